//! Registering a clause outside the built-in set.

use sqlchain::messages::MessageTable;
use sqlchain::prelude::*;
use sqlchain::{DialectConfig, GenericDialect};
use std::sync::Arc;

const LOCK_MODES: &[&str] = &["UPDATE", "SHARE", "NO KEY UPDATE", "KEY SHARE"];

/// `FOR UPDATE` and friends. Only valid on SELECT.
#[derive(Debug)]
struct Lock;

impl Clause for Lock {
    fn method(&self) -> &'static str {
        "lock"
    }

    fn slot(&self) -> Option<&'static str> {
        Some("lock")
    }

    fn build_order(&self) -> Option<u32> {
        Some(98)
    }

    fn keyword(&self) -> &'static str {
        "FOR"
    }

    fn replaces_slot(&self) -> bool {
        true
    }

    fn valid_for(&self) -> &'static [QueryKind] {
        &[QueryKind::Select]
    }

    fn messages(&self) -> MessageTable {
        &[(
            "mode",
            "Invalid lock mode \"<mode>\" specified for query builder \"<method>\" component.",
        )]
    }

    fn resolve_string(&self, link: &mut Link<'_>, s: &str) -> std::result::Result<(), QueryBuilderError> {
        let mode = s.split_whitespace().collect::<Vec<_>>().join(" ").to_ascii_uppercase();
        if !LOCK_MODES.contains(&mode.as_str()) {
            return Err(link.fail("mode", &[("mode", s)]));
        }
        link.push(mode);
        Ok(())
    }
}

/// Optimizer hint comment placed ahead of the statement.
#[derive(Debug)]
struct Hint;

impl Clause for Hint {
    fn method(&self) -> &'static str {
        "hint"
    }

    fn slot(&self) -> Option<&'static str> {
        Some("hint")
    }

    fn build_order(&self) -> Option<u32> {
        Some(5)
    }

    fn joint(&self) -> &'static str {
        " "
    }

    fn valid_for(&self) -> &'static [QueryKind] {
        &[QueryKind::Select, QueryKind::Insert]
    }

    fn resolve_string(&self, link: &mut Link<'_>, s: &str) -> std::result::Result<(), QueryBuilderError> {
        link.push(format!("/*+ {} */", s.trim()));
        Ok(())
    }
}

fn builder() -> QueryBuilder {
    let mut registry = Registry::standard();
    registry.register(Lock).register(Hint);
    QueryBuilder::with_registry(Arc::new(registry), Postgres)
}

#[test]
fn custom_clause_renders_in_build_order() {
    let q = builder()
        .from("jobs")
        .select("id")
        .call("lock", [Arg::from("no key update")])
        .where_(("state", "queued"))
        .limit(1);
    assert_eq!(
        q.sql().unwrap(),
        "SELECT \"id\"\nFROM \"jobs\"\nWHERE \"state\" = $1\nLIMIT 1\nFOR NO KEY UPDATE"
    );
    assert_eq!(q.values().unwrap(), vec![Value::from("queued")]);
}

#[test]
fn last_lock_wins() {
    let q = builder()
        .select("id")
        .from("jobs")
        .call("lock", [Arg::from("share")])
        .call("lock", [Arg::from("update")]);
    assert_eq!(q.sql().unwrap(), "SELECT \"id\"\nFROM \"jobs\"\nFOR UPDATE");
}

#[test]
fn custom_clause_respects_query_kind() {
    let q = builder()
        .update("jobs")
        .set(("state", "done"))
        .call("lock", [Arg::from("update")]);
    let err = q.sql().unwrap_err();
    assert_eq!(
        err.to_string(),
        "The \"lock\" method is not allowed in an UPDATE query"
    );
}

#[test]
fn whitelisted_query_kinds() {
    let q = builder()
        .select("id")
        .from("jobs")
        .call("hint", [Arg::from("parallel(4)")]);
    assert_eq!(
        q.sql().unwrap(),
        "/*+ parallel(4) */\nSELECT \"id\"\nFROM \"jobs\""
    );

    let q = builder()
        .insert("id")
        .into("jobs")
        .values(1)
        .call("hint", [Arg::from("append")]);
    assert_eq!(
        q.sql().unwrap(),
        "/*+ append */\nINSERT\nINTO \"jobs\" (\"id\") VALUES ($1)"
    );

    let q = builder()
        .update("jobs")
        .set(("a", 1))
        .call("hint", [Arg::from("x")]);
    assert_eq!(
        q.sql().unwrap_err().to_string(),
        "The \"hint\" method is not allowed in an UPDATE query"
    );

    let q = builder().delete().from("jobs").call("hint", [Arg::from("x")]);
    assert_eq!(
        q.sql().unwrap_err().to_string(),
        "The \"hint\" method is not allowed in a DELETE query"
    );
}

#[test]
fn custom_clause_uses_its_own_messages() {
    let q = builder()
        .select("id")
        .call("lock", [Arg::from("everything")]);
    assert_eq!(
        q.sql().unwrap_err().to_string(),
        "Invalid lock mode \"everything\" specified for query builder \"lock\" component."
    );

    let q = builder().select("id").call("lock", [Arg::from(("a", "b"))]);
    assert_eq!(
        q.sql().unwrap_err(),
        QueryBuilderError::NotImplemented {
            method: "lock",
            handler: "resolve_list"
        }
    );
}

#[test]
fn standard_registry_does_not_know_custom_methods() {
    let q = qb::postgres().select("id").call("lock", [Arg::from("update")]);
    assert_eq!(
        q.sql().unwrap_err(),
        QueryBuilderError::UnknownMethod("lock".into())
    );
}

#[test]
fn configured_dialect() {
    let config: DialectConfig = serde_json::from_str(
        r#"{"name": "duck", "quote": "`", "placeholder": "numbered", "returning": true}"#,
    )
    .unwrap();
    let q = qb::builder(GenericDialect::new(config))
        .update("t")
        .set(("a", 1))
        .where_(("b", 2))
        .returning("id");
    assert_eq!(
        q.sql().unwrap(),
        "UPDATE `t`\nSET `a` = $1\nWHERE `b` = $2\nRETURNING `id`"
    );
}
