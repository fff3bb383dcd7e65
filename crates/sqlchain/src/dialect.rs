//! Dialect adapters: identifier quoting and placeholder syntax.
//!
//! The builder never hard-codes either. Clauses ask the active [`Dialect`]
//! to quote names and to shape predicates, and placeholder tokens are turned
//! into `?` or `$n` by [`Dialect::format_placeholder`] at render time.

use crate::fragment::Fragment;
use serde::Deserialize;
use std::fmt::Debug;

/// Dialect-specific SQL rendering.
///
/// Only [`name`](Dialect::name) and
/// [`format_placeholder`](Dialect::format_placeholder) are required; the
/// predicate renderers default to ANSI syntax. Column arguments of the
/// `format_*` methods are already quoted.
pub trait Dialect: Debug + Send + Sync {
    /// Short dialect name used in messages.
    fn name(&self) -> &str;

    /// Placeholder for the `n`-th (1-based) bind value.
    fn format_placeholder(&self, n: usize) -> String;

    /// Character used to quote identifiers.
    fn quote_char(&self) -> char {
        '"'
    }

    /// Whether `RETURNING` is supported.
    fn returning(&self) -> bool {
        false
    }

    /// Quote a single identifier. `*` passes through.
    fn quote(&self, ident: &str) -> String {
        if ident == "*" {
            return ident.to_string();
        }
        let q = self.quote_char();
        let mut out = String::with_capacity(ident.len() + 2);
        out.push(q);
        for ch in ident.chars() {
            if ch == q {
                out.push(q);
            }
            out.push(ch);
        }
        out.push(q);
        out
    }

    /// Quote a dotted path such as `schema.table` or `table.column`.
    fn quote_path(&self, path: &str) -> String {
        path.split('.')
            .map(|part| self.quote(part))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Quote `column`, qualifying it with `table` unless it is already dotted.
    fn quote_table_column(&self, table: Option<&str>, column: &str) -> String {
        match table {
            Some(table) if !column.contains('.') => {
                format!("{}.{}", self.quote_path(table), self.quote(column))
            }
            _ => self.quote_path(column),
        }
    }

    /// `column <op> ?`
    fn format_where_placeholder(&self, column: &str, op: &str) -> Fragment {
        let mut f = Fragment::new(format!("{column} {op} "));
        f.push_param();
        f
    }

    /// `column <op> (?,?,...)`
    fn format_where_in_placeholder(&self, column: &str, op: &str, count: usize) -> Fragment {
        let mut f = Fragment::new(format!("{column} {op} ("));
        f.push_params(count, ",").push(")");
        f
    }

    /// `column IS NULL`
    fn format_where_null(&self, column: &str) -> Fragment {
        Fragment::new(format!("{column} IS NULL"))
    }

    /// `column IS NOT NULL`
    fn format_where_not_null(&self, column: &str) -> Fragment {
        Fragment::new(format!("{column} IS NOT NULL"))
    }

    /// `column = ?` inside `SET`
    fn format_set_placeholder(&self, column: &str) -> Fragment {
        let mut f = Fragment::new(format!("{column} = "));
        f.push_param();
        f
    }
}

/// PostgreSQL: `$n` placeholders, double-quoted identifiers, `RETURNING`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Postgres;

impl Dialect for Postgres {
    fn name(&self) -> &str {
        "postgres"
    }

    fn format_placeholder(&self, n: usize) -> String {
        format!("${n}")
    }

    fn returning(&self) -> bool {
        true
    }
}

/// SQLite: `?` placeholders, double-quoted identifiers, `RETURNING` (3.35+).
#[derive(Debug, Clone, Copy, Default)]
pub struct Sqlite;

impl Dialect for Sqlite {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn format_placeholder(&self, _n: usize) -> String {
        "?".to_string()
    }

    fn returning(&self) -> bool {
        true
    }
}

/// MySQL: `?` placeholders, backtick-quoted identifiers, no `RETURNING`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mysql;

impl Dialect for Mysql {
    fn name(&self) -> &str {
        "mysql"
    }

    fn format_placeholder(&self, _n: usize) -> String {
        "?".to_string()
    }

    fn quote_char(&self) -> char {
        '`'
    }
}

/// Placeholder syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderStyle {
    /// `?`
    #[default]
    Positional,
    /// `$1`, `$2`, ...
    Numbered,
}

fn default_name() -> String {
    "generic".to_string()
}

fn default_quote() -> char {
    '"'
}

/// Configuration for a [`GenericDialect`].
///
/// ```ignore
/// let config: DialectConfig = serde_json::from_str(r#"{"name": "duck", "placeholder": "numbered"}"#)?;
/// let dialect = GenericDialect::new(config);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DialectConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_quote")]
    pub quote: char,
    #[serde(default)]
    pub placeholder: PlaceholderStyle,
    #[serde(default)]
    pub returning: bool,
}

impl Default for DialectConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            quote: default_quote(),
            placeholder: PlaceholderStyle::default(),
            returning: false,
        }
    }
}

/// A dialect assembled from a [`DialectConfig`].
#[derive(Debug, Clone, Default)]
pub struct GenericDialect {
    config: DialectConfig,
}

impl GenericDialect {
    pub fn new(config: DialectConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DialectConfig {
        &self.config
    }
}

impl Dialect for GenericDialect {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn format_placeholder(&self, n: usize) -> String {
        match self.config.placeholder {
            PlaceholderStyle::Positional => "?".to_string(),
            PlaceholderStyle::Numbered => format!("${n}"),
        }
    }

    fn quote_char(&self) -> char {
        self.config.quote
    }

    fn returning(&self) -> bool {
        self.config.returning
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_doubles_embedded_quotes() {
        assert_eq!(Postgres.quote("users"), r#""users""#);
        assert_eq!(Postgres.quote(r#"we"ird"#), r#""we""ird""#);
        assert_eq!(Mysql.quote("users"), "`users`");
        assert_eq!(Mysql.quote("a`b"), "`a``b`");
        assert_eq!(Postgres.quote("*"), "*");
    }

    #[test]
    fn quote_table_column_respects_explicit_table() {
        assert_eq!(
            Postgres.quote_table_column(Some("users"), "id"),
            r#""users"."id""#
        );
        assert_eq!(
            Postgres.quote_table_column(Some("users"), "orders.id"),
            r#""orders"."id""#
        );
        assert_eq!(Postgres.quote_table_column(None, "u.*"), r#""u".*"#);
    }

    #[test]
    fn where_in_has_no_spaces_between_placeholders() {
        let f = Sqlite.format_where_in_placeholder(r#""a""#, "IN", 3);
        assert_eq!(f.to_sql(&Sqlite), r#""a" IN (?,?,?)"#);
    }

    #[test]
    fn generic_dialect_from_config() {
        let config: DialectConfig =
            serde_json::from_str(r#"{"name": "duck", "placeholder": "numbered", "returning": true}"#)
                .unwrap();
        let d = GenericDialect::new(config);
        assert_eq!(d.name(), "duck");
        assert_eq!(d.format_placeholder(2), "$2");
        assert!(d.returning());
        assert_eq!(d.quote("x"), r#""x""#);
    }

    #[test]
    fn generic_dialect_defaults() {
        let config: DialectConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, DialectConfig::default());
        assert_eq!(GenericDialect::new(config).format_placeholder(7), "?");
    }
}
