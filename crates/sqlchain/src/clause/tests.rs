use super::*;
use crate::arg::raw;
use crate::comparator;
use crate::dialect::{Dialect, Mysql, Postgres, Sqlite};
use crate::qb::{Query, SqlQuery};
use serde_json::json;

macro_rules! calls {
    ($($method:literal $(, $arg:expr)*);* $(;)?) => {
        vec![$(($method, vec![$(Arg::from($arg)),*])),*]
    };
}

type Calls = Vec<(&'static str, Vec<Arg>)>;

fn query(dialect: impl Dialect + 'static, calls: Calls) -> Result<Query, QueryBuilderError> {
    calls
        .into_iter()
        .try_fold(Query::new(dialect), |q, (method, args)| q.call(method, args))
}

fn sql(calls: Calls) -> String {
    query(Sqlite, calls).and_then(|q| q.sql()).unwrap()
}

fn error(calls: Calls) -> String {
    query(Sqlite, calls)
        .and_then(|q| q.sql())
        .unwrap_err()
        .to_string()
}

fn values(calls: Calls) -> Vec<Value> {
    query(Sqlite, calls).and_then(|q| q.values()).unwrap()
}

#[test]
fn select_string_splits_on_spaces_and_commas() {
    assert_eq!(sql(calls!["select", "id, email  name"]), r#"SELECT "id", "email", "name""#);
}

#[test]
fn select_list_gives_aliases() {
    assert_eq!(
        sql(calls!["select", ("id", "user_id"); "select", ("users", "name", "n")]),
        r#"SELECT "id" AS "user_id", "users"."name" AS "n""#
    );
}

#[test]
fn select_object_forms() {
    assert_eq!(
        sql(calls!["select", json!({"column": "name", "table": "u", "as": "n"})]),
        r#"SELECT "u"."name" AS "n""#
    );
    assert_eq!(
        sql(calls!["select", json!({"columns": "id name", "prefix": "user_"})]),
        r#"SELECT "id" AS "user_id", "name" AS "user_name""#
    );
    assert_eq!(
        error(calls!["select", json!({"colour": "red"})]),
        r#"Invalid object with "colour" properties specified for query builder "select" component."#
    );
}

#[test]
fn select_raw_is_verbatim() {
    assert_eq!(
        sql(calls!["select", raw("COUNT(*) AS n")]),
        "SELECT COUNT(*) AS n"
    );
}

#[test]
fn select_ignores_current_table() {
    assert_eq!(
        sql(calls!["from", "users"; "select", "id"]),
        "SELECT \"id\"\nFROM \"users\""
    );
}

#[test]
fn columns_use_table_and_prefix() {
    assert_eq!(
        sql(calls!["from", "users"; "prefix", "user_"; "columns", "id name"]),
        "SELECT \"users\".\"id\" AS \"user_id\", \"users\".\"name\" AS \"user_name\"\nFROM \"users\""
    );
    assert_eq!(
        sql(calls!["from", ("users", "u"); "columns", "*"]),
        "SELECT \"u\".*\nFROM \"users\" AS \"u\""
    );
    assert_eq!(
        sql(calls!["table", "people"; "columns", "id"]),
        r#"SELECT "people"."id""#
    );
}

#[test]
fn from_shapes() {
    assert_eq!(sql(calls!["from", "users orders"]), r#"FROM "users", "orders""#);
    assert_eq!(
        sql(calls!["from", json!({"table": "public.users", "as": "u"})]),
        r#"FROM "public"."users" AS "u""#
    );
    assert_eq!(
        error(calls!["from", ("a", "b", "c")]),
        r#"Invalid array with 3 items specified for query builder "from" component."#
    );
}

#[test]
fn join_strings_pick_the_join_type() {
    for (join, keyword) in [
        ("users.id=orders.user_id", "JOIN"),
        ("users.id=>orders.user_id", "LEFT JOIN"),
        ("users.id<=orders.user_id", "RIGHT JOIN"),
        ("users.id<=>orders.user_id", "FULL JOIN"),
    ] {
        assert_eq!(
            sql(calls!["from", "users"; "join", join]),
            format!(
                "FROM \"users\"\n{keyword} \"orders\" ON \"users\".\"id\" = \"orders\".\"user_id\""
            ),
            "{join}"
        );
    }
}

#[test]
fn join_from_column_is_used_as_written() {
    assert_eq!(
        sql(calls!["from", "users"; "join", "id=orders.user_id"]),
        "FROM \"users\"\nJOIN \"orders\" ON \"id\" = \"orders\".\"user_id\""
    );
}

#[test]
fn chained_joins_keep_their_own_qualifiers() {
    assert_eq!(
        sql(calls![
            "from", "users";
            "join", "users.id=orders.user_id";
            "join", "orders.product_id=products.id";
        ]),
        "FROM \"users\"\n\
         JOIN \"orders\" ON \"users\".\"id\" = \"orders\".\"user_id\"\n\
         JOIN \"products\" ON \"orders\".\"product_id\" = \"products\".\"id\""
    );
}

#[test]
fn join_lists_and_objects() {
    assert_eq!(
        sql(calls![
            "from", "users";
            "join", ("left", "users.id", "orders.user_id");
            "join", ("inner", "users.team_id", "teams", "id");
            "join", json!({"type": "right", "table": "pets", "from": "users.id", "to": "owner_id"});
            "join", ("orders.id", "items.order_id");
        ]),
        "FROM \"users\"\n\
         LEFT JOIN \"orders\" ON \"users\".\"id\" = \"orders\".\"user_id\"\n\
         JOIN \"teams\" ON \"users\".\"team_id\" = \"teams\".\"id\"\n\
         RIGHT JOIN \"pets\" ON \"users\".\"id\" = \"pets\".\"owner_id\"\n\
         JOIN \"items\" ON \"orders\".\"id\" = \"items\".\"order_id\""
    );
}

#[test]
fn join_errors() {
    assert_eq!(
        error(calls!["from", "users"; "join", ("sideways", "id", "orders.user_id")]),
        r#"Invalid join type "sideways" specified for query builder "join" component.  Valid types are "inner", "left", "right" and "full"."#
    );
    assert!(
        error(calls!["from", "users"; "join", "id-orders"])
            .starts_with(r#"Invalid join string "id-orders" specified for query builder "join" component."#)
    );
    assert_eq!(
        error(calls!["from", "users"; "join", json!({"on": "id"})]),
        r#"Invalid object with "on" properties specified for query builder "join" component.  Valid properties are "type", "table", "from" and "to"."#
    );
}

#[test]
fn where_string_defers_values() {
    let q = query(Sqlite, calls!["select", "*"; "from", "users"; "where", "name email"]).unwrap();
    assert_eq!(
        q.sql().unwrap(),
        "SELECT *\nFROM \"users\"\nWHERE \"name\" = ? AND \"email\" = ?"
    );
    assert_eq!(
        q.values().unwrap_err(),
        QueryBuilderError::MissingValues {
            expected: 2,
            got: 0
        }
    );
    assert_eq!(
        q.all_values(&[Value::from("Bobby"), Value::from("b@example.com")])
            .unwrap(),
        vec![Value::from("Bobby"), Value::from("b@example.com")]
    );
}

#[test]
fn where_comparisons() {
    let q = query(
        Sqlite,
        calls![
            "select", "*";
            "from", "users";
            "where", ("age", ">", 21);
            "where", ("name", "like", "B%");
            "where", ("score", vec!["<="]);
        ],
    )
    .unwrap();
    assert_eq!(
        q.sql().unwrap(),
        "SELECT *\nFROM \"users\"\nWHERE \"age\" > ? AND \"name\" LIKE ? AND \"score\" <= ?"
    );
    assert_eq!(
        q.all_values(&[Value::Int(90)]).unwrap(),
        vec![Value::Int(21), Value::from("B%"), Value::Int(90)]
    );
}

#[test]
fn in_forms_agree() {
    let forms = [
        Arg::from(("id", "in", vec![1, 2, 3])),
        Arg::from(("id", ("in", vec![1, 2, 3]))),
        Arg::from(json!({"id": {"isIn": [1, 2, 3]}})),
        Arg::object([("id", comparator::is_in([1, 2, 3]))]),
    ];
    for form in forms {
        let calls = vec![("where", vec![form.clone()])];
        assert_eq!(sql(calls.clone()), r#"WHERE "id" IN (?,?,?)"#, "{form}");
        assert_eq!(
            values(calls),
            vec![Value::Int(1), Value::Int(2), Value::Int(3)]
        );
    }
    assert_eq!(sql(calls!["where", ("id", "not in", vec![1])]), r#"WHERE "id" NOT IN (?)"#);
    assert_eq!(sql(calls!["where", ("id", "in", 5)]), r#"WHERE "id" IN (?)"#);
}

#[test]
fn empty_in_lists_are_constant() {
    assert_eq!(sql(calls!["where", ("id", "in", Vec::<i32>::new())]), "WHERE 1=0");
    assert_eq!(sql(calls!["where", ("id", "not in", Vec::<i32>::new())]), "WHERE 1=1");
    assert!(values(calls!["where", ("id", "in", Vec::<i32>::new())]).is_empty());
}

#[test]
fn in_needs_values() {
    assert_eq!(
        error(calls!["where", ("id", vec!["in"])]),
        r#"The "IN" comparison for query builder "where" component needs a list of values."#
    );
}

#[test]
fn null_comparisons() {
    assert_eq!(sql(calls!["where", ("deleted_at", ())]), r#"WHERE "deleted_at" IS NULL"#);
    assert_eq!(
        sql(calls!["where", ("deleted_at", "!=", ())]),
        r#"WHERE "deleted_at" IS NOT NULL"#
    );
    assert_eq!(
        sql(calls!["where", json!({"a": {"isNull": true}, "b": {"notNull": true}, "c": {"isNull": false}})]),
        r#"WHERE "a" IS NULL AND "b" IS NOT NULL AND "c" IS NOT NULL"#
    );
    assert_eq!(
        error(calls!["where", ("deleted_at", ">", ())]),
        r#"Cannot compare NULL using ">" in query builder "where" component."#
    );
}

#[test]
fn unknown_operators_and_comparators() {
    assert_eq!(
        error(calls!["where", ("a", "between", 1)]),
        r#"Invalid comparison operator "between" specified for query builder "where" component."#
    );
    let message = error(calls!["where", json!({"a": {"between": 1}})]);
    assert!(message.starts_with(
        r#"Invalid comparison "between" specified for query builder "where" component.  Valid comparisons are "eq", "ne""#
    ));
    assert!(message.ends_with(r#"and "notNull"."#));
    assert_eq!(
        error(calls!["where", 5]),
        "Invalid value specified for query builder \"where\" component: 5"
    );
}

#[test]
fn raw_and_function_predicates() {
    assert_eq!(
        sql(calls!["where", ("created_at", "<", raw("NOW()")); "where", raw("1 = 1")]),
        r#"WHERE "created_at" < NOW() AND 1 = 1"#
    );
    let func = Arg::func(|link| {
        link.push("2 = 2");
        Ok(())
    });
    assert_eq!(sql(vec![("where", vec![func])]), "WHERE 2 = 2");
}

#[test]
fn object_predicates_keep_key_order() {
    let calls = calls!["where", json!({"status": "active", "age": {"gt": 21, "lt": 65}})];
    assert_eq!(
        sql(calls.clone()),
        r#"WHERE "status" = ? AND "age" > ? AND "age" < ?"#
    );
    assert_eq!(
        values(calls),
        vec![Value::from("active"), Value::Int(21), Value::Int(65)]
    );
}

#[test]
fn having_binds_after_where() {
    let calls = calls![
        "select", "team";
        "from", "users";
        "group", "team";
        "having", ("count", ">", 3);
        "where", ("active", true);
    ];
    assert_eq!(
        sql(calls.clone()),
        "SELECT \"team\"\nFROM \"users\"\nWHERE \"active\" = ?\nGROUP BY \"team\"\nHAVING \"count\" > ?"
    );
    assert_eq!(values(calls), vec![Value::Bool(true), Value::Int(3)]);
}

#[test]
fn set_assignments() {
    let q = query(
        Postgres,
        calls![
            "update", "users";
            "where", ("id", 7);
            "set", ("name", "Bobby");
            "set", json!({"age": 30, "bio": null});
            "set", ("updated_at", raw("NOW()"));
        ],
    )
    .unwrap();
    assert_eq!(
        q.sql().unwrap(),
        "UPDATE \"users\"\nSET \"name\" = $1, \"age\" = $2, \"bio\" = $3, \"updated_at\" = NOW()\nWHERE \"id\" = $4"
    );
    assert_eq!(
        q.values().unwrap(),
        vec![Value::from("Bobby"), Value::Int(30), Value::Null, Value::Int(7)]
    );

    let q = query(Sqlite, calls!["update", "users"; "set", "name email"]).unwrap();
    assert_eq!(q.sql().unwrap(), "UPDATE \"users\"\nSET \"name\" = ?, \"email\" = ?");
    assert_eq!(q.context().unwrap().deferred_count(), 2);

    assert_eq!(
        error(calls!["update", "users"; "set", ("a", "=", 1)]),
        r#"Invalid array with 3 items specified for query builder "set" component."#
    );
}

#[test]
fn order_shapes() {
    assert_eq!(
        sql(calls!["select", "*"; "from", "t"; "order", "name DESC, id"]),
        "SELECT *\nFROM \"t\"\nORDER BY \"name\" DESC, \"id\""
    );
    assert_eq!(
        sql(calls!["select", "*"; "order", ("name id", "desc")]),
        "SELECT *\nORDER BY \"name\" DESC, \"id\" DESC"
    );
    assert_eq!(
        sql(calls!["select", "*"; "order_by", json!({"column": "name", "table": "u", "desc": true})]),
        "SELECT *\nORDER BY \"u\".\"name\" DESC"
    );
    assert_eq!(
        error(calls!["select", "*"; "order", ("name", "sideways")]),
        r#"Invalid sort direction "sideways" specified for query builder "order" component.  Valid directions are "ASC" and "DESC"."#
    );
    assert_eq!(
        error(calls!["select", "*"; "order", "DESC name"]),
        r#"Invalid order string "DESC name" specified for query builder "order" component: a direction must follow a column."#
    );
}

#[test]
fn group_shapes() {
    assert_eq!(
        sql(calls!["select", "*"; "group", "a b"; "groupBy", ("c", "d e")]),
        "SELECT *\nGROUP BY \"a\", \"b\", \"c\", \"d\", \"e\""
    );
}

#[test]
fn limit_and_offset_are_literal_and_last_wins() {
    let calls = calls!["select", "*"; "from", "t"; "limit", 10; "limit", "20"; "offset", 5];
    assert_eq!(sql(calls.clone()), "SELECT *\nFROM \"t\"\nLIMIT 20\nOFFSET 5");
    assert!(values(calls).is_empty());
    assert_eq!(
        error(calls!["select", "*"; "limit", -1]),
        "Invalid value specified for query builder \"limit\" component: -1"
    );
}

#[test]
fn range_forms_agree() {
    let forms = [
        vec![Arg::from((10, 19))],
        vec![Arg::from(10), Arg::from(19)],
        vec![Arg::from(json!({"from": 10, "to": 19}))],
        vec![Arg::from(json!({"limit": 10, "offset": 10}))],
    ];
    for args in forms {
        let calls = vec![
            ("select", vec![Arg::from("*")]),
            ("from", vec![Arg::from("t")]),
            ("range", args),
        ];
        assert_eq!(sql(calls), "SELECT *\nFROM \"t\"\nLIMIT 10\nOFFSET 10");
    }
}

#[test]
fn range_with_only_a_start_is_an_offset() {
    assert_eq!(
        sql(calls!["select", "*"; "range", 100]),
        sql(calls!["select", "*"; "range", json!({"offset": 100})])
    );
}

#[test]
fn range_replaces_an_earlier_window() {
    assert_eq!(
        sql(calls!["select", "*"; "range", (10, 19); "range", 100]),
        "SELECT *\nOFFSET 100"
    );
    assert_eq!(
        sql(calls!["select", "*"; "limit", 5; "offset", 7; "range", json!({"offset": 3})]),
        "SELECT *\nOFFSET 3"
    );
    assert_eq!(
        sql(calls!["select", "*"; "range", 100; "limit", 5]),
        "SELECT *\nLIMIT 5\nOFFSET 100"
    );
}

#[test]
fn range_edges() {
    assert_eq!(sql(calls!["select", "*"; "range", 5]), "SELECT *\nOFFSET 5");
    assert_eq!(
        sql(calls!["select", "*"; "range", (10, 19); "limit", 5]),
        "SELECT *\nLIMIT 5\nOFFSET 10"
    );
    assert_eq!(
        error(calls!["select", "*"; "range", (5, 3)]),
        "Invalid value specified for query builder \"range\" component: 5..3"
    );
}

#[test]
fn returning_depends_on_dialect() {
    let calls = calls!["update", "users"; "set", ("a", 1); "returning", "id"];
    assert_eq!(
        query(Postgres, calls.clone()).and_then(|q| q.sql()).unwrap(),
        "UPDATE \"users\"\nSET \"a\" = $1\nRETURNING \"id\""
    );
    assert_eq!(
        query(Mysql, calls).and_then(|q| q.sql()).unwrap_err(),
        QueryBuilderError::Unsupported("The mysql dialect does not support RETURNING".into())
    );
}

#[test]
fn with_expressions() {
    assert_eq!(
        sql(calls!["with", ("recent", raw("SELECT 1")); "select", "*"; "from", "recent"]),
        "WITH \"recent\" AS (SELECT 1)\nSELECT *\nFROM \"recent\""
    );
    let object = Arg::object([
        ("name", Arg::from("recent")),
        ("query", Arg::from(raw("SELECT 2"))),
    ]);
    assert_eq!(
        sql(vec![("with", vec![object])]),
        "WITH \"recent\" AS (SELECT 2)"
    );
    assert_eq!(
        error(calls!["with", ("recent", "SELECT 1")]),
        "Invalid argument specified for query builder \"with\" component: SELECT 1"
    );
}

#[test]
fn insert_into_values() {
    let calls = calls![
        "insert", "name email";
        "into", "users";
        "values", ("Bobby", "bobby@example.com");
    ];
    assert_eq!(
        sql(calls.clone()),
        "INSERT\nINTO \"users\" (\"name\", \"email\") VALUES (?, ?)"
    );
    assert_eq!(
        values(calls),
        vec![Value::from("Bobby"), Value::from("bobby@example.com")]
    );
}

#[test]
fn insert_values_before_into_are_held() {
    let q = query(
        Sqlite,
        calls!["insert", "a b"; "values", ("x", "y"); "into", "t"],
    )
    .unwrap();
    assert_eq!(q.sql().unwrap(), "INSERT\nINTO \"t\" (\"a\", \"b\") VALUES (?, ?)");
    assert_eq!(q.values().unwrap(), vec![Value::from("x"), Value::from("y")]);

    let q = query(
        Postgres,
        calls!["insert", "a b c"; "values", 1; "into", "t"; "values", 2],
    )
    .unwrap();
    assert_eq!(q.sql().unwrap(), "INSERT\nINTO \"t\" (\"a\", \"b\", \"c\") VALUES ($1, $2, $3)");
    assert_eq!(
        q.all_values(&[Value::Int(3)]).unwrap(),
        vec![Value::Int(1), Value::Int(2), Value::Int(3)]
    );

    let q = query(Sqlite, calls!["insert", "a"; "values", (1, 2); "into", "t"]).unwrap();
    assert_eq!(
        q.sql().unwrap_err(),
        QueryBuilderError::BindMismatch {
            placeholders: 1,
            values: 2
        }
    );
}

#[test]
fn insert_values_can_arrive_at_execution() {
    let q = query(
        Sqlite,
        calls!["insert", "name email"; "into", "users"; "values", "Bobby"],
    )
    .unwrap();
    assert_eq!(
        q.values().unwrap_err(),
        QueryBuilderError::MissingValues {
            expected: 1,
            got: 0
        }
    );
    assert_eq!(
        q.all_values(&[Value::from("b@example.com")]).unwrap(),
        vec![Value::from("Bobby"), Value::from("b@example.com")]
    );

    let q = query(Sqlite, calls!["insert", "a b"; "into", "t"; "values", (1, 2, 3)]).unwrap();
    assert_eq!(
        q.sql().unwrap_err(),
        QueryBuilderError::BindMismatch {
            placeholders: 2,
            values: 3
        }
    );
    assert_eq!(
        error(calls!["insert", "a"; "into", "t"; "values", json!({"a": 1})]),
        "Invalid argument specified for query builder \"values\" component: {a: 1}"
    );
}

#[test]
fn generated_keys_follow_returning_support() {
    let calls = calls!["insert", "name"; "into", "users"];
    let ctx = query(Postgres, calls.clone()).unwrap().context().unwrap();
    assert!(ctx.generated_keys());
    let ctx = query(Mysql, calls).unwrap().context().unwrap();
    assert!(!ctx.generated_keys());
}

#[test]
fn delete_shapes() {
    assert_eq!(
        sql(calls!["delete"; "from", "users"; "where", ("id", 1)]),
        "DELETE\nFROM \"users\"\nWHERE \"id\" = ?"
    );
    assert_eq!(
        sql(calls!["delete", "a"; "from", "a b"]),
        "DELETE \"a\"\nFROM \"a\", \"b\""
    );
}

#[test]
fn missing_handlers_are_loud() {
    let err = query(Sqlite, calls!["table", ("a", "b")])
        .and_then(|q| q.sql())
        .unwrap_err();
    assert_eq!(
        err,
        QueryBuilderError::NotImplemented {
            method: "table",
            handler: "resolve_list"
        }
    );
    assert_eq!(
        err.to_string(),
        "resolve_list() is not implemented in base class for \"table\""
    );
}

#[test]
fn query_kinds() {
    assert_eq!(QueryKind::Insert.article(), "an");
    assert_eq!(QueryKind::Delete.article(), "a");
    assert_eq!(QueryKind::Update.to_string(), "UPDATE");
    assert!(QueryKind::Select.allows("range"));
    assert!(!QueryKind::Insert.allows("where"));
}

#[test]
fn methods_outside_the_query_kind_are_refused() {
    for (calls, message) in [
        (
            calls!["update", "users"; "select", "id"],
            r#"The "select" method is not allowed in an UPDATE query"#,
        ),
        (
            calls!["insert", "a"; "where", ("a", 1)],
            r#"The "where" method is not allowed in an INSERT query"#,
        ),
        (
            calls!["select", "*"; "set", ("a", 1)],
            r#"The "set" method is not allowed in a SELECT query"#,
        ),
        (
            calls!["delete"; "limit", 1],
            r#"The "limit" method is not allowed in a DELETE query"#,
        ),
    ] {
        let err = query(Sqlite, calls).unwrap_err();
        assert!(err.is_not_allowed());
        assert_eq!(err.to_string(), message);
    }
}

#[test]
fn unknown_methods_are_refused() {
    let err = Query::new(Sqlite).call("frobnicate", Vec::new()).unwrap_err();
    assert_eq!(err.to_string(), "Invalid query builder method: frobnicate");
}
