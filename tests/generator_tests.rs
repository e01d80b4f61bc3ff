//! Generator tests against a scripted database.

mod support;

use pretty_assertions::assert_eq;
use shroud::prelude::*;
use support::{Call, Failure, ScriptedDb};

fn foo_generator() -> Generator {
    let foo = Table::builder()
        .transform("bar", Static::new("var", "TEXT"))
        .transform("unknown", Static::new("value", "TEXT"))
        .build();
    Generator::builder(PostgresQueryBuilder).table("foo", foo).build()
}

#[tokio::test]
async fn test_create_views_end_to_end() {
    let generator = Generator::builder(PostgresQueryBuilder)
        .table("t", Table::builder().transform("bar", Static::new("var", "TEXT")).build())
        .build();
    let db = ScriptedDb::new().table("t", &["id", "bar"]);

    let created = generator.create_views(&db).await.unwrap();

    assert_eq!(created, 1);
    assert_eq!(
        generator.column_fragments("t", &["id".to_string(), "bar".to_string()]),
        vec!["t.id AS id".to_string(), "'var'::TEXT AS bar".to_string()]
    );
    assert_eq!(
        db.executed(),
        vec!["CREATE OR REPLACE VIEW t_anonymized AS SELECT t.id AS id, 'var'::TEXT AS bar FROM t".to_string()]
    );
    assert_eq!(db.views(), vec!["t_anonymized".to_string()]);
}

#[tokio::test]
async fn test_create_views_issues_queries_in_order() {
    let generator = foo_generator();
    let db = ScriptedDb::new()
        .table("foo", &["id", "bar"])
        .table("foo2", &["id", "baz"]);
    let qb = PostgresQueryBuilder;

    generator.create_views(&db).await.unwrap();

    assert_eq!(
        db.calls(),
        vec![
            Call::Query {
                sql: qb.list_tables_query().to_string(),
                bind: None
            },
            Call::Query {
                sql: qb.list_columns_query().to_string(),
                bind: Some("foo".to_string())
            },
            Call::Execute(
                "CREATE OR REPLACE VIEW foo_anonymized AS SELECT foo.id AS id, 'var'::TEXT AS bar FROM foo"
                    .to_string()
            ),
            Call::Query {
                sql: qb.list_columns_query().to_string(),
                bind: Some("foo2".to_string())
            },
            Call::Execute(
                "CREATE OR REPLACE VIEW foo2_anonymized AS SELECT foo2.id AS id, foo2.baz AS baz FROM foo2"
                    .to_string()
            ),
        ]
    );
}

#[tokio::test]
async fn test_create_views_table_selection_fails() {
    let db = ScriptedDb::new()
        .table("foo", &["id", "bar"])
        .fail(Failure::ListTables);

    let err = foo_generator().create_views(&db).await.unwrap_err();

    assert!(matches!(err, ShroudError::ListTables(_)));
    assert!(err.is_introspection());
    assert!(err.to_string().starts_with("Failed to select tables: "));
    assert!(db.executed().is_empty());
}

#[tokio::test]
async fn test_create_views_column_selection_fails() {
    let db = ScriptedDb::new()
        .table("foo", &["id", "bar"])
        .table("foo2", &["id"])
        .fail(Failure::ListColumns("foo".to_string()));

    let err = foo_generator().create_views(&db).await.unwrap_err();

    match err {
        ShroudError::ListColumns { table, .. } => assert_eq!(table, "foo"),
        other => panic!("unexpected error: {}", other),
    }
    assert!(db.executed().is_empty());
}

#[tokio::test]
async fn test_create_views_stops_at_failed_view() {
    let db = ScriptedDb::new()
        .table("foo", &["id", "bar"])
        .table("foo2", &["id"])
        .table("foo3", &["id"])
        .fail(Failure::Statement("VIEW foo2_anonymized".to_string()));

    let err = foo_generator().create_views(&db).await.unwrap_err();

    match &err {
        ShroudError::CreateView { view, .. } => assert_eq!(view, "foo2_anonymized"),
        other => panic!("unexpected error: {}", other),
    }
    assert!(err.is_ddl());
    // foo stays created, foo3 is never attempted
    assert_eq!(db.views(), vec!["foo_anonymized".to_string()]);
    assert_eq!(db.executed().len(), 2);
}

#[tokio::test]
async fn test_configured_table_missing_from_schema_is_ignored() {
    let db = ScriptedDb::new().table("other", &["id"]);

    let created = foo_generator().create_views(&db).await.unwrap();

    assert_eq!(created, 1);
    assert_eq!(db.views(), vec!["other_anonymized".to_string()]);
}

#[tokio::test]
async fn test_clear_views() {
    let db = ScriptedDb::new()
        .view("foo_anonymized")
        .view("foo2_anonymized")
        .view("reports");

    let dropped = foo_generator().clear_views(&db).await.unwrap();

    assert_eq!(dropped, 2);
    assert_eq!(
        db.executed(),
        vec![
            "DROP VIEW IF EXISTS foo2_anonymized".to_string(),
            "DROP VIEW IF EXISTS foo_anonymized".to_string(),
        ]
    );
    assert_eq!(db.views(), vec!["reports".to_string()]);
}

#[tokio::test]
async fn test_clear_views_binds_suffix() {
    let generator = Generator::builder(PostgresQueryBuilder).view_suffix("bazbaz").build();
    let db = ScriptedDb::new().view("foo_bazbaz").view("foo_anonymized");

    generator.clear_views(&db).await.unwrap();

    assert_eq!(
        db.calls()[0],
        Call::Query {
            sql: PostgresQueryBuilder.list_views_query().to_string(),
            bind: Some("bazbaz".to_string())
        }
    );
    assert_eq!(db.views(), vec!["foo_anonymized".to_string()]);
}

#[tokio::test]
async fn test_clear_views_selection_fails() {
    let db = ScriptedDb::new()
        .view("foo_anonymized")
        .fail(Failure::ListViews);

    let err = foo_generator().clear_views(&db).await.unwrap_err();

    assert!(matches!(err, ShroudError::ListViews(_)));
    assert!(err.to_string().starts_with("Failed to select views: "));
    assert!(db.executed().is_empty());
}

#[tokio::test]
async fn test_clear_views_second_drop_fails() {
    let db = ScriptedDb::new()
        .view("foo_anonymized")
        .view("foo2_anonymized")
        .view("foo3_anonymized")
        .fail(Failure::Statement("foo3_anonymized".to_string()));

    let err = foo_generator().clear_views(&db).await.unwrap_err();

    match &err {
        ShroudError::DropView { view, .. } => assert_eq!(view, "foo3_anonymized"),
        other => panic!("unexpected error: {}", other),
    }
    assert!(err.to_string().starts_with("Failed to drop view 'foo3_anonymized': "));
    // foo2 stays dropped, foo is never attempted
    assert_eq!(
        db.views(),
        vec!["foo3_anonymized".to_string(), "foo_anonymized".to_string()]
    );
    assert_eq!(db.executed().len(), 2);
}

#[tokio::test]
async fn test_clear_views_refuses_empty_suffix() {
    let generator = Generator::builder(PostgresQueryBuilder).view_suffix("").build();
    let db = ScriptedDb::new().view("foo_").view("foo_anonymized");

    let err = generator.clear_views(&db).await.unwrap_err();

    assert!(matches!(err, ShroudError::Config(_)));
    assert!(db.calls().is_empty());
    assert_eq!(db.views(), vec!["foo_".to_string(), "foo_anonymized".to_string()]);
}

#[tokio::test]
async fn test_clear_views_twice() {
    let db = ScriptedDb::new().view("foo_anonymized").view("foo2_anonymized");
    let generator = foo_generator();

    assert_eq!(generator.clear_views(&db).await.unwrap(), 2);
    assert_eq!(generator.clear_views(&db).await.unwrap(), 0);
    assert!(db.views().is_empty());
}

#[tokio::test]
async fn test_clear_then_create() {
    let db = ScriptedDb::new()
        .table("foo", &["id", "bar"])
        .view("dropped_anonymized");
    let generator = foo_generator();

    generator.clear_views(&db).await.unwrap();
    generator.create_views(&db).await.unwrap();

    assert_eq!(db.views(), vec!["foo_anonymized".to_string()]);
}

#[tokio::test]
async fn test_plan_views_does_not_execute() {
    let db = ScriptedDb::new()
        .table("foo", &["id", "bar"])
        .table("foo2", &["id"]);

    let plans = foo_generator().plan_views(&db).await.unwrap();

    assert_eq!(
        plans,
        vec![
            ViewPlan {
                table: "foo".to_string(),
                view: "foo_anonymized".to_string(),
                sql: "CREATE OR REPLACE VIEW foo_anonymized AS SELECT foo.id AS id, 'var'::TEXT AS bar FROM foo"
                    .to_string(),
            },
            ViewPlan {
                table: "foo2".to_string(),
                view: "foo2_anonymized".to_string(),
                sql: "CREATE OR REPLACE VIEW foo2_anonymized AS SELECT foo2.id AS id FROM foo2".to_string(),
            },
        ]
    );
    assert!(db.executed().is_empty());
}

#[tokio::test]
async fn test_create_views_with_every_transform() {
    let users = Table::builder()
        .transform("email", Email::new())
        .transform("phone", Overlay::new("X", 4, 6))
        .transform("notes", Null)
        .transform("meta", RemoveJsonKeys::new(["token"]))
        .transform("ssn", Sha256::new(10))
        .transform("city", RegexReplace::new("^.", "_"))
        .transform(
            "role",
            Condition::new(
                "TEXT",
                Noop,
                vec![When::new("id", Operator::Lte, "100", "integer", Static::new("staff", "TEXT"))],
            ),
        )
        .build();
    let generator = Generator::builder(PostgresQueryBuilder).table("users", users).build();
    let db = ScriptedDb::new().table(
        "users",
        &["id", "email", "phone", "notes", "meta", "ssn", "city", "role"],
    );

    generator.create_views(&db).await.unwrap();

    let sql = &db.executed()[0];
    assert!(sql.starts_with("CREATE OR REPLACE VIEW users_anonymized AS SELECT users.id AS id, CASE WHEN"));
    assert!(sql.contains(" AS email, "));
    assert!(sql.contains(r#""overlay"((users.phone)::text, 'XXXXXX'::text, 4) AS phone"#));
    assert!(sql.contains("NULL::unknown AS notes"));
    assert!(sql.contains("WHERE key <> 'token') AS meta"));
    assert!(sql.contains("'hex'), 0, 11) AS ssn"));
    assert!(sql.contains("REGEXP_REPLACE(users.city, '^.', '_') AS city"));
    assert!(sql.ends_with(
        "(CASE WHEN ((users.id)::integer) <= '100'::integer THEN ('staff'::TEXT) ELSE users.role END)::TEXT AS role FROM users"
    ));
}
