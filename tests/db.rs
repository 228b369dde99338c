use diesel::prelude::*;
use diesel::sql_types::Text;
use freeflow_ops::db::run_migrations;

mod common;

#[derive(QueryableByName)]
struct TableName {
    #[diesel(sql_type = Text)]
    name: String,
}

#[test]
fn migrations_create_every_table() {
    let test_db = common::TestDb::new("migrations_create_every_table.db");
    let mut conn = test_db.pool().get().unwrap();

    let mut tables: Vec<String> = diesel::sql_query(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE '__diesel%' \
         AND name NOT LIKE 'sqlite_%'",
    )
    .load::<TableName>(&mut conn)
    .unwrap()
    .into_iter()
    .map(|t| t.name)
    .collect();
    tables.sort();

    assert_eq!(
        tables,
        vec![
            "bookings",
            "notifications",
            "preferences",
            "support_tickets",
            "work_orders"
        ]
    );
}

#[test]
fn migrations_are_idempotent() {
    let test_db = common::TestDb::new("migrations_are_idempotent.db");
    assert!(run_migrations(&test_db.pool()).is_ok());
}
