use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::Integer;
use member_search::db::run_migrations;

mod common;

#[derive(QueryableByName)]
struct PragmaValue {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

#[test]
fn test_creates_and_migrates_db_file() {
    let test_db = common::TestDb::new("test_creates_and_migrates_db_file.db");
    let conn = test_db.pool().get();
    assert!(conn.is_ok());
}

#[test]
fn test_migrations_are_applied_once() {
    let test_db = common::TestDb::new("test_migrations_are_applied_once.db");
    assert_eq!(run_migrations(&test_db.pool()).unwrap(), 0);
}

#[test]
fn test_connections_enforce_foreign_keys() {
    let test_db = common::TestDb::new("test_connections_enforce_foreign_keys.db");
    let mut conn = test_db.pool().get().unwrap();
    let pragma = sql_query("PRAGMA foreign_keys")
        .get_result::<PragmaValue>(&mut conn)
        .unwrap();
    assert_eq!(pragma.foreign_keys, 1);
}
