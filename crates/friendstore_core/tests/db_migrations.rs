use friendstore_core::db::migrations::{apply_migrations, latest_version};
use friendstore_core::db::{open_db, open_db_in_memory, DbError, DbLocation};
use rusqlite::Connection;

fn table_exists(conn: &Connection, name: &str) -> bool {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
        [name],
        |row| row.get::<_, i64>(0),
    )
    .unwrap()
        == 1
}

fn user_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn fresh_database_is_fully_migrated() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(user_version(&conn), latest_version());
    assert!(table_exists(&conn, "users"));
    assert!(table_exists(&conn, "user_friends"));
}

#[test]
fn migrations_are_idempotent_on_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.sqlite3");

    drop(open_db(&path).unwrap());
    let conn = open_db(&path).unwrap();

    assert_eq!(user_version(&conn), latest_version());
}

#[test]
fn newer_schema_version_is_rejected() {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version() + 1))
        .unwrap();

    let err = apply_migrations(&mut conn).unwrap_err();
    assert!(matches!(
        err,
        DbError::SchemaTooNew { found, supported }
            if found == latest_version() + 1 && supported == latest_version()
    ));
}

#[test]
fn newer_schema_file_is_refused_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.sqlite3");
    Connection::open(&path)
        .unwrap()
        .execute_batch(&format!("PRAGMA user_version = {};", latest_version() + 1))
        .unwrap();

    let err = open_db(&path).unwrap_err();
    assert!(matches!(err, DbError::SchemaTooNew { .. }));
}

#[test]
fn open_failure_names_the_database_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("records.sqlite3");

    let err = open_db(&path).unwrap_err();
    match &err {
        DbError::Open { location, .. } => assert_eq!(location, &DbLocation::file(&path)),
        other => panic!("expected open error, got {other:?}"),
    }
    assert!(err.to_string().contains("records.sqlite3"));
}

#[test]
fn negative_age_is_rejected_by_schema() {
    let conn = open_db_in_memory().unwrap();
    let result = conn.execute(
        "INSERT INTO users (id, name, email, age) VALUES ('x', 'Vin', 'vin@b.net', -1);",
        [],
    );
    assert!(result.is_err());
}
