use brokerage_core::db::migrations::latest_version;
use brokerage_core::db::{open_db, open_db_in_memory, DbError};
use brokerage_core::{
    AppContext, BoardPosition, BoardService, ColumnId, KeyValueRepository, LocalStore,
    ProspectService, SqliteKvRepository,
};
use chrono::NaiveDate;
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "local_storage");
}

#[test]
fn file_database_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("brokerage.db");
    let ctx = AppContext::mock();

    {
        let conn = open_db(&path).unwrap();
        let repo = SqliteKvRepository::try_new(&conn).unwrap();
        let boards = BoardService::new(&repo, &ctx);
        let mut board = boards.load_or_seed().unwrap();
        board.move_task(
            BoardPosition::new(ColumnId::NotStarted, 0),
            Some(BoardPosition::new(ColumnId::Completed, 0)),
            NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
        );
        boards.save(&board).unwrap();
        ProspectService::new(&repo, &ctx).load_or_seed().unwrap();
    }

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    let repo = SqliteKvRepository::try_new(&conn).unwrap();

    let board = BoardService::new(&repo, &ctx).load_or_seed().unwrap();
    assert_eq!(
        board.column(ColumnId::Completed).task_ids(),
        vec!["task-1", "task-4"]
    );
    assert_eq!(board.task("task-1").unwrap().progress, 100);
    assert_eq!(
        repo.keys().unwrap(),
        vec!["crmBoard".to_string(), "prospectsData".to_string()]
    );
    assert_eq!(
        ProspectService::new(&repo, &ctx).list().unwrap().len(),
        3
    );
}

#[test]
fn local_store_over_sqlite_fails_closed_on_garbage() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKvRepository::try_new(&conn).unwrap();
    repo.set_item("registeredPolicies", "not json").unwrap();

    let store = LocalStore::new(&repo);
    let loaded: Vec<serde_json::Value> = store.load("registeredPolicies").unwrap();
    assert!(loaded.is_empty());
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "missing table {table_name}");
}
