//! Key/value storage contracts and backends.
//!
//! # Responsibility
//! - Mirror the browser local-storage API (`getItem`/`setItem`/...).
//! - Provide an in-memory backend and a SQLite-backed one.
//!
//! # Invariants
//! - `set_item` replaces the whole value for a key.
//! - `keys` is sorted ascending.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StorageResult<T> = Result<T, StorageError>;

/// Storage transport or encoding failure.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    Encode(serde_json::Error),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode records: {err}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// String-keyed document storage.
pub trait KeyValueRepository {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;
    /// Returns whether a value was present.
    fn remove_item(&self, key: &str) -> StorageResult<bool>;
    fn keys(&self) -> StorageResult<Vec<String>>;
}

impl<R: KeyValueRepository + ?Sized> KeyValueRepository for &R {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StorageResult<bool> {
        (**self).remove_item(key)
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        (**self).keys()
    }
}

/// Process-local storage, lost on drop.
#[derive(Debug, Default)]
pub struct MemoryKvRepository {
    items: RefCell<BTreeMap<String, String>>,
}

impl MemoryKvRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueRepository for MemoryKvRepository {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<bool> {
        Ok(self.items.borrow_mut().remove(key).is_some())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        Ok(self.items.borrow().keys().cloned().collect())
    }
}

/// SQLite-backed storage over the `local_storage` table.
pub struct SqliteKvRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKvRepository<'conn> {
    /// Wraps a connection that has already been migrated.
    ///
    /// Use `db::open_db`/`db::open_db_in_memory` to obtain one.
    pub fn try_new(conn: &'conn Connection) -> StorageResult<Self> {
        let version = current_user_version(conn)?;
        if version < latest_version() {
            return Err(DbError::PendingMigrations {
                db_version: version,
                latest_supported: latest_version(),
            }
            .into());
        }
        Ok(Self { conn })
    }
}

impl KeyValueRepository for SqliteKvRepository<'_> {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1;",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO local_storage (key, value, updated_at)
             VALUES (?1, ?2, CAST(strftime('%s','now') AS INTEGER) * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM local_storage WHERE key = ?1;", params![key])?;
        Ok(changed > 0)
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM local_storage ORDER BY key ASC;")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut keys = Vec::new();
        for key in rows {
            keys.push(key?);
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyValueRepository, MemoryKvRepository, SqliteKvRepository, StorageError};
    use crate::db::{open_db_in_memory, DbError};
    use rusqlite::Connection;

    fn exercise(repo: &dyn KeyValueRepository) {
        assert_eq!(repo.get_item("crmBoard").unwrap(), None);
        repo.set_item("crmBoard", "[]").unwrap();
        repo.set_item("prospectsData", "[1]").unwrap();
        repo.set_item("crmBoard", "[2]").unwrap();
        assert_eq!(repo.get_item("crmBoard").unwrap().as_deref(), Some("[2]"));
        assert_eq!(
            repo.keys().unwrap(),
            vec!["crmBoard".to_string(), "prospectsData".to_string()]
        );
        assert!(repo.remove_item("crmBoard").unwrap());
        assert!(!repo.remove_item("crmBoard").unwrap());
        assert_eq!(repo.get_item("crmBoard").unwrap(), None);
    }

    #[test]
    fn memory_backend_behaves_like_local_storage() {
        exercise(&MemoryKvRepository::new());
    }

    #[test]
    fn sqlite_backend_behaves_like_local_storage() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteKvRepository::try_new(&conn).unwrap();
        exercise(&repo);
    }

    #[test]
    fn sqlite_backend_rejects_unmigrated_connection() {
        let conn = Connection::open_in_memory().unwrap();
        let err = SqliteKvRepository::try_new(&conn).err().unwrap();
        assert!(matches!(
            err,
            StorageError::Db(DbError::PendingMigrations { db_version: 0, .. })
        ));
    }
}
