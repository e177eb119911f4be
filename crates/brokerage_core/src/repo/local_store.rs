//! Typed JSON collections over a `KeyValueRepository`.
//!
//! # Invariants
//! - An absent key loads as an empty collection.
//! - Malformed JSON loads as an empty collection and logs
//!   `event=storage_load status=error`; it is never surfaced as an error.
//! - A record that does not fit its type is dropped and logged with its
//!   index; the other records still load.
//! - Unknown fields in stored records are ignored on load.

use super::kv_repo::{KeyValueRepository, StorageResult};
use log::{debug, error};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug)]
pub struct LocalStore<R: KeyValueRepository> {
    repo: R,
}

impl<R: KeyValueRepository> LocalStore<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Reads the collection stored under `key`.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Vec<T>> {
        let Some(raw) = self.repo.get_item(key)? else {
            debug!("event=storage_load module=repo status=ok key={key} found=false");
            return Ok(Vec::new());
        };

        let items = match serde_json::from_str::<Vec<Value>>(&raw) {
            Ok(items) => items,
            Err(err) => {
                error!(
                    "event=storage_load module=repo status=error key={key} error_code=malformed_json line={} column={}",
                    err.line(),
                    err.column()
                );
                return Ok(Vec::new());
            }
        };

        let total = items.len();
        let mut records = Vec::with_capacity(total);
        for (index, item) in items.into_iter().enumerate() {
            match serde_json::from_value::<T>(item) {
                Ok(record) => records.push(record),
                Err(err) => error!(
                    "event=storage_load module=repo status=error key={key} index={index} error_code=invalid_record category={:?}",
                    err.classify()
                ),
            }
        }
        debug!(
            "event=storage_load module=repo status=ok key={key} count={} dropped={}",
            records.len(),
            total - records.len()
        );
        Ok(records)
    }

    /// Replaces the collection stored under `key`.
    pub fn save<T: Serialize>(&self, key: &str, records: &[T]) -> StorageResult<()> {
        let raw = serde_json::to_string(records)?;
        self.repo.set_item(key, &raw)?;
        debug!(
            "event=storage_save module=repo status=ok key={key} count={}",
            records.len()
        );
        Ok(())
    }

    pub fn contains(&self, key: &str) -> StorageResult<bool> {
        Ok(self.repo.get_item(key)?.is_some())
    }

    pub fn remove(&self, key: &str) -> StorageResult<bool> {
        self.repo.remove_item(key)
    }
}

#[cfg(test)]
mod tests {
    use super::LocalStore;
    use crate::repo::kv_repo::{KeyValueRepository, MemoryKvRepository};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Item {
        id: String,
    }

    #[test]
    fn absent_and_malformed_keys_load_empty() {
        let store = LocalStore::new(MemoryKvRepository::new());
        assert!(store.load::<Item>("missing").unwrap().is_empty());

        store.repo().set_item("broken", "{not json").unwrap();
        assert!(store.load::<Item>("broken").unwrap().is_empty());
        assert!(store.contains("broken").unwrap());
    }

    #[test]
    fn invalid_record_is_dropped_and_neighbours_survive() {
        let store = LocalStore::new(MemoryKvRepository::new());
        store
            .repo()
            .set_item("items", r#"[{"id":"a"},{"id":7},{"name":"no id"},{"id":"d"}]"#)
            .unwrap();

        let loaded = store.load::<Item>("items").unwrap();
        assert_eq!(
            loaded,
            vec![Item { id: "a".to_string() }, Item { id: "d".to_string() }]
        );
    }

    #[test]
    fn non_array_document_loads_empty() {
        let store = LocalStore::new(MemoryKvRepository::new());
        store.repo().set_item("items", r#"{"id":"a"}"#).unwrap();
        assert!(store.load::<Item>("items").unwrap().is_empty());
    }

    #[test]
    fn save_writes_json_array() {
        let store = LocalStore::new(MemoryKvRepository::new());
        store
            .save("items", &[Item { id: "a".to_string() }])
            .unwrap();
        assert_eq!(
            store.repo().get_item("items").unwrap().as_deref(),
            Some(r#"[{"id":"a"}]"#)
        );
        assert!(store.remove("items").unwrap());
        assert!(!store.contains("items").unwrap());
    }
}
