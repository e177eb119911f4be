//! Local-storage persistence.
//!
//! # Responsibility
//! - Define the key/value medium contract (`KeyValueRepository`).
//! - Serialize record collections as JSON arrays under string keys.
//!
//! # Invariants
//! - Values are always whole JSON documents; no partial writes.
//! - Unreadable stored JSON is reported as an empty collection, never as an
//!   error.

pub mod kv_repo;
pub mod local_store;
