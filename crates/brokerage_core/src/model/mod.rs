//! Domain records for the CRM board, prospects and back-office admin.
//!
//! # Responsibility
//! - Define the canonical shapes persisted in local storage.
//! - Keep derived values (commissions) as pure projections.
//!
//! # Invariants
//! - Serialized field names match the stored JSON record shape.
//! - Commission fields are never stored on `Prospect`.

pub mod column;
pub mod commission;
pub mod directory;
mod lenient;
pub mod policy;
pub mod prospect;
pub mod registration;
pub mod task;

/// Generates `<prefix><uuid>` identifiers for newly created records.
pub(crate) fn generate_id(prefix: &str) -> String {
    format!("{prefix}{}", uuid::Uuid::new_v4().simple())
}
