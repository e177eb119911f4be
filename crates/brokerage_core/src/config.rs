//! Core configuration.
//!
//! # Responsibility
//! - Hold the compile-time defaults the UI used to hard-code.
//! - Allow overriding them from a JSON document.
//!
//! # Invariants
//! - Every field has a default, so `{}` is a valid configuration.
//! - Storage keys are non-blank and pairwise distinct.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Default progress applied when a task enters the in-progress column.
pub const DEFAULT_IN_PROGRESS_FLOOR: u8 = 10;
/// Attachments above 5 MiB are rejected by the prospect form.
pub const DEFAULT_MAX_ATTACHMENT_BYTES: u64 = 5 * 1024 * 1024;
/// Role whose holders only see their own board tasks.
pub const DEFAULT_SELLER_ROLE_NAME: &str = "Vendedor";

/// Local-storage keys, one per persisted collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct StorageKeys {
    pub prospects: String,
    pub registration_tasks: String,
    pub policies: String,
    pub board: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            prospects: "prospectsData".to_string(),
            registration_tasks: "registrationTasks".to_string(),
            policies: "registeredPolicies".to_string(),
            board: "crmBoard".to_string(),
        }
    }
}

impl StorageKeys {
    fn all(&self) -> [&str; 4] {
        [
            self.prospects.as_str(),
            self.registration_tasks.as_str(),
            self.policies.as_str(),
            self.board.as_str(),
        ]
    }
}

/// Tunables shared by services and the board store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct CoreConfig {
    pub storage_keys: StorageKeys,
    pub in_progress_floor: u8,
    pub max_attachment_bytes: u64,
    pub seller_role_name: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            storage_keys: StorageKeys::default(),
            in_progress_floor: DEFAULT_IN_PROGRESS_FLOOR,
            max_attachment_bytes: DEFAULT_MAX_ATTACHMENT_BYTES,
            seller_role_name: DEFAULT_SELLER_ROLE_NAME.to_string(),
        }
    }
}

/// Configuration parse/validation failures.
#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    BlankStorageKey,
    DuplicateStorageKey(String),
    InProgressFloorOutOfRange(u8),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid config document: {err}"),
            Self::BlankStorageKey => write!(f, "storage keys must not be blank"),
            Self::DuplicateStorageKey(key) => write!(f, "storage key `{key}` is used twice"),
            Self::InProgressFloorOutOfRange(value) => {
                write!(f, "in_progress_floor must be <= 100, got {value}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl CoreConfig {
    /// Parses a JSON document, filling omitted fields with defaults.
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for key in self.storage_keys.all() {
            if key.trim().is_empty() {
                return Err(ConfigError::BlankStorageKey);
            }
            if !seen.insert(key) {
                return Err(ConfigError::DuplicateStorageKey(key.to_string()));
            }
        }
        if self.in_progress_floor > 100 {
            return Err(ConfigError::InProgressFloorOutOfRange(self.in_progress_floor));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig};

    #[test]
    fn empty_document_yields_defaults() {
        let config = CoreConfig::from_json_str("{}").unwrap();
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.storage_keys.prospects, "prospectsData");
        assert_eq!(config.in_progress_floor, 10);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = CoreConfig::from_json_str(
            r#"{"storage_keys": {"board": "kanban"}, "in_progress_floor": 25}"#,
        )
        .unwrap();
        assert_eq!(config.storage_keys.board, "kanban");
        assert_eq!(config.storage_keys.policies, "registeredPolicies");
        assert_eq!(config.in_progress_floor, 25);
    }

    #[test]
    fn duplicate_keys_and_bad_floor_are_rejected() {
        let err = CoreConfig::from_json_str(r#"{"storage_keys": {"board": "prospectsData"}}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateStorageKey(key) if key == "prospectsData"));

        let err = CoreConfig::from_json_str(r#"{"in_progress_floor": 120}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InProgressFloorOutOfRange(120)));
    }
}
