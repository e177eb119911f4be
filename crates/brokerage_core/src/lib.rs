//! Core domain logic for the brokerage back office.
//! This crate is the single source of truth for board, prospect and
//! commission rules.

pub mod board;
pub mod config;
pub mod context;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seed;
pub mod service;

pub use board::drag::{DragCapability, DragController, DragMove, DragOutcome, DragState};
pub use board::modal::{ModalOutcome, TaskModal, TaskModalError, TaskModalMode};
pub use board::store::{BoardFilter, BoardPosition, BoardStore, ColumnView, TaskMove, UpsertOutcome};
pub use config::{ConfigError, CoreConfig, StorageKeys};
pub use context::{AppContext, Clock, CurrentUser, FixedClock, SystemClock};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::column::{Column, ColumnId};
pub use model::commission::{calculate_commissions, parse_percentage, Commissions};
pub use model::prospect::{Prospect, ProspectWithCommissions};
pub use model::task::{Note, Priority, Task, TaskValidationError};
pub use repo::kv_repo::{
    KeyValueRepository, MemoryKvRepository, SqliteKvRepository, StorageError, StorageResult,
};
pub use repo::local_store::LocalStore;
pub use service::admin_service::AdminDirectory;
pub use service::board_service::BoardService;
pub use service::policy_service::PolicyService;
pub use service::prospect_service::{filter_prospects, ExpiryFilter, ProspectService};
pub use service::registration_service::RegistrationService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
