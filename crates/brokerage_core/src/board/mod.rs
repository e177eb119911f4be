//! CRM kanban board: state, drag gestures and the task form.
//!
//! # Responsibility
//! - `store`: ordered columns and every structural edit.
//! - `drag`: gesture state machine feeding `BoardStore::move_task`.
//! - `modal`: draft/validate/submit flow for task cards.

pub mod drag;
pub mod modal;
pub mod store;
