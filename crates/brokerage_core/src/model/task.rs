//! CRM board task and note records.
//!
//! # Invariants
//! - `id` is unique across the whole board, not just one column.
//! - `progress` stays within `0..=100`.
//! - Notes are append-only.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TaskId = String;

pub const MAX_PROGRESS: u8 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "Baixa")]
    Low,
    #[default]
    #[serde(rename = "Média")]
    Medium,
    #[serde(rename = "Alta")]
    High,
}

impl Priority {
    /// Label shown on cards and stored in JSON.
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Baixa",
            Self::Medium => "Média",
            Self::High => "Alta",
        }
    }
}

/// Free-text annotation attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub text: String,
    pub date: DateTime<Utc>,
}

impl Note {
    pub fn new(text: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            id: super::generate_id("note-"),
            text: text.into(),
            date,
        }
    }
}

/// One kanban card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub client_name: String,
    pub client_phone: String,
    pub client_email: String,
    #[serde(default)]
    pub description: String,
    /// Seller id.
    pub assigned_to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub progress: u8,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub notes: Vec<Note>,
    pub created_on: NaiveDate,
    pub last_activity: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    BlankTitle,
    ProgressOutOfRange(u8),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "task title must not be blank"),
            Self::ProgressOutOfRange(value) => {
                write!(f, "task progress must be <= {MAX_PROGRESS}, got {value}")
            }
        }
    }
}

impl Error for TaskValidationError {}

impl Task {
    /// Empty card stamped with `today`, as the "new project" form starts.
    pub fn blank(id: impl Into<TaskId>, assigned_to: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            client_name: String::new(),
            client_phone: String::new(),
            client_email: String::new(),
            description: String::new(),
            assigned_to: assigned_to.into(),
            created_by: None,
            tags: Vec::new(),
            progress: 0,
            priority: Priority::Medium,
            value: 0.0,
            notes: Vec::new(),
            created_on: today,
            last_activity: today,
        }
    }

    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::BlankTitle);
        }
        if self.progress > MAX_PROGRESS {
            return Err(TaskValidationError::ProgressOutOfRange(self.progress));
        }
        Ok(())
    }

    /// Adds `tag` after trimming; blank and duplicate tags are ignored.
    ///
    /// Returns whether the tag list changed.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.tags.iter().any(|existing| existing == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|existing| existing != tag);
        self.tags.len() != before
    }

    /// Case-insensitive match on title, client name or any tag.
    ///
    /// `needle` must already be lowercase.
    pub(crate) fn matches_search(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.client_name.to_lowercase().contains(needle)
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(needle))
    }
}
