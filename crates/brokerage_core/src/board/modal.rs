//! Task form: view, edit, annotate or create a board card.
//!
//! # Invariants
//! - Nothing reaches the board until `submit` validates the draft.
//! - A failed submit leaves both the board and the draft untouched.

use super::store::{BoardStore, UpsertOutcome};
use crate::context::AppContext;
use crate::model::column::ColumnId;
use crate::model::directory::Seller;
use crate::model::task::{Note, Task, TaskValidationError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskModalMode {
    View,
    Edit,
    AddNote,
    NewProject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskModalError {
    Validation(TaskValidationError),
    BlankNote,
    /// The task vanished from its column while the modal was open.
    TaskMissing(String),
}

impl Display for TaskModalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::BlankNote => write!(f, "note text must not be blank"),
            Self::TaskMissing(id) => write!(f, "task not found on board: {id}"),
        }
    }
}

impl Error for TaskModalError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaskValidationError> for TaskModalError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModalOutcome {
    /// View mode: nothing to save.
    Closed,
    Saved { task: Task, placement: UpsertOutcome },
    NoteAdded { task_id: String, note: Note },
}

/// Working copy of one task plus the column it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskModal {
    mode: TaskModalMode,
    column: ColumnId,
    draft: Task,
    note_text: String,
}

impl TaskModal {
    /// Opens an existing task in `mode` (anything but `NewProject`).
    pub fn open(mode: TaskModalMode, task: &Task, column: ColumnId) -> Self {
        Self {
            mode,
            column,
            draft: task.clone(),
            note_text: String::new(),
        }
    }

    /// Starts a blank project destined for `column`.
    ///
    /// Sellers get the card assigned to themselves; everyone else defaults to
    /// the first known seller.
    pub fn new_project(ctx: &AppContext, sellers: &[Seller], column: ColumnId) -> Self {
        let user = ctx.current_user();
        let assignee = if ctx.is_seller() {
            user.id.clone()
        } else {
            sellers.first().map(|s| s.id.clone()).unwrap_or_default()
        };
        let mut draft = Task::blank(String::new(), assignee, ctx.clock().today());
        draft.created_by = Some(user.id.clone());
        Self {
            mode: TaskModalMode::NewProject,
            column,
            draft,
            note_text: String::new(),
        }
    }

    pub fn mode(&self) -> TaskModalMode {
        self.mode
    }

    pub fn column(&self) -> ColumnId {
        self.column
    }

    pub fn draft(&self) -> &Task {
        &self.draft
    }

    /// Form fields are edited through this; ignored in view mode on submit.
    pub fn draft_mut(&mut self) -> &mut Task {
        &mut self.draft
    }

    pub fn add_tag(&mut self, tag: &str) -> bool {
        self.draft.add_tag(tag)
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        self.draft.remove_tag(tag)
    }

    pub fn set_note_text(&mut self, text: impl Into<String>) {
        self.note_text = text.into();
    }

    /// Applies the modal to `board` according to its mode.
    pub fn submit(
        &self,
        board: &mut BoardStore,
        ctx: &AppContext,
    ) -> Result<ModalOutcome, TaskModalError> {
        match self.mode {
            TaskModalMode::View => Ok(ModalOutcome::Closed),
            TaskModalMode::AddNote => self.submit_note(board, ctx),
            TaskModalMode::Edit | TaskModalMode::NewProject => self.submit_task(board, ctx),
        }
    }

    fn submit_note(
        &self,
        board: &mut BoardStore,
        ctx: &AppContext,
    ) -> Result<ModalOutcome, TaskModalError> {
        let text = self.note_text.trim();
        if text.is_empty() {
            return Err(TaskModalError::BlankNote);
        }
        let note = board
            .add_note(&self.draft.id, self.column, text, ctx.clock().now())
            .cloned()
            .ok_or_else(|| TaskModalError::TaskMissing(self.draft.id.clone()))?;
        info!(
            "event=task_note_added module=board status=ok task_id={}",
            self.draft.id
        );
        Ok(ModalOutcome::NoteAdded {
            task_id: self.draft.id.clone(),
            note,
        })
    }

    fn submit_task(
        &self,
        board: &mut BoardStore,
        ctx: &AppContext,
    ) -> Result<ModalOutcome, TaskModalError> {
        self.draft.validate()?;
        if self.mode == TaskModalMode::Edit && board.find_task(&self.draft.id).is_none() {
            warn!(
                "event=task_saved module=board status=error error_code=task_missing task_id={}",
                self.draft.id
            );
            return Err(TaskModalError::TaskMissing(self.draft.id.clone()));
        }

        let mut task = self.draft.clone();
        if self.mode == TaskModalMode::NewProject {
            task.id = crate::model::generate_id("task-");
        }
        task.last_activity = ctx.clock().today();

        let placement = board.upsert_task(task.clone(), self.column);
        info!(
            "event=task_saved module=board status=ok task_id={} new={}",
            task.id,
            self.mode == TaskModalMode::NewProject
        );
        Ok(ModalOutcome::Saved { task, placement })
    }
}
