//! In-memory kanban board state.
//!
//! # Responsibility
//! - Own the ordered column/task structure rendered by the CRM view.
//! - Apply move, upsert, delete and note-append edits.
//!
//! # Invariants
//! - Column order is fixed at construction.
//! - Every edit fully applies or leaves the board untouched.
//! - Missing targets are silent no-ops, never errors.

use crate::config::DEFAULT_IN_PROGRESS_FLOOR;
use crate::model::column::{Column, ColumnId};
use crate::model::task::{Note, Task, TaskId, MAX_PROGRESS};
use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// A slot on the board: column plus index within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardPosition {
    pub column: ColumnId,
    pub index: usize,
}

impl BoardPosition {
    pub fn new(column: ColumnId, index: usize) -> Self {
        Self { column, index }
    }
}

/// Result of a successful `move_task`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskMove {
    pub task_id: TaskId,
    pub from: BoardPosition,
    /// Index actually used after clamping to the destination length.
    pub to: BoardPosition,
    pub progress: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// Replaced in place in the given column.
    Replaced(ColumnId),
    /// Prepended to the requested column.
    Inserted(ColumnId),
}

/// Read-side filter used when rendering the board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardFilter {
    /// Case-insensitive match on title, client name or tag.
    pub search: Option<String>,
    /// Only tasks assigned to this seller id.
    pub assigned_to: Option<String>,
}

/// Borrowed projection of one column after filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnView<'a> {
    pub id: ColumnId,
    pub name: &'a str,
    pub color: &'a str,
    pub tasks: Vec<&'a Task>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardStore {
    columns: Vec<Column>,
    in_progress_floor: u8,
}

impl BoardStore {
    /// Builds a board from `columns`, adding any missing stage as empty.
    ///
    /// Columns are kept in `ColumnId` order; duplicates keep the first.
    pub fn new(columns: Vec<Column>) -> Self {
        let mut ordered: Vec<Column> = Vec::with_capacity(ColumnId::ALL.len());
        for id in ColumnId::ALL {
            let column = columns
                .iter()
                .find(|column| column.id == id)
                .cloned()
                .unwrap_or_else(|| Column::empty(id));
            ordered.push(column);
        }
        Self {
            columns: ordered,
            in_progress_floor: DEFAULT_IN_PROGRESS_FLOOR,
        }
    }

    /// Overrides the minimum progress applied on entering `in-progress`.
    pub fn with_in_progress_floor(mut self, floor: u8) -> Self {
        self.in_progress_floor = floor.min(MAX_PROGRESS);
        self
    }

    pub fn seeded() -> Self {
        Self::new(crate::seed::board_columns())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }

    pub fn column(&self, id: ColumnId) -> &Column {
        &self.columns[column_slot(id)]
    }

    fn column_mut(&mut self, id: ColumnId) -> &mut Column {
        &mut self.columns[column_slot(id)]
    }

    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|column| column.tasks.len()).sum()
    }

    /// Locates a task anywhere on the board.
    pub fn find_task(&self, task_id: &str) -> Option<BoardPosition> {
        self.columns.iter().find_map(|column| {
            column
                .position_of(task_id)
                .map(|index| BoardPosition::new(column.id, index))
        })
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.find_task(task_id)
            .map(|position| &self.column(position.column).tasks[position.index])
    }

    /// Moves the task at `source` to `destination`.
    ///
    /// `destination == None` (dropped outside any column) and an
    /// out-of-range `source.index` leave the board unchanged and return
    /// `None`. The destination index is clamped to the column length.
    /// Progress follows the destination stage and `last_activity` is set to
    /// `today`.
    pub fn move_task(
        &mut self,
        source: BoardPosition,
        destination: Option<BoardPosition>,
        today: NaiveDate,
    ) -> Option<TaskMove> {
        let Some(destination) = destination else {
            debug!(
                "event=board_move module=board status=noop reason=no_destination from={}",
                source.column
            );
            return None;
        };

        let source_len = self.column(source.column).tasks.len();
        if source.index >= source_len {
            warn!(
                "event=board_move module=board status=noop reason=source_out_of_range column={} index={} len={source_len}",
                source.column, source.index
            );
            return None;
        }

        let mut task = self.column_mut(source.column).tasks.remove(source.index);
        task.progress = progress_for(destination.column, task.progress, self.in_progress_floor);
        task.last_activity = today;

        let dest_tasks = &mut self.column_mut(destination.column).tasks;
        let index = destination.index.min(dest_tasks.len());
        let outcome = TaskMove {
            task_id: task.id.clone(),
            from: source,
            to: BoardPosition::new(destination.column, index),
            progress: task.progress,
        };
        dest_tasks.insert(index, task);

        debug!(
            "event=board_move module=board status=ok task_id={} from={}:{} to={}:{} progress={}",
            outcome.task_id,
            source.column,
            source.index,
            destination.column,
            index,
            outcome.progress
        );
        Some(outcome)
    }

    /// Replaces the task with the same id wherever it lives, otherwise
    /// prepends it to `column`.
    pub fn upsert_task(&mut self, task: Task, column: ColumnId) -> UpsertOutcome {
        if let Some(position) = self.find_task(&task.id) {
            debug!(
                "event=board_upsert module=board status=ok mode=replace task_id={} column={}",
                task.id, position.column
            );
            self.column_mut(position.column).tasks[position.index] = task;
            return UpsertOutcome::Replaced(position.column);
        }

        debug!(
            "event=board_upsert module=board status=ok mode=insert task_id={} column={column}",
            task.id
        );
        self.column_mut(column).tasks.insert(0, task);
        UpsertOutcome::Inserted(column)
    }

    /// Removes `task_id` from `column` only.
    ///
    /// Returns the removed task, or `None` with the column untouched.
    pub fn delete_task(&mut self, task_id: &str, column: ColumnId) -> Option<Task> {
        let tasks = &mut self.column_mut(column).tasks;
        match tasks.iter().position(|task| task.id == task_id) {
            Some(index) => {
                debug!("event=board_delete module=board status=ok task_id={task_id} column={column}");
                Some(tasks.remove(index))
            }
            None => {
                debug!("event=board_delete module=board status=noop task_id={task_id} column={column}");
                None
            }
        }
    }

    /// Appends a fresh note to the task and stamps its last activity.
    ///
    /// Returns the new note, or `None` if the task is not in `column`.
    pub fn add_note(
        &mut self,
        task_id: &str,
        column: ColumnId,
        text: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Option<&Note> {
        let Some(task) = self
            .column_mut(column)
            .tasks
            .iter_mut()
            .find(|task| task.id == task_id)
        else {
            debug!("event=board_note module=board status=noop task_id={task_id} column={column}");
            return None;
        };

        task.notes.push(Note::new(text, now));
        task.last_activity = now.date_naive();
        debug!(
            "event=board_note module=board status=ok task_id={task_id} notes={}",
            task.notes.len()
        );
        task.notes.last()
    }

    /// Filtered, borrowed view of every column in board order.
    pub fn filtered(&self, filter: &BoardFilter) -> Vec<ColumnView<'_>> {
        let needle = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase);

        self.columns
            .iter()
            .map(|column| ColumnView {
                id: column.id,
                name: column.name.as_str(),
                color: column.color.as_str(),
                tasks: column
                    .tasks
                    .iter()
                    .filter(|task| {
                        filter
                            .assigned_to
                            .as_deref()
                            .map_or(true, |seller| task.assigned_to == seller)
                    })
                    .filter(|task| {
                        needle
                            .as_deref()
                            .map_or(true, |needle| task.matches_search(needle))
                    })
                    .collect(),
            })
            .collect()
    }
}

impl Default for BoardStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

fn column_slot(id: ColumnId) -> usize {
    match id {
        ColumnId::NotStarted => 0,
        ColumnId::InProgress => 1,
        ColumnId::WaitingFeedback => 2,
        ColumnId::Completed => 3,
    }
}

/// Progress a task gets when dropped into `column`.
fn progress_for(column: ColumnId, current: u8, in_progress_floor: u8) -> u8 {
    match column {
        ColumnId::Completed => MAX_PROGRESS,
        ColumnId::InProgress if current < in_progress_floor => in_progress_floor,
        ColumnId::NotStarted => 0,
        _ => current,
    }
}
