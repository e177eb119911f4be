//! Drag-and-drop gesture state machine.
//!
//! # Responsibility
//! - Capture the source slot when a drag starts.
//! - Turn the drop into exactly one `BoardStore::move_task` call.
//!
//! # Invariants
//! - The controller is `Idle` after every `end_drag`, whatever the outcome.
//! - A drop without destination never touches the board.

use super::store::{BoardPosition, BoardStore, TaskMove};
use chrono::NaiveDate;
use log::debug;

/// What a UI drag-and-drop adapter reports to the core.
pub trait DragCapability {
    /// A card at `source` was picked up.
    fn begin_drag(&mut self, source: BoardPosition);

    /// The card was released over `destination`, or outside any column.
    ///
    /// Returns the move to apply, if any.
    fn end_drag(&mut self, destination: Option<BoardPosition>) -> Option<DragMove>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        source: BoardPosition,
    },
}

/// A completed gesture with both ends known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragMove {
    pub source: BoardPosition,
    pub destination: BoardPosition,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// The board changed. Column names are the display names at drop time.
    Moved {
        task_move: TaskMove,
        from_column: String,
        to_column: String,
    },
    /// Dropped outside any column.
    Cancelled,
    /// `end_drag` without a preceding `begin_drag`.
    NotDragging,
    /// The board refused the move (stale source slot).
    Rejected,
}

#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Ends the gesture and applies it to `board`.
    pub fn drop_on(
        &mut self,
        board: &mut BoardStore,
        destination: Option<BoardPosition>,
        today: NaiveDate,
    ) -> DragOutcome {
        let was_dragging = self.is_dragging();
        let Some(drag) = self.end_drag(destination) else {
            return if was_dragging {
                DragOutcome::Cancelled
            } else {
                DragOutcome::NotDragging
            };
        };

        match board.move_task(drag.source, Some(drag.destination), today) {
            Some(task_move) => DragOutcome::Moved {
                from_column: board.column(drag.source.column).name.clone(),
                to_column: board.column(drag.destination.column).name.clone(),
                task_move,
            },
            None => DragOutcome::Rejected,
        }
    }
}

impl DragCapability for DragController {
    fn begin_drag(&mut self, source: BoardPosition) {
        if let DragState::Dragging { source: previous } = self.state {
            debug!(
                "event=drag_begin module=board status=ok replaced={}:{}",
                previous.column, previous.index
            );
        }
        self.state = DragState::Dragging { source };
    }

    fn end_drag(&mut self, destination: Option<BoardPosition>) -> Option<DragMove> {
        let state = std::mem::take(&mut self.state);
        let DragState::Dragging { source } = state else {
            debug!("event=drag_end module=board status=noop reason=not_dragging");
            return None;
        };
        let Some(destination) = destination else {
            debug!(
                "event=drag_end module=board status=noop reason=no_destination from={}",
                source.column
            );
            return None;
        };
        Some(DragMove {
            source,
            destination,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{DragCapability, DragController, DragMove, DragState};
    use crate::board::store::BoardPosition;
    use crate::model::column::ColumnId;

    #[test]
    fn begin_then_end_yields_move_and_returns_to_idle() {
        let mut controller = DragController::new();
        let source = BoardPosition::new(ColumnId::NotStarted, 1);
        let destination = BoardPosition::new(ColumnId::Completed, 0);

        controller.begin_drag(source);
        assert_eq!(controller.state(), DragState::Dragging { source });

        let drag = controller.end_drag(Some(destination));
        assert_eq!(
            drag,
            Some(DragMove {
                source,
                destination
            })
        );
        assert_eq!(controller.state(), DragState::Idle);
    }

    #[test]
    fn drop_outside_returns_to_idle_without_move() {
        let mut controller = DragController::new();
        controller.begin_drag(BoardPosition::new(ColumnId::InProgress, 0));
        assert_eq!(controller.end_drag(None), None);
        assert!(!controller.is_dragging());
    }

    #[test]
    fn second_begin_replaces_source() {
        let mut controller = DragController::new();
        controller.begin_drag(BoardPosition::new(ColumnId::InProgress, 0));
        let latest = BoardPosition::new(ColumnId::WaitingFeedback, 0);
        controller.begin_drag(latest);
        assert_eq!(controller.state(), DragState::Dragging { source: latest });
    }
}
