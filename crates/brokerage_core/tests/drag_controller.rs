use brokerage_core::{
    BoardPosition, BoardStore, ColumnId, DragCapability, DragController, DragOutcome,
};
use chrono::NaiveDate;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
}

#[test]
fn drop_on_column_moves_task_once() {
    let mut board = BoardStore::seeded();
    let mut drag = DragController::new();

    drag.begin_drag(BoardPosition::new(ColumnId::NotStarted, 0));
    let outcome = drag.drop_on(
        &mut board,
        Some(BoardPosition::new(ColumnId::InProgress, 1)),
        today(),
    );

    let DragOutcome::Moved {
        task_move,
        from_column,
        to_column,
    } = outcome
    else {
        panic!("expected a move, got {outcome:?}");
    };
    assert_eq!(task_move.task_id, "task-1");
    assert_eq!(task_move.progress, 10);
    assert_eq!(from_column, ColumnId::NotStarted.default_name());
    assert_eq!(to_column, ColumnId::InProgress.default_name());
    assert_eq!(
        board.column(ColumnId::InProgress).task_ids(),
        vec!["task-3", "task-1"]
    );
    assert!(!drag.is_dragging());
}

#[test]
fn drop_outside_cancels_without_touching_board() {
    let mut board = BoardStore::seeded();
    let before = board.clone();
    let mut drag = DragController::new();

    drag.begin_drag(BoardPosition::new(ColumnId::Completed, 0));
    assert_eq!(drag.drop_on(&mut board, None, today()), DragOutcome::Cancelled);
    assert_eq!(board, before);
}

#[test]
fn drop_without_begin_is_reported() {
    let mut board = BoardStore::seeded();
    let mut drag = DragController::new();
    assert_eq!(
        drag.drop_on(
            &mut board,
            Some(BoardPosition::new(ColumnId::Completed, 0)),
            today()
        ),
        DragOutcome::NotDragging
    );
}

#[test]
fn stale_source_is_rejected() {
    let mut board = BoardStore::seeded();
    let mut drag = DragController::new();
    drag.begin_drag(BoardPosition::new(ColumnId::WaitingFeedback, 3));
    assert_eq!(
        drag.drop_on(
            &mut board,
            Some(BoardPosition::new(ColumnId::Completed, 0)),
            today()
        ),
        DragOutcome::Rejected
    );
    assert!(!drag.is_dragging());
}
