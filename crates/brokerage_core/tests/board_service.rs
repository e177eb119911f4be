use brokerage_core::config::CoreConfig;
use brokerage_core::context::{AppContext, CurrentUser, FixedClock};
use brokerage_core::{
    BoardPosition, BoardService, ColumnId, KeyValueRepository, MemoryKvRepository,
};
use chrono::{TimeZone, Utc};
use std::sync::Arc;

fn seller_context() -> AppContext {
    let mut user = CurrentUser::mock_admin();
    user.id = "seller2".to_string();
    user.role_name = "Vendedor".to_string();
    let clock = FixedClock(Utc.with_ymd_and_hms(2025, 6, 10, 9, 0, 0).unwrap());
    AppContext::new(user, CoreConfig::default(), Arc::new(clock))
}

#[test]
fn seller_view_only_shows_own_tasks() {
    let ctx = seller_context();
    let repo = MemoryKvRepository::new();
    let service = BoardService::new(&repo, &ctx);
    let board = service.load_or_seed().unwrap();

    let ids: Vec<&str> = board
        .filtered(&service.view_filter(None))
        .into_iter()
        .flat_map(|column| column.tasks.into_iter().map(|task| task.id.as_str()))
        .collect();
    assert_eq!(ids, vec!["task-2", "task-4"]);
}

#[test]
fn admin_view_is_unfiltered() {
    let ctx = AppContext::mock();
    let repo = MemoryKvRepository::new();
    let service = BoardService::new(&repo, &ctx);
    let filter = service.view_filter(Some("souza"));
    assert_eq!(filter.assigned_to, None);
    assert_eq!(filter.search.as_deref(), Some("souza"));
}

#[test]
fn saved_board_round_trips_with_notes_and_config_floor() {
    let mut config = CoreConfig::default();
    config.in_progress_floor = 30;
    let ctx = AppContext::new(
        CurrentUser::mock_admin(),
        config,
        Arc::new(FixedClock(Utc.with_ymd_and_hms(2025, 6, 10, 9, 0, 0).unwrap())),
    );
    let repo = MemoryKvRepository::new();
    let service = BoardService::new(&repo, &ctx);

    let mut board = service.load_or_seed().unwrap();
    let moved = board
        .move_task(
            BoardPosition::new(ColumnId::NotStarted, 0),
            Some(BoardPosition::new(ColumnId::InProgress, 0)),
            ctx.clock().today(),
        )
        .unwrap();
    assert_eq!(moved.progress, 30);
    service.save(&board).unwrap();

    let reloaded = service.load_or_seed().unwrap();
    assert_eq!(reloaded, board);
    assert_eq!(reloaded.task("task-3").unwrap().notes[0].id, "note-1");
}

#[test]
fn malformed_board_loads_as_empty_columns() {
    let ctx = AppContext::mock();
    let repo = MemoryKvRepository::new();
    repo.set_item("crmBoard", "{oops").unwrap();

    let board = BoardService::new(&repo, &ctx).load_or_seed().unwrap();
    assert_eq!(board.columns().len(), 4);
    assert_eq!(board.task_count(), 0);
}
