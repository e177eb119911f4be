//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `brokerage_core` linkage with a deterministic summary of the
//!   seeded board and prospects.
//! - Optionally exercise file logging when `BROKERAGE_LOG_DIR` is set.

use brokerage_core::{AppContext, BoardFilter, BoardService, MemoryKvRepository, ProspectService};
use log::info;
use std::process::ExitCode;

fn main() -> ExitCode {
    if let Ok(log_dir) = std::env::var("BROKERAGE_LOG_DIR") {
        if let Err(err) = brokerage_core::init_logging(brokerage_core::default_log_level(), &log_dir)
        {
            eprintln!("logging disabled: {err}");
        }
    }

    println!("brokerage_core ping={}", brokerage_core::ping());
    println!("brokerage_core version={}", brokerage_core::core_version());

    let ctx = AppContext::mock();
    let repo = MemoryKvRepository::new();

    let board = match BoardService::new(&repo, &ctx).load_or_seed() {
        Ok(board) => board,
        Err(err) => {
            eprintln!("board load failed: {err}");
            return ExitCode::FAILURE;
        }
    };
    for column in board.filtered(&BoardFilter::default()) {
        println!("board column={} tasks={}", column.id, column.tasks.len());
    }

    let prospects = match ProspectService::new(&repo, &ctx).load_or_seed() {
        Ok(prospects) => prospects,
        Err(err) => {
            eprintln!("prospect load failed: {err}");
            return ExitCode::FAILURE;
        }
    };
    for item in &prospects {
        println!(
            "prospect id={} commission_delta={:.2}",
            item.prospect.id, item.commissions.difference
        );
    }

    info!(
        "event=cli_smoke module=cli status=ok tasks={} prospects={}",
        board.task_count(),
        prospects.len()
    );
    ExitCode::SUCCESS
}
