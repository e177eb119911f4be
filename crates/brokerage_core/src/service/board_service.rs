//! Kanban board persistence.
//!
//! # Invariants
//! - The board is stored as its ordered column list; tasks and notes are
//!   kept verbatim.
//! - Loaded boards always carry all four stages (`BoardStore::new`).

use crate::board::store::{BoardFilter, BoardStore};
use crate::context::AppContext;
use crate::model::column::Column;
use crate::repo::kv_repo::{KeyValueRepository, StorageResult};
use crate::repo::local_store::LocalStore;
use log::info;

pub struct BoardService<'ctx, R: KeyValueRepository> {
    store: LocalStore<R>,
    ctx: &'ctx AppContext,
}

impl<'ctx, R: KeyValueRepository> BoardService<'ctx, R> {
    pub fn new(repo: R, ctx: &'ctx AppContext) -> Self {
        Self {
            store: LocalStore::new(repo),
            ctx,
        }
    }

    fn key(&self) -> &str {
        &self.ctx.config().storage_keys.board
    }

    /// Loads the stored board, or stores and returns the demo board when
    /// nothing was saved yet.
    pub fn load_or_seed(&self) -> StorageResult<BoardStore> {
        let columns = if self.store.contains(self.key())? {
            self.store.load::<Column>(self.key())?
        } else {
            let columns = crate::seed::board_columns();
            self.store.save(self.key(), &columns)?;
            info!(
                "event=board_seed module=service status=ok tasks={}",
                columns.iter().map(|column| column.tasks.len()).sum::<usize>()
            );
            columns
        };
        Ok(BoardStore::new(columns).with_in_progress_floor(self.ctx.config().in_progress_floor))
    }

    pub fn save(&self, board: &BoardStore) -> StorageResult<()> {
        self.store.save(self.key(), board.columns())
    }

    /// Render filter for the current user; sellers only see their own cards.
    pub fn view_filter(&self, search: Option<&str>) -> BoardFilter {
        BoardFilter {
            search: search.map(str::to_string),
            assigned_to: self
                .ctx
                .is_seller()
                .then(|| self.ctx.current_user().id.clone()),
        }
    }
}
