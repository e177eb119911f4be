//! Policy-registration task service.
//!
//! # Responsibility
//! - Queue registration work for converted prospects.
//! - Confirm a registration, flipping both task and prospect status.
//!
//! # Invariants
//! - `confirm` writes nothing unless both the task and its prospect exist.
//! - `confirm` leaves both collections as they were when a write fails.

use super::record_matches;
use crate::context::AppContext;
use crate::model::prospect::{Prospect, ProspectStatus, ProspectWithCommissions};
use crate::model::registration::{RegistrationStatus, RegistrationTask};
use crate::repo::kv_repo::{KeyValueRepository, StorageError};
use crate::repo::local_store::LocalStore;
use log::{error, info, warn};
use std::cmp::Reverse;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum RegistrationServiceError {
    TaskNotFound(String),
    /// The task points at a prospect that is no longer stored.
    ProspectNotFound(String),
    Storage(StorageError),
}

impl Display for RegistrationServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TaskNotFound(id) => write!(f, "registration task not found: {id}"),
            Self::ProspectNotFound(id) => write!(f, "linked prospect not found: {id}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RegistrationServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StorageError> for RegistrationServiceError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

pub type RegistrationResult<T> = Result<T, RegistrationServiceError>;

/// A task opened for review together with its prospect.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationReview {
    pub task: RegistrationTask,
    pub prospect: ProspectWithCommissions,
}

pub struct RegistrationService<'ctx, R: KeyValueRepository> {
    store: LocalStore<R>,
    ctx: &'ctx AppContext,
}

impl<'ctx, R: KeyValueRepository> RegistrationService<'ctx, R> {
    pub fn new(repo: R, ctx: &'ctx AppContext) -> Self {
        Self {
            store: LocalStore::new(repo),
            ctx,
        }
    }

    fn tasks_key(&self) -> &str {
        &self.ctx.config().storage_keys.registration_tasks
    }

    fn prospects_key(&self) -> &str {
        &self.ctx.config().storage_keys.prospects
    }

    fn tasks(&self) -> RegistrationResult<Vec<RegistrationTask>> {
        Ok(self.store.load(self.tasks_key())?)
    }

    /// Appends a pending registration task for `prospect`.
    pub fn create_from_prospect(&self, prospect: &Prospect) -> RegistrationResult<RegistrationTask> {
        let task = RegistrationTask::for_prospect(prospect, self.ctx.clock().now());
        let mut tasks = self.tasks()?;
        tasks.push(task.clone());
        self.store.save(self.tasks_key(), &tasks)?;
        info!(
            "event=registration_create module=service status=ok task_id={} prospect_id={}",
            task.id, task.prospect_id
        );
        Ok(task)
    }

    /// Tasks matching `search`, newest first.
    pub fn list(&self, search: &str) -> RegistrationResult<Vec<RegistrationTask>> {
        let mut tasks: Vec<RegistrationTask> = self
            .tasks()?
            .into_iter()
            .filter(|task| record_matches(task, search))
            .collect();
        tasks.sort_by_key(|task| Reverse(task.created_at));
        Ok(tasks)
    }

    /// Loads a task with its prospect for the confirmation dialog.
    pub fn check_prospect(&self, task_id: &str) -> RegistrationResult<RegistrationReview> {
        let task = self
            .tasks()?
            .into_iter()
            .find(|task| task.id == task_id)
            .ok_or_else(|| RegistrationServiceError::TaskNotFound(task_id.to_string()))?;
        let prospect = self
            .store
            .load::<Prospect>(self.prospects_key())?
            .into_iter()
            .find(|prospect| prospect.id == task.prospect_id)
            .ok_or_else(|| {
                warn!(
                    "event=registration_check module=service status=error error_code=prospect_missing task_id={task_id}"
                );
                RegistrationServiceError::ProspectNotFound(task.prospect_id.clone())
            })?;
        Ok(RegistrationReview {
            task,
            prospect: prospect.into(),
        })
    }

    fn restore_tasks(&self, raw: Option<&str>) -> RegistrationResult<()> {
        match raw {
            Some(raw) => self.store.repo().set_item(self.tasks_key(), raw)?,
            None => {
                self.store.repo().remove_item(self.tasks_key())?;
            }
        }
        Ok(())
    }

    /// Marks the task confirmed and its prospect registered.
    ///
    /// Both collections change or neither does: a failed prospect write puts
    /// the previous task list back.
    pub fn confirm(&self, task_id: &str) -> RegistrationResult<RegistrationTask> {
        let mut tasks = self.tasks()?;
        let task_index = tasks
            .iter()
            .position(|task| task.id == task_id)
            .ok_or_else(|| RegistrationServiceError::TaskNotFound(task_id.to_string()))?;

        let mut prospects: Vec<Prospect> = self.store.load(self.prospects_key())?;
        let prospect_id = tasks[task_index].prospect_id.clone();
        let prospect = prospects
            .iter_mut()
            .find(|prospect| prospect.id == prospect_id)
            .ok_or_else(|| RegistrationServiceError::ProspectNotFound(prospect_id.clone()))?;

        prospect.status = ProspectStatus::Registered;
        tasks[task_index].status = RegistrationStatus::Confirmed;

        let previous_tasks = self.store.repo().get_item(self.tasks_key())?;
        self.store.save(self.tasks_key(), &tasks)?;
        if let Err(err) = self.store.save(self.prospects_key(), &prospects) {
            error!(
                "event=registration_confirm module=service status=error error_code=prospect_write_failed task_id={task_id}"
            );
            self.restore_tasks(previous_tasks.as_deref())?;
            return Err(err.into());
        }
        info!(
            "event=registration_confirm module=service status=ok task_id={task_id} prospect_id={prospect_id}"
        );
        Ok(tasks.swap_remove(task_index))
    }
}
