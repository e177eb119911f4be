use brokerage_core::config::CoreConfig;
use brokerage_core::context::{AppContext, CurrentUser, FixedClock};
use brokerage_core::model::prospect::ProspectStatus;
use brokerage_core::model::registration::RegistrationStatus;
use brokerage_core::service::registration_service::RegistrationServiceError;
use brokerage_core::db::DbError;
use brokerage_core::{
    KeyValueRepository, MemoryKvRepository, ProspectService, RegistrationService, StorageError,
    StorageResult,
};
use chrono::{TimeZone, Utc};
use std::cell::Cell;
use std::sync::Arc;

/// Memory repo whose writes to one key start failing on demand.
struct FailingWrites {
    inner: MemoryKvRepository,
    failing_key: &'static str,
    armed: Cell<bool>,
}

impl KeyValueRepository for FailingWrites {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        if self.armed.get() && key == self.failing_key {
            return Err(StorageError::Db(DbError::Sqlite(
                rusqlite::Error::InvalidQuery,
            )));
        }
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StorageResult<bool> {
        self.inner.remove_item(key)
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        self.inner.keys()
    }
}

fn context_at(hour: u32) -> AppContext {
    let clock = FixedClock(Utc.with_ymd_and_hms(2025, 6, 20, hour, 0, 0).unwrap());
    AppContext::new(CurrentUser::mock_admin(), CoreConfig::default(), Arc::new(clock))
}

#[test]
fn confirm_marks_task_and_prospect() {
    let ctx = context_at(9);
    let repo = MemoryKvRepository::new();
    let prospects = ProspectService::new(&repo, &ctx);
    let registrations = RegistrationService::new(&repo, &ctx);

    let sofia = prospects.load_or_seed().unwrap().remove(2).prospect;
    let task = registrations.create_from_prospect(&sofia).unwrap();
    assert!(task.is_pending());
    assert_eq!(task.client, "Sofia Bernardes");

    let review = registrations.check_prospect(&task.id).unwrap();
    assert_eq!(review.prospect.prospect.id, "PROS003");

    let confirmed = registrations.confirm(&task.id).unwrap();
    assert_eq!(confirmed.status, RegistrationStatus::Confirmed);
    assert_eq!(
        prospects.get("PROS003").unwrap().unwrap().prospect.status,
        ProspectStatus::Registered
    );
    assert_eq!(
        registrations.list("").unwrap()[0].status,
        RegistrationStatus::Confirmed
    );
}

#[test]
fn missing_prospect_aborts_without_writes() {
    let ctx = context_at(9);
    let repo = MemoryKvRepository::new();
    let prospects = ProspectService::new(&repo, &ctx);
    let registrations = RegistrationService::new(&repo, &ctx);

    let juliana = prospects.load_or_seed().unwrap().remove(0).prospect;
    let task = registrations.create_from_prospect(&juliana).unwrap();
    prospects.delete_prospect("PROS001").unwrap();
    let tasks_before = repo.get_item("registrationTasks").unwrap();
    let prospects_before = repo.get_item("prospectsData").unwrap();

    let err = registrations.check_prospect(&task.id).unwrap_err();
    assert!(matches!(err, RegistrationServiceError::ProspectNotFound(id) if id == "PROS001"));
    let err = registrations.confirm(&task.id).unwrap_err();
    assert!(matches!(err, RegistrationServiceError::ProspectNotFound(_)));

    assert_eq!(repo.get_item("registrationTasks").unwrap(), tasks_before);
    assert_eq!(repo.get_item("prospectsData").unwrap(), prospects_before);
}

#[test]
fn list_is_newest_first_and_searchable() {
    let repo = MemoryKvRepository::new();
    let early = context_at(8);
    let late = context_at(17);
    let seeded = ProspectService::new(&repo, &early).load_or_seed().unwrap();

    RegistrationService::new(&repo, &early)
        .create_from_prospect(&seeded[0].prospect)
        .unwrap();
    RegistrationService::new(&repo, &late)
        .create_from_prospect(&seeded[1].prospect)
        .unwrap();

    let registrations = RegistrationService::new(&repo, &late);
    let clients: Vec<String> = registrations
        .list("")
        .unwrap()
        .into_iter()
        .map(|task| task.client)
        .collect();
    assert_eq!(clients, vec!["Ricardo Alves", "Juliana Paes"]);

    let hits = registrations.list("porto").unwrap();
    assert!(hits.is_empty());
    let hits = registrations.list("juliana").unwrap();
    assert_eq!(hits.len(), 1);
}

#[test]
fn unknown_task_is_reported() {
    let ctx = context_at(9);
    let repo = MemoryKvRepository::new();
    let err = RegistrationService::new(&repo, &ctx)
        .confirm("TASK-missing")
        .unwrap_err();
    assert!(matches!(err, RegistrationServiceError::TaskNotFound(_)));
}

#[test]
fn failed_prospect_write_restores_task_list() {
    let ctx = context_at(9);
    let repo = FailingWrites {
        inner: MemoryKvRepository::new(),
        failing_key: "prospectsData",
        armed: Cell::new(false),
    };
    let prospects = ProspectService::new(&repo, &ctx);
    let registrations = RegistrationService::new(&repo, &ctx);

    let sofia = prospects.load_or_seed().unwrap().remove(2).prospect;
    let task = registrations.create_from_prospect(&sofia).unwrap();
    let tasks_before = repo.get_item("registrationTasks").unwrap();
    let prospects_before = repo.get_item("prospectsData").unwrap();

    repo.armed.set(true);
    let err = registrations.confirm(&task.id).unwrap_err();
    assert!(matches!(err, RegistrationServiceError::Storage(_)));

    assert_eq!(repo.get_item("registrationTasks").unwrap(), tasks_before);
    assert_eq!(repo.get_item("prospectsData").unwrap(), prospects_before);
    assert!(registrations.list("").unwrap()[0].is_pending());
    assert_eq!(
        prospects.get("PROS003").unwrap().unwrap().prospect.status,
        sofia.status
    );
}
