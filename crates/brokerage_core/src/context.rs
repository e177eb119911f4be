//! Application context shared by every service.
//!
//! # Responsibility
//! - Carry the signed-in (mock) user, configuration and clock.
//!
//! # Invariants
//! - Built once at startup and read-only afterwards.
//! - All "today"/"now" stamps in the core come from `AppContext::clock`.

use crate::config::CoreConfig;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::Arc;

/// Time source, swappable for deterministic tests.
pub trait Clock: Debug + Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Route paths the mock administrator may open.
pub const ADMIN_PERMISSIONS: &[&str] = &[
    "/",
    "/dashboard",
    "/crm",
    "/prospeccoes",
    "/tarefas-cadastro",
    "/apolices",
    "/usuarios",
    "/vendedores",
    "/sinistros",
    "/relatorios",
    "/configuracoes",
    "/ajuda",
    "/acesso-negado",
];

/// Identity of whoever is operating the back office.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub avatar_fallback: String,
    pub role_id: String,
    pub role_name: String,
    #[serde(rename = "role_permissions")]
    pub permissions: Vec<String>,
    pub status: String,
}

impl CurrentUser {
    /// The hard-wired administrator used in place of real sign-in.
    pub fn mock_admin() -> Self {
        Self {
            id: "mock-admin-id".to_string(),
            email: "admin@example.com".to_string(),
            name: "Admin Mockado".to_string(),
            avatar_fallback: "AM".to_string(),
            role_id: "mock-admin-role-id".to_string(),
            role_name: "Admin".to_string(),
            permissions: ADMIN_PERMISSIONS.iter().map(|p| p.to_string()).collect(),
            status: "Ativo".to_string(),
        }
    }

    pub fn can_access(&self, path: &str) -> bool {
        self.permissions.iter().any(|allowed| allowed == path)
    }
}

#[derive(Debug, Clone)]
pub struct AppContext {
    current_user: CurrentUser,
    config: CoreConfig,
    clock: Arc<dyn Clock>,
}

impl AppContext {
    pub fn new(current_user: CurrentUser, config: CoreConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            current_user,
            config,
            clock,
        }
    }

    /// Mock administrator, default config, wall clock.
    pub fn mock() -> Self {
        Self::new(
            CurrentUser::mock_admin(),
            CoreConfig::default(),
            Arc::new(SystemClock),
        )
    }

    pub fn current_user(&self) -> &CurrentUser {
        &self.current_user
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Whether the current user only sees work assigned to them.
    pub fn is_seller(&self) -> bool {
        self.current_user.role_name == self.config.seller_role_name
    }
}
