//! Registered policy service.

use crate::context::AppContext;
use crate::model::commission::parse_float_prefix;
use crate::model::policy::{policy_id, PolicyForm, PolicyStatus, RegisteredPolicy};
use crate::repo::kv_repo::{KeyValueRepository, StorageError};
use crate::repo::local_store::LocalStore;
use chrono::NaiveDate;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum PolicyServiceError {
    /// A required form field was left blank.
    MissingField(&'static str),
    InvalidPremium(String),
    InvalidDate { field: &'static str, value: String },
    Storage(StorageError),
}

impl Display for PolicyServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "required field is blank: {field}"),
            Self::InvalidPremium(value) => write!(f, "premium is not a number: `{value}`"),
            Self::InvalidDate { field, value } => {
                write!(f, "{field} is not a YYYY-MM-DD date: `{value}`")
            }
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PolicyServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StorageError> for PolicyServiceError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

pub struct PolicyService<'ctx, R: KeyValueRepository> {
    store: LocalStore<R>,
    ctx: &'ctx AppContext,
}

impl<'ctx, R: KeyValueRepository> PolicyService<'ctx, R> {
    pub fn new(repo: R, ctx: &'ctx AppContext) -> Self {
        Self {
            store: LocalStore::new(repo),
            ctx,
        }
    }

    fn key(&self) -> &str {
        &self.ctx.config().storage_keys.policies
    }

    pub fn list(&self) -> Result<Vec<RegisteredPolicy>, PolicyServiceError> {
        Ok(self.store.load(self.key())?)
    }

    /// Validates the form and appends an active policy numbered after the
    /// stored count.
    pub fn register(&self, form: &PolicyForm) -> Result<RegisteredPolicy, PolicyServiceError> {
        let client_name = required("clientName", &form.client_name)?;
        let policy_type = required("policyType", &form.policy_type)?;
        let premium_raw = required("premium", &form.premium)?;
        let start_raw = required("startDate", &form.start_date)?;
        let expiry_raw = required("expiryDate", &form.expiry_date)?;

        let premium = parse_float_prefix(premium_raw)
            .filter(|value| value.is_finite())
            .ok_or_else(|| PolicyServiceError::InvalidPremium(premium_raw.to_string()))?;
        let start_date = parse_date("startDate", start_raw)?;
        let expiry_date = parse_date("expiryDate", expiry_raw)?;

        let mut policies = self.list()?;
        let policy = RegisteredPolicy {
            id: policy_id(policies.len() + 1),
            client_name: client_name.to_string(),
            policy_type: policy_type.to_string(),
            premium,
            start_date,
            expiry_date,
            status: PolicyStatus::Active,
        };
        policies.push(policy.clone());
        self.store.save(self.key(), &policies)?;

        info!(
            "event=policy_register module=service status=ok policy_id={}",
            policy.id
        );
        Ok(policy)
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, PolicyServiceError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(PolicyServiceError::MissingField(field));
    }
    Ok(value)
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, PolicyServiceError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| PolicyServiceError::InvalidDate {
        field,
        value: value.to_string(),
    })
}
