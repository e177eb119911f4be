//! Registered insurance policies.

use super::prospect::Prospect;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyStatus {
    #[default]
    #[serde(rename = "Pendente Confirmação")]
    PendingConfirmation,
    #[serde(rename = "Ativa")]
    Active,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredPolicy {
    pub id: String,
    pub client_name: String,
    pub policy_type: String,
    #[serde(deserialize_with = "super::lenient::amount")]
    pub premium: f64,
    pub start_date: NaiveDate,
    pub expiry_date: NaiveDate,
    #[serde(default)]
    pub status: PolicyStatus,
}

/// Raw policy registration form input; every field is required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyForm {
    pub client_name: String,
    pub policy_type: String,
    pub premium: String,
    pub start_date: String,
    pub expiry_date: String,
}

impl PolicyForm {
    /// Form opened from a converted prospect: client and product carried over.
    pub fn from_prospect(prospect: &Prospect) -> Self {
        Self {
            client_name: prospect.client.clone(),
            policy_type: prospect.product.clone(),
            ..Self::default()
        }
    }
}

/// `POL001`, `POL002`, ... for the `ordinal`-th stored policy.
pub fn policy_id(ordinal: usize) -> String {
    format!("POL{ordinal:03}")
}
