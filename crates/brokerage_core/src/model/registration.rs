//! Policy-registration work items created from converted prospects.

use super::prospect::Prospect;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegistrationStatus {
    #[default]
    #[serde(rename = "Pendente Cadastro")]
    Pending,
    #[serde(rename = "Confirmado")]
    Confirmed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationTask {
    pub id: String,
    #[serde(rename = "prospectId")]
    pub prospect_id: String,
    #[serde(rename = "cliente")]
    pub client: String,
    #[serde(rename = "produto", default)]
    pub product: String,
    #[serde(rename = "vendedor", default)]
    pub seller: String,
    #[serde(default)]
    pub status: RegistrationStatus,
    #[serde(rename = "observacao", default)]
    pub observation: String,
    #[serde(rename = "dataCriacao")]
    pub created_at: DateTime<Utc>,
}

impl RegistrationTask {
    /// Pending task snapshotting the prospect's identifying fields.
    pub fn for_prospect(prospect: &Prospect, created_at: DateTime<Utc>) -> Self {
        Self {
            id: super::generate_id("TASK"),
            prospect_id: prospect.id.clone(),
            client: prospect.client.clone(),
            product: prospect.product.clone(),
            seller: prospect.seller.clone(),
            status: RegistrationStatus::Pending,
            observation: prospect.observation.clone(),
            created_at,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == RegistrationStatus::Pending
    }
}
