//! Renewal prospect records.
//!
//! # Responsibility
//! - Define the stored prospect shape.
//! - Expose commissions as a projection recomputed on every read.
//!
//! # Invariants
//! - `Prospect` has no commission fields; `ProspectWithCommissions` always
//!   derives them from the four premium/percentage inputs.

use super::commission::{calculate_commissions, parse_float_prefix, Commissions};
use super::lenient;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProspectStatus {
    #[default]
    #[serde(rename = "Contatar")]
    Contact,
    #[serde(rename = "Em Negociação")]
    Negotiating,
    #[serde(rename = "Aguardando Documentos")]
    AwaitingDocuments,
    #[serde(rename = "Convertido")]
    Converted,
    #[serde(rename = "Perdido")]
    Lost,
    #[serde(rename = "Follow-up")]
    FollowUp,
    /// Set once the registration task is confirmed.
    #[serde(rename = "Cadastrado")]
    Registered,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Situation {
    #[default]
    #[serde(rename = "Pendente Vendedor")]
    PendingSeller,
    #[serde(rename = "Aguardando Cliente")]
    AwaitingClient,
    #[serde(rename = "Documentação OK")]
    DocumentsOk,
    #[serde(rename = "Fechado")]
    Closed,
    #[serde(rename = "Cancelado")]
    Cancelled,
}

/// File metadata only; contents are never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prospect {
    pub id: String,
    #[serde(
        rename = "vigenciaFinal",
        default,
        deserialize_with = "lenient::optional_date"
    )]
    pub policy_end: Option<NaiveDate>,
    #[serde(rename = "cliente")]
    pub client: String,
    #[serde(rename = "produto", default)]
    pub product: String,
    #[serde(rename = "seguradora", default)]
    pub insurer: String,
    #[serde(rename = "vendedor", default)]
    pub seller: String,
    #[serde(rename = "planoAnterior", default)]
    pub previous_plan: String,
    #[serde(
        rename = "percentualAnterior",
        default,
        deserialize_with = "lenient::text_or_number"
    )]
    pub previous_percent: String,
    #[serde(
        rename = "premioLiquidoAnterior",
        default,
        deserialize_with = "lenient::amount"
    )]
    pub previous_premium: f64,
    #[serde(rename = "planoAtual", default)]
    pub current_plan: String,
    #[serde(
        rename = "percentualAtual",
        default,
        deserialize_with = "lenient::text_or_number"
    )]
    pub current_percent: String,
    #[serde(
        rename = "premioLiquidoAtual",
        default,
        deserialize_with = "lenient::amount"
    )]
    pub current_premium: f64,
    #[serde(rename = "analise", default)]
    pub analysis: String,
    #[serde(default)]
    pub status: ProspectStatus,
    #[serde(rename = "situacao", default)]
    pub situation: Situation,
    #[serde(rename = "observacao", default)]
    pub observation: String,
    #[serde(default)]
    pub attachment: Option<Attachment>,
    #[serde(
        rename = "lastModified",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_modified: Option<NaiveDate>,
}

impl Prospect {
    /// Empty record with the form's defaults.
    pub fn blank(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            policy_end: None,
            client: String::new(),
            product: String::new(),
            insurer: String::new(),
            seller: String::new(),
            previous_plan: String::new(),
            previous_percent: String::new(),
            previous_premium: 0.0,
            current_plan: String::new(),
            current_percent: String::new(),
            current_premium: 0.0,
            analysis: String::new(),
            status: ProspectStatus::default(),
            situation: Situation::default(),
            observation: String::new(),
            attachment: None,
            last_modified: None,
        }
    }

    pub fn commissions(&self) -> Commissions {
        calculate_commissions(
            self.previous_premium,
            &self.previous_percent,
            self.current_premium,
            &self.current_percent,
        )
    }

    /// Rewrites percentages as plain numbers, as the form does on submit.
    ///
    /// `"7%"` becomes `"7"`, anything unparsable becomes `"0"`.
    pub fn normalize_inputs(&mut self) {
        self.previous_percent = normalize_percent(&self.previous_percent);
        self.current_percent = normalize_percent(&self.current_percent);
        if !self.previous_premium.is_finite() {
            self.previous_premium = 0.0;
        }
        if !self.current_premium.is_finite() {
            self.current_premium = 0.0;
        }
    }

    /// Days from `today` to the policy end; negative once expired.
    pub fn days_until_expiry(&self, today: NaiveDate) -> Option<i64> {
        self.policy_end.map(|end| (end - today).num_days())
    }
}

fn normalize_percent(value: &str) -> String {
    parse_float_prefix(value).unwrap_or(0.0).to_string()
}

/// Prospect plus freshly derived commissions, for rendering and export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProspectWithCommissions {
    #[serde(flatten)]
    pub prospect: Prospect,
    #[serde(flatten)]
    pub commissions: Commissions,
}

impl From<Prospect> for ProspectWithCommissions {
    fn from(prospect: Prospect) -> Self {
        let commissions = prospect.commissions();
        Self {
            prospect,
            commissions,
        }
    }
}
