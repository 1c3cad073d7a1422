//! Settlement configuration and runs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::Identified;

/// How often a merchant is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettlementSchedule {
    /// Every business day.
    Daily,
    /// Once a week.
    Weekly,
    /// Once a month.
    Monthly,
}

/// State of a settlement run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettlementStatus {
    /// Waiting to be processed.
    Pending,
    /// Being paid out.
    Processing,
    /// Paid out.
    Completed,
    /// Payout failed.
    Failed,
    /// A status this client does not know about.
    #[serde(other)]
    Unknown,
}

/// Settlement for one merchant over one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    /// Backend identifier.
    pub id: String,
    /// Settled merchant.
    pub merchant_code: String,
    /// Paying partner bank.
    #[serde(default)]
    pub partner_bank_code: Option<String>,
    /// Net amount in major units.
    #[serde(default)]
    pub amount: f64,
    /// ISO 4217 currency code.
    #[serde(default)]
    pub currency: Option<String>,
    /// Settlement cadence.
    #[serde(default)]
    pub schedule: Option<SettlementSchedule>,
    /// Run state.
    pub status: SettlementStatus,
    /// First day covered.
    #[serde(default)]
    pub period_start: Option<NaiveDate>,
    /// Last day covered.
    #[serde(default)]
    pub period_end: Option<NaiveDate>,
    /// When the run was processed.
    #[serde(default)]
    pub processed_at: Option<DateTime<Utc>>,
}

impl Identified for Settlement {
    fn record_id(&self) -> &str {
        self.id.as_str()
    }
}

/// Body of `POST /settlements`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSettlement {
    /// Merchant to settle.
    pub merchant_code: String,
    /// Paying partner bank.
    pub partner_bank_code: String,
    /// Settlement cadence.
    pub schedule: SettlementSchedule,
}

/// Body of `PUT /settlements/{id}`; unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementUpdate {
    /// New paying partner bank.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_bank_code: Option<String>,
    /// New cadence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<SettlementSchedule>,
}
