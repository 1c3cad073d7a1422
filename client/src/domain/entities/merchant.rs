//! Merchant records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Identified;

/// Lifecycle state of a merchant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MerchantStatus {
    /// Onboarding submitted, not yet approved.
    Pending,
    /// Approved and transacting.
    Active,
    /// Temporarily blocked.
    Suspended,
    /// Deactivated.
    Inactive,
    /// A status this client does not know about.
    #[serde(other)]
    Unknown,
}

/// Onboarded merchant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Merchant {
    /// Backend identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Merchant code used in resource paths (for example `BP001`).
    pub merchant_code: String,
    /// Registered business name.
    #[serde(default)]
    pub business_name: String,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Contact phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Lifecycle state.
    #[serde(default = "unknown_status")]
    pub status: MerchantStatus,
    /// Partner bank that settles for this merchant.
    #[serde(default)]
    pub partner_bank_code: Option<String>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

const fn unknown_status() -> MerchantStatus {
    MerchantStatus::Unknown
}

impl Identified for Merchant {
    fn record_id(&self) -> &str {
        self.merchant_code.as_str()
    }
}

/// Body of `POST /merchants`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMerchant {
    /// Merchant code to register.
    pub merchant_code: String,
    /// Registered business name.
    pub business_name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
    /// Settling partner bank.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_bank_code: Option<String>,
}

/// Body of `PUT /merchants/{code}`; unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantUpdate {
    /// New business name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    /// New contact email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New contact phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// New settling partner bank.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_bank_code: Option<String>,
}
