//! Partner bank records.

use serde::{Deserialize, Serialize};

use super::Identified;

/// Bank that settles funds for merchants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerBank {
    /// Backend identifier.
    pub id: String,
    /// Short bank code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account funds settle into.
    #[serde(default)]
    pub settlement_account: Option<String>,
    /// Whether the bank currently accepts settlements.
    #[serde(default)]
    pub is_active: bool,
}

impl Identified for PartnerBank {
    fn record_id(&self) -> &str {
        self.id.as_str()
    }
}

/// Body of `POST /banks/partners`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPartnerBank {
    /// Short bank code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account funds settle into.
    pub settlement_account: String,
}

/// Body of `PUT /banks/partners/{id}`; unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerBankUpdate {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New settlement account.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settlement_account: Option<String>,
    /// Enable or disable the bank.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
