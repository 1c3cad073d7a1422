//! Commission rules.

use serde::{Deserialize, Serialize};

use super::Identified;

/// Fee rule applied to matching transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commission {
    /// Backend identifier.
    pub id: String,
    /// Merchant scope; `None` applies platform-wide.
    #[serde(default)]
    pub merchant_code: Option<String>,
    /// Telco scope; `None` applies to every operator.
    #[serde(default)]
    pub telco_code: Option<String>,
    /// Transaction type the rule matches.
    #[serde(default)]
    pub transaction_type: Option<String>,
    /// Percentage rate.
    #[serde(default)]
    pub rate: f64,
    /// Flat fee in major units.
    #[serde(default)]
    pub flat_fee: f64,
    /// Whether the rule is applied.
    #[serde(default)]
    pub is_active: bool,
}

impl Identified for Commission {
    fn record_id(&self) -> &str {
        self.id.as_str()
    }
}

/// Body of `POST /commissions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCommission {
    /// Merchant scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_code: Option<String>,
    /// Telco scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telco_code: Option<String>,
    /// Matched transaction type.
    pub transaction_type: String,
    /// Percentage rate.
    pub rate: f64,
    /// Flat fee in major units.
    pub flat_fee: f64,
}

/// Body of `PUT /commissions/{id}`; unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionUpdate {
    /// New percentage rate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    /// New flat fee.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flat_fee: Option<f64>,
    /// Enable or disable the rule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
