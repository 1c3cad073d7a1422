//! Mobile network operator configuration.

use serde::{Deserialize, Serialize};

use super::Identified;

/// Telco routing entry managed under `/telcos-mgt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelcoManagement {
    /// Backend identifier.
    pub id: String,
    /// Operator name.
    pub name: String,
    /// Short operator code.
    pub code: String,
    /// Phone number prefixes routed to this operator.
    #[serde(default)]
    pub prefixes: Vec<String>,
    /// Whether routing is enabled.
    #[serde(default)]
    pub is_active: bool,
}

impl Identified for TelcoManagement {
    fn record_id(&self) -> &str {
        self.id.as_str()
    }
}

/// Body of `POST /telcos-mgt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTelco {
    /// Operator name.
    pub name: String,
    /// Short operator code.
    pub code: String,
    /// Routed phone number prefixes.
    pub prefixes: Vec<String>,
}

/// Body of `PUT /telcos-mgt/{id}`; unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelcoUpdate {
    /// New operator name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New prefix list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefixes: Option<Vec<String>>,
    /// Enable or disable routing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
