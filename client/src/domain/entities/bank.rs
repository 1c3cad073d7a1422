//! Reference list of banks.

use serde::{Deserialize, Serialize};

/// Bank from the reference list used in onboarding forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bank {
    /// Short bank code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// SWIFT/BIC, when known.
    #[serde(default)]
    pub swift_code: Option<String>,
}
