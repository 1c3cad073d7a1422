//! Transaction records and analytics.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Identified;

/// Processing state of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// Accepted, awaiting the processor.
    Pending,
    /// Completed successfully.
    Successful,
    /// Rejected or errored.
    Failed,
    /// Reversed after completion.
    Reversed,
    /// A status this client does not know about.
    #[serde(other)]
    Unknown,
}

/// One payment transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Backend identifier.
    pub id: String,
    /// Customer-facing reference.
    #[serde(default)]
    pub reference: Option<String>,
    /// Merchant that received the payment.
    #[serde(default)]
    pub merchant_code: Option<String>,
    /// Amount in major units.
    #[serde(default)]
    pub amount: f64,
    /// ISO 4217 currency code.
    #[serde(default)]
    pub currency: Option<String>,
    /// Processing state.
    pub status: TransactionStatus,
    /// Payment channel (card, mobile money, ...).
    #[serde(default)]
    pub channel: Option<String>,
    /// Paying customer's phone number.
    #[serde(default)]
    pub customer_phone: Option<String>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Identified for Transaction {
    fn record_id(&self) -> &str {
        self.id.as_str()
    }
}

/// Aggregates shown on the transactions dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionAnalytics {
    /// Number of transactions in range.
    #[serde(default)]
    pub total_count: u64,
    /// Sum of amounts in range.
    #[serde(default)]
    pub total_volume: f64,
    /// Share of successful transactions, 0 to 100.
    #[serde(default)]
    pub success_rate: f64,
    /// Transaction counts per status.
    #[serde(default)]
    pub by_status: BTreeMap<String, u64>,
}
