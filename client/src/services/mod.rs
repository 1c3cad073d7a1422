//! Resource services, one per backend resource.
//!
//! Each service holds an [`ApiClient`] clone and knows its resource paths and
//! the [`ListShape`](pagination::ListShape) each list endpoint answers with.
//! List-backed services also implement [`ListSource`] and, where the backend
//! accepts writes, [`RecordWriter`], which is what the feature stores drive.

mod auth;
mod banks;
mod commissions;
mod devices;
mod merchants;
mod partner_banks;
mod settlements;
mod telcos;
mod transactions;
mod users;

use async_trait::async_trait;
use pagination::PaginatedResponse;
use serde::Serialize;

pub use auth::AuthService;
pub use banks::BankService;
pub use commissions::CommissionService;
pub use devices::DeviceService;
pub use merchants::MerchantService;
pub use partner_banks::PartnerBankService;
pub use settlements::SettlementService;
pub use telcos::TelcoService;
pub use transactions::TransactionService;
pub use users::UserService;

#[cfg(doc)]
use crate::client::ApiClient;
use crate::domain::ApiError;
use crate::domain::entities::Identified;
use crate::domain::filters::ListFilter;

/// Read side of a list-backed resource.
#[async_trait]
pub trait ListSource: Send + Sync {
    /// Record type the list contains.
    type Record: Identified + Clone + Send + Sync + 'static;
    /// Filters the list accepts.
    type Filters: ListFilter;

    /// Fetch one page of records.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    async fn fetch(
        &self,
        filters: &Self::Filters,
    ) -> Result<PaginatedResponse<Self::Record>, ApiError>;
}

/// Write side of a list-backed resource.
#[async_trait]
pub trait RecordWriter: ListSource {
    /// Body of a create call.
    type Create: Serialize + Send + Sync;
    /// Body of an update call.
    type Update: Serialize + Send + Sync;

    /// Create a record.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    async fn create_record(&self, input: &Self::Create) -> Result<Self::Record, ApiError>;

    /// Update the record identified by `id`.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    async fn update_record(
        &self,
        id: &str,
        input: &Self::Update,
    ) -> Result<Self::Record, ApiError>;

    /// Delete the record identified by `id`.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    async fn delete_record(&self, id: &str) -> Result<(), ApiError>;
}

/// Path of one record under `base`.
///
/// The identifier is percent-encoded into a single segment, so `/`, `?`, and
/// `#` inside it never reach another resource. Identifiers that are empty or
/// only dots are refused by [`ApiClient`] before sending.
fn record_path(base: &str, id: &str) -> String {
    format!("{base}/{}", urlencoding::encode(id))
}
