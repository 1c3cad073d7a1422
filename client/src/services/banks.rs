//! Reference list of banks.

use pagination::{ListShape, PaginatedResponse};

use super::record_path;
use crate::client::ApiClient;
use crate::domain::entities::Bank;
use crate::domain::filters::{ListFilter, PageFilters};
use crate::domain::{ApiError, QueryParams};

const BASE: &str = "/banks";

/// Client for `/banks`.
///
/// These endpoints answer without the response envelope.
#[derive(Debug, Clone)]
pub struct BankService {
    client: ApiClient,
}

impl BankService {
    /// Service backed by `client`.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Known banks.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    pub async fn list(&self, filters: &PageFilters) -> Result<PaginatedResponse<Bank>, ApiError> {
        self.client
            .get_bare_list(
                BASE,
                &filters.to_query(),
                filters.page_request(),
                ListShape::BareArray,
            )
            .await
    }

    /// Bank with `code`.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    pub async fn get(&self, code: &str) -> Result<Bank, ApiError> {
        self.client
            .get_bare(&record_path(BASE, code), &QueryParams::new())
            .await
    }
}
