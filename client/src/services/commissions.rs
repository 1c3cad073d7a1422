//! Commission rules.

use pagination::{ListShape, PaginatedResponse};
use serde::de::IgnoredAny;

use super::record_path;
use crate::client::ApiClient;
use crate::domain::ApiError;
use crate::domain::entities::{Commission, CommissionUpdate, NewCommission};
use crate::domain::filters::{ListFilter, PageFilters};

const BASE: &str = "/commissions";

/// Client for `/commissions`.
#[derive(Debug, Clone)]
pub struct CommissionService {
    client: ApiClient,
}

impl CommissionService {
    /// Service backed by `client`.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Commission rules.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    pub async fn list(
        &self,
        filters: &PageFilters,
    ) -> Result<PaginatedResponse<Commission>, ApiError> {
        self.client
            .get_list(
                BASE,
                &filters.to_query(),
                filters.page_request(),
                ListShape::BareArray,
            )
            .await
    }

    /// Add a commission rule.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    pub async fn create(&self, input: &NewCommission) -> Result<Commission, ApiError> {
        self.client.post(BASE, input).await
    }

    /// Update rule `id`.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    pub async fn update(&self, id: &str, input: &CommissionUpdate) -> Result<Commission, ApiError> {
        self.client.put(&record_path(BASE, id), input).await
    }

    /// Delete rule `id`.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .delete::<IgnoredAny>(&record_path(BASE, id))
            .await
            .map(|_| ())
    }
}
