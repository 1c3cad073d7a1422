//! Telco operator configuration.

use pagination::{ListShape, PaginatedResponse};
use serde::de::IgnoredAny;

use super::record_path;
use crate::client::ApiClient;
use crate::domain::ApiError;
use crate::domain::entities::{NewTelco, TelcoManagement, TelcoUpdate};
use crate::domain::filters::{ListFilter, PageFilters};

const BASE: &str = "/telcos-mgt";

/// Client for `/telcos-mgt`.
///
/// The list endpoint answers with a bare array.
#[derive(Debug, Clone)]
pub struct TelcoService {
    client: ApiClient,
}

impl TelcoService {
    /// Service backed by `client`.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Configured telcos.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    pub async fn list(
        &self,
        filters: &PageFilters,
    ) -> Result<PaginatedResponse<TelcoManagement>, ApiError> {
        self.client
            .get_list(
                BASE,
                &filters.to_query(),
                filters.page_request(),
                ListShape::BareArray,
            )
            .await
    }

    /// Configure a telco.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    pub async fn create(&self, input: &NewTelco) -> Result<TelcoManagement, ApiError> {
        self.client.post(BASE, input).await
    }

    /// Update telco `id`.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    pub async fn update(&self, id: &str, input: &TelcoUpdate) -> Result<TelcoManagement, ApiError> {
        self.client.put(&record_path(BASE, id), input).await
    }

    /// Delete telco `id`.
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
