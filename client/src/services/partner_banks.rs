//! Partner bank configuration.

use async_trait::async_trait;
use pagination::{ListShape, PaginatedResponse};
use serde::de::IgnoredAny;

use super::{ListSource, RecordWriter, record_path};
use crate::client::ApiClient;
use crate::domain::entities::{NewPartnerBank, PartnerBank, PartnerBankUpdate};
use crate::domain::filters::{ListFilter, PageFilters};
use crate::domain::{ApiError, QueryParams};

const BASE: &str = "/banks/partners";

/// Client for `/banks/partners`.
///
/// The list endpoint answers with `{ data: [...], total }`.
#[derive(Debug, Clone)]
pub struct PartnerBankService {
    client: ApiClient,
}

impl PartnerBankService {
    /// Service backed by `client`.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// One page of partner banks.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    pub async fn list(
        &self,
        filters: &PageFilters,
    ) -> Result<PaginatedResponse<PartnerBank>, ApiError> {
        self.client
            .get_list(
                BASE,
                &filters.to_query(),
                filters.page_request(),
                ListShape::DataTotal,
            )
            .await
    }

    /// Partner bank with `id`.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    pub async fn get(&self, id: &str) -> Result<PartnerBank, ApiError> {
        self.client
            .get(&record_path(BASE, id), &QueryParams::new())
            .await
    }

    /// Register a partner bank.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    pub async fn create(&self, input: &NewPartnerBank) -> Result<PartnerBank, ApiError> {
        self.client.post(BASE, input).await
    }

    /// Update partner bank `id`.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    pub async fn update(
        &self,
        id: &str,
        input: &PartnerBankUpdate,
    ) -> Result<PartnerBank, ApiError> {
        self.client.put(&record_path(BASE, id), input).await
    }

    /// Delete partner bank `id`.
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

#[async_trait]
impl ListSource for PartnerBankService {
    type Record = PartnerBank;
    type Filters = PageFilters;

    async fn fetch(
        &self,
        filters: &PageFilters,
    ) -> Result<PaginatedResponse<PartnerBank>, ApiError> {
        self.list(filters).await
    }
}

#[async_trait]
impl RecordWriter for PartnerBankService {
    type Create = NewPartnerBank;
    type Update = PartnerBankUpdate;

    async fn create_record(&self, input: &NewPartnerBank) -> Result<PartnerBank, ApiError> {
        self.create(input).await
    }

    async fn update_record(
        &self,
        id: &str,
        input: &PartnerBankUpdate,
    ) -> Result<PartnerBank, ApiError> {
        self.update(id, input).await
    }

    async fn delete_record(&self, id: &str) -> Result<(), ApiError> {
        self.delete(id).await
    }
}
