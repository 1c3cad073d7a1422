//! Settlement configuration and runs.

use async_trait::async_trait;
use pagination::{ListShape, PaginatedResponse};
use serde::de::IgnoredAny;
use serde_json::json;

use super::{ListSource, RecordWriter, record_path};
use crate::client::ApiClient;
use crate::domain::entities::{NewSettlement, Settlement, SettlementUpdate};
use crate::domain::filters::{ListFilter, SettlementFilters};
use crate::domain::{ApiError, QueryParams};

const BASE: &str = "/settlements";

/// Client for `/settlements`.
///
/// The list endpoint already answers with `{ data, meta }`.
#[derive(Debug, Clone)]
pub struct SettlementService {
    client: ApiClient,
}

impl SettlementService {
    /// Service backed by `client`.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// One page of settlements.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    pub async fn list(
        &self,
        filters: &SettlementFilters,
    ) -> Result<PaginatedResponse<Settlement>, ApiError> {
        self.client
            .get_list(
                BASE,
                &filters.to_query(),
                filters.page_request(),
                ListShape::Paginated,
            )
            .await
    }

    /// Settlement with `id`.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    pub async fn get(&self, id: &str) -> Result<Settlement, ApiError> {
        self.client
            .get(&record_path(BASE, id), &QueryParams::new())
            .await
    }

    /// Configure a settlement.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    pub async fn create(&self, input: &NewSettlement) -> Result<Settlement, ApiError> {
        self.client.post(BASE, input).await
    }

    /// Update settlement `id`.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    pub async fn update(
        &self,
        id: &str,
        input: &SettlementUpdate,
    ) -> Result<Settlement, ApiError> {
        self.client.put(&record_path(BASE, id), input).await
    }

    /// Trigger payout of settlement `id`.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    pub async fn process(&self, id: &str) -> Result<Settlement, ApiError> {
        let path = format!("{}/process", record_path(BASE, id));
        self.client.post(&path, &json!({})).await
    }

    /// Delete settlement `id`.
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
impl ListSource for SettlementService {
    type Record = Settlement;
    type Filters = SettlementFilters;

    async fn fetch(
        &self,
        filters: &SettlementFilters,
    ) -> Result<PaginatedResponse<Settlement>, ApiError> {
        self.list(filters).await
    }
}

#[async_trait]
impl RecordWriter for SettlementService {
    type Create = NewSettlement;
    type Update = SettlementUpdate;

    async fn create_record(&self, input: &NewSettlement) -> Result<Settlement, ApiError> {
        self.create(input).await
    }

    async fn update_record(
        &self,
        id: &str,
        input: &SettlementUpdate,
    ) -> Result<Settlement, ApiError> {
        self.update(id, input).await
    }

    async fn delete_record(&self, id: &str) -> Result<(), ApiError> {
        self.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for settlement paths.

    use std::sync::Arc;

    use super::*;
    use crate::domain::HttpMethod;
    use crate::test_support::ScriptedTransport;

    #[tokio::test]
    async fn processing_posts_to_the_process_resource_with_a_key() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_success(json!({
            "id": "s-9",
            "merchantCode": "BP001",
            "schedule": "DAILY",
            "status": "PROCESSING"
        }));
        let service = SettlementService::new(ApiClient::new(transport.clone()));

        let settlement = service.process("s-9").await.expect("process succeeds");

        assert_eq!(settlement.id, "s-9");
        let request = transport.last_request().expect("request recorded");
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.path, "/settlements/s-9/process");
        assert!(request.header("Idempotency-Key").is_some());
    }
}
