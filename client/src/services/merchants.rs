//! Merchant onboarding records.

use async_trait::async_trait;
use pagination::{ListShape, PaginatedResponse};
use serde::de::IgnoredAny;
use serde_json::json;

use super::{ListSource, RecordWriter, record_path};
use crate::client::ApiClient;
use crate::domain::{ApiError, QueryParams};
use crate::domain::entities::{Merchant, MerchantStatus, MerchantUpdate, NewMerchant};
use crate::domain::filters::{ListFilter, MerchantFilters};

const BASE: &str = "/merchants";

/// Client for `/merchants`.
///
/// The list endpoint answers with a bare array.
#[derive(Debug, Clone)]
pub struct MerchantService {
    client: ApiClient,
}

impl MerchantService {
    /// Service backed by `client`.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// One page of merchants.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    pub async fn list(
        &self,
        filters: &MerchantFilters,
    ) -> Result<PaginatedResponse<Merchant>, ApiError> {
        self.client
            .get_list(
                BASE,
                &filters.to_query(),
                filters.page_request(),
                ListShape::BareArray,
            )
            .await
    }

    /// Merchant with `code`.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    pub async fn get(&self, code: &str) -> Result<Merchant, ApiError> {
        self.client
            .get(&record_path(BASE, code), &QueryParams::new())
            .await
    }

    /// Register a merchant.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    pub async fn create(&self, input: &NewMerchant) -> Result<Merchant, ApiError> {
        self.client.post(BASE, input).await
    }

    /// Update merchant `code`.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    pub async fn update(&self, code: &str, input: &MerchantUpdate) -> Result<Merchant, ApiError> {
        self.client.put(&record_path(BASE, code), input).await
    }

    /// Move merchant `code` to `status`.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    pub async fn update_status(
        &self,
        code: &str,
        status: MerchantStatus,
    ) -> Result<Merchant, ApiError> {
        let path = format!("{}/status", record_path(BASE, code));
        self.client.patch(&path, &json!({ "status": status })).await
    }

    /// Delete merchant `code`.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    pub async fn delete(&self, code: &str) -> Result<(), ApiError> {
        self.client
            .delete::<IgnoredAny>(&record_path(BASE, code))
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl ListSource for MerchantService {
    type Record = Merchant;
    type Filters = MerchantFilters;

    async fn fetch(
        &self,
        filters: &MerchantFilters,
    ) -> Result<PaginatedResponse<Merchant>, ApiError> {
        self.list(filters).await
    }
}

#[async_trait]
impl RecordWriter for MerchantService {
    type Create = NewMerchant;
    type Update = MerchantUpdate;

    async fn create_record(&self, input: &NewMerchant) -> Result<Merchant, ApiError> {
        self.create(input).await
    }

    async fn update_record(&self, id: &str, input: &MerchantUpdate) -> Result<Merchant, ApiError> {
        self.update(id, input).await
    }

    async fn delete_record(&self, id: &str) -> Result<(), ApiError> {
        self.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for merchant paths and list adaptation.

    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::domain::HttpMethod;
    use crate::test_support::ScriptedTransport;

    fn service(transport: &Arc<ScriptedTransport>) -> MerchantService {
        MerchantService::new(ApiClient::new(transport.clone()))
    }

    #[tokio::test]
    async fn bare_array_lists_use_the_array_length_as_total() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_success(json!([
            { "merchantCode": "BP001", "businessName": "Bean Co", "status": "ACTIVE" },
            { "merchantCode": "BP002", "businessName": "Leaf Ltd", "status": "PENDING" }
        ]));

        let page = service(&transport)
            .list(&MerchantFilters::default())
            .await
            .expect("list succeeds");

        assert_eq!(page.meta.total, 2);
        assert_eq!(page.meta.total_pages, 1);
        let request = transport.last_request().expect("request recorded");
        assert_eq!(request.path, "/merchants");
        assert_eq!(request.query.get("perPage"), Some("10"));
    }

    #[tokio::test]
    async fn status_changes_patch_the_status_resource() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_success(json!({
            "merchantCode": "BP001", "businessName": "Bean Co", "status": "SUSPENDED"
        }));

        let merchant = service(&transport)
            .update_status("BP001", MerchantStatus::Suspended)
            .await
            .expect("status update succeeds");

        assert_eq!(merchant.status, MerchantStatus::Suspended);
        let request = transport.last_request().expect("request recorded");
        assert_eq!(request.method, HttpMethod::Patch);
        assert_eq!(request.path, "/merchants/BP001/status");
        assert_eq!(request.body, Some(json!({ "status": "SUSPENDED" })));
    }

    #[tokio::test]
    async fn deletes_ignore_the_returned_payload() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_success(json!({ "deleted": true }));

        service(&transport)
            .delete("BP001")
            .await
            .expect("delete succeeds");

        let request = transport.last_request().expect("request recorded");
        assert_eq!(request.method, HttpMethod::Delete);
        assert_eq!(request.path, "/merchants/BP001");
    }

    #[tokio::test]
    async fn codes_cannot_address_another_resource() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_success(json!(null));

        service(&transport)
            .delete("../users/u1")
            .await
            .expect("escaped delete is sent");
        let request = transport.last_request().expect("request recorded");
        assert_eq!(request.path, "/merchants/..%2Fusers%2Fu1");

        let error = service(&transport)
            .delete("..")
            .await
            .expect_err("dot code is refused");
        assert_eq!(error.code(), crate::domain::error::INVALID_PATH_CODE);
        assert_eq!(transport.requests().len(), 1);
    }
}
