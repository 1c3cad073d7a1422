//! Point-of-sale device inventory.

use pagination::{ListShape, PaginatedResponse};
use serde::de::IgnoredAny;

use super::record_path;
use crate::client::ApiClient;
use crate::domain::entities::{Device, DeviceAssignment, NewDevice};
use crate::domain::filters::{ListFilter, PageFilters};
use crate::domain::{ApiError, QueryParams};

const BASE: &str = "/devices";

/// Client for `/devices`.
///
/// The list endpoint already answers with `{ data, meta }`.
#[derive(Debug, Clone)]
pub struct DeviceService {
    client: ApiClient,
}

impl DeviceService {
    /// Service backed by `client`.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// One page of devices.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    pub async fn list(&self, filters: &PageFilters) -> Result<PaginatedResponse<Device>, ApiError> {
        self.client
            .get_list(
                BASE,
                &filters.to_query(),
                filters.page_request(),
                ListShape::Paginated,
            )
            .await
    }

    /// Device with serial number `serial`.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    pub async fn get(&self, serial: &str) -> Result<Device, ApiError> {
        self.client
            .get(&record_path(BASE, serial), &QueryParams::new())
            .await
    }

    /// Register a device.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    pub async fn create(&self, input: &NewDevice) -> Result<Device, ApiError> {
        self.client.post(BASE, input).await
    }

    /// Assign device `serial` to a merchant.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    pub async fn assign(&self, serial: &str, input: &DeviceAssignment) -> Result<Device, ApiError> {
        let path = format!("{}/assign", record_path(BASE, serial));
        self.client.patch(&path, input).await
    }

    /// Delete device `serial`.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    pub async fn delete(&self, serial: &str) -> Result<(), ApiError> {
        self.client
            .delete::<IgnoredAny>(&record_path(BASE, serial))
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for device assignment.

    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::domain::HttpMethod;
    use crate::domain::entities::DeviceStatus;
    use crate::test_support::ScriptedTransport;

    #[tokio::test]
    async fn assignment_patches_the_assign_resource() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_success(json!({
            "serialNumber": "SN-1", "merchantCode": "BP001", "status": "ASSIGNED"
        }));
        let service = DeviceService::new(ApiClient::new(transport.clone()));

        let device = service
            .assign(
                "SN-1",
                &DeviceAssignment {
                    merchant_code: "BP001".to_owned(),
                },
            )
            .await
            .expect("assign succeeds");

        assert_eq!(device.status, DeviceStatus::Assigned);
        let request = transport.last_request().expect("request recorded");
        assert_eq!(request.method, HttpMethod::Patch);
        assert_eq!(request.path, "/devices/SN-1/assign");
        assert_eq!(request.body, Some(json!({ "merchantCode": "BP001" })));
    }
}
