//! Dashboard user management.

use async_trait::async_trait;
use pagination::{ListShape, PaginatedResponse};
use serde::de::IgnoredAny;
use serde_json::json;

use super::{ListSource, RecordWriter, record_path};
use crate::client::ApiClient;
use crate::domain::entities::{NewUser, User, UserUpdate};
use crate::domain::filters::{ListFilter, UserFilters};
use crate::domain::{ApiError, QueryParams};

const BASE: &str = "/users";

/// Client for `/users`.
///
/// The list endpoint answers with `{ data: [...], total }`.
#[derive(Debug, Clone)]
pub struct UserService {
    client: ApiClient,
}

impl UserService {
    /// Service backed by `client`.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// One page of users.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    pub async fn list(&self, filters: &UserFilters) -> Result<PaginatedResponse<User>, ApiError> {
        self.client
            .get_list(
                BASE,
                &filters.to_query(),
                filters.page_request(),
                ListShape::DataTotal,
            )
            .await
    }

    /// User with `id`.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    pub async fn get(&self, id: &str) -> Result<User, ApiError> {
        self.client
            .get(&record_path(BASE, id), &QueryParams::new())
            .await
    }

    /// Invite a user.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    pub async fn create(&self, input: &NewUser) -> Result<User, ApiError> {
        self.client.post(BASE, input).await
    }

    /// Update user `id`.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    pub async fn update(&self, id: &str, input: &UserUpdate) -> Result<User, ApiError> {
        self.client.put(&record_path(BASE, id), input).await
    }

    /// Delete user `id`.
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

    /// Send user `id` a password reset.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    pub async fn reset_password(&self, id: &str) -> Result<(), ApiError> {
        let path = format!("{}/reset-password", record_path(BASE, id));
        self.client
            .post::<IgnoredAny, _>(&path, &json!({}))
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl ListSource for UserService {
    type Record = User;
    type Filters = UserFilters;

    async fn fetch(&self, filters: &UserFilters) -> Result<PaginatedResponse<User>, ApiError> {
        self.list(filters).await
    }
}

#[async_trait]
impl RecordWriter for UserService {
    type Create = NewUser;
    type Update = UserUpdate;

    async fn create_record(&self, input: &NewUser) -> Result<User, ApiError> {
        self.create(input).await
    }

    async fn update_record(&self, id: &str, input: &UserUpdate) -> Result<User, ApiError> {
        self.update(id, input).await
    }

    async fn delete_record(&self, id: &str) -> Result<(), ApiError> {
        self.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for user list adaptation.

    use std::sync::Arc;

    use super::*;
    use crate::domain::Role;
    use crate::test_support::ScriptedTransport;

    #[tokio::test]
    async fn data_total_lists_fill_paging_from_the_request() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_success(json!({
            "data": [{
                "id": "u1",
                "email": "ops@example.com",
                "role": "OPERATIONS",
                "status": "ACTIVE"
            }],
            "total": 23
        }));
        let service = UserService::new(ApiClient::new(transport.clone()));
        let filters = UserFilters {
            page: 2,
            role: Some(Role::Operations),
            ..UserFilters::default()
        };

        let page = service.list(&filters).await.expect("list succeeds");

        assert_eq!(page.meta.page, 2);
        assert_eq!(page.meta.total, 23);
        assert_eq!(page.meta.total_pages, 3);
        let request = transport.last_request().expect("request recorded");
        assert_eq!(request.query.get("role"), Some("OPERATIONS"));
    }
}
