//! Login, logout, and the signed-in session.

use async_trait::async_trait;
use serde::de::IgnoredAny;
use serde_json::json;
use tracing::{info, warn};

use crate::client::ApiClient;
use crate::domain::ports::{PERSISTED_KEYS, SessionProvider};
use crate::domain::{ApiError, LoginCredentials, LoginResponse, QueryParams, Session, SessionUser};

const LOGIN_PATH: &str = "/auth/login";
const LOGOUT_PATH: &str = "/auth/logout";
const ME_PATH: &str = "/auth/me";

/// Client for `/auth`.
#[derive(Debug, Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    /// Service backed by `client`.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Sign in and remember the issued token.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the backend rejects the
    /// credentials or the call fails.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<LoginResponse, ApiError> {
        let response: LoginResponse = self.client.post(LOGIN_PATH, credentials).await?;
        self.client.set_token(response.access_token.clone());
        info!(email = credentials.email(), "signed in");
        Ok(response)
    }

    /// Sign out, forgetting the token and every saved preference.
    ///
    /// The backend is told first when a token is known; local state is
    /// cleared even when that call fails.
    pub async fn logout(&self) {
        if self.client.token().is_some() {
            if let Err(error) = self
                .client
                .post::<IgnoredAny, _>(LOGOUT_PATH, &json!({}))
                .await
            {
                warn!(code = error.code(), "backend logout failed; clearing local session anyway");
            }
        }
        self.client.clear_token();
        let storage = self.client.storage();
        for key in PERSISTED_KEYS {
            if let Err(error) = storage.remove(key) {
                warn!(key, %error, "failed to remove persisted value");
            }
        }
        info!("signed out");
    }

    /// User behind the current token.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] when the call fails.
    pub async fn current_user(&self) -> Result<SessionUser, ApiError> {
        self.client.get(ME_PATH, &QueryParams::new()).await
    }
}

#[async_trait]
impl SessionProvider for AuthService {
    async fn current_session(&self) -> Result<Option<Session>, ApiError> {
        if self.client.token().is_none() {
            return Ok(None);
        }
        match self.current_user().await {
            Ok(user) => Ok(Some(Session { user })),
            Err(error) if error.is_authentication() => Ok(None),
            Err(error) => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for session lifecycle.

    use std::sync::Arc;

    use super::*;
    use crate::domain::Role;
    use crate::domain::ports::{
        KeyValueStore, MERCHANT_FILTERS_KEY, TOKEN_KEY, TRANSACTION_FILTERS_KEY,
    };
    use crate::outbound::storage::InMemoryStore;
    use crate::test_support::ScriptedTransport;

    fn service(transport: &Arc<ScriptedTransport>, storage: &Arc<InMemoryStore>) -> AuthService {
        AuthService::new(
            ApiClient::builder(transport.clone())
                .storage(storage.clone())
                .build(),
        )
    }

    #[tokio::test]
    async fn login_persists_the_issued_token() {
        let transport = Arc::new(ScriptedTransport::new());
        let storage = Arc::new(InMemoryStore::new());
        transport.push_success(json!({
            "accessToken": "fresh",
            "user": { "id": "u1", "email": "ops@example.com", "role": "ADMIN" }
        }));
        let credentials =
            LoginCredentials::try_from_parts("ops@example.com", "pw").expect("valid credentials");

        let response = service(&transport, &storage)
            .login(&credentials)
            .await
            .expect("login succeeds");

        assert_eq!(response.user.map(|user| user.role), Some(Role::Admin));
        assert_eq!(storage.get(TOKEN_KEY).expect("read").as_deref(), Some("fresh"));
    }

    #[tokio::test]
    async fn logout_clears_every_persisted_key() {
        let transport = Arc::new(ScriptedTransport::new());
        let storage = Arc::new(InMemoryStore::with_entries([
            (TOKEN_KEY, "abc"),
            (TRANSACTION_FILTERS_KEY, "{}"),
            (MERCHANT_FILTERS_KEY, "{}"),
        ]));
        transport.push_failure(500, "logout exploded");

        service(&transport, &storage).logout().await;

        assert!(storage.is_empty());
        let request = transport.last_request().expect("logout call sent");
        assert_eq!(request.path, "/auth/logout");
        assert_eq!(request.header("Authorization"), Some("Bearer abc"));
    }

    #[tokio::test]
    async fn sessions_are_absent_without_a_token() {
        let transport = Arc::new(ScriptedTransport::new());
        let storage = Arc::new(InMemoryStore::new());

        let session = service(&transport, &storage)
            .current_session()
            .await
            .expect("lookup succeeds");

        assert!(session.is_none());
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn rejected_tokens_resolve_to_no_session() {
        let transport = Arc::new(ScriptedTransport::new());
        let storage = Arc::new(InMemoryStore::with_entries([(TOKEN_KEY, "stale")]));
        transport.push_failure(401, "Token expired");

        let session = service(&transport, &storage)
            .current_session()
            .await
            .expect("lookup succeeds");

        assert!(session.is_none());
        assert!(storage.is_empty());
    }
}
