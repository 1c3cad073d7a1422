//! Driving port exposing the signed-in session.

use async_trait::async_trait;

use crate::domain::auth::{Role, Session, SessionUser};
use crate::domain::error::ApiError;

/// Source of the current session and role.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Current session, or `None` when nobody is signed in.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the session cannot be resolved.
    async fn current_session(&self) -> Result<Option<Session>, ApiError>;
}

/// Provider returning a fixed session.
#[derive(Debug, Clone, Default)]
pub struct FixtureSessionProvider {
    session: Option<Session>,
}

impl FixtureSessionProvider {
    /// Provider for a signed-in user with `role`.
    #[must_use]
    pub fn signed_in(role: Role) -> Self {
        Self {
            session: Some(Session {
                user: SessionUser {
                    id: "fixture-user".to_owned(),
                    email: "fixture@example.com".to_owned(),
                    name: None,
                    role,
                    merchant_code: (role == Role::Merchant).then(|| "BP001".to_owned()),
                },
            }),
        }
    }

    /// Provider with nobody signed in.
    #[must_use]
    pub const fn signed_out() -> Self {
        Self { session: None }
    }
}

#[async_trait]
impl SessionProvider for FixtureSessionProvider {
    async fn current_session(&self) -> Result<Option<Session>, ApiError> {
        Ok(self.session.clone())
    }
}
