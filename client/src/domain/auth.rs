//! Credentials, bearer tokens, and the signed-in session.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors for authentication primitives.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthValidationError {
    /// The bearer token was blank.
    #[error("access token must not be empty")]
    EmptyToken,
    /// The bearer token contained whitespace.
    #[error("access token must not contain whitespace")]
    MalformedToken,
    /// The login email was blank.
    #[error("email must not be empty")]
    EmptyEmail,
    /// The login password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Opaque bearer token issued by the backend.
///
/// `Debug` redacts the value so tokens never reach logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AuthToken(String);

impl AuthToken {
    /// Validate and wrap a token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthValidationError`] for blank tokens or tokens containing
    /// whitespace.
    pub fn new(token: impl Into<String>) -> Result<Self, AuthValidationError> {
        let raw = token.into();
        if raw.is_empty() {
            return Err(AuthValidationError::EmptyToken);
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(AuthValidationError::MalformedToken);
        }
        Ok(Self(raw))
    }

    /// Raw token for the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// `Authorization` header value.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

impl From<AuthToken> for String {
    fn from(value: AuthToken) -> Self {
        value.0
    }
}

impl TryFrom<String> for AuthToken {
    type Error = AuthValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Email and password submitted to `/auth/login`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct LoginCredentials {
    email: String,
    password: String,
}

impl LoginCredentials {
    /// Validate and build credentials.
    ///
    /// # Errors
    ///
    /// Returns [`AuthValidationError`] when either part is blank.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AuthValidationError> {
        let trimmed = email.trim();
        if trimmed.is_empty() {
            return Err(AuthValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        Ok(Self {
            email: trimmed.to_owned(),
            password: password.to_owned(),
        })
    }

    /// Login email.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Dashboard role of the signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Platform super administrator.
    SuperAdmin,
    /// Platform administrator.
    Admin,
    /// Operations staff with read access to every merchant.
    Operations,
    /// Merchant staff scoped to their own merchant.
    Merchant,
    /// Any role this client does not know about.
    #[serde(other)]
    Unknown,
}

impl Role {
    /// Whether the role sees platform-wide analytics.
    #[must_use]
    pub const fn is_platform_staff(self) -> bool {
        matches!(self, Self::SuperAdmin | Self::Admin | Self::Operations)
    }
}

/// User record behind the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    /// Backend user identifier.
    pub id: String,
    /// Login email.
    pub email: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Dashboard role.
    pub role: Role,
    /// Merchant the user belongs to, for merchant roles.
    #[serde(default)]
    pub merchant_code: Option<String>,
}

/// Current signed-in session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Signed-in user.
    pub user: SessionUser,
}

impl Session {
    /// Role of the signed-in user.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.user.role
    }
}

/// Body returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer token for subsequent calls.
    #[serde(alias = "token")]
    pub access_token: AuthToken,
    /// Signed-in user, when the backend includes it.
    #[serde(default)]
    pub user: Option<SessionUser>,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("", AuthValidationError::EmptyToken)]
    #[case("abc def", AuthValidationError::MalformedToken)]
    fn rejects_malformed_tokens(#[case] raw: &str, #[case] expected: AuthValidationError) {
        assert_eq!(AuthToken::new(raw), Err(expected));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let token = AuthToken::new("secret-token").expect("valid token");
        let credentials =
            LoginCredentials::try_from_parts("ops@example.com", "hunter2").expect("valid");

        assert!(!format!("{token:?}").contains("secret-token"));
        assert!(!format!("{credentials:?}").contains("hunter2"));
        assert_eq!(token.bearer(), "Bearer secret-token");
    }

    #[test]
    fn login_response_accepts_either_token_key() {
        let response: LoginResponse = serde_json::from_value(json!({
            "token": "abc",
            "user": { "id": "u1", "email": "a@b.c", "role": "MERCHANT", "merchantCode": "BP001" }
        }))
        .expect("login response decodes");

        assert_eq!(response.access_token.expose(), "abc");
        assert_eq!(response.user.map(|user| user.role), Some(Role::Merchant));
    }

    #[rstest]
    #[case(Role::SuperAdmin, true)]
    #[case(Role::Operations, true)]
    #[case(Role::Merchant, false)]
    #[case(Role::Unknown, false)]
    fn platform_staff_roles(#[case] role: Role, #[case] expected: bool) {
        assert_eq!(role.is_platform_staff(), expected);
    }
}
