//! Dashboard user accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Identified;
use crate::domain::auth::Role;

/// Account state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    /// Can sign in.
    Active,
    /// Invited, has not signed in yet.
    Invited,
    /// Blocked from signing in.
    Disabled,
    /// A status this client does not know about.
    #[serde(other)]
    Unknown,
}

/// Dashboard user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Backend identifier.
    pub id: String,
    /// Login email.
    pub email: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Dashboard role.
    pub role: Role,
    /// Account state.
    pub status: UserStatus,
    /// Merchant scope for merchant roles.
    #[serde(default)]
    pub merchant_code: Option<String>,
    /// Last successful sign-in.
    #[serde(default)]
    pub last_login_at: Option<DateTime<Utc>>,
}

impl Identified for User {
    fn record_id(&self) -> &str {
        self.id.as_str()
    }
}

/// Body of `POST /users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    /// Login email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Dashboard role.
    pub role: Role,
    /// Merchant scope for merchant roles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_code: Option<String>,
}

/// Body of `PUT /users/{id}`; unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New role.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// New account state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
}
