//! Normalised API error taxonomy.
//!
//! Every failure at the transport boundary becomes exactly one [`ApiError`].
//! The kind is tagged by [`ErrorKind`]; the message, code, timestamp, and
//! originating call are carried alongside for display and diagnostics.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::http::HttpMethod;

/// Code used for 429 responses.
pub const RATE_LIMITED_CODE: &str = "RATE_LIMITED";
/// Code used for other unmapped HTTP statuses.
pub const HTTP_ERROR_CODE: &str = "HTTP_ERROR";
/// Code used when a response body could not be decoded.
pub const DECODE_ERROR_CODE: &str = "DECODE_ERROR";
/// Code used when a request body could not be encoded.
pub const ENCODE_ERROR_CODE: &str = "ENCODE_ERROR";
/// Code used when the caller cancelled the call.
pub const CANCELLED_CODE: &str = "REQUEST_CANCELLED";
/// Code used when a request path would not address a single resource.
pub const INVALID_PATH_CODE: &str = "INVALID_PATH";
/// Code used for validation failures.
pub const VALIDATION_CODE: &str = "VALIDATION_ERROR";
/// Code used for connectivity failures.
pub const NETWORK_CODE: &str = "NETWORK_ERROR";
/// Code used for 5xx responses.
pub const SERVER_CODE: &str = "SERVER_ERROR";

/// Sub-classification of 401/403/404 responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BusinessCategory {
    /// 401: missing or expired credentials.
    Authentication,
    /// 403: authenticated but not permitted.
    Authorization,
    /// 404: the resource does not exist.
    ResourceNotFound,
}

impl BusinessCategory {
    /// Category for an HTTP status, if it has one.
    #[must_use]
    pub const fn from_status(status: u16) -> Option<Self> {
        match status {
            401 => Some(Self::Authentication),
            403 => Some(Self::Authorization),
            404 => Some(Self::ResourceNotFound),
            _ => None,
        }
    }

    /// Business code used when the backend does not supply one.
    #[must_use]
    pub const fn default_code(self) -> &'static str {
        match self {
            Self::Authentication => "AUTHENTICATION_REQUIRED",
            Self::Authorization => "ACCESS_DENIED",
            Self::ResourceNotFound => "RESOURCE_NOT_FOUND",
        }
    }
}

impl fmt::Display for BusinessCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Authentication => "AUTHENTICATION",
            Self::Authorization => "AUTHORIZATION",
            Self::ResourceNotFound => "RESOURCE_NOT_FOUND",
        })
    }
}

/// One rejected input field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldViolation {
    /// Field name as the backend reports it (for example `email`).
    pub field: String,
    /// Rejected value, when echoed back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Human-readable constraint messages.
    #[serde(default)]
    pub constraints: Vec<String>,
}

/// Structured payload of a validation failure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationDetails {
    /// Primary offending field, when the backend names one.
    pub field: Option<String>,
    /// Primary offending value.
    pub value: Option<Value>,
    /// Constraint messages for the primary field.
    pub constraints: Vec<String>,
    /// Every field violation the backend listed.
    pub violations: Vec<FieldViolation>,
}

/// Payload of a failure with no HTTP response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkDetails {
    /// The call exceeded its deadline.
    pub timeout: bool,
    /// The backend could not be reached at all.
    pub offline: bool,
}

/// Payload of a 401/403/404 failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessDetails {
    /// Backend-specific code, or the category default.
    pub business_code: String,
    /// Category derived from the status.
    pub category: BusinessCategory,
}

/// Tagged error variant.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// HTTP 400 or 422.
    Validation(ValidationDetails),
    /// No HTTP response: timeout or connectivity.
    Network(NetworkDetails),
    /// HTTP 401, 403, or 404.
    Business(BusinessDetails),
    /// HTTP 5xx.
    Server,
    /// Anything else.
    Generic,
}

impl ErrorKind {
    /// Short label for logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Network(_) => "network",
            Self::Business(_) => "business",
            Self::Server => "server",
            Self::Generic => "generic",
        }
    }
}

/// The call an error came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ErrorContext {
    /// Request path, without the base URL.
    pub endpoint: String,
    /// Request verb.
    pub method: HttpMethod,
}

impl ErrorContext {
    /// Build a context for one call.
    #[must_use]
    pub fn new(method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method,
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.endpoint)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ApiErrorRepr {
    kind: ErrorKind,
    message: String,
    code: String,
    status_code: Option<u16>,
    timestamp: DateTime<Utc>,
    context: ErrorContext,
    details: Option<Value>,
}

/// Normalised failure of one API call.
///
/// Display shows the message only, which is what UI code surfaces.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use payments_console::domain::{ApiError, ErrorContext, HttpMethod};
///
/// let error = ApiError::server(
///     "Service unavailable",
///     503,
///     ErrorContext::new(HttpMethod::Get, "/merchants"),
///     Utc::now(),
/// );
/// assert!(error.is_retryable());
/// assert_eq!(error.to_string(), "Service unavailable");
/// ```
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{}", .repr.message)]
pub struct ApiError {
    repr: Box<ApiErrorRepr>,
}

impl ApiError {
    fn build(
        kind: ErrorKind,
        message: impl Into<String>,
        code: impl Into<String>,
        status_code: Option<u16>,
        context: ErrorContext,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            repr: Box::new(ApiErrorRepr {
                kind,
                message: message.into(),
                code: code.into(),
                status_code,
                timestamp,
                context,
                details: None,
            }),
        }
    }

    /// Validation failure (400/422).
    #[must_use]
    pub fn validation(
        message: impl Into<String>,
        status_code: u16,
        details: ValidationDetails,
        context: ErrorContext,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self::build(
            ErrorKind::Validation(details),
            message,
            VALIDATION_CODE,
            Some(status_code),
            context,
            timestamp,
        )
    }

    /// Failure with no HTTP response.
    #[must_use]
    pub fn network(
        message: impl Into<String>,
        details: NetworkDetails,
        context: ErrorContext,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self::build(
            ErrorKind::Network(details),
            message,
            NETWORK_CODE,
            None,
            context,
            timestamp,
        )
    }

    /// Business failure (401/403/404).
    #[must_use]
    pub fn business(
        message: impl Into<String>,
        status_code: u16,
        details: BusinessDetails,
        context: ErrorContext,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let code = details.business_code.clone();
        Self::build(
            ErrorKind::Business(details),
            message,
            code,
            Some(status_code),
            context,
            timestamp,
        )
    }

    /// Server failure (5xx).
    #[must_use]
    pub fn server(
        message: impl Into<String>,
        status_code: u16,
        context: ErrorContext,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self::build(
            ErrorKind::Server,
            message,
            SERVER_CODE,
            Some(status_code),
            context,
            timestamp,
        )
    }

    /// Generic fallback.
    #[must_use]
    pub fn generic(
        message: impl Into<String>,
        code: impl Into<String>,
        status_code: Option<u16>,
        context: ErrorContext,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self::build(
            ErrorKind::Generic,
            message,
            code,
            status_code,
            context,
            timestamp,
        )
    }

    /// Generic failure recording that the caller abandoned the call.
    #[must_use]
    pub fn cancelled(context: ErrorContext, timestamp: DateTime<Utc>) -> Self {
        Self::generic(
            "Request was cancelled",
            CANCELLED_CODE,
            None,
            context,
            timestamp,
        )
    }

    /// Attach raw backend details.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.repr.details = Some(details);
        self
    }

    /// Tagged variant.
    #[must_use]
    pub fn kind(&self) -> &ErrorKind {
        &self.repr.kind
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.repr.message.as_str()
    }

    /// Stable machine-readable code.
    #[must_use]
    pub fn code(&self) -> &str {
        self.repr.code.as_str()
    }

    /// HTTP (or envelope) status, absent for network failures.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        self.repr.status_code
    }

    /// When the failure was normalised.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.repr.timestamp
    }

    /// The call that failed.
    #[must_use]
    pub fn context(&self) -> &ErrorContext {
        &self.repr.context
    }

    /// Raw backend error body, if any.
    #[must_use]
    pub fn details(&self) -> Option<&Value> {
        self.repr.details.as_ref()
    }

    /// Business category for 401/403/404 failures.
    #[must_use]
    pub fn business_category(&self) -> Option<BusinessCategory> {
        match self.kind() {
            ErrorKind::Business(details) => Some(details.category),
            _ => None,
        }
    }

    /// Whether the failure came from a missing or expired session.
    #[must_use]
    pub fn is_authentication(&self) -> bool {
        self.business_category() == Some(BusinessCategory::Authentication)
    }

    /// Whether this is a cancelled call rather than a backend failure.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self.kind(), ErrorKind::Generic) && self.code() == CANCELLED_CODE
    }

    /// Whether repeating the call may succeed.
    ///
    /// Network failures, 5xx, and 429 are retryable; everything else is not.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self.kind() {
            ErrorKind::Network(_) | ErrorKind::Server => true,
            ErrorKind::Generic => self.status_code() == Some(429),
            ErrorKind::Validation(_) | ErrorKind::Business(_) => false,
        }
    }

    /// Constraint messages per field for validation failures.
    ///
    /// Forms route errors to inputs through this map instead of inspecting
    /// the message text. Non-validation errors yield an empty map.
    #[must_use]
    pub fn field_errors(&self) -> BTreeMap<String, Vec<String>> {
        let mut fields = BTreeMap::new();
        let ErrorKind::Validation(details) = self.kind() else {
            return fields;
        };
        for violation in &details.violations {
            fields
                .entry(violation.field.clone())
                .or_insert_with(Vec::new)
                .extend(violation.constraints.iter().cloned());
        }
        if let Some(field) = &details.field {
            let entry = fields.entry(field.clone()).or_insert_with(Vec::new);
            for constraint in &details.constraints {
                if !entry.contains(constraint) {
                    entry.push(constraint.clone());
                }
            }
        }
        fields
    }

    /// Violation recorded for one field.
    #[must_use]
    pub fn violation_for(&self, field: &str) -> Option<FieldViolation> {
        let ErrorKind::Validation(details) = self.kind() else {
            return None;
        };
        if let Some(found) = details
            .violations
            .iter()
            .find(|violation| violation.field == field)
        {
            return Some(found.clone());
        }
        (details.field.as_deref() == Some(field)).then(|| FieldViolation {
            field: field.to_owned(),
            value: details.value.clone(),
            constraints: details.constraints.clone(),
        })
    }
}

#[cfg(test)]
mod tests;
