//! Total mapping from transport failures to [`ApiError`].
//!
//! Status codes decide first; a missing response means a network failure.
//! Normalisation itself never fails: unexpected input lands in the generic
//! fallback.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::error::{
    ApiError, BusinessCategory, BusinessDetails, DECODE_ERROR_CODE, ErrorContext,
    FieldViolation, HTTP_ERROR_CODE, NetworkDetails, RATE_LIMITED_CODE, ValidationDetails,
};

/// Error body fields the backend may send with a failed call.
///
/// Every field is optional and decoded on its own, so one oddly typed field
/// never costs the others; unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorBody {
    /// Human-readable message, exactly as sent.
    pub message: Option<String>,
    /// Status code echoed inside the body.
    pub status_code: Option<u16>,
    /// Backend error code (`code`, `errorCode`, or `businessCode`).
    pub code: Option<String>,
    /// Offending field of a validation failure.
    pub field: Option<String>,
    /// Offending value of a validation failure.
    pub value: Option<Value>,
    /// Constraint messages of a validation failure.
    pub constraints: Vec<String>,
    /// Per-field violations of a validation failure.
    pub errors: Vec<FieldViolation>,
    /// The raw body this was decoded from.
    pub raw: Option<Value>,
}

const CODE_KEYS: [&str; 3] = ["code", "errorCode", "businessCode"];

impl ErrorBody {
    /// Decode an error body leniently.
    ///
    /// Bodies that are not JSON produce an empty body.
    #[must_use]
    pub fn from_slice(bytes: &[u8]) -> Self {
        let Ok(raw) = serde_json::from_slice::<Value>(bytes) else {
            return Self::default();
        };
        Self::from_value(raw)
    }

    /// Decode an error body from an already-parsed JSON value.
    ///
    /// Non-object values keep only `raw`. Within an object, `errors` may be
    /// a list of violations or a map from field name to messages, and codes
    /// may be strings or numbers.
    #[must_use]
    pub fn from_value(raw: Value) -> Self {
        let Value::Object(fields) = &raw else {
            return Self {
                raw: Some(raw),
                ..Self::default()
            };
        };
        let body = Self {
            message: fields.get("message").and_then(text),
            status_code: fields.get("statusCode").and_then(status_code),
            code: CODE_KEYS
                .iter()
                .filter_map(|key| fields.get(*key))
                .find_map(scalar_text),
            field: fields.get("field").and_then(text),
            value: fields.get("value").filter(|value| !value.is_null()).cloned(),
            constraints: fields.get("constraints").map(messages).unwrap_or_default(),
            errors: fields.get("errors").map(violations).unwrap_or_default(),
            raw: None,
        };
        Self {
            raw: Some(raw),
            ..body
        }
    }

    /// Body carrying only a message.
    #[must_use]
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    fn message_or(&self, fallback: &str) -> String {
        self.message.clone().unwrap_or_else(|| fallback.to_owned())
    }
}

fn text(value: &Value) -> Option<String> {
    value.as_str().map(str::to_owned)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn status_code(value: &Value) -> Option<u16> {
    match value {
        Value::Number(number) => number.as_u64().and_then(|code| u16::try_from(code).ok()),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// A single message or a list of messages; other entries are skipped.
fn messages(value: &Value) -> Vec<String> {
    match value {
        Value::String(text) => vec![text.clone()],
        Value::Array(items) => items.iter().filter_map(scalar_text).collect(),
        _ => Vec::new(),
    }
}

fn violations(value: &Value) -> Vec<FieldViolation> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| serde_json::from_value(item.clone()).ok())
            .collect(),
        Value::Object(by_field) => by_field
            .iter()
            .map(|(field, reported)| FieldViolation {
                field: field.clone(),
                value: None,
                constraints: messages(reported),
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Failure observed at the transport boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportFailure {
    /// The backend answered with a failing status, either on the HTTP line
    /// or inside the envelope.
    Status {
        /// Effective status code.
        status: u16,
        /// Decoded error body.
        body: ErrorBody,
    },
    /// No HTTP response arrived.
    NoResponse {
        /// The deadline elapsed.
        timeout: bool,
        /// The backend could not be reached.
        offline: bool,
        /// Transport diagnostic.
        message: String,
    },
    /// A response arrived but could not be decoded.
    Decode {
        /// HTTP status of the response.
        status: u16,
        /// Decoder diagnostic.
        message: String,
    },
    /// The caller abandoned the call.
    Cancelled,
}

/// Map a transport failure to exactly one [`ApiError`] variant.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use payments_console::domain::{
///     normalize, BusinessCategory, ErrorBody, ErrorContext, HttpMethod, TransportFailure,
/// };
///
/// let error = normalize(
///     TransportFailure::Status { status: 403, body: ErrorBody::default() },
///     ErrorContext::new(HttpMethod::Get, "/users"),
///     Utc::now(),
/// );
/// assert_eq!(error.business_category(), Some(BusinessCategory::Authorization));
/// ```
#[must_use]
pub fn normalize(
    failure: TransportFailure,
    context: ErrorContext,
    timestamp: DateTime<Utc>,
) -> ApiError {
    match failure {
        TransportFailure::Status { status, body } => from_status(status, body, context, timestamp),
        TransportFailure::NoResponse {
            timeout,
            offline,
            message,
        } => {
            let text = if timeout {
                "Request timed out"
            } else {
                "Unable to reach the server"
            };
            ApiError::network(text, NetworkDetails { timeout, offline }, context, timestamp)
                .with_details(Value::String(message))
        }
        TransportFailure::Decode { status, message } => ApiError::generic(
            "Received an unreadable response from the server",
            DECODE_ERROR_CODE,
            Some(status),
            context,
            timestamp,
        )
        .with_details(Value::String(message)),
        TransportFailure::Cancelled => ApiError::cancelled(context, timestamp),
    }
}

fn from_status(
    status: u16,
    body: ErrorBody,
    context: ErrorContext,
    timestamp: DateTime<Utc>,
) -> ApiError {
    let error = match status {
        400 | 422 => {
            let message = body.message_or("Validation failed");
            let details = validation_details(&body);
            ApiError::validation(message, status, details, context, timestamp)
        }
        401 | 403 | 404 => {
            let Some(category) = BusinessCategory::from_status(status) else {
                return generic_status(status, &body, context, timestamp);
            };
            let message = body.message_or(match category {
                BusinessCategory::Authentication => "Authentication required",
                BusinessCategory::Authorization => {
                    "You do not have permission to perform this action"
                }
                BusinessCategory::ResourceNotFound => "Resource not found",
            });
            let business_code = body
                .code
                .clone()
                .unwrap_or_else(|| category.default_code().to_owned());
            ApiError::business(
                message,
                status,
                BusinessDetails {
                    business_code,
                    category,
                },
                context,
                timestamp,
            )
        }
        500..=599 => ApiError::server(
            body.message_or("Server error, please try again later"),
            status,
            context,
            timestamp,
        ),
        _ => generic_status(status, &body, context, timestamp),
    };
    match body.raw {
        Some(raw) => error.with_details(raw),
        None => error,
    }
}

fn generic_status(
    status: u16,
    body: &ErrorBody,
    context: ErrorContext,
    timestamp: DateTime<Utc>,
) -> ApiError {
    let (fallback, default_code) = if status == 429 {
        ("Too many requests, please slow down", RATE_LIMITED_CODE)
    } else {
        ("Request failed", HTTP_ERROR_CODE)
    };
    let code = body
        .code
        .clone()
        .unwrap_or_else(|| default_code.to_owned());
    ApiError::generic(
        body.message_or(fallback),
        code,
        Some(status),
        context,
        timestamp,
    )
}

fn validation_details(body: &ErrorBody) -> ValidationDetails {
    let primary = body.errors.first();
    let field = body
        .field
        .clone()
        .or_else(|| primary.map(|violation| violation.field.clone()));
    let value = body
        .value
        .clone()
        .or_else(|| primary.and_then(|violation| violation.value.clone()));
    let constraints = if body.constraints.is_empty() {
        primary
            .map(|violation| violation.constraints.clone())
            .unwrap_or_default()
    } else {
        body.constraints.clone()
    };
    ValidationDetails {
        field,
        value,
        constraints,
        violations: body.errors.clone(),
    }
}
