//! Driven port for sending HTTP requests to the backend.
//!
//! The client owns headers, envelopes, and error normalisation; adapters only
//! move bytes. Tests substitute scripted or mocked transports.

use async_trait::async_trait;
use serde_json::Value;

use super::define_port_error;
use crate::domain::http::{HttpMethod, QueryParams};

/// Fully prepared outbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// Verb.
    pub method: HttpMethod,
    /// Path relative to the configured base URL, starting with `/`.
    pub path: String,
    /// Query-string parameters.
    pub query: QueryParams,
    /// Header name/value pairs.
    pub headers: Vec<(String, String)>,
    /// JSON body for state-changing verbs.
    pub body: Option<Value>,
}

impl HttpRequest {
    /// Bare request with no query, headers, or body.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: QueryParams::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Value of the first header named `name`, compared case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Raw response received from the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body bytes.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Build a response from a status and a JSON value.
    #[must_use]
    pub fn json(status: u16, body: &Value) -> Self {
        Self {
            status,
            body: body.to_string().into_bytes(),
        }
    }

    /// Whether the status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

define_port_error! {
    /// Failures that leave the caller without an HTTP response.
    pub enum TransportError {
        /// The request exceeded its deadline.
        Timeout => "backend request timed out",
        /// The backend could not be reached.
        Connect => "backend unreachable",
        /// The request failed for another transport reason.
        Transport => "backend transport failed",
    }
}

/// Port for exchanging one request/response pair with the backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send `request` and return whatever status the backend answered with.
    ///
    /// Non-2xx statuses are responses, not errors.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] only when no response was received.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}
