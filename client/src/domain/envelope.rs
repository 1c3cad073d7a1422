//! The `{status, message, data, statusCode}` envelope every backend call uses.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::normalize::{ErrorBody, TransportFailure};

/// Envelope status; anything other than `"success"` is a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    /// `data` is meaningful.
    Success,
    /// Any other status string.
    #[serde(other)]
    Error,
}

/// Response envelope.
///
/// `data` stays raw JSON until the status has been checked, so failing
/// envelopes never need a decodable payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T = Value> {
    /// Outcome marker.
    pub status: EnvelopeStatus,
    /// Human-readable message; required in practice for failures.
    #[serde(default)]
    pub message: Option<String>,
    /// Payload, meaningful only on success.
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    /// Status echoed by the backend.
    #[serde(default)]
    pub status_code: Option<u16>,
}

impl ApiResponse<Value> {
    /// Decode an envelope from a response body.
    ///
    /// # Errors
    ///
    /// Returns [`TransportFailure::Decode`] when the body is not an envelope.
    pub fn from_slice(http_status: u16, body: &[u8]) -> Result<Self, TransportFailure> {
        serde_json::from_slice(body).map_err(|err| TransportFailure::Decode {
            status: http_status,
            message: format!("invalid response envelope: {err}"),
        })
    }

    /// Unwrap the payload and decode it as `T`.
    ///
    /// A non-success envelope becomes a [`TransportFailure::Status`] keyed by
    /// the envelope's `statusCode` (or `http_status` when absent) and
    /// carrying the envelope's message.
    ///
    /// # Errors
    ///
    /// Returns the failure described above, or [`TransportFailure::Decode`]
    /// when a successful payload does not decode as `T`.
    pub fn into_data<T: DeserializeOwned>(self, http_status: u16) -> Result<T, TransportFailure> {
        match self.status {
            EnvelopeStatus::Success => {
                let data = self.data.unwrap_or(Value::Null);
                serde_json::from_value(data).map_err(|err| TransportFailure::Decode {
                    status: http_status,
                    message: format!("unexpected response payload: {err}"),
                })
            }
            EnvelopeStatus::Error => Err(self.into_failure(http_status)),
        }
    }

    /// Describe a failing envelope as a [`TransportFailure::Status`].
    ///
    /// The status is the envelope's `statusCode` when it is an error code,
    /// else `http_status` when that is one, else 400. The message is the
    /// envelope's, untouched; validation details come from an object `data`.
    #[must_use]
    pub fn into_failure(self, http_status: u16) -> TransportFailure {
        let status = self
            .status_code
            .filter(|code| *code >= 400)
            .unwrap_or(if http_status >= 400 { http_status } else { 400 });
        let raw = serde_json::json!({
            "status": "error",
            "message": self.message,
            "statusCode": status,
            "data": self.data,
        });
        let mut body = match self.data {
            Some(details @ Value::Object(_)) => ErrorBody::from_value(details),
            _ => ErrorBody::default(),
        };
        body.message = self.message.or(body.message);
        body.status_code = Some(status);
        body.raw = Some(raw);
        TransportFailure::Status { status, body }
    }
}
