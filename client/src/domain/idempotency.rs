//! Idempotency keys attached to state-changing requests.
//!
//! Every POST, PUT, PATCH, and DELETE carries a fresh key. A retry of the
//! same call resends the request it already built, so the key is shared
//! across attempts and the backend can replay instead of repeating.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// HTTP header name for idempotency keys.
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// Reasons a string is not an idempotency key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdempotencyKeyValidationError {
    /// Nothing was supplied.
    #[error("idempotency key must not be empty")]
    EmptyKey,
    /// The text is not a hyphenated UUID.
    #[error("idempotency key {value:?} is not a UUID")]
    NotUuid {
        /// Rejected input.
        value: String,
    },
}

/// Random v4 UUID identifying one logical mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdempotencyKey(Uuid);

impl IdempotencyKey {
    /// Generate a fresh key.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Header name and value ready to attach to a request.
    #[must_use]
    pub fn header(&self) -> (String, String) {
        (IDEMPOTENCY_KEY_HEADER.to_owned(), self.to_string())
    }
}

impl FromStr for IdempotencyKey {
    type Err = IdempotencyKeyValidationError;

    /// Parse the hyphenated form sent on the wire.
    ///
    /// Surrounding whitespace is rejected rather than trimmed.
    ///
    /// ```
    /// # use payments_console::domain::IdempotencyKey;
    /// let key: IdempotencyKey = "550e8400-e29b-41d4-a716-446655440000"
    ///     .parse()
    ///     .expect("valid UUID");
    /// assert_eq!(key.to_string(), "550e8400-e29b-41d4-a716-446655440000");
    /// ```
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.is_empty() {
            return Err(IdempotencyKeyValidationError::EmptyKey);
        }
        Uuid::try_parse(raw)
            .ok()
            .filter(|uuid| uuid.hyphenated().to_string() == raw.to_ascii_lowercase())
            .map(Self)
            .ok_or_else(|| IdempotencyKeyValidationError::NotUuid {
                value: raw.to_owned(),
            })
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for key parsing and generation.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("not-a-uuid")]
    #[case(" 550e8400-e29b-41d4-a716-446655440000")]
    #[case("550e8400e29b41d4a716446655440000")]
    fn rejects_malformed_keys(#[case] raw: &str) {
        assert!(raw.parse::<IdempotencyKey>().is_err());
    }

    #[test]
    fn empty_input_has_its_own_error() {
        assert_eq!(
            "".parse::<IdempotencyKey>(),
            Err(IdempotencyKeyValidationError::EmptyKey)
        );
    }

    #[test]
    fn random_keys_are_distinct_v4_uuids() {
        let first = IdempotencyKey::random();
        let second = IdempotencyKey::random();

        assert_ne!(first, second);
        assert_eq!(first.as_uuid().get_version_num(), 4);
    }

    #[test]
    fn header_pairs_name_with_hyphenated_value() {
        let key = IdempotencyKey::random();
        let (name, value) = key.header();

        assert_eq!(name, IDEMPOTENCY_KEY_HEADER);
        assert_eq!(value.parse::<IdempotencyKey>(), Ok(key));
    }
}
