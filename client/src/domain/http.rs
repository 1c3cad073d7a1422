//! Request vocabulary shared by the client and its transport port.

use std::fmt;

use serde::{Deserialize, Serialize};

/// HTTP verbs the backend accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// Read.
    Get,
    /// Create or trigger.
    Post,
    /// Replace.
    Put,
    /// Partial update.
    Patch,
    /// Remove.
    Delete,
}

impl HttpMethod {
    /// Whether the verb changes server state and so needs an idempotency key.
    #[must_use]
    pub const fn is_state_changing(self) -> bool {
        !matches!(self, Self::Get)
    }

    /// Upper-case wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered query-string parameters.
///
/// Unset optional values are skipped so filters only send what the user
/// chose.
///
/// # Examples
/// ```
/// use payments_console::domain::QueryParams;
///
/// let params = QueryParams::new()
///     .with("page", 2)
///     .with_opt("status", None::<&str>);
/// assert_eq!(params.pairs(), &[("page".to_owned(), "2".to_owned())]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    /// Empty parameter list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Append one parameter.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.0.push((key.to_owned(), value.to_string()));
        self
    }

    /// Append one parameter when `value` is present.
    #[must_use]
    pub fn with_opt(self, key: &str, value: Option<impl fmt::Display>) -> Self {
        match value {
            Some(present) => self.with(key, present),
            None => self,
        }
    }

    /// Append one parameter when `value` is present and not blank.
    #[must_use]
    pub fn with_text(self, key: &str, value: Option<&str>) -> Self {
        self.with_opt(key, value.map(str::trim).filter(|text| !text.is_empty()))
    }

    /// Parameters in insertion order.
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    /// Look up the first value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Whether no parameters are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
