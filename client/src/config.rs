//! Client configuration loaded via OrthoConfig.
//!
//! Values come from defaults, configuration files, and `CONSOLE_*`
//! environment variables, in increasing precedence.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::client::RetryPolicy;

const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_RETRY_ATTEMPTS: u32 = 1;
const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 200;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// The base URL did not parse.
    #[error("invalid base URL {value:?}: {message}")]
    InvalidBaseUrl {
        /// Configured value.
        value: String,
        /// Parser message.
        message: String,
    },
}

/// Settings for the payments console client.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CONSOLE")]
pub struct ClientSettings {
    /// Backend API root, including the version prefix.
    pub base_url: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Directory for the persisted token and filters; memory only when unset.
    pub storage_dir: Option<PathBuf>,
    /// Attempts per call, including the first. `1` disables retries.
    pub retry_attempts: Option<u32>,
    /// Delay before the first retry, in milliseconds.
    pub retry_base_delay_ms: Option<u64>,
    /// `User-Agent` header override.
    pub user_agent: Option<String>,
}

impl ClientSettings {
    /// Return the configured base URL, falling back to the local backend.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBaseUrl`] when the value does not
    /// parse as a URL.
    pub fn base_url(&self) -> Result<Url, SettingsError> {
        let raw = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        Url::parse(raw).map_err(|err| SettingsError::InvalidBaseUrl {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Return the request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Return the retry policy described by the retry settings.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry_attempts.unwrap_or(DEFAULT_RETRY_ATTEMPTS),
            Duration::from_millis(
                self.retry_base_delay_ms
                    .unwrap_or(DEFAULT_RETRY_BASE_DELAY_MS),
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for client configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 6] = [
        "CONSOLE_BASE_URL",
        "CONSOLE_TIMEOUT_SECS",
        "CONSOLE_STORAGE_DIR",
        "CONSOLE_RETRY_ATTEMPTS",
        "CONSOLE_RETRY_BASE_DELAY_MS",
        "CONSOLE_USER_AGENT",
    ];

    fn load_from_empty_args() -> ClientSettings {
        ClientSettings::load_from_iter([OsString::from("payments-console")])
            .expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.base_url().expect("default URL parses").as_str(),
            DEFAULT_BASE_URL
        );
        assert_eq!(settings.timeout(), Duration::from_secs(30));
        assert_eq!(settings.retry_policy().attempts(), 1);
        assert!(settings.storage_dir.is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("CONSOLE_BASE_URL", Some("https://pay.example.com/api/v2".to_owned())),
            ("CONSOLE_TIMEOUT_SECS", Some("5".to_owned())),
            ("CONSOLE_STORAGE_DIR", Some("/tmp/console-state".to_owned())),
            ("CONSOLE_RETRY_ATTEMPTS", Some("3".to_owned())),
            ("CONSOLE_RETRY_BASE_DELAY_MS", Some("50".to_owned())),
            ("CONSOLE_USER_AGENT", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.base_url().expect("override parses").host_str(),
            Some("pay.example.com")
        );
        assert_eq!(settings.timeout(), Duration::from_secs(5));
        assert_eq!(
            settings.storage_dir,
            Some(PathBuf::from("/tmp/console-state"))
        );
        let policy = settings.retry_policy();
        assert_eq!(policy.attempts(), 3);
        assert_eq!(policy.delay_after(1), Duration::from_millis(50));
    }

    #[rstest]
    fn malformed_base_urls_are_reported() {
        let _guard = lock_env([("CONSOLE_BASE_URL", Some("not a url".to_owned()))]);

        let settings = load_from_empty_args();
        assert!(matches!(
            settings.base_url(),
            Err(SettingsError::InvalidBaseUrl { .. })
        ));
    }
}
