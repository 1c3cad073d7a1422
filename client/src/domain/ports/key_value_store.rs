//! Driven port for small persisted values (token, saved filters).

use super::define_port_error;

/// Key holding the bearer token.
pub const TOKEN_KEY: &str = "auth.token";
/// Key holding saved transaction filters.
pub const TRANSACTION_FILTERS_KEY: &str = "transactions.filters";
/// Key holding saved merchant filters.
pub const MERCHANT_FILTERS_KEY: &str = "merchants.filters";

/// Every key the client persists; logout clears all of them.
pub const PERSISTED_KEYS: [&str; 3] = [TOKEN_KEY, TRANSACTION_FILTERS_KEY, MERCHANT_FILTERS_KEY];

define_port_error! {
    /// Errors raised by key/value stores.
    pub enum StorageError {
        /// The backing medium could not be read or written.
        Io => "storage io failed",
        /// Stored content could not be decoded or encoded.
        Serialization => "storage serialization failed",
    }
}

/// String key/value persistence.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`; removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
