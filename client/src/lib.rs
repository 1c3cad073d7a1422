//! Typed client for the payments administration API.
//!
//! The crate is layered the way the dashboard uses it:
//!
//! - [`client`] wraps an [`HttpTransport`](domain::ports::HttpTransport),
//!   attaching bearer tokens and idempotency keys and unwrapping the
//!   response envelope.
//! - [`domain`] holds records, filters, and the normalised [`ApiError`].
//! - [`services`] exposes one service per backend resource.
//! - [`state`] keeps observable per-feature stores on top of the services.
//! - [`outbound`] provides the reqwest transport and key-value storage.

pub mod client;
pub mod config;
pub mod domain;
pub mod outbound;
pub mod services;
pub mod state;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use client::ApiClient;
pub use domain::ApiError;
