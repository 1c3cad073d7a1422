//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **http**: reqwest-backed transport for the backend REST API
//! - **storage**: in-memory and file-backed key/value stores
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod http;
pub mod storage;
