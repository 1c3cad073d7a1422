//! Domain types for the payments console client.
//!
//! Purpose: define strongly typed records, errors, and ports shared by the
//! HTTP client, the resource services, and the feature stores. Keep the
//! modules here free of transport and runtime concerns.

pub mod auth;
pub mod entities;
pub mod envelope;
pub mod error;
pub mod filters;
pub mod http;
pub mod idempotency;
pub mod normalize;
pub mod ports;

pub use self::auth::{
    AuthToken, AuthValidationError, LoginCredentials, LoginResponse, Role, Session, SessionUser,
};
pub use self::envelope::{ApiResponse, EnvelopeStatus};
pub use self::error::{
    ApiError, BusinessCategory, BusinessDetails, ErrorContext, ErrorKind, FieldViolation,
    NetworkDetails, ValidationDetails,
};
pub use self::filters::{
    DateRange, ListFilter, MerchantFilters, PageFilters, SettlementFilters, Sort, SortDirection,
    TransactionFilters, UserFilters,
};
pub use self::http::{HttpMethod, QueryParams};
pub use self::idempotency::{IDEMPOTENCY_KEY_HEADER, IdempotencyKey, IdempotencyKeyValidationError};
pub use self::normalize::{ErrorBody, TransportFailure, normalize};
