//! Canonical pagination primitives for the payments console client.
//!
//! Backend list endpoints do not agree on one response layout. Each endpoint
//! declares its layout as a [`ListShape`], and the matching adapter turns the
//! payload into a [`PaginatedResponse`]. Callers never inspect payloads at
//! runtime to guess which layout they received.

mod page;
mod shape;

pub use page::{DEFAULT_PER_PAGE, PageMeta, PageRequest, PaginatedResponse};
pub use shape::{ListShape, ShapeError};
