//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod http_transport;
mod key_value_store;
mod session_events;
mod session_provider;

#[cfg(test)]
pub use http_transport::MockHttpTransport;
pub use http_transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};
pub use key_value_store::{
    KeyValueStore, MERCHANT_FILTERS_KEY, PERSISTED_KEYS, StorageError, TOKEN_KEY,
    TRANSACTION_FILTERS_KEY,
};
#[cfg(test)]
pub use session_events::MockSessionEvents;
pub use session_events::{LOGIN_ROUTE, NoopSessionEvents, SessionEvents, UnauthorizedEvent};
pub use session_provider::{FixtureSessionProvider, SessionProvider};
