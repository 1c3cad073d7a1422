//! Driven port notified when the backend rejects the session.
//!
//! The client clears its token and emits an event; whoever embeds the client
//! decides how to send the user back to the login screen.

use crate::domain::http::HttpMethod;

/// Route the user is sent to after a rejected session.
pub const LOGIN_ROUTE: &str = "/auth/login";

/// Emitted after a 401 from a non-public endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnauthorizedEvent {
    /// Endpoint that answered 401.
    pub endpoint: String,
    /// Verb of the rejected call.
    pub method: HttpMethod,
    /// Where the user should be sent.
    pub redirect_to: &'static str,
}

/// Listener for session-level events.
#[cfg_attr(test, mockall::automock)]
pub trait SessionEvents: Send + Sync {
    /// Called once per rejected call, after the token has been cleared.
    fn on_unauthorized(&self, event: &UnauthorizedEvent);
}

/// Listener that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSessionEvents;

impl SessionEvents for NoopSessionEvents {
    fn on_unauthorized(&self, _event: &UnauthorizedEvent) {}
}
