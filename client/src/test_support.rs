//! Test doubles for the client crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`). Only
//! compiled for tests or with the `test-support` feature.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::client::RetrySleeper;
use crate::domain::ports::{
    HttpRequest, HttpResponse, HttpTransport, SessionEvents, TransportError, UnauthorizedEvent,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One scripted outcome of [`ScriptedTransport::send`].
#[derive(Debug, Clone)]
pub enum Scripted {
    /// Answer with this response.
    Respond(HttpResponse),
    /// Fail without a response.
    Fail(TransportError),
    /// Never answer.
    Hang,
}

/// Transport that replays queued outcomes and records every request.
///
/// Once the queue is empty, calls fail with a transport error.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    /// Transport with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an arbitrary outcome.
    pub fn push(&self, outcome: Scripted) -> &Self {
        lock(&self.script).push_back(outcome);
        self
    }

    /// Queue a raw JSON response.
    pub fn push_json(&self, status: u16, body: &Value) -> &Self {
        self.push(Scripted::Respond(HttpResponse::json(status, body)))
    }

    /// Queue a 200 success envelope around `data`.
    pub fn push_success(&self, data: Value) -> &Self {
        self.push_json(200, &json!({ "status": "success", "data": data }))
    }

    /// Queue a failing envelope with `status` on both the HTTP line and the
    /// envelope.
    pub fn push_failure(&self, status: u16, message: &str) -> &Self {
        self.push_json(
            status,
            &json!({ "status": "error", "message": message, "statusCode": status }),
        )
    }

    /// Queue a failure without a response.
    pub fn push_error(&self, error: TransportError) -> &Self {
        self.push(Scripted::Fail(error))
    }

    /// Queue a call that never completes.
    pub fn push_hang(&self) -> &Self {
        self.push(Scripted::Hang)
    }

    /// Requests received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        lock(&self.requests).clone()
    }

    /// Most recent request.
    #[must_use]
    pub fn last_request(&self) -> Option<HttpRequest> {
        lock(&self.requests).last().cloned()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        lock(&self.requests).push(request);
        let next = lock(&self.script).pop_front();
        match next {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::Fail(error)) => Err(error),
            Some(Scripted::Hang) => std::future::pending().await,
            None => Err(TransportError::transport("no scripted response left")),
        }
    }
}

/// Session listener that remembers every event.
#[derive(Debug, Default)]
pub struct RecordingSessionEvents {
    events: Mutex<Vec<UnauthorizedEvent>>,
}

impl RecordingSessionEvents {
    /// Events received so far.
    #[must_use]
    pub fn events(&self) -> Vec<UnauthorizedEvent> {
        lock(&self.events).clone()
    }
}

impl SessionEvents for RecordingSessionEvents {
    fn on_unauthorized(&self, event: &UnauthorizedEvent) {
        lock(&self.events).push(event.clone());
    }
}

/// Sleeper that returns immediately and remembers requested delays.
#[derive(Debug, Default)]
pub struct InstantSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl InstantSleeper {
    /// Delays requested so far.
    #[must_use]
    pub fn delays(&self) -> Vec<Duration> {
        lock(&self.delays).clone()
    }
}

#[async_trait]
impl RetrySleeper for InstantSleeper {
    async fn sleep(&self, duration: Duration) {
        lock(&self.delays).push(duration);
    }
}
