//! Transport wrapper shared by every resource service.
//!
//! [`ApiClient`] prepares requests (bearer token, idempotency key), sends
//! them through the [`HttpTransport`] port, unwraps the response envelope, and
//! turns every failure into an [`ApiError`]. A 401 from a protected endpoint
//! clears the session and notifies the configured [`SessionEvents`] listener.

mod retry;

use std::fmt;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

use mockable::{Clock, DefaultClock};
use pagination::{ListShape, PageRequest, PaginatedResponse};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub use retry::{RetryPolicy, RetrySleeper, TokioSleeper};

use crate::domain::error::{ENCODE_ERROR_CODE, INVALID_PATH_CODE};
use crate::domain::ports::{
    HttpRequest, HttpResponse, HttpTransport, KeyValueStore, LOGIN_ROUTE, NoopSessionEvents,
    SessionEvents, TOKEN_KEY, TransportError, UnauthorizedEvent,
};
use crate::domain::{
    ApiError, ApiResponse, AuthToken, EnvelopeStatus, ErrorBody, ErrorContext, HttpMethod,
    IdempotencyKey, QueryParams, TransportFailure, normalize,
};
use crate::outbound::storage::InMemoryStore;

/// Endpoints called without a bearer token and exempt from the 401 side
/// effect.
pub const PUBLIC_PATHS: [&str; 3] = ["/auth/login", "/auth/callback", "/auth/forgot-password"];

const AUTHORIZATION_HEADER: &str = "Authorization";

/// Whether `path` is one of the [`PUBLIC_PATHS`].
#[must_use]
pub fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.iter().any(|public| {
        path.strip_prefix(public)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(['/', '?']))
    })
}

struct Shared {
    transport: Arc<dyn HttpTransport>,
    storage: Arc<dyn KeyValueStore>,
    events: Arc<dyn SessionEvents>,
    clock: Arc<dyn Clock + Send + Sync>,
    sleeper: Arc<dyn RetrySleeper>,
    retry: RetryPolicy,
    token: RwLock<Option<AuthToken>>,
}

/// Typed client for the backend REST API.
///
/// Clones share the token and ports. A clone produced by
/// [`ApiClient::scoped`] additionally races every call against a
/// cancellation token.
#[derive(Clone)]
pub struct ApiClient {
    shared: Arc<Shared>,
    cancel: Option<CancellationToken>,
}

/// Builder for [`ApiClient`].
pub struct ApiClientBuilder {
    transport: Arc<dyn HttpTransport>,
    storage: Option<Arc<dyn KeyValueStore>>,
    events: Option<Arc<dyn SessionEvents>>,
    clock: Option<Arc<dyn Clock + Send + Sync>>,
    sleeper: Option<Arc<dyn RetrySleeper>>,
    retry: RetryPolicy,
}

impl ApiClientBuilder {
    /// Persist the token through `storage` instead of process memory.
    #[must_use]
    pub fn storage(mut self, storage: Arc<dyn KeyValueStore>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Notify `events` when the backend rejects the session.
    #[must_use]
    pub fn session_events(mut self, events: Arc<dyn SessionEvents>) -> Self {
        self.events = Some(events);
        self
    }

    /// Timestamp errors with `clock`.
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Retry retryable failures according to `retry`.
    #[must_use]
    pub const fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Wait between retries with `sleeper`.
    #[must_use]
    pub fn sleeper(mut self, sleeper: Arc<dyn RetrySleeper>) -> Self {
        self.sleeper = Some(sleeper);
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> ApiClient {
        ApiClient {
            shared: Arc::new(Shared {
                transport: self.transport,
                storage: self
                    .storage
                    .unwrap_or_else(|| Arc::new(InMemoryStore::new())),
                events: self.events.unwrap_or_else(|| Arc::new(NoopSessionEvents)),
                clock: self.clock.unwrap_or_else(|| Arc::new(DefaultClock)),
                sleeper: self.sleeper.unwrap_or_else(|| Arc::new(TokioSleeper)),
                retry: self.retry,
                token: RwLock::new(None),
            }),
            cancel: None,
        }
    }
}

impl ApiClient {
    /// Start building a client around `transport`.
    #[must_use]
    pub fn builder(transport: Arc<dyn HttpTransport>) -> ApiClientBuilder {
        ApiClientBuilder {
            transport,
            storage: None,
            events: None,
            clock: None,
            sleeper: None,
            retry: RetryPolicy::default(),
        }
    }

    /// Client with in-memory storage and no session listener.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self::builder(transport).build()
    }

    /// Clone whose calls end with a `REQUEST_CANCELLED` error once `token`
    /// fires.
    #[must_use]
    pub fn scoped(&self, token: CancellationToken) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            cancel: Some(token),
        }
    }

    /// Key/value store holding the token and saved preferences.
    #[must_use]
    pub fn storage(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.shared.storage)
    }

    /// Remember `token` in memory and in storage.
    pub fn set_token(&self, token: AuthToken) {
        if let Err(error) = self.shared.storage.set(TOKEN_KEY, token.expose()) {
            warn!(%error, "failed to persist access token");
        }
        *self.write_token() = Some(token);
    }

    /// Forget the token in memory and in storage.
    pub fn clear_token(&self) {
        *self.write_token() = None;
        if let Err(error) = self.shared.storage.remove(TOKEN_KEY) {
            warn!(%error, "failed to remove persisted access token");
        }
    }

    /// Current token, rehydrated from storage when memory is empty.
    #[must_use]
    pub fn token(&self) -> Option<AuthToken> {
        let cached = self.read_token().clone();
        if cached.is_some() {
            return cached;
        }
        let stored = match self.shared.storage.get(TOKEN_KEY) {
            Ok(stored) => stored?,
            Err(error) => {
                warn!(%error, "failed to read persisted access token");
                return None;
            }
        };
        match AuthToken::new(stored) {
            Ok(token) => {
                *self.write_token() = Some(token.clone());
                Some(token)
            }
            Err(error) => {
                warn!(%error, "ignoring malformed persisted access token");
                None
            }
        }
    }

    /// `GET path` and unwrap the envelope.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] for any failure.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &QueryParams,
    ) -> Result<T, ApiError> {
        self.enveloped(HttpMethod::Get, path, query, None).await
    }

    /// `POST path` with a JSON body and unwrap the envelope.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] for any failure.
    pub async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let payload = self.encode(HttpMethod::Post, path, body)?;
        self.enveloped(HttpMethod::Post, path, &QueryParams::new(), Some(payload))
            .await
    }

    /// `PUT path` with a JSON body and unwrap the envelope.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] for any failure.
    pub async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let payload = self.encode(HttpMethod::Put, path, body)?;
        self.enveloped(HttpMethod::Put, path, &QueryParams::new(), Some(payload))
            .await
    }

    /// `PATCH path` with a JSON body and unwrap the envelope.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] for any failure.
    pub async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let payload = self.encode(HttpMethod::Patch, path, body)?;
        self.enveloped(HttpMethod::Patch, path, &QueryParams::new(), Some(payload))
            .await
    }

    /// `DELETE path` and unwrap the envelope.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] for any failure.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.enveloped(HttpMethod::Delete, path, &QueryParams::new(), None)
            .await
    }

    /// `GET` a list endpoint and adapt its payload through `shape`.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] for any failure, including a
    /// payload that does not match `shape`.
    pub async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &QueryParams,
        request: PageRequest,
        shape: ListShape,
    ) -> Result<PaginatedResponse<T>, ApiError> {
        let context = ErrorContext::new(HttpMethod::Get, path);
        let payload = self
            .exchange(HttpMethod::Get, path, query, None, Framing::Enveloped, &context)
            .await?;
        self.adapt_list(payload, request, shape, context)
    }

    /// `GET` an endpoint that answers without the envelope.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] for any failure.
    pub async fn get_bare<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &QueryParams,
    ) -> Result<T, ApiError> {
        let context = ErrorContext::new(HttpMethod::Get, path);
        let payload = self
            .exchange(HttpMethod::Get, path, query, None, Framing::Bare, &context)
            .await?;
        self.decode(payload, context)
    }

    /// `GET` a list endpoint that answers without the envelope.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] for any failure.
    pub async fn get_bare_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &QueryParams,
        request: PageRequest,
        shape: ListShape,
    ) -> Result<PaginatedResponse<T>, ApiError> {
        let context = ErrorContext::new(HttpMethod::Get, path);
        let payload = self
            .exchange(HttpMethod::Get, path, query, None, Framing::Bare, &context)
            .await?;
        self.adapt_list(payload, request, shape, context)
    }

    async fn enveloped<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        query: &QueryParams,
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let context = ErrorContext::new(method, path);
        let payload = self
            .exchange(method, path, query, body, Framing::Enveloped, &context)
            .await?;
        self.decode(payload, context)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        payload: Payload,
        context: ErrorContext,
    ) -> Result<T, ApiError> {
        serde_json::from_value(payload.value).map_err(|error| {
            self.fail(
                TransportFailure::Decode {
                    status: payload.status,
                    message: format!("unexpected response payload: {error}"),
                },
                context,
            )
        })
    }

    fn adapt_list<T: DeserializeOwned>(
        &self,
        payload: Payload,
        request: PageRequest,
        shape: ListShape,
        context: ErrorContext,
    ) -> Result<PaginatedResponse<T>, ApiError> {
        shape.adapt(payload.value, request).map_err(|error| {
            self.fail(
                TransportFailure::Decode {
                    status: payload.status,
                    message: error.to_string(),
                },
                context,
            )
        })
    }

    fn encode<B: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &B,
    ) -> Result<Value, ApiError> {
        serde_json::to_value(body).map_err(|error| {
            ApiError::generic(
                "Request could not be encoded",
                ENCODE_ERROR_CODE,
                None,
                ErrorContext::new(method, path),
                self.shared.clock.utc(),
            )
            .with_details(Value::String(error.to_string()))
        })
    }

    /// Send one logical call, retrying retryable failures per the policy.
    ///
    /// A 2xx response is opened according to `framing` inside the loop, so
    /// a failing envelope behind HTTP 200 is retried like the same status on
    /// the HTTP line. Everything returned as `Err` is already normalised.
    async fn exchange(
        &self,
        method: HttpMethod,
        path: &str,
        query: &QueryParams,
        body: Option<Value>,
        framing: Framing,
        context: &ErrorContext,
    ) -> Result<Payload, ApiError> {
        if let Some(segment) = unsafe_segment(path) {
            warn!(%method, path, segment, "refusing to send a request with an unsafe path");
            return Err(ApiError::generic(
                "Request path is not a valid resource path",
                INVALID_PATH_CODE,
                None,
                context.clone(),
                self.shared.clock.utc(),
            ));
        }
        let request = self.prepare(method, path, query, body);
        let attempts = self.shared.retry.attempts();
        let mut attempt = 1;
        loop {
            let started = Instant::now();
            let outcome = self.race(self.shared.transport.send(request.clone())).await;
            let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
            let failure = match outcome {
                Some(Ok(response)) if response.is_success() => match framing.open(&response) {
                    Ok(payload) => {
                        debug!(
                            %method,
                            path,
                            status = response.status,
                            elapsed_ms,
                            attempt,
                            "backend call succeeded"
                        );
                        return Ok(payload);
                    }
                    Err(failure) => failure,
                },
                Some(Ok(response)) => status_failure(&response),
                Some(Err(error)) => no_response(error),
                None => TransportFailure::Cancelled,
            };
            let error = self.fail(failure, context.clone());
            if !error.is_retryable() || attempt >= attempts {
                return Err(error);
            }
            let delay = self.shared.retry.delay_after(attempt);
            warn!(
                %method,
                path,
                attempt,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                code = error.code(),
                "retrying backend call"
            );
            if self.race(self.shared.sleeper.sleep(delay)).await.is_none() {
                return Err(self.fail(TransportFailure::Cancelled, context.clone()));
            }
            attempt += 1;
        }
    }

    fn prepare(
        &self,
        method: HttpMethod,
        path: &str,
        query: &QueryParams,
        body: Option<Value>,
    ) -> HttpRequest {
        let mut request = HttpRequest::new(method, path);
        request.query = query.clone();
        request.body = body;
        if !is_public_path(path) {
            if let Some(token) = self.token() {
                request
                    .headers
                    .push((AUTHORIZATION_HEADER.to_owned(), token.bearer()));
            }
        }
        if method.is_state_changing() {
            request.headers.push(IdempotencyKey::random().header());
        }
        request
    }

    async fn race<F: Future>(&self, future: F) -> Option<F::Output> {
        match &self.cancel {
            Some(token) => tokio::select! {
                biased;
                () = token.cancelled() => None,
                output = future => Some(output),
            },
            None => Some(future.await),
        }
    }

    /// Normalise `failure` and apply the session side effect for 401s.
    fn fail(&self, failure: TransportFailure, context: ErrorContext) -> ApiError {
        let error = normalize(failure, context, self.shared.clock.utc());
        let origin = error.context();
        if error.status_code() == Some(401) && !is_public_path(&origin.endpoint) {
            warn!(endpoint = %origin.endpoint, "backend rejected the session; clearing token");
            self.clear_token();
            self.shared.events.on_unauthorized(&UnauthorizedEvent {
                endpoint: origin.endpoint.clone(),
                method: origin.method,
                redirect_to: LOGIN_ROUTE,
            });
        } else if !error.is_cancelled() {
            debug!(
                method = %origin.method,
                path = %origin.endpoint,
                kind = error.kind().label(),
                code = error.code(),
                status = error.status_code(),
                "backend call failed"
            );
        }
        error
    }

    fn read_token(&self) -> RwLockReadGuard<'_, Option<AuthToken>> {
        self.shared
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_token(&self) -> RwLockWriteGuard<'_, Option<AuthToken>> {
        self.shared
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("retry", &self.shared.retry)
            .field("scoped", &self.cancel.is_some())
            .finish_non_exhaustive()
    }
}

/// How a 2xx response body carries its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Framing {
    /// Inside the `{status, message, data, statusCode}` envelope.
    Enveloped,
    /// As the whole body.
    Bare,
}

impl Framing {
    fn open(self, response: &HttpResponse) -> Result<Payload, TransportFailure> {
        let value = match self {
            Self::Enveloped => ApiResponse::from_slice(response.status, &response.body)
                .and_then(|envelope| envelope.into_data::<Value>(response.status))?,
            Self::Bare => serde_json::from_slice(&response.body).map_err(|error| {
                TransportFailure::Decode {
                    status: response.status,
                    message: format!("invalid response body: {error}"),
                }
            })?,
        };
        Ok(Payload {
            status: response.status,
            value,
        })
    }
}

/// Unwrapped payload of a successful call.
struct Payload {
    status: u16,
    value: Value,
}

/// First path segment that is empty or a dot segment.
///
/// `%2e` counts as a dot because URL parsers resolve it like one.
fn unsafe_segment(path: &str) -> Option<&str> {
    path.trim_start_matches('/').split('/').find(|segment| {
        let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
        decoded.is_empty() || decoded == "." || decoded == ".."
    })
}

fn status_failure(response: &HttpResponse) -> TransportFailure {
    let failed_envelope = ApiResponse::from_slice(response.status, &response.body)
        .ok()
        .filter(|envelope| envelope.status == EnvelopeStatus::Error);
    if let Some(envelope) = failed_envelope {
        return envelope.into_failure(response.status);
    }
    let body = ErrorBody::from_slice(&response.body);
    let status = body
        .status_code
        .filter(|code| *code >= 400)
        .unwrap_or(response.status);
    TransportFailure::Status { status, body }
}

fn no_response(error: TransportError) -> TransportFailure {
    match error {
        TransportError::Timeout { message } => TransportFailure::NoResponse {
            timeout: true,
            offline: false,
            message,
        },
        TransportError::Connect { message } => TransportFailure::NoResponse {
            timeout: false,
            offline: true,
            message,
        },
        TransportError::Transport { message } => TransportFailure::NoResponse {
            timeout: false,
            offline: false,
            message,
        },
    }
}

#[cfg(test)]
mod tests;
