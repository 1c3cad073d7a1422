//! Reqwest-backed transport adapter.
//!
//! This adapter owns wire details only: URL assembly, header and body
//! serialisation, and mapping transport failures. Status codes and bodies are
//! passed back untouched for the client to interpret.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, Url};
use tracing::debug;

use crate::domain::http::{HttpMethod, QueryParams};
use crate::domain::ports::{HttpRequest, HttpResponse, HttpTransport, TransportError};

const DEFAULT_USER_AGENT: &str = concat!("payments-console/", env!("CARGO_PKG_VERSION"));

/// Transport adapter that sends requests to one backend base URL.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: Url,
}

impl ReqwestTransport {
    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        Self::with_user_agent(base_url, timeout, DEFAULT_USER_AGENT)
    }

    /// Build an adapter with an explicit timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_user_agent(
        base_url: Url,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client, base_url })
    }

    /// Base URL every request path is appended to.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = build_url(&self.base_url, &request.path, &request.query)?;
        debug!(method = %request.method, url = %url, "sending backend request");

        let mut builder = self
            .client
            .request(to_method(request.method), url)
            .header(reqwest::header::ACCEPT, "application/json");
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(map_transport_error)?;
        debug!(status, bytes = body.len(), "backend responded");
        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}

fn build_url(base: &Url, path: &str, query: &QueryParams) -> Result<Url, TransportError> {
    let joined = format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    let mut url = Url::parse(&joined)
        .map_err(|error| TransportError::transport(format!("invalid request url: {error}")))?;
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query.pairs());
    }
    Ok(url)
}

const fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn map_transport_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::timeout(error.to_string())
    } else if error.is_connect() {
        TransportError::connect(error.to_string())
    } else {
        TransportError::transport(error.to_string())
    }
}
