//! HTTP request/response values and the transport seam.
//!
//! # Design
//! Requests and responses are plain data. `ContentClient` builds an
//! `HttpRequest`, hands it to a `Transport`, and parses the returned
//! `HttpResponse`; the transport is the only place that touches the
//! network. `HttpTransport` is the reqwest-backed implementation used in
//! production, while tests plug in an in-memory transport that records what
//! it was asked to send.
//!
//! All fields use owned types so values can be moved across tasks freely.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;

use crate::error::{ApiError, Result};

/// A GET request described as plain data.
///
/// Built by `ContentClient::build_request`. The API is read-only, so only
/// the fully-qualified URL and headers are carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

/// An HTTP response described as plain data.
///
/// `status_text` is the reason phrase (e.g. "Not Found") reported alongside
/// the status code; it ends up in `ApiError::Transport`.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// A 200 response with the given body and no headers.
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            status_text: "OK".to_string(),
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes one `HttpRequest` and returns the raw response.
///
/// Implementations must return non-2xx replies as `Ok(HttpResponse)`; status
/// interpretation belongs to the client. `Err` is reserved for requests that
/// produced no response at all.
pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse>> + Send;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a transport with an optional request timeout. Without one the
    /// reqwest default (no timeout) applies.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Wrap an already configured reqwest client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

const USER_AGENT: &str = concat!("boletin-core/", env!("CARGO_PKG_VERSION"));

impl Transport for HttpTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self.client.get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("failed to read body: {e}")))?;

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }
}
