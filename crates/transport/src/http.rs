//! reqwest-backed transport
//!
//! Each `HttpTransport` owns its own `reqwest::Client` with default headers
//! (JSON content negotiation and, when configured, the bearer token). Nothing
//! is shared between instances, so two clients holding different tokens can
//! never leak headers into each other's requests.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use common::Secret;
use reqwest::header::{
    ACCEPT, ACCEPT_CHARSET, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue,
};
use tracing::{Instrument, debug, debug_span, warn};

use crate::metrics::{record_error, record_request};
use crate::{Result, Transport, TransportError};

const APPLICATION_JSON: &str = "application/json";

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-instance transport configuration.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Sent as `Authorization: Bearer <token>` on every request when set.
    pub bearer_token: Option<Secret<String>>,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            bearer_token: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("medium-rs/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// HTTP transport over a dedicated `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: TransportConfig) -> Result<Self> {
        let headers = default_headers(config.bearer_token.as_ref())?;
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| TransportError::Config(format!("building HTTP client: {e}")))?;
        Ok(Self { client })
    }

    async fn execute(
        &self,
        method: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<String> {
        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                record_error(method, "request");
                warn!(error = %e, "request failed before a response was received");
                return Err(TransportError::Request(e.to_string()));
            }
        };

        let status = response.status();
        record_request(method, status.as_u16());

        let body = response.text().await.map_err(|e| {
            record_error(method, "request");
            TransportError::Request(format!("reading response body: {e}"))
        })?;

        if !status.is_success() {
            record_error(method, "status");
            warn!(status = status.as_u16(), "non-success response");
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(status = status.as_u16(), bytes = body.len(), "response received");
        Ok(body)
    }
}

impl Transport for HttpTransport {
    fn get<'a>(&'a self, url: &'a str) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        let span = debug_span!("transport", method = "GET", url = %url);
        Box::pin(self.execute("GET", self.client.get(url)).instrument(span))
    }

    fn post<'a>(
        &'a self,
        url: &'a str,
        body: String,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        let span = debug_span!("transport", method = "POST", url = %url);
        Box::pin(
            self.execute("POST", self.client.post(url).body(body))
                .instrument(span),
        )
    }
}

fn default_headers(bearer_token: Option<&Secret<String>>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
    headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
    headers.insert(ACCEPT_CHARSET, HeaderValue::from_static("utf-8"));

    if let Some(token) = bearer_token {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose()))
            .map_err(|e| TransportError::Config(format!("bearer token is not a valid header: {e}")))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    Ok(headers)
}
