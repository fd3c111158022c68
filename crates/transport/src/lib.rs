//! Transport abstraction for the Medium REST API
//!
//! Defines the `Transport` trait that decouples the typed API client from the
//! mechanics of HTTP. The client only ever needs two verbs: GET a URL and
//! POST a JSON body to a URL, each yielding the response body as text. Any
//! non-2xx response surfaces as `TransportError::Status` carrying the status
//! code and body; failures that never produced a response (DNS, refused
//! connection, timeout) surface as `TransportError::Request`.
//!
//! `HttpTransport` is the reqwest-backed implementation. Tests substitute an
//! in-memory implementation of the same trait.

pub mod http;
mod metrics;

pub use http::{HttpTransport, TransportConfig};

use std::future::Future;
use std::pin::Pin;

/// Errors from a single transport round trip.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The request failed before a response was received.
    #[error("request failed: {0}")]
    Request(String),

    /// The transport could not be constructed from its configuration.
    #[error("invalid transport configuration: {0}")]
    Config(String),
}

impl TransportError {
    /// HTTP status code, or `None` when no response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            TransportError::Request(_) | TransportError::Config(_) => None,
        }
    }

    /// Response body for status errors.
    pub fn body(&self) -> Option<&str> {
        match self {
            TransportError::Status { body, .. } => Some(body),
            TransportError::Request(_) | TransportError::Config(_) => None,
        }
    }

    /// Whether the server rejected the bearer token or client credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }
}

/// Result alias for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

/// Minimal request/response capability the API client is built on.
///
/// Uses `Pin<Box<dyn Future>>` return types for dyn-compatibility (`Arc<dyn Transport>`).
pub trait Transport: Send + Sync {
    /// GET `url` and return the response body.
    fn get<'a>(&'a self, url: &'a str) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;

    /// POST `body` (JSON text) to `url` and return the response body.
    fn post<'a>(
        &'a self,
        url: &'a str,
        body: String,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_exposes_code_and_body() {
        let err = TransportError::Status {
            status: 404,
            body: r#"{"errors":[{"message":"not found","code":6000}]}"#.into(),
        };
        assert_eq!(err.status(), Some(404));
        assert!(err.body().unwrap().contains("not found"));
        assert!(!err.is_unauthorized());
        assert!(err.to_string().starts_with("HTTP 404"));
    }

    #[test]
    fn request_error_has_no_status() {
        let err = TransportError::Request("connection refused".into());
        assert_eq!(err.status(), None);
        assert_eq!(err.body(), None);
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn unauthorized_covers_401_and_403() {
        for status in [401, 403] {
            let err = TransportError::Status {
                status,
                body: String::new(),
            };
            assert!(err.is_unauthorized(), "{status} should be unauthorized");
        }
    }
}
