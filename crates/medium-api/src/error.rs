//! Error types for API calls

use thiserror::Error;
use transport::TransportError;

use crate::converter::ConversionError;
use crate::model::{ApiError, ApiErrorBody};

/// Errors from `MediumClient` operations.
///
/// Transport and conversion failures are passed through unchanged.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// The client lacks what the operation needs (e.g. credentials).
    #[error("invalid state: {0}")]
    InvalidState(String),
}

impl Error {
    /// Structured errors from the API's error body, if the server sent one.
    pub fn api_errors(&self) -> Option<Vec<ApiError>> {
        let body = match self {
            Error::Transport(e) => e.body()?,
            Error::Conversion(_) | Error::InvalidState(_) => return None,
        };
        serde_json::from_str::<ApiErrorBody>(body)
            .ok()
            .map(|b| b.errors)
            .filter(|errors| !errors.is_empty())
    }
}

/// Result alias for API calls
pub type Result<T> = std::result::Result<T, Error>;
