//! Error types for the authorization flow

use thiserror::Error;

use crate::negotiation::Failure;

/// Errors from building authorization requests and running the negotiation.
///
/// `InvalidRedirectUri` and `Bind` are setup failures: nothing was attempted
/// with the user yet and retrying with the same configuration will fail the
/// same way. The remaining variants are negotiation outcomes.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid redirect URI {uri:?}: {reason}")]
    InvalidRedirectUri { uri: String, reason: String },

    #[error("could not bind callback listener on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("callback request did not carry an authorization code")]
    MissingCode,

    #[error("token endpoint granted an empty access token")]
    EmptyToken,

    #[error("authorization code exchange failed: {0}")]
    Exchange(String),

    #[error("callback listener closed before a callback arrived")]
    ListenerClosed,
}

impl Error {
    /// Whether this error is a setup failure rather than a negotiation outcome.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::InvalidRedirectUri { .. } | Error::Bind { .. }
        )
    }
}

impl From<Failure> for Error {
    fn from(failure: Failure) -> Self {
        match failure {
            Failure::MissingCode => Error::MissingCode,
            Failure::EmptyToken => Error::EmptyToken,
            Failure::Exchange(reason) => Error::Exchange(reason),
        }
    }
}

/// Result alias for the authorization flow
pub type Result<T> = std::result::Result<T, Error>;
