//! OAuth2 authorization for the Medium API
//!
//! Covers everything up to holding an access token:
//! - `AuthorizationRequest` renders the URL the user opens in a browser
//! - `AccessProvider` listens on the redirect URI for the callback and trades
//!   the authorization code for an `AccessToken` through a `CodeExchange`
//! - `ConfigFile` loads client credentials and the redirect URI
//!
//! The negotiation itself is a pure state machine in [`negotiation`]; the
//! network side is behind [`CallbackSource`] so it can be driven without
//! sockets.

pub mod access;
pub mod authorize;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod error;
pub mod listener;
pub mod negotiation;
pub mod redirect;
pub mod scope;
pub mod token;

pub use access::{AccessProvider, CodeExchange, ExchangeError};
pub use authorize::AuthorizationRequest;
pub use config::ConfigFile;
pub use credentials::Credentials;
pub use error::{Error, Result};
pub use listener::{CallbackRequest, CallbackSource, LocalCallbackListener, PendingCallback};
pub use redirect::RedirectTarget;
pub use scope::{Scope, join_scopes};
pub use token::{AccessToken, TokenRequest};
