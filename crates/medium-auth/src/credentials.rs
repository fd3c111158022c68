//! Client application credentials

use common::Secret;
use serde::Deserialize;

/// The registered application's identity, used before an access token exists.
///
/// Supplied by the caller or the config file and never mutated. The secret is
/// redacted from Debug output and zeroized on drop.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: Secret<String>,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: Secret::new(client_secret.into()),
        }
    }
}
