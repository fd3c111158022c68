//! Authorization URL construction
//!
//! The user's browser is sent to the authorize endpoint with the client id,
//! requested scopes, an opaque state token, the response type and the
//! redirect URI. Parameter order is fixed. Values are inserted as given:
//! callers are expected to pass URL-safe state tokens and redirect URIs.

use crate::constants::{AUTHORIZE_ENDPOINT, DEFAULT_RESPONSE_TYPE};
use crate::error::{Error, Result};
use crate::scope::{Scope, join_scopes};

/// Everything needed to render an authorization URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    pub endpoint: String,
    pub client_id: String,
    pub scopes: Vec<Scope>,
    pub state: String,
    pub response_type: String,
    pub redirect_uri: String,
}

impl Default for AuthorizationRequest {
    fn default() -> Self {
        Self {
            endpoint: AUTHORIZE_ENDPOINT.to_string(),
            client_id: String::new(),
            scopes: Vec::new(),
            state: String::new(),
            response_type: DEFAULT_RESPONSE_TYPE.to_string(),
            redirect_uri: String::new(),
        }
    }
}

impl AuthorizationRequest {
    /// Render the URL the user opens to grant access.
    ///
    /// Fails with `InvalidState` when the endpoint, client id or redirect URI
    /// is empty. An empty scope list or state renders as an empty value.
    pub fn to_url(&self) -> Result<String> {
        require("endpoint", &self.endpoint)?;
        require("client_id", &self.client_id)?;
        require("redirect_uri", &self.redirect_uri)?;

        Ok(format!(
            "{}?client_id={}&scope={}&state={}&response_type={}&redirect_uri={}",
            self.endpoint,
            self.client_id,
            join_scopes(&self.scopes),
            self.state,
            self.response_type,
            self.redirect_uri,
        ))
    }
}

fn require(name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::InvalidState(format!(
            "authorization request is missing {name}"
        )));
    }
    Ok(())
}
