//! Typed client for the Medium REST API
//!
//! Each operation is one transport round trip plus one conversion. Errors
//! from either step are returned as-is; nothing is retried.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use common::Secret;
use medium_auth::constants::{API_BASE, AUTHORIZE_ENDPOINT};
use medium_auth::{
    AccessToken, AuthorizationRequest, CodeExchange, Credentials, ExchangeError, Scope,
    TokenRequest,
};
use tracing::debug;
use transport::{HttpTransport, Transport, TransportConfig};

use crate::converter::ModelConverter;
use crate::error::{Error, Result};
use crate::model::{Contributor, Post, Publication, Submission, User};

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-client configuration. Nothing here is shared between clients.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for resource calls and the token endpoint
    pub api_endpoint: String,
    /// Browser-facing authorization endpoint
    pub authorize_endpoint: String,
    /// Needed for the authorization URL and token exchanges
    pub credentials: Option<Credentials>,
    /// Sent as a bearer token on every request when set
    pub access_token: Option<Secret<String>>,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_endpoint: API_BASE.to_string(),
            authorize_endpoint: AUTHORIZE_ENDPOINT.to_string(),
            credentials: None,
            access_token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

pub struct MediumClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    converter: ModelConverter,
}

impl MediumClient {
    /// Build a client over its own HTTP transport.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(TransportConfig {
            bearer_token: config.access_token.clone(),
            timeout: config.timeout,
            ..TransportConfig::default()
        })?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Build a client over any transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            transport,
            converter: ModelConverter,
        }
    }

    /// Client that can build authorization URLs and exchange tokens.
    pub fn from_credentials(credentials: Credentials) -> Result<Self> {
        Self::new(ClientConfig {
            credentials: Some(credentials),
            ..ClientConfig::default()
        })
    }

    /// Client that can call resource endpoints with an existing token.
    pub fn from_access_token(access_token: impl Into<String>) -> Result<Self> {
        Self::new(ClientConfig {
            access_token: Some(Secret::new(access_token.into())),
            ..ClientConfig::default()
        })
    }

    /// New client with the same endpoints and credentials, authenticated
    /// with `token`.
    pub fn with_access_token(&self, token: &AccessToken) -> Result<Self> {
        Self::new(ClientConfig {
            access_token: Some(Secret::new(token.access_token.clone())),
            ..self.config.clone()
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// URL the user opens to grant this application access.
    pub fn authorization_url(
        &self,
        state: &str,
        redirect_url: &str,
        scopes: &[Scope],
    ) -> Result<String> {
        let credentials = self.credentials()?;
        AuthorizationRequest {
            endpoint: self.config.authorize_endpoint.clone(),
            client_id: credentials.client_id.clone(),
            scopes: scopes.to_vec(),
            state: state.to_string(),
            redirect_uri: redirect_url.to_string(),
            ..AuthorizationRequest::default()
        }
        .to_url()
        .map_err(|e| Error::InvalidState(e.to_string()))
    }

    pub async fn exchange_authorization_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<AccessToken> {
        let credentials = self.credentials()?;
        self.request_token(TokenRequest::authorization_code(credentials, code, redirect_uri))
            .await
    }

    pub async fn exchange_refresh_token(&self, refresh_token: &str) -> Result<AccessToken> {
        let credentials = self.credentials()?;
        self.request_token(TokenRequest::refresh_token(credentials, refresh_token))
            .await
    }

    /// The user the access token belongs to.
    pub async fn get_user(&self) -> Result<User> {
        let body = self.transport.get(&self.url("/me")).await?;
        Ok(self.converter.deserialize_single(&body)?)
    }

    pub async fn list_publications(&self, user_id: &str) -> Result<Vec<Publication>> {
        let url = self.url(&format!("/users/{user_id}/publications"));
        let body = self.transport.get(&url).await?;
        Ok(self.converter.deserialize_list(&body)?)
    }

    pub async fn list_contributors(&self, publication_id: &str) -> Result<Vec<Contributor>> {
        let url = self.url(&format!("/publications/{publication_id}/contributors"));
        let body = self.transport.get(&url).await?;
        Ok(self.converter.deserialize_list(&body)?)
    }

    /// Create a post on the user's profile.
    pub async fn create_post(&self, submission: &Submission, user_id: &str) -> Result<Post> {
        self.submit(submission, &format!("/users/{user_id}/posts"))
            .await
    }

    /// Create a post in a publication.
    pub async fn create_post_for_publication(
        &self,
        submission: &Submission,
        publication_id: &str,
    ) -> Result<Post> {
        self.submit(submission, &format!("/publications/{publication_id}/posts"))
            .await
    }

    async fn submit(&self, submission: &Submission, path: &str) -> Result<Post> {
        let body = self.converter.serialize(submission)?;
        let response = self.transport.post(&self.url(path), body).await?;
        Ok(self.converter.deserialize_single(&response)?)
    }

    async fn request_token(&self, request: TokenRequest<'_>) -> Result<AccessToken> {
        debug!(grant_type = request.grant_type(), "requesting token");
        let body = self.converter.serialize(&request)?;
        let response = self.transport.post(&self.url("/tokens"), body).await?;
        Ok(self.converter.deserialize_single(&response)?)
    }

    fn credentials(&self) -> Result<&Credentials> {
        self.config
            .credentials
            .as_ref()
            .ok_or_else(|| Error::InvalidState("client was built without credentials".into()))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_endpoint.trim_end_matches('/'))
    }
}

impl std::fmt::Debug for MediumClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediumClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CodeExchange for MediumClient {
    fn exchange_authorization_code<'a>(
        &'a self,
        code: &'a str,
        redirect_uri: &'a str,
    ) -> Pin<Box<dyn Future<Output = std::result::Result<AccessToken, ExchangeError>> + Send + 'a>>
    {
        Box::pin(async move {
            MediumClient::exchange_authorization_code(self, code, redirect_uri)
                .await
                .map_err(ExchangeError::from)
        })
    }
}
