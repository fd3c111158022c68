//! Access provider: runs one authorization code negotiation
//!
//! Binds a local callback listener on the redirect URI, waits for the
//! browser redirect, exchanges the code for a token and stops the listener.
//! The outcome is returned as a single `Result`: a granted token, or the
//! reason the negotiation failed.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::http::StatusCode;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::listener::{CallbackSource, LocalCallbackListener};
use crate::negotiation::{NegotiationAction, NegotiationEvent, NegotiationState, handle_event};
use crate::redirect::RedirectTarget;
use crate::token::AccessToken;

/// Error type returned by a `CodeExchange` implementation.
pub type ExchangeError = Box<dyn std::error::Error + Send + Sync>;

/// Trades an authorization code for an access token.
///
/// Implemented by the API client. Uses `Pin<Box<dyn Future>>` return types for
/// dyn-compatibility (`Arc<dyn CodeExchange>`).
pub trait CodeExchange: Send + Sync {
    fn exchange_authorization_code<'a>(
        &'a self,
        code: &'a str,
        redirect_uri: &'a str,
    ) -> Pin<Box<dyn Future<Output = std::result::Result<AccessToken, ExchangeError>> + Send + 'a>>;
}

/// Runs the authorization code negotiation for one redirect URI.
pub struct AccessProvider {
    exchanger: Arc<dyn CodeExchange>,
    target: RedirectTarget,
}

impl AccessProvider {
    /// Fails with `Error::InvalidRedirectUri` when the redirect URI cannot be
    /// served by a local listener.
    pub fn new(exchanger: Arc<dyn CodeExchange>, redirect_uri: &str) -> Result<Self> {
        let target = RedirectTarget::parse(redirect_uri)?;
        Ok(Self { exchanger, target })
    }

    pub fn redirect_target(&self) -> &RedirectTarget {
        &self.target
    }

    /// Bind the local listener and wait for the authorization callback.
    ///
    /// Blocks until a callback arrives; there is no timeout. A bind failure
    /// is returned as `Error::Bind`.
    pub async fn listen_for_authorization_code(&self) -> Result<AccessToken> {
        let mut listener = LocalCallbackListener::bind(&self.target).await?;
        self.listen_with(&mut listener).await
    }

    /// Run the negotiation over any callback source.
    ///
    /// Non-GET callbacks are answered with 405 and the source keeps being
    /// polled. The first GET decides the outcome; it is answered with 200
    /// after any exchange completes, and the source is shut down.
    pub async fn listen_with<S>(&self, source: &mut S) -> Result<AccessToken>
    where
        S: CallbackSource + ?Sized,
    {
        let (mut state, _) = handle_event(NegotiationState::Idle, NegotiationEvent::ListenerBound);
        info!(redirect_uri = self.target.as_str(), "waiting for authorization callback");

        let outcome = loop {
            let Some(pending) = source.next_callback().await else {
                break Err(Error::ListenerClosed);
            };

            let (next, action) = handle_event(
                state,
                NegotiationEvent::CallbackReceived {
                    method: pending.request.method.clone(),
                    query: pending.request.query.clone(),
                },
            );
            state = next;

            match action {
                NegotiationAction::RejectMethod => {
                    warn!(method = %pending.request.method, "rejecting non-GET callback");
                    pending.respond(StatusCode::METHOD_NOT_ALLOWED);
                }
                NegotiationAction::ExchangeCode { code } => {
                    let (next, _) = handle_event(state, NegotiationEvent::ExchangeStarted);
                    state = next;
                    debug!("exchanging authorization code");

                    let event = match self
                        .exchanger
                        .exchange_authorization_code(&code, self.target.as_str())
                        .await
                    {
                        Ok(token) => NegotiationEvent::TokenReceived(token),
                        Err(e) => NegotiationEvent::ExchangeFailed(e.to_string()),
                    };
                    let (next, action) = handle_event(state, event);
                    state = next;

                    pending.respond(StatusCode::OK);
                    break outcome_of(action);
                }
                action => {
                    pending.respond(StatusCode::OK);
                    break outcome_of(action);
                }
            }
        };

        source.shutdown().await;

        match &outcome {
            Ok(token) => info!(scopes = token.scope.len(), "access granted"),
            Err(e) => warn!(error = %e, terminal = state.is_terminal(), "authorization failed"),
        }
        outcome
    }
}

fn outcome_of(action: NegotiationAction) -> Result<AccessToken> {
    match action {
        NegotiationAction::Grant(token) => Ok(token),
        NegotiationAction::Fail(failure) => Err(failure.into()),
        other => Err(Error::InvalidState(format!(
            "negotiation ended without an outcome: {other:?}"
        ))),
    }
}
