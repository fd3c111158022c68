//! Authorization code negotiation state machine
//!
//! Pure state machine: receives events, returns (new_state, action).
//! The caller (`AccessProvider`) performs the I/O implied by each action:
//! answering the callback request, calling the token endpoint and stopping
//! the listener.
//!
//! ```text
//! Idle --ListenerBound--> Listening
//! Listening --non-GET--> Listening            (405, keep waiting)
//! Listening --GET without code--> CodeMissing (terminal)
//! Listening --GET with code--> CodeReceived --ExchangeStarted--> Exchanging
//! Exchanging --token--> Granted | Error       (terminal)
//! ```
//!
//! Once a terminal state is reached every further event is ignored, so only
//! the first successful callback is ever processed.

use axum::http::Method;

use crate::constants::CODE_PARAMETER;
use crate::token::AccessToken;

/// Why a negotiation ended without a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// The callback was a GET without a `code` query parameter
    MissingCode,
    /// The token endpoint answered but the access token was empty
    EmptyToken,
    /// The token endpoint call failed
    Exchange(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NegotiationState {
    /// Listener not yet bound
    Idle,
    /// Waiting for the browser redirect
    Listening,
    /// Callback carried a code, exchange not yet started
    CodeReceived { code: String },
    /// Token endpoint call in flight
    Exchanging,
    /// Terminal: token granted
    Granted,
    /// Terminal: callback had no code
    CodeMissing,
    /// Terminal: exchange failed
    Error { reason: Failure },
}

impl NegotiationState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            NegotiationState::Granted
                | NegotiationState::CodeMissing
                | NegotiationState::Error { .. }
        )
    }
}

#[derive(Debug)]
pub enum NegotiationEvent {
    ListenerBound,
    CallbackReceived {
        method: Method,
        query: Option<String>,
    },
    ExchangeStarted,
    TokenReceived(AccessToken),
    ExchangeFailed(String),
}

/// Actions the caller should execute after a state transition
#[derive(Debug, PartialEq, Eq)]
pub enum NegotiationAction {
    /// Wait for the next callback request
    AwaitCallback,
    /// Answer the current callback with 405 and keep listening
    RejectMethod,
    /// Exchange the code at the token endpoint
    ExchangeCode { code: String },
    /// Deliver the token and stop the listener
    Grant(AccessToken),
    /// Deliver the failure and stop the listener
    Fail(Failure),
    /// No-op
    None,
}

/// Handle a state transition. Pure function: no I/O.
pub fn handle_event(
    state: NegotiationState,
    event: NegotiationEvent,
) -> (NegotiationState, NegotiationAction) {
    match (state, event) {
        (NegotiationState::Idle, NegotiationEvent::ListenerBound) => {
            (NegotiationState::Listening, NegotiationAction::AwaitCallback)
        }

        (NegotiationState::Listening, NegotiationEvent::CallbackReceived { method, .. })
            if method != Method::GET =>
        {
            (NegotiationState::Listening, NegotiationAction::RejectMethod)
        }

        (NegotiationState::Listening, NegotiationEvent::CallbackReceived { query, .. }) => {
            match authorization_code(query.as_deref()) {
                Some(code) => (
                    NegotiationState::CodeReceived { code: code.clone() },
                    NegotiationAction::ExchangeCode { code },
                ),
                None => (
                    NegotiationState::CodeMissing,
                    NegotiationAction::Fail(Failure::MissingCode),
                ),
            }
        }

        (NegotiationState::CodeReceived { .. }, NegotiationEvent::ExchangeStarted) => {
            (NegotiationState::Exchanging, NegotiationAction::None)
        }

        (
            NegotiationState::CodeReceived { .. } | NegotiationState::Exchanging,
            NegotiationEvent::TokenReceived(token),
        ) => {
            if token.has_access_token() {
                (NegotiationState::Granted, NegotiationAction::Grant(token))
            } else {
                (
                    NegotiationState::Error {
                        reason: Failure::EmptyToken,
                    },
                    NegotiationAction::Fail(Failure::EmptyToken),
                )
            }
        }

        (
            NegotiationState::CodeReceived { .. } | NegotiationState::Exchanging,
            NegotiationEvent::ExchangeFailed(reason),
        ) => {
            let failure = Failure::Exchange(reason);
            (
                NegotiationState::Error {
                    reason: failure.clone(),
                },
                NegotiationAction::Fail(failure),
            )
        }

        // --- Invalid/unhandled transition (including anything after a terminal state) ---
        (state, _event) => (state, NegotiationAction::None),
    }
}

/// Extract the authorization code from a callback query string.
///
/// Takes the first pair named `code`, form-url-decoded. A present but empty
/// value still counts as a code.
pub fn authorization_code(query: Option<&str>) -> Option<String> {
    let query = query?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(name, _)| name == CODE_PARAMETER)
        .map(|(_, value)| value.into_owned())
}
