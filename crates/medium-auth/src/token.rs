//! Access tokens and token endpoint requests
//!
//! Both grant types POST to the API's `/tokens` endpoint:
//! 1. `authorization_code` after the browser callback delivered a code
//! 2. `refresh_token` to renew an expired access token
//!
//! The response is the same `AccessToken` shape for both.

use std::collections::BTreeSet;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::credentials::Credentials;
use crate::scope::Scope;

/// Token granted by the token endpoint.
///
/// `expires_at` is a unix timestamp in milliseconds (absolute, not a delta).
/// Fields missing from the response deserialize to their empty defaults; the
/// negotiation treats an empty `access_token` as a failed grant.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessToken {
    /// Always "Bearer" in practice
    pub token_type: String,
    pub access_token: String,
    /// Long-lived token for `exchange_refresh_token`
    pub refresh_token: String,
    pub scope: BTreeSet<Scope>,
    pub expires_at: i64,
}

impl AccessToken {
    /// Whether the grant actually carries a usable access token.
    pub fn has_access_token(&self) -> bool {
        !self.access_token.is_empty()
    }

    /// Whether the token has expired relative to `now_millis`.
    pub fn is_expired_at(&self, now_millis: i64) -> bool {
        self.expires_at <= now_millis
    }

    /// Whether the token has expired relative to the system clock.
    pub fn is_expired(&self) -> bool {
        let now_millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or_default();
        self.is_expired_at(now_millis)
    }

    pub fn grants(&self, scope: Scope) -> bool {
        self.scope.contains(&scope)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token_type", &self.token_type)
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("scope", &self.scope)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Body POSTed to the token endpoint.
///
/// Serializes with a `grant_type` discriminator of `authorization_code` or
/// `refresh_token`. Borrows everything, so the client secret is never copied
/// out of its `Secret`.
#[derive(Serialize)]
#[serde(tag = "grant_type", rename_all = "snake_case")]
pub enum TokenRequest<'a> {
    AuthorizationCode {
        client_id: &'a str,
        client_secret: &'a str,
        code: &'a str,
        redirect_uri: &'a str,
    },
    RefreshToken {
        client_id: &'a str,
        client_secret: &'a str,
        refresh_token: &'a str,
    },
}

impl<'a> TokenRequest<'a> {
    pub fn authorization_code(
        credentials: &'a Credentials,
        code: &'a str,
        redirect_uri: &'a str,
    ) -> Self {
        TokenRequest::AuthorizationCode {
            client_id: &credentials.client_id,
            client_secret: credentials.client_secret.expose(),
            code,
            redirect_uri,
        }
    }

    pub fn refresh_token(credentials: &'a Credentials, refresh_token: &'a str) -> Self {
        TokenRequest::RefreshToken {
            client_id: &credentials.client_id,
            client_secret: credentials.client_secret.expose(),
            refresh_token,
        }
    }

    pub fn grant_type(&self) -> &'static str {
        match self {
            TokenRequest::AuthorizationCode { .. } => "authorization_code",
            TokenRequest::RefreshToken { .. } => "refresh_token",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    const TOKEN_JSON: &str = r#"{
        "token_type": "Bearer",
        "access_token": "e27bb85c111d0f4fb27597db25fd4d359ff066ba10d6779ec2aa01bfa60a0a958",
        "refresh_token": "1e5ed3c1cefcdba39b4b8aa0c0cf4e7ac4d0d0d1b3df8e3a9d4bcf0edfd3a6f3a",
        "scope": ["basicProfile", "publishPost"],
        "expires_at": 1426325769161
    }"#;

    #[test]
    fn access_token_deserializes() {
        let token: AccessToken = serde_json::from_str(TOKEN_JSON).unwrap();
        assert_eq!(token.token_type, "Bearer");
        assert!(token.access_token.starts_with("e27bb85c"));
        assert!(token.grants(Scope::PublishPost));
        assert!(!token.grants(Scope::UploadImage));
        assert_eq!(token.expires_at, 1426325769161);
    }

    #[test]
    fn missing_access_token_defaults_to_empty() {
        let token: AccessToken = serde_json::from_str(r#"{"token_type":"Bearer"}"#).unwrap();
        assert!(!token.has_access_token());
        assert!(token.scope.is_empty());
    }

    #[test]
    fn unknown_scope_in_response_is_rejected() {
        let result = serde_json::from_str::<AccessToken>(r#"{"scope":["everything"]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn expiry_is_compared_in_millis() {
        let token = AccessToken {
            expires_at: 1_000,
            ..AccessToken::default()
        };
        assert!(!token.is_expired_at(999));
        assert!(token.is_expired_at(1_000));
        assert!(token.is_expired(), "1970 is well in the past");
    }

    #[test]
    fn debug_redacts_tokens() {
        let token: AccessToken = serde_json::from_str(TOKEN_JSON).unwrap();
        let debug = format!("{token:?}");
        assert!(!debug.contains("e27bb85c"), "access token leaked: {debug}");
        assert!(!debug.contains("1e5ed3c1"), "refresh token leaked: {debug}");
        assert!(debug.contains("Bearer"));
    }

    #[test]
    fn authorization_code_request_body() {
        let credentials = Credentials::new("KoolClient22", "SecretSauces");
        let request =
            TokenRequest::authorization_code(&credentials, "XYZ", "http://127.0.0.1:9000/callback");
        assert_eq!(request.grant_type(), "authorization_code");

        let body: Value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({
                "grant_type": "authorization_code",
                "client_id": "KoolClient22",
                "client_secret": "SecretSauces",
                "code": "XYZ",
                "redirect_uri": "http://127.0.0.1:9000/callback",
            })
        );
    }

    #[test]
    fn refresh_token_request_body() {
        let credentials = Credentials::new("KoolClient22", "SecretSauces");
        let request = TokenRequest::refresh_token(&credentials, "rt_abc");
        assert_eq!(request.grant_type(), "refresh_token");

        let body: Value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({
                "grant_type": "refresh_token",
                "client_id": "KoolClient22",
                "client_secret": "SecretSauces",
                "refresh_token": "rt_abc",
            })
        );
        assert!(body.get("redirect_uri").is_none());
    }
}
