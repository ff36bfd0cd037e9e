// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth authorization-code session for the Strava API.
//!
//! One session per process: every remote call is gated on the single
//! authenticated identity. The session moves
//! `Unauthenticated -> AuthorizationPending -> Authenticated`; an expired
//! token fails the validity check and a new authorization round-trip starts
//! over from `begin_authorization`.

use crate::config::Config;
use crate::error::AppError;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use ring::rand::{SecureRandom, SystemRandom};
use serde::Deserialize;

const STRAVA_AUTHORIZE_URL: &str = "https://www.strava.com/oauth/authorize";
const STRAVA_TOKEN_URL: &str = "https://www.strava.com/oauth/token";
const OAUTH_SCOPE: &str = "activity:read";

/// Bounded deadline for the token exchange request.
const EXCHANGE_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// Authorization lifecycle state.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Unauthenticated,
    AuthorizationPending {
        nonce: String,
    },
    Authenticated {
        access_token: String,
        expires_at: DateTime<Utc>,
    },
}

/// OAuth session state machine.
///
/// Callers share it behind a `tokio::sync::Mutex`; the callback handler must
/// hold the guard across the whole `complete_authorization` call since the
/// code exchange is a non-idempotent side effect.
pub struct AuthSession {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    token_url: String,
    authorize_url: String,
    state: SessionState,
}

impl AuthSession {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(EXCHANGE_TIMEOUT)
                .build()
                .unwrap_or_default(),
            client_id: config.strava_client_id.clone(),
            client_secret: config.strava_client_secret.clone(),
            redirect_uri: config.callback_url(),
            token_url: STRAVA_TOKEN_URL.to_string(),
            authorize_url: STRAVA_AUTHORIZE_URL.to_string(),
            state: SessionState::Unauthenticated,
        }
    }

    /// Point the session at different OAuth endpoints (tests).
    pub fn with_endpoints(mut self, authorize_url: &str, token_url: &str) -> Self {
        self.authorize_url = authorize_url.to_string();
        self.token_url = token_url.to_string();
        self
    }

    /// Record a fresh CSRF nonce and return the authorization URL embedding
    /// it. The session enters `AuthorizationPending`.
    pub fn begin_authorization(&mut self) -> Result<String, AppError> {
        let mut bytes = [0u8; 16];
        SystemRandom::new()
            .fill(&mut bytes)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("CSRF nonce generation failed")))?;
        let nonce = URL_SAFE_NO_PAD.encode(bytes);

        let url = format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}",
            self.authorize_url,
            self.client_id,
            urlencoding::encode(&self.redirect_uri),
            OAUTH_SCOPE,
            nonce
        );

        self.state = SessionState::AuthorizationPending { nonce };
        Ok(url)
    }

    /// Validate the callback and exchange the authorization code for an
    /// access token.
    ///
    /// On `StateMismatch`, `MissingCode` and `TokenExchange` failures the
    /// session state is left untouched, so the pending authorization can be
    /// retried.
    pub async fn complete_authorization(
        &mut self,
        received_state: &str,
        code: Option<&str>,
    ) -> Result<(), AppError> {
        match &self.state {
            SessionState::AuthorizationPending { nonce } if nonce.as_str() == received_state => {}
            _ => return Err(AppError::StateMismatch),
        }

        let code = match code {
            Some(c) if !c.is_empty() => c,
            _ => return Err(AppError::MissingCode),
        };

        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AppError::TokenExchange(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Strava token exchange failed");
            return Err(AppError::TokenExchange(format!("HTTP {}", status)));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::TokenExchange(format!("could not parse response: {}", e)))?;

        let expires_at = DateTime::from_timestamp(token.expires_at, 0).unwrap_or_default();
        tracing::info!(expires_at = %expires_at, "OAuth token exchange successful");

        self.state = SessionState::Authenticated {
            access_token: token.access_token,
            expires_at,
        };
        Ok(())
    }

    /// True only when authenticated with an unexpired token.
    pub fn is_valid(&self) -> bool {
        match &self.state {
            SessionState::Authenticated { expires_at, .. } => Utc::now() < *expires_at,
            _ => false,
        }
    }

    /// The bearer token for remote calls, or `Unauthenticated`.
    pub fn access_token(&self) -> Result<String, AppError> {
        match &self.state {
            SessionState::Authenticated {
                access_token,
                expires_at,
            } if Utc::now() < *expires_at => Ok(access_token.clone()),
            _ => Err(AppError::Unauthenticated),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }
}

/// Token exchange response from Strava.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn test_session() -> AuthSession {
        AuthSession::new(&Config::default())
    }

    fn authenticated(expires_at: DateTime<Utc>) -> AuthSession {
        let mut session = test_session();
        session.state = SessionState::Authenticated {
            access_token: "token".to_string(),
            expires_at,
        };
        session
    }

    #[test]
    fn test_begin_authorization_embeds_nonce_and_scope() {
        let mut session = test_session();
        let url = session.begin_authorization().unwrap();

        let nonce = match session.state() {
            SessionState::AuthorizationPending { nonce } => nonce.clone(),
            other => panic!("expected pending state, got {:?}", other),
        };

        assert!(url.starts_with("https://www.strava.com/oauth/authorize?"));
        assert!(url.contains("scope=activity:read"));
        assert!(url.contains(&format!("state={}", nonce)));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8888%2Fcallback"));
    }

    #[test]
    fn test_nonce_is_fresh_per_authorization() {
        let mut session = test_session();
        let first = session.begin_authorization().unwrap();
        let second = session.begin_authorization().unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_state_mismatch_leaves_session_pending() {
        let mut session = test_session();
        session.begin_authorization().unwrap();
        let pending = session.state().clone();

        let err = session
            .complete_authorization("wrong-state", Some("code"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::StateMismatch));
        assert_eq!(session.state(), &pending);
        assert!(!session.is_valid());
    }

    #[tokio::test]
    async fn test_callback_without_pending_authorization_is_rejected() {
        let mut session = test_session();
        let err = session
            .complete_authorization("anything", Some("code"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::StateMismatch));
    }

    #[tokio::test]
    async fn test_missing_code_is_rejected() {
        let mut session = test_session();
        session.begin_authorization().unwrap();
        let nonce = match session.state() {
            SessionState::AuthorizationPending { nonce } => nonce.clone(),
            _ => unreachable!(),
        };

        let err = session
            .complete_authorization(&nonce, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MissingCode));

        let err = session
            .complete_authorization(&nonce, Some(""))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MissingCode));
    }

    #[test]
    fn test_expired_token_is_invalid() {
        let expired = authenticated(Utc::now() - Duration::minutes(1));
        assert!(!expired.is_valid());
        assert!(matches!(
            expired.access_token(),
            Err(AppError::Unauthenticated)
        ));

        let live = authenticated(Utc::now() + Duration::hours(1));
        assert!(live.is_valid());
        assert_eq!(live.access_token().unwrap(), "token");
    }
}
