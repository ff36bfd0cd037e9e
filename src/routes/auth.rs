// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava OAuth authentication routes.

use axum::{
    extract::{Query, State},
    response::Redirect,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::Result;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", get(login))
        .route("/callback", get(callback))
}

/// Start OAuth flow - redirect to Strava authorization.
async fn login(State(state): State<Arc<AppState>>) -> Result<Redirect> {
    let auth_url = state.session.lock().await.begin_authorization()?;

    tracing::info!("Starting OAuth flow, redirecting to Strava");
    Ok(Redirect::temporary(&auth_url))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    state: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth callback - validate state, exchange code for a token.
async fn callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Result<Redirect> {
    if let Some(error) = &params.error {
        // A denied authorization comes back with no code; the session
        // rejects it below.
        tracing::warn!(error = %error, "OAuth error from Strava");
    }

    // Hold the lock across the whole check-then-exchange sequence: the
    // exchange is a non-idempotent side effect and must not race another
    // authorization attempt.
    let mut session = state.session.lock().await;
    session
        .complete_authorization(&params.state, params.code.as_deref())
        .await?;

    tracing::info!("OAuth successful, session authenticated");
    Ok(Redirect::temporary("/"))
}
