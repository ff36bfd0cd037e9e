// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod api;
pub mod auth;

use crate::AppState;
use axum::http::{Method, StatusCode};
use axum::response::Html;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}

/// Landing page: a login link until the session is authenticated, the
/// action links afterwards.
async fn home(State(state): State<Arc<AppState>>) -> (StatusCode, Html<&'static str>) {
    if !state.session.lock().await.is_valid() {
        return (
            StatusCode::UNAUTHORIZED,
            Html(r#"<html><body><a href="/login">Login with Strava</a></body></html>"#),
        );
    }

    (
        StatusCode::OK,
        Html(
            r#"<html><body>
            <a href="/athlete">get athlete data</a><br>
            <a href="/collect">collect activities</a><br>
            <a href="/places">places</a><br>
            <a href="/static/index.html">go to map</a>
            </body></html>"#,
        ),
    )
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // The map frontend may be served from anywhere; the read path is
    // GET-only and public.
    let cors = CorsLayer::new().allow_origin(Any).allow_methods([Method::GET]);

    Router::new()
        .route("/", get(home))
        .route("/health", get(health_check))
        .merge(auth::routes())
        .merge(api::routes())
        .nest_service("/static", ServeDir::new("web"))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
