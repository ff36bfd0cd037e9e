// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes: athlete profile, activity collection, map data.

use crate::error::Result;
use crate::models::WaypointCollection;
use crate::services::SyncReport;
use crate::storage::collections;
use crate::AppState;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/athlete", get(get_athlete))
        .route("/collect", get(collect_activities))
        .route("/places", get(get_places))
}

/// Get the athlete profile, from the store when this process has already
/// fetched it, from Strava otherwise.
async fn get_athlete(State(state): State<Arc<AppState>>) -> Result<Response> {
    if let Some(id) = state.athlete_id.lock().await.clone() {
        if let Some(blob) = state.store.get(collections::ATHLETES, &id).await? {
            return Ok(stored_json(blob));
        }
    }

    let token = state.session.lock().await.access_token()?;
    let profile = state.sync.fetch_and_store_profile(&token).await?;
    *state.athlete_id.lock().await = Some(profile.key());

    Ok(Json(profile).into_response())
}

/// Run the collect batch and return the aggregate report.
async fn collect_activities(State(state): State<Arc<AppState>>) -> Result<Json<SyncReport>> {
    let token = state.session.lock().await.access_token()?;
    let report = state.sync.collect(&token).await?;

    // Remember the athlete for the profile fast path.
    *state.athlete_id.lock().await = Some(report.athlete_id.to_string());

    Ok(Json(report))
}

/// All collected waypoints, merged for map rendering.
async fn get_places(State(state): State<Arc<AppState>>) -> Result<Json<WaypointCollection>> {
    Ok(Json(state.sync.map_waypoints().await?))
}

/// Serve a stored blob verbatim; it is already JSON.
fn stored_json(blob: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], blob).into_response()
}
