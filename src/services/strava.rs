// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client for fetching athlete data and activity streams.
//!
//! Handles:
//! - Athlete profile fetching
//! - Activity summary listing with geographic filtering
//! - Per-activity dual stream fetching (moving + latlng)
//!
//! Callers obtain the bearer token from [`AuthSession`](crate::services::AuthSession)
//! first, so an invalid session surfaces as `Unauthenticated` before any
//! request is made.

use crate::error::AppError;
use crate::models::{ActivityStream, AthleteProfile, BoundingBox, SummaryList};

/// Bounded deadline for each remote call.
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for StravaClient {
    fn default() -> Self {
        Self::new()
    }
}

impl StravaClient {
    pub fn new() -> Self {
        Self::with_base_url("https://www.strava.com/api/v3")
    }

    /// Create a client against a different API root (tests).
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Get the authenticated athlete's profile.
    pub async fn get_athlete(&self, access_token: &str) -> Result<AthleteProfile, AppError> {
        let url = format!("{}/athlete", self.base_url);
        let body = self.get_text(&url, access_token, &[]).await?;
        serde_json::from_str(&body)
            .map_err(|e| AppError::Parse(format!("could not parse athlete data: {}", e)))
    }

    /// List the athlete's activity summaries, keeping only those that end
    /// inside `bounds`, in the order Strava returned them.
    pub async fn list_activities(
        &self,
        access_token: &str,
        bounds: &BoundingBox,
    ) -> Result<SummaryList, AppError> {
        let url = format!("{}/athlete/activities", self.base_url);
        let body = self.get_text(&url, access_token, &[]).await?;

        let mut list = SummaryList::from_json(&body)?;
        let fetched = list.summaries.len();
        list.retain_in_bounds(bounds);
        tracing::debug!(
            fetched,
            retained = list.summaries.len(),
            "Geo-filtered activity summaries"
        );
        Ok(list)
    }

    /// Fetch the moving and latlng series of one activity and combine them
    /// into a single stream set, moving first.
    ///
    /// The two series are fetched independently; nothing here checks that
    /// they are index-aligned - the waypoint extractor validates that.
    pub async fn get_activity_streams(
        &self,
        access_token: &str,
        activity_id: u64,
    ) -> Result<ActivityStream, AppError> {
        let url = format!("{}/activities/{}/streams", self.base_url, activity_id);

        let moving_body = self
            .get_text(&url, access_token, &[("keys", "moving"), ("key_by_type", "")])
            .await?;
        let latlng_body = self
            .get_text(&url, access_token, &[("keys", "latlng"), ("key_by_type", "")])
            .await?;

        let moving = ActivityStream::from_json(&moving_body)?;
        let latlng = ActivityStream::from_json(&latlng_body)?;
        Ok(moving.merge(latlng))
    }

    /// Generic GET returning the raw body, with status checking.
    async fn get_text(
        &self,
        url: &str,
        access_token: &str,
        query: &[(&str, &str)],
    ) -> Result<String, AppError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Fetch(format!("HTTP {}: {}", status, body)));
        }

        response
            .text()
            .await
            .map_err(|e| AppError::Fetch(e.to_string()))
    }
}
