// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity collection service.
//!
//! Handles the core workflow:
//! 1. Fetch the athlete profile and persist it
//! 2. Fetch and geo-filter activity summaries
//! 3. Per activity: fetch dual stream, persist raw, extract waypoints,
//!    persist the derived collection
//! 4. Report which activities succeeded and which failed
//!
//! A failure while processing one activity is recorded and the batch moves
//! on; only profile and summary-list failures abort the whole run.

use crate::error::{AppError, Result};
use crate::models::{ActivitySummary, AthleteProfile, BoundingBox, WaypointCollection};
use crate::services::StravaClient;
use crate::storage::{collections, BlobStore};
use serde::Serialize;

/// Drives the collect batch and the map read path.
#[derive(Clone)]
pub struct SyncService {
    client: StravaClient,
    store: BlobStore,
    bounds: BoundingBox,
}

/// Aggregate outcome of one collect run.
#[derive(Debug, Serialize)]
pub struct SyncReport {
    pub athlete_id: u64,
    /// Activity ids fully fetched, extracted and persisted, in batch order
    pub collected: Vec<u64>,
    /// Activities that failed at any per-activity step
    pub failed: Vec<SyncFailure>,
}

/// One activity that could not be collected.
#[derive(Debug, Serialize)]
pub struct SyncFailure {
    pub activity_id: u64,
    pub name: String,
    pub error: String,
}

impl SyncService {
    pub fn new(client: StravaClient, store: BlobStore, bounds: BoundingBox) -> Self {
        Self {
            client,
            store,
            bounds,
        }
    }

    /// Fetch the athlete profile and persist it under `athletes/{id}`.
    pub async fn fetch_and_store_profile(&self, access_token: &str) -> Result<AthleteProfile> {
        let profile = self.client.get_athlete(access_token).await?;
        let blob = serde_json::to_vec(&profile)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("could not encode profile: {}", e)))?;
        self.store
            .put(collections::ATHLETES, &profile.key(), &blob)
            .await?;
        Ok(profile)
    }

    /// Run the full collect batch.
    pub async fn collect(&self, access_token: &str) -> Result<SyncReport> {
        let profile = self.fetch_and_store_profile(access_token).await?;

        let list = self.client.list_activities(access_token, &self.bounds).await?;
        tracing::info!(
            athlete_id = profile.id,
            activities = list.summaries.len(),
            "Collecting activities"
        );

        let mut report = SyncReport {
            athlete_id: profile.id,
            collected: Vec::new(),
            failed: Vec::new(),
        };

        for summary in &list.summaries {
            match self.process_activity(access_token, summary).await {
                Ok(()) => {
                    tracing::info!(activity_id = summary.id, name = %summary.name, "Activity collected");
                    report.collected.push(summary.id);
                }
                Err(e) => {
                    tracing::warn!(
                        activity_id = summary.id,
                        name = %summary.name,
                        error = %e,
                        "Activity failed, continuing batch"
                    );
                    report.failed.push(SyncFailure {
                        activity_id: summary.id,
                        name: summary.name.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            athlete_id = report.athlete_id,
            collected = report.collected.len(),
            failed = report.failed.len(),
            "Collect run finished"
        );
        Ok(report)
    }

    /// Fetch, persist and extract one activity. Any error here is a
    /// per-activity failure for the caller to record.
    async fn process_activity(&self, access_token: &str, summary: &ActivitySummary) -> Result<()> {
        let stream = self
            .client
            .get_activity_streams(access_token, summary.id)
            .await?;
        let key = summary.id.to_string();

        let raw = serde_json::to_vec(&stream)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("could not encode stream: {}", e)))?;
        self.store.put(collections::RIDES, &key, &raw).await?;

        let waypoints = WaypointCollection::from_streams(std::slice::from_ref(&stream))?;
        let derived = serde_json::to_vec(&waypoints).map_err(|e| {
            AppError::Internal(anyhow::anyhow!("could not encode waypoints: {}", e))
        })?;
        self.store.put(collections::MAPS, &key, &derived).await?;

        Ok(())
    }

    /// Merge every persisted waypoint collection for map rendering.
    ///
    /// A blob that cannot be read or parsed is skipped with a warning; one
    /// bad ride must not take the map down.
    pub async fn map_waypoints(&self) -> Result<WaypointCollection> {
        let mut all = WaypointCollection::default();

        for key in self.store.list_keys(collections::MAPS).await? {
            let blob = match self.store.get(collections::MAPS, &key).await {
                Ok(Some(blob)) => blob,
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Could not read map blob, skipping");
                    continue;
                }
            };

            match WaypointCollection::from_json(&blob) {
                Ok(collection) => all.append(collection),
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Malformed map blob, skipping");
                }
            }
        }

        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Waypoint;

    fn memory_sync() -> SyncService {
        SyncService::new(
            StravaClient::new(),
            BlobStore::in_memory(),
            BoundingBox::default(),
        )
    }

    #[tokio::test]
    async fn test_map_waypoints_merges_all_collections() {
        let sync = memory_sync();

        let first = WaypointCollection {
            data: vec![Waypoint { lat: 1.0, lng: 2.0 }],
        };
        let second = WaypointCollection {
            data: vec![Waypoint { lat: 3.0, lng: 4.0 }],
        };
        sync.store
            .put(collections::MAPS, "1", &serde_json::to_vec(&first).unwrap())
            .await
            .unwrap();
        sync.store
            .put(collections::MAPS, "2", &serde_json::to_vec(&second).unwrap())
            .await
            .unwrap();

        let merged = sync.map_waypoints().await.unwrap();
        assert_eq!(merged.len(), 2);
    }

    #[tokio::test]
    async fn test_map_waypoints_skips_malformed_blob() {
        let sync = memory_sync();

        let good = WaypointCollection {
            data: vec![Waypoint { lat: 1.0, lng: 2.0 }],
        };
        sync.store
            .put(collections::MAPS, "1", &serde_json::to_vec(&good).unwrap())
            .await
            .unwrap();
        sync.store
            .put(collections::MAPS, "2", b"{not json")
            .await
            .unwrap();

        let merged = sync.map_waypoints().await.unwrap();
        assert_eq!(merged.data, good.data);
    }

    #[tokio::test]
    async fn test_map_waypoints_empty_store() {
        let sync = memory_sync();
        assert!(sync.map_waypoints().await.unwrap().is_empty());
    }
}
