// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Sofia-Tracker: collect Strava ride waypoints around Sofia
//!
//! This crate provides the backend for ingesting a single athlete's Strava
//! activities, filtering them to the Sofia region, and serving the derived
//! waypoints for map rendering.

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod storage;

use config::Config;
use services::{AuthSession, SyncService};
use storage::BlobStore;
use tokio::sync::Mutex;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: BlobStore,
    pub sync: SyncService,
    /// The one OAuth session gating all remote calls; every read and
    /// transition goes through this lock.
    pub session: Mutex<AuthSession>,
    /// Athlete id cached after the first successful fetch this process.
    pub athlete_id: Mutex<Option<String>>,
}
