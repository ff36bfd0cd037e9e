// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod auth;
pub mod strava;
pub mod sync;

pub use auth::AuthSession;
pub use strava::StravaClient;
pub use sync::{SyncFailure, SyncReport, SyncService};
