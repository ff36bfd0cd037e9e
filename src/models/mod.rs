// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod athlete;
pub mod waypoint;

pub use activity::{ActivityStream, ActivitySummary, LatLng, Stream, SummaryList};
pub use athlete::AthleteProfile;
pub use waypoint::{BoundingBox, Waypoint, WaypointCollection};
