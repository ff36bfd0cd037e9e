// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Waypoints derived from activity streams, and the geographic filter that
//! decides which activities contribute them.

use crate::error::AppError;
use crate::models::{ActivityStream, LatLng};
use serde::{Deserialize, Serialize};

/// A single coordinate sampled while the athlete was moving.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub lat: f64,
    pub lng: f64,
}

/// Ordered waypoint sequence, persisted under `maps/{activity_id}` as
/// `{"data": [...]}`. Insertion order is preserved and nothing is deduplicated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaypointCollection {
    pub data: Vec<Waypoint>,
}

impl WaypointCollection {
    /// Extract waypoints from stream sets, in input order.
    ///
    /// For each set, every index where the moving series is true contributes
    /// the latlng sample at the same index. Both series must be present and
    /// index-aligned; a missing series or a length mismatch fails the whole
    /// set rather than reading past the shorter series.
    pub fn from_streams(streams: &[ActivityStream]) -> Result<Self, AppError> {
        let mut data = Vec::new();
        for stream in streams {
            let moving = stream
                .moving()
                .ok_or_else(|| AppError::Parse("stream set has no moving series".to_string()))?;
            let latlng = stream
                .latlng()
                .ok_or_else(|| AppError::Parse("stream set has no latlng series".to_string()))?;

            if moving.len() != latlng.len() {
                return Err(AppError::Parse(format!(
                    "series length mismatch: {} moving vs {} latlng",
                    moving.len(),
                    latlng.len()
                )));
            }

            for (flag, point) in moving.iter().zip(latlng) {
                if *flag {
                    data.push(Waypoint {
                        lat: point.lat,
                        lng: point.lng,
                    });
                }
            }
        }
        Ok(Self { data })
    }

    /// Parse a persisted collection blob.
    pub fn from_json(input: &[u8]) -> Result<Self, AppError> {
        serde_json::from_slice(input)
            .map_err(|e| AppError::Parse(format!("could not parse waypoint collection: {}", e)))
    }

    /// Append all waypoints of `other`, keeping their order.
    pub fn append(&mut self, other: WaypointCollection) {
        self.data.extend(other.data);
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Geographic region activities must *end* in to be collected.
///
/// All four comparisons are strict: a point exactly on an edge is outside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    pub fn contains(&self, p: &LatLng) -> bool {
        self.south < p.lat && p.lat < self.north && self.west < p.lng && p.lng < self.east
    }
}

impl Default for BoundingBox {
    /// The Sofia region this deployment collects.
    fn default() -> Self {
        Self {
            south: 42.656182,
            west: 23.102273,
            north: 42.753063,
            east: 23.572252,
        }
    }
}
