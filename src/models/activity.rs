// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava activity models: summaries and per-activity stream sets.
//!
//! Strava returns bare JSON arrays from its list endpoints; the persisted
//! blobs use wrapped objects (`{"summary-list": [...]}`, `{"streams": [...]}`).
//! The `from_json` constructors accept either form, writers always emit the
//! wrapped form.

use crate::error::AppError;
use crate::models::BoundingBox;
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair, `[lat, lng]` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<[f64; 2]> for LatLng {
    fn from(pair: [f64; 2]) -> Self {
        Self {
            lat: pair[0],
            lng: pair[1],
        }
    }
}

impl From<LatLng> for [f64; 2] {
    fn from(p: LatLng) -> Self {
        [p.lat, p.lng]
    }
}

/// Summary activity from `GET /athlete/activities`.
///
/// https://developers.strava.com/docs/reference/#api-models-SummaryActivity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivitySummary {
    pub id: u64,
    pub name: String,
    #[serde(rename = "start_latlng")]
    pub start: LatLng,
    #[serde(rename = "end_latlng")]
    pub end: LatLng,
}

/// Ordered list of activity summaries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryList {
    #[serde(rename = "summary-list")]
    pub summaries: Vec<ActivitySummary>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MaybeWrappedSummaries {
    Wrapped {
        #[serde(rename = "summary-list")]
        summaries: Vec<ActivitySummary>,
    },
    Bare(Vec<ActivitySummary>),
}

impl SummaryList {
    /// Parse from either the bare-array wire form or the wrapped blob form.
    pub fn from_json(input: &str) -> Result<Self, AppError> {
        let parsed: MaybeWrappedSummaries = serde_json::from_str(input)
            .map_err(|e| AppError::Parse(format!("could not parse activity list: {}", e)))?;
        let summaries = match parsed {
            MaybeWrappedSummaries::Wrapped { summaries } => summaries,
            MaybeWrappedSummaries::Bare(summaries) => summaries,
        };
        Ok(Self { summaries })
    }

    /// Keep only activities whose *end* coordinate lies inside `bounds`,
    /// preserving order.
    pub fn retain_in_bounds(&mut self, bounds: &BoundingBox) {
        self.summaries.retain(|s| bounds.contains(&s.end));
    }
}

/// One time series of an activity, tagged by its Strava stream type.
///
/// Stream set is one of {moving, latlng}
/// https://developers.strava.com/docs/reference/#api-models-StreamSet
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Stream {
    Moving {
        resolution: String,
        original_size: u64,
        data: Vec<bool>,
    },
    Latlng {
        resolution: String,
        original_size: u64,
        data: Vec<LatLng>,
    },
}

/// The stream set of one activity, persisted under `rides/{id}` as
/// `{"streams": [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityStream {
    pub streams: Vec<Stream>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MaybeWrappedStreams {
    Wrapped { streams: Vec<Stream> },
    Bare(Vec<Stream>),
}

impl ActivityStream {
    /// Parse from either the bare-array wire form or the wrapped blob form.
    pub fn from_json(input: &str) -> Result<Self, AppError> {
        let parsed: MaybeWrappedStreams = serde_json::from_str(input)
            .map_err(|e| AppError::Parse(format!("could not parse activity stream: {}", e)))?;
        let streams = match parsed {
            MaybeWrappedStreams::Wrapped { streams } => streams,
            MaybeWrappedStreams::Bare(streams) => streams,
        };
        Ok(Self { streams })
    }

    /// Combine two fetched stream sets into one.
    pub fn merge(self, other: ActivityStream) -> ActivityStream {
        ActivityStream {
            streams: self.streams.into_iter().chain(other.streams).collect(),
        }
    }

    /// The moving series, looked up by tag.
    pub fn moving(&self) -> Option<&[bool]> {
        self.streams.iter().find_map(|s| match s {
            Stream::Moving { data, .. } => Some(data.as_slice()),
            _ => None,
        })
    }

    /// The latlng series, looked up by tag.
    pub fn latlng(&self) -> Option<&[LatLng]> {
        self.streams.iter().find_map(|s| match s {
            Stream::Latlng { data, .. } => Some(data.as_slice()),
            _ => None,
        })
    }
}
