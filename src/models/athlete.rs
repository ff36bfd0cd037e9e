//! Athlete profile model for storage and API.

use serde::{Deserialize, Serialize};

/// Athlete profile as returned by `GET /athlete` and persisted under
/// `athletes/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AthleteProfile {
    /// Strava athlete ID (also used as blob key)
    pub id: u64,
    /// First name
    pub firstname: String,
    /// Last name
    pub lastname: String,
    /// Sex (may be withheld)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
    /// Profile picture URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_medium: Option<String>,
}

impl AthleteProfile {
    /// Blob key this profile is stored under.
    pub fn key(&self) -> String {
        self.id.to_string()
    }
}
