//! Application configuration loaded from environment variables.
//!
//! Everything has a development-friendly default except the Strava OAuth
//! credentials, which must be present.

use crate::models::BoundingBox;
use std::env;
use std::path::PathBuf;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Strava OAuth client ID (public)
    pub strava_client_id: String,
    /// Strava OAuth client secret
    pub strava_client_secret: String,
    /// Public base URL of this service, used to build the OAuth callback
    pub server_url: String,
    /// Server port
    pub port: u16,
    /// Root directory of the blob store
    pub storage_root: PathBuf,
    /// Region activities must end in to be collected
    pub bounds: BoundingBox,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            strava_client_id: "test_client_id".to_string(),
            strava_client_secret: "test_secret".to_string(),
            server_url: "http://localhost:8888".to_string(),
            port: 8888,
            storage_root: PathBuf::from("data"),
            bounds: BoundingBox::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "8888".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        Ok(Self {
            strava_client_id: env::var("STRAVA_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_ID"))?,
            strava_client_secret: env::var("STRAVA_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_SECRET"))?,
            server_url: env::var("SERVER_URL")
                .unwrap_or_else(|_| format!("http://localhost:{}", port)),
            port,
            storage_root: env::var("STORAGE_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            bounds: bounds_from_env()?,
        })
    }

    /// OAuth redirect target Strava sends the browser back to.
    pub fn callback_url(&self) -> String {
        format!("{}/callback", self.server_url.trim_end_matches('/'))
    }
}

/// Read the collection region from BOUNDS_* variables, defaulting each edge
/// to the Sofia box.
fn bounds_from_env() -> Result<BoundingBox, ConfigError> {
    let default = BoundingBox::default();

    let edge = |name: &'static str, fallback: f64| -> Result<f64, ConfigError> {
        match env::var(name) {
            Ok(v) => v.parse().map_err(|_| ConfigError::Invalid(name)),
            Err(_) => Ok(fallback),
        }
    };

    Ok(BoundingBox {
        south: edge("BOUNDS_SOUTH", default.south)?,
        west: edge("BOUNDS_WEST", default.west)?,
        north: edge("BOUNDS_NORTH", default.north)?,
        east: edge("BOUNDS_EAST", default.east)?,
    })
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("STRAVA_CLIENT_ID", "test_id");
        env::set_var("STRAVA_CLIENT_SECRET", "test_secret");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.strava_client_id, "test_id");
        assert_eq!(config.strava_client_secret, "test_secret");
        assert_eq!(config.port, 8888);
        assert_eq!(config.callback_url(), "http://localhost:8888/callback");
    }

    #[test]
    fn test_default_bounds_are_sofia() {
        let config = Config::default();
        assert_eq!(config.bounds.south, 42.656182);
        assert_eq!(config.bounds.east, 23.572252);
    }
}
