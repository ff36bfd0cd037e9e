// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Blob store with idempotent put/get/list over named collections.
//!
//! Three collections hold JSON blobs keyed by stringified numeric ids:
//! - `rides` - raw activity stream sets
//! - `athletes` - athlete profiles
//! - `maps` - derived waypoint collections
//!
//! The filesystem backend maps a collection to a directory and a key to a
//! file. Tests use the in-memory backend.

use crate::error::AppError;
use dashmap::DashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Collection names as constants.
pub mod collections {
    pub const RIDES: &str = "rides";
    pub const ATHLETES: &str = "athletes";
    pub const MAPS: &str = "maps";
}

/// Blob store client.
#[derive(Clone)]
pub struct BlobStore {
    backend: Backend,
}

#[derive(Clone)]
enum Backend {
    Fs { root: PathBuf },
    Memory(Arc<DashMap<(String, String), Vec<u8>>>),
}

impl BlobStore {
    /// Open a filesystem-backed store rooted at `root`.
    ///
    /// The root (and each collection under it) is created on first write.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self {
            backend: Backend::Fs { root: root.into() },
        }
    }

    /// Create an in-memory store for testing.
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(DashMap::new())),
        }
    }

    /// Write a blob, overwriting any existing content under the same key.
    ///
    /// Provisioning is idempotent: a collection that already exists is not
    /// an error.
    pub async fn put(&self, collection: &str, key: &str, bytes: &[u8]) -> Result<(), AppError> {
        validate_key(key)?;
        match &self.backend {
            Backend::Fs { root } => {
                let dir = root.join(collection);
                tokio::fs::create_dir_all(&dir).await.map_err(|e| {
                    AppError::Persist(format!("could not create collection '{}': {}", collection, e))
                })?;
                tokio::fs::write(dir.join(key), bytes).await.map_err(|e| {
                    AppError::Persist(format!(
                        "could not write '{}/{}': {}",
                        collection, key, e
                    ))
                })
            }
            Backend::Memory(map) => {
                map.insert((collection.to_string(), key.to_string()), bytes.to_vec());
                Ok(())
            }
        }
    }

    /// Read a blob. Returns `None` (not an error) when the key is absent.
    pub async fn get(&self, collection: &str, key: &str) -> Result<Option<Vec<u8>>, AppError> {
        validate_key(key)?;
        match &self.backend {
            Backend::Fs { root } => {
                match tokio::fs::read(root.join(collection).join(key)).await {
                    Ok(bytes) => Ok(Some(bytes)),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                    Err(e) => Err(AppError::Persist(format!(
                        "could not read '{}/{}': {}",
                        collection, key, e
                    ))),
                }
            }
            Backend::Memory(map) => Ok(map
                .get(&(collection.to_string(), key.to_string()))
                .map(|entry| entry.value().clone())),
        }
    }

    /// Enumerate every key in a collection. A collection that has never been
    /// written to lists as empty.
    pub async fn list_keys(&self, collection: &str) -> Result<Vec<String>, AppError> {
        match &self.backend {
            Backend::Fs { root } => {
                let mut entries = match tokio::fs::read_dir(root.join(collection)).await {
                    Ok(entries) => entries,
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
                    Err(e) => {
                        return Err(AppError::Persist(format!(
                            "could not list collection '{}': {}",
                            collection, e
                        )))
                    }
                };

                let mut keys = Vec::new();
                loop {
                    match entries.next_entry().await {
                        Ok(Some(entry)) => {
                            if let Some(name) = entry.file_name().to_str() {
                                keys.push(name.to_string());
                            }
                        }
                        Ok(None) => break,
                        Err(e) => {
                            return Err(AppError::Persist(format!(
                                "could not list collection '{}': {}",
                                collection, e
                            )))
                        }
                    }
                }
                Ok(keys)
            }
            Backend::Memory(map) => Ok(map
                .iter()
                .filter(|entry| entry.key().0 == collection)
                .map(|entry| entry.key().1.clone())
                .collect()),
        }
    }
}

/// Keys are stringified numeric ids; anything path-like is refused.
fn validate_key(key: &str) -> Result<(), AppError> {
    if key.is_empty() || key.contains('/') || key.contains('\\') || key.contains("..") {
        return Err(AppError::Persist(format!("invalid blob key '{}'", key)));
    }
    Ok(())
}
