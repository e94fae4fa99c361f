//! # Scoped storage implementations
//!
//! Two `KeyValueStore` implementations back the mock layer: a file-backed
//! store for real devices (one JSON document per key, survives restarts,
//! scoped per-device) and an in-memory store for tests.

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use wf_core::error::{ApiError, Result};
use wf_core::traits::KeyValueStore;

/// File-backed store: `<dir>/<key>.json` per key.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Keys come from a fixed internal set, but a stray separator would
    /// escape the scope directory, so reject anything non-alphanumeric.
    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(ApiError::Internal(format!("bad storage key: {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let path = self.path_for(key)?;
        match fs::read(&path).await {
            Ok(bytes) => {
                let value = serde_json::from_slice(&bytes).map_err(|e| {
                    ApiError::Internal(format!("corrupt storage file {}: {e}", path.display()))
                })?;
                Ok(Some(value))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| io_error(parent, e))?;
        }
        let bytes = serde_json::to_vec(&value)?;
        fs::write(&path, bytes).await.map_err(|e| io_error(&path, e))
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            // Removing an absent key is a no-op, matching delete semantics
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&path, e)),
        }
    }
}

fn io_error(path: &Path, e: std::io::Error) -> ApiError {
    ApiError::Internal(format!("storage I/O at {}: {e}", path.display()))
}

/// In-memory store for tests and throwaway clients.
#[derive(Default)]
pub struct MemoryStore {
    map: DashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.map.get(key).map(|v| v.clone()))
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.map.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.map.remove(key);
        Ok(())
    }
}
