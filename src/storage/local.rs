//! Local filesystem snapshot store.
//!
//! Writes go to a temporary sibling and are renamed over the target, so a
//! crash mid-write leaves the previous snapshot intact.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::Snapshot;
use crate::storage::{StateStore, migrate};

/// JSON file snapshot store.
#[derive(Debug, Clone)]
pub struct LocalStateStore {
    path: PathBuf,
}

impl LocalStateStore {
    /// Create a store backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.ensure_dir().await?;

        let tmp = self.path.with_extension("json.tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Decode raw bytes, upgrading older schemas first.
    fn decode(bytes: &[u8]) -> Result<Snapshot> {
        let mut object = match serde_json::from_slice::<Value>(bytes)? {
            Value::Object(map) => map,
            other => {
                return Err(AppError::validation(format!(
                    "snapshot root must be an object, found {}",
                    json_kind(&other)
                )));
            }
        };

        migrate::upgrade(&mut object);
        Ok(serde_json::from_value(Value::Object(object))?)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[async_trait]
impl StateStore for LocalStateStore {
    async fn load(&self) -> Snapshot {
        let bytes = match self.read_bytes().await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                log::info!(
                    "No snapshot at {}; starting fresh",
                    self.path.display()
                );
                return Snapshot::default();
            }
            Err(e) => {
                log::warn!(
                    "Cannot read snapshot {}: {}; starting fresh",
                    self.path.display(),
                    e
                );
                return Snapshot::default();
            }
        };

        match Self::decode(&bytes) {
            Ok(snapshot) => {
                log::debug!(
                    "Loaded snapshot with {} tracked drops",
                    snapshot.drops.len()
                );
                snapshot
            }
            Err(e) => {
                log::warn!(
                    "Snapshot {} is corrupt ({}); starting fresh",
                    self.path.display(),
                    e
                );
                Snapshot::default()
            }
        }
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(snapshot)?;
        self.write_bytes(&bytes).await?;
        log::info!("Snapshot saved to {}", self.path.display());
        Ok(())
    }
}
