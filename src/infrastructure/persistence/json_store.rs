//! File-backed JSON document store.

use super::store::StateStore;
use crate::error::AppError;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

/// Stores one pretty-printed JSON file per key under a data directory.
///
/// Writes go to a temp file first and are moved into place with a rename, so
/// a crash mid-write never leaves a truncated document behind.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Opens (creating if needed) the data directory.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] when the directory cannot be created.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, AppError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|e| {
            AppError::persistence(
                "Failed to create data directory",
                json!({ "dir": dir.display().to_string(), "reason": e.to_string() }),
            )
        })?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl StateStore for JsonFileStore {
    async fn load(&self, key: &str) -> Result<Option<Value>, AppError> {
        let path = self.path_for(key);

        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AppError::persistence(
                    "Failed to read state document",
                    json!({ "path": path.display().to_string(), "reason": e.to_string() }),
                ));
            }
        };

        let document = serde_json::from_str(&raw).map_err(|e| {
            AppError::persistence(
                "State document is not valid JSON",
                json!({ "path": path.display().to_string(), "reason": e.to_string() }),
            )
        })?;

        Ok(Some(document))
    }

    async fn save(&self, key: &str, document: Value) -> Result<(), AppError> {
        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));

        let bytes = serde_json::to_vec_pretty(&document).map_err(|e| {
            AppError::persistence(
                "Failed to serialize state document",
                json!({ "key": key, "reason": e.to_string() }),
            )
        })?;

        tokio::fs::write(&tmp, &bytes).await.map_err(|e| {
            AppError::persistence(
                "Failed to write state document",
                json!({ "path": tmp.display().to_string(), "reason": e.to_string() }),
            )
        })?;

        tokio::fs::rename(&tmp, &path).await.map_err(|e| {
            AppError::persistence(
                "Failed to move state document into place",
                json!({ "path": path.display().to_string(), "reason": e.to_string() }),
            )
        })?;

        Ok(())
    }
}
