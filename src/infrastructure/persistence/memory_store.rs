//! In-process document store for tests and ephemeral runs.

use super::store::StateStore;
use crate::error::AppError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

/// A [`StateStore`] that keeps documents in a process-local map.
///
/// Nothing survives a restart. Used when no data directory is configured
/// (`--ephemeral`) and throughout the test suite, where it doubles as a way
/// to verify what services persisted.
#[derive(Default)]
pub struct MemoryStore {
    docs: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        debug!("Using MemoryStore (state will not survive a restart)");
        Self::default()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn load(&self, key: &str) -> Result<Option<Value>, AppError> {
        Ok(self.docs.lock().await.get(key).cloned())
    }

    async fn save(&self, key: &str, document: Value) -> Result<(), AppError> {
        self.docs.lock().await.insert(key.to_string(), document);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_round_trip() {
        let store = MemoryStore::new();
        store.save("k", json!({ "a": 1 })).await.unwrap();
        assert_eq!(store.load("k").await.unwrap(), Some(json!({ "a": 1 })));
        assert!(store.load("other").await.unwrap().is_none());
    }
}
