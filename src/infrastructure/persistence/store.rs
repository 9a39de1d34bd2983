//! Key-value persistence boundary for service state documents.

use crate::error::AppError;
use async_trait::async_trait;
use serde_json::Value;

/// JSON-document store for service state.
///
/// Each stateful service (link store, source registry, credential rotator)
/// persists one document under its own key. Services load on start and save
/// after every mutation; a failed save is logged and surfaced as a non-fatal
/// warning, the in-memory state stays authoritative for the process
/// lifetime.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::JsonFileStore`] - one file per key
/// - [`crate::infrastructure::persistence::MemoryStore`] - in-process map for
///   tests and ephemeral runs
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Loads the document stored under `key`.
    ///
    /// Returns `Ok(None)` when no document exists yet.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on read or parse failures.
    async fn load(&self, key: &str) -> Result<Option<Value>, AppError>;

    /// Atomically replaces the document stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on write failures.
    async fn save(&self, key: &str, document: Value) -> Result<(), AppError>;
}
