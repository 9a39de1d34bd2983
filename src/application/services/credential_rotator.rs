//! Rotating pool of bot tokens.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::infrastructure::persistence::StateStore;

const STORE_KEY: &str = "credentials";

#[derive(Debug, Default, Serialize, Deserialize)]
struct RotatorState {
    #[serde(default)]
    primary: Option<String>,
    #[serde(default)]
    pool: Vec<String>,
    /// Index of the next pool entry to hand out.
    #[serde(default)]
    cursor: usize,
}

/// Hands out bot tokens round-robin so that no single token absorbs the
/// whole polling load.
///
/// The pool is the rotation set; the primary is the fallback used whenever
/// the pool is empty. With a populated pool every token is returned exactly
/// once per full rotation.
pub struct CredentialRotator {
    store: Arc<dyn StateStore>,
    inner: Mutex<RotatorState>,
}

impl CredentialRotator {
    /// Loads the rotator, seeding the primary token from `seed_primary` when
    /// the persisted document has none.
    pub async fn load(store: Arc<dyn StateStore>, seed_primary: Option<String>) -> Self {
        let mut state = match store.load(STORE_KEY).await {
            Ok(Some(doc)) => match serde_json::from_value::<RotatorState>(doc) {
                Ok(state) => state,
                Err(e) => {
                    warn!(error = %e, "credential document malformed, starting empty");
                    RotatorState::default()
                }
            },
            Ok(None) => RotatorState::default(),
            Err(e) => {
                warn!(error = %e, "failed to load credentials, starting empty");
                RotatorState::default()
            }
        };

        let mut seeded = false;
        if state.primary.is_none() && seed_primary.is_some() {
            state.primary = seed_primary;
            seeded = true;
        }
        if !state.pool.is_empty() {
            state.cursor %= state.pool.len();
        } else {
            state.cursor = 0;
        }

        info!(
            pool_size = state.pool.len(),
            has_primary = state.primary.is_some(),
            "credential rotator loaded"
        );

        let rotator = Self {
            store,
            inner: Mutex::new(state),
        };

        if seeded {
            let state = rotator.inner.lock().await;
            rotator.persist(&state).await;
        }

        rotator
    }

    /// Returns the next token and advances the cursor.
    ///
    /// Empty pool falls back to the primary; no primary either means the
    /// caller proceeds unauthenticated.
    pub async fn next_token(&self) -> Option<String> {
        let mut state = self.inner.lock().await;

        if state.pool.is_empty() {
            return state.primary.clone();
        }

        let token = state.pool[state.cursor].clone();
        state.cursor = (state.cursor + 1) % state.pool.len();
        self.persist(&state).await;
        Some(token)
    }

    /// Adds a token to the rotation pool. Duplicates are ignored.
    pub async fn add_token(&self, token: &str) -> bool {
        let token = token.trim();
        if token.is_empty() {
            return false;
        }

        let mut state = self.inner.lock().await;
        if state.pool.iter().any(|t| t == token) {
            return false;
        }

        state.pool.push(token.to_string());
        self.persist(&state).await;
        info!(pool_size = state.pool.len(), "token added to rotation pool");
        true
    }

    /// Removes a token from the pool or the primary slot.
    ///
    /// Removing the primary promotes the next pool entry into its place, so
    /// a configured installation never silently loses its fallback while the
    /// pool still has tokens.
    pub async fn remove_token(&self, token: &str) -> bool {
        let mut state = self.inner.lock().await;

        if let Some(idx) = state.pool.iter().position(|t| t == token) {
            state.pool.remove(idx);
            if idx < state.cursor {
                state.cursor -= 1;
            }
            if state.pool.is_empty() {
                state.cursor = 0;
            } else {
                state.cursor %= state.pool.len();
            }
            self.persist(&state).await;
            info!(pool_size = state.pool.len(), "token removed from rotation pool");
            return true;
        }

        if state.primary.as_deref() == Some(token) {
            state.primary = if state.pool.is_empty() {
                None
            } else {
                let promoted = state.pool.remove(0);
                if state.cursor > 0 {
                    state.cursor -= 1;
                }
                if state.pool.is_empty() {
                    state.cursor = 0;
                } else {
                    state.cursor %= state.pool.len();
                }
                Some(promoted)
            };
            self.persist(&state).await;
            info!("primary token removed");
            return true;
        }

        false
    }

    /// Number of tokens in the rotation pool (the primary is not counted).
    pub async fn pool_size(&self) -> usize {
        self.inner.lock().await.pool.len()
    }

    pub async fn has_primary(&self) -> bool {
        self.inner.lock().await.primary.is_some()
    }

    async fn persist(&self, state: &RotatorState) {
        let document = match serde_json::to_value(state) {
            Ok(doc) => doc,
            Err(e) => {
                warn!(error = %e, "failed to serialize credential state");
                return;
            }
        };

        if let Err(e) = self.store.save(STORE_KEY, document).await {
            warn!(error = %e, "failed to persist credentials, in-memory state kept");
        }
    }
}
