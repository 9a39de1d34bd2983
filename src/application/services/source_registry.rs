//! Registry of monitored channels and websites.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{info, warn};
use url::Url;

use crate::domain::classify::DEFAULT_CATEGORY;
use crate::domain::normalize::normalize_channel_name;
use crate::error::AppError;
use crate::infrastructure::persistence::StateStore;

const STORE_KEY: &str = "sources";

/// Persisted document. Additive schema with defaults throughout.
#[derive(Debug, Default, Serialize, Deserialize)]
struct RegistryState {
    #[serde(default)]
    channels: Vec<String>,
    #[serde(default)]
    websites: Vec<String>,
    #[serde(default)]
    channel_categories: BTreeMap<String, String>,
    #[serde(default)]
    website_categories: BTreeMap<String, String>,
    /// Cumulative links attributed to each source.
    #[serde(default)]
    link_counts: BTreeMap<String, u64>,
    #[serde(default)]
    last_check: Option<DateTime<Utc>>,
}

/// The list of monitored channel and website sources, their categories, and
/// their cumulative link counters.
///
/// Identifiers are normalized before every uniqueness check, so `@name` and
/// `name` collide. Invalid identifiers are rejected without partial
/// mutation; each successful mutation is one atomic persisted write.
pub struct SourceRegistry {
    store: Arc<dyn StateStore>,
    inner: Mutex<RegistryState>,
}

impl SourceRegistry {
    /// Loads the registry, falling back to an empty one on a missing or
    /// unreadable document.
    pub async fn load(store: Arc<dyn StateStore>) -> Self {
        let state = match store.load(STORE_KEY).await {
            Ok(Some(doc)) => match serde_json::from_value::<RegistryState>(doc) {
                Ok(state) => state,
                Err(e) => {
                    warn!(error = %e, "source registry document malformed, starting empty");
                    RegistryState::default()
                }
            },
            Ok(None) => RegistryState::default(),
            Err(e) => {
                warn!(error = %e, "failed to load source registry, starting empty");
                RegistryState::default()
            }
        };

        info!(
            channels = state.channels.len(),
            websites = state.websites.len(),
            "source registry loaded"
        );

        Self {
            store,
            inner: Mutex::new(state),
        }
    }

    /// Adds a channel under `category` (default general).
    ///
    /// Returns `Ok(false)` when the channel is already registered, which
    /// makes the operation safe to repeat from auto-discovery.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for empty or multi-segment
    /// identifiers; nothing is mutated in that case.
    pub async fn add_channel(
        &self,
        channel: &str,
        category: Option<&str>,
    ) -> Result<bool, AppError> {
        let name = normalize_channel_name(channel).map_err(|e| {
            AppError::bad_request(
                "Invalid channel identifier",
                json!({ "channel": channel, "reason": e.to_string() }),
            )
        })?;

        let mut state = self.inner.lock().await;

        if state.channels.contains(&name) {
            return Ok(false);
        }

        state.channels.push(name.clone());
        state.channel_categories.insert(
            name.clone(),
            category.unwrap_or(DEFAULT_CATEGORY).to_string(),
        );

        self.persist(&state).await;
        info!(channel = %name, "channel added");
        Ok(true)
    }

    /// Removes a channel along with its category and counter.
    pub async fn remove_channel(&self, channel: &str) -> Result<bool, AppError> {
        let name = normalize_channel_name(channel).map_err(|e| {
            AppError::bad_request(
                "Invalid channel identifier",
                json!({ "channel": channel, "reason": e.to_string() }),
            )
        })?;

        let mut state = self.inner.lock().await;

        let Some(pos) = state.channels.iter().position(|c| c == &name) else {
            return Ok(false);
        };

        state.channels.remove(pos);
        state.channel_categories.remove(&name);
        state.link_counts.remove(&name);

        self.persist(&state).await;
        info!(channel = %name, "channel removed");
        Ok(true)
    }

    /// Adds a website URL under `category` (default general).
    ///
    /// A missing scheme gets `https://` prepended before validation.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] when the result is not a valid URL.
    pub async fn add_website(&self, url: &str, category: Option<&str>) -> Result<bool, AppError> {
        let normalized = normalize_website_url(url)?;

        let mut state = self.inner.lock().await;

        if state.websites.contains(&normalized) {
            return Ok(false);
        }

        state.websites.push(normalized.clone());
        state.website_categories.insert(
            normalized.clone(),
            category.unwrap_or(DEFAULT_CATEGORY).to_string(),
        );

        self.persist(&state).await;
        info!(website = %normalized, "website added");
        Ok(true)
    }

    /// Removes a website along with its category and counter.
    pub async fn remove_website(&self, url: &str) -> Result<bool, AppError> {
        let normalized = normalize_website_url(url)?;

        let mut state = self.inner.lock().await;

        let Some(pos) = state.websites.iter().position(|w| w == &normalized) else {
            return Ok(false);
        };

        state.websites.remove(pos);
        state.website_categories.remove(&normalized);
        state.link_counts.remove(&normalized);

        self.persist(&state).await;
        info!(website = %normalized, "website removed");
        Ok(true)
    }

    /// Monitored channels, in registration order.
    pub async fn channels(&self) -> Vec<String> {
        self.inner.lock().await.channels.clone()
    }

    /// Monitored websites, in registration order.
    pub async fn websites(&self) -> Vec<String> {
        self.inner.lock().await.websites.clone()
    }

    /// Assigned category of a channel.
    pub async fn channel_category(&self, channel: &str) -> Option<String> {
        let name = normalize_channel_name(channel).ok()?;
        self.inner.lock().await.channel_categories.get(&name).cloned()
    }

    /// Assigned category of a website.
    pub async fn website_category(&self, url: &str) -> Option<String> {
        let normalized = normalize_website_url(url).ok()?;
        self.inner.lock().await.website_categories.get(&normalized).cloned()
    }

    /// Reassigns a channel's category. No-op for unknown channels.
    pub async fn set_channel_category(&self, channel: &str, category: &str) -> Result<bool, AppError> {
        let name = normalize_channel_name(channel).map_err(|e| {
            AppError::bad_request(
                "Invalid channel identifier",
                json!({ "channel": channel, "reason": e.to_string() }),
            )
        })?;

        let mut state = self.inner.lock().await;
        if !state.channels.contains(&name) {
            return Ok(false);
        }

        state.channel_categories.insert(name, category.to_string());
        self.persist(&state).await;
        Ok(true)
    }

    /// Reassigns a website's category. No-op for unknown websites.
    pub async fn set_website_category(&self, url: &str, category: &str) -> Result<bool, AppError> {
        let normalized = normalize_website_url(url)?;

        let mut state = self.inner.lock().await;
        if !state.websites.contains(&normalized) {
            return Ok(false);
        }

        state.website_categories.insert(normalized, category.to_string());
        self.persist(&state).await;
        Ok(true)
    }

    /// Attributes `count` newly discovered links to `source`.
    pub async fn record_links(&self, source: &str, count: u64) {
        if count == 0 {
            return;
        }
        let mut state = self.inner.lock().await;
        *state.link_counts.entry(source.to_string()).or_insert(0) += count;
        self.persist(&state).await;
    }

    /// Cumulative links attributed to `source`.
    pub async fn link_count(&self, source: &str) -> u64 {
        self.inner
            .lock()
            .await
            .link_counts
            .get(source)
            .copied()
            .unwrap_or(0)
    }

    /// Removes every source, category assignment, and counter.
    pub async fn remove_all(&self) {
        let mut state = self.inner.lock().await;
        state.channels.clear();
        state.websites.clear();
        state.channel_categories.clear();
        state.website_categories.clear();
        state.link_counts.clear();
        self.persist(&state).await;
        info!("all sources removed");
    }

    /// Timestamp of the last completed check cycle.
    pub async fn last_check(&self) -> Option<DateTime<Utc>> {
        self.inner.lock().await.last_check
    }

    /// Stamps the last-check time with now. Called unconditionally at the
    /// end of every cycle, even a fully failed one, so the registry never
    /// reports a permanently stale "never checked" state.
    pub async fn touch_last_check(&self) {
        let mut state = self.inner.lock().await;
        state.last_check = Some(Utc::now());
        self.persist(&state).await;
    }

    async fn persist(&self, state: &RegistryState) {
        let document = match serde_json::to_value(state) {
            Ok(doc) => doc,
            Err(e) => {
                warn!(error = %e, "failed to serialize source registry state");
                return;
            }
        };

        if let Err(e) = self.store.save(STORE_KEY, document).await {
            warn!(error = %e, "failed to persist source registry, in-memory state kept");
        }
    }
}

/// Normalizes a website identifier: prepends `https://` when schemeless,
/// then validates with a full URL parse.
fn normalize_website_url(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::bad_request(
            "Website URL is empty",
            json!({ "url": raw }),
        ));
    }

    let candidate = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    Url::parse(&candidate).map_err(|e| {
        AppError::bad_request(
            "Invalid website URL",
            json!({ "url": raw, "reason": e.to_string() }),
        )
    })?;

    Ok(candidate)
}
