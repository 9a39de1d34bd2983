//! Orchestration of a full check cycle over every configured source.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::application::services::credential_rotator::CredentialRotator;
use crate::application::services::link_store::LinkStore;
use crate::application::services::source_registry::SourceRegistry;
use crate::domain::collaborators::{AccountGroupSource, MessageSource, Notifier, PageFetcher};
use crate::domain::discovery::{scan_for_directories, DIRECTORY_CATEGORY};
use crate::domain::entities::{CheckCycleResult, SourceError};
use crate::domain::extract::extract_telegram_links;
use crate::error::AppError;

/// Tunable knobs of a check cycle. Reloadable at runtime through
/// [`Coordinator::update_settings`].
#[derive(Debug, Clone)]
pub struct CoordinatorSettings {
    /// Maximum sources visited per pass in one cycle.
    pub batch_cap: usize,
    /// Delay between consecutive sources within a pass.
    pub pacing: Duration,
    /// Messages fetched per channel or account group.
    pub max_messages: usize,
    /// Scroll iterations when rendering a website.
    pub scroll_count: u32,
    /// Budget for a single source before it is written off as hung.
    pub source_timeout: Duration,
    pub auto_discover: bool,
    pub notify_enabled: bool,
    pub notify_destination: Option<String>,
    /// Minimum new links in a cycle before a notification goes out.
    pub notify_min_links: u64,
}

impl Default for CoordinatorSettings {
    fn default() -> Self {
        Self {
            batch_cap: 20,
            pacing: Duration::from_millis(1500),
            max_messages: 100,
            scroll_count: 5,
            source_timeout: Duration::from_secs(20),
            auto_discover: true,
            notify_enabled: false,
            notify_destination: None,
            notify_min_links: 5,
        }
    }
}

/// Point-in-time snapshot of the aggregation state, for status commands
/// and log summaries.
#[derive(Debug, Clone)]
pub struct StatusSnapshot {
    pub total_links: usize,
    pub new_links: usize,
    pub channels: usize,
    pub websites: usize,
    pub token_pool_size: usize,
    pub last_check: Option<DateTime<Utc>>,
}

/// Drives check cycles: channels, then websites, then account groups.
///
/// Each pass isolates per-source failures and applies the shared timeout and
/// pacing settings. A cycle always finishes and always stamps the registry's
/// last-check time, however many sources failed along the way.
pub struct Coordinator {
    links: Arc<LinkStore>,
    registry: Arc<SourceRegistry>,
    rotator: Arc<CredentialRotator>,
    messages: Arc<dyn MessageSource>,
    pages: Arc<dyn PageFetcher>,
    accounts: Arc<dyn AccountGroupSource>,
    notifier: Arc<dyn Notifier>,
    settings: RwLock<CoordinatorSettings>,
}

/// What one source contributed to the cycle.
#[derive(Debug, Default)]
struct SourceTally {
    new_links: u64,
    discovered: u64,
}

impl Coordinator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        links: Arc<LinkStore>,
        registry: Arc<SourceRegistry>,
        rotator: Arc<CredentialRotator>,
        messages: Arc<dyn MessageSource>,
        pages: Arc<dyn PageFetcher>,
        accounts: Arc<dyn AccountGroupSource>,
        notifier: Arc<dyn Notifier>,
        settings: CoordinatorSettings,
    ) -> Self {
        Self {
            links,
            registry,
            rotator,
            messages,
            pages,
            accounts,
            notifier,
            settings: RwLock::new(settings),
        }
    }

    pub async fn settings(&self) -> CoordinatorSettings {
        self.settings.read().await.clone()
    }

    /// Swaps in new settings; the next cycle picks them up.
    pub async fn update_settings(&self, settings: CoordinatorSettings) {
        *self.settings.write().await = settings;
        info!("coordinator settings updated");
    }

    /// Runs one full check cycle and returns its aggregate result.
    pub async fn check_cycle(&self) -> CheckCycleResult {
        let settings = self.settings().await;
        let started_at = Utc::now();

        let mut per_source: BTreeMap<String, u64> = BTreeMap::new();
        let mut errors: Vec<SourceError> = Vec::new();
        let mut sources_checked: u64 = 0;
        let mut discovered_sources: u64 = 0;

        // Known channels are excluded from discovery proposals; the set grows
        // as new directories are registered mid-cycle.
        let mut known_channels: HashSet<String> =
            self.registry.channels().await.into_iter().collect();

        let channels = apply_batch_cap(self.registry.channels().await, settings.batch_cap, "channels");
        for (i, channel) in channels.iter().enumerate() {
            sources_checked += 1;
            let category = self.registry.channel_category(channel).await;
            let token = self.rotator.next_token().await;

            let fetched = timeout(
                settings.source_timeout,
                self.messages
                    .list_recent_text(channel, token, settings.max_messages),
            )
            .await;

            match flatten_timeout(fetched, channel) {
                Ok(texts) => {
                    let tally = self
                        .ingest_texts(channel, category.as_deref(), &texts, &settings, &mut known_channels)
                        .await;
                    if tally.new_links > 0 {
                        per_source.insert(channel.clone(), tally.new_links);
                        self.registry.record_links(channel, tally.new_links).await;
                    }
                    discovered_sources += tally.discovered;
                }
                Err(e) => {
                    warn!(source = %channel, error = %e.message, "channel check failed");
                    errors.push(e);
                }
            }

            // Pacing applies between sources, not after the last one.
            if i + 1 < channels.len() && !settings.pacing.is_zero() {
                tokio::time::sleep(settings.pacing).await;
            }
        }

        let websites = apply_batch_cap(self.registry.websites().await, settings.batch_cap, "websites");
        for (i, website) in websites.iter().enumerate() {
            sources_checked += 1;
            let category = self.registry.website_category(website).await;

            let fetched = timeout(
                settings.source_timeout,
                self.pages.render_and_extract_text(website, settings.scroll_count),
            )
            .await;

            match flatten_timeout(fetched, website) {
                Ok(texts) => {
                    let tally = self
                        .ingest_texts(website, category.as_deref(), &texts, &settings, &mut known_channels)
                        .await;
                    if tally.new_links > 0 {
                        per_source.insert(website.clone(), tally.new_links);
                        self.registry.record_links(website, tally.new_links).await;
                    }
                    discovered_sources += tally.discovered;
                }
                Err(e) => {
                    warn!(source = %website, error = %e.message, "website check failed");
                    errors.push(e);
                }
            }

            if i + 1 < websites.len() && !settings.pacing.is_zero() {
                tokio::time::sleep(settings.pacing).await;
            }
        }

        // Account groups come back in one batched call; the per-group text is
        // ingested with the group as the attributed source.
        let grouped = timeout(
            settings.source_timeout,
            self.accounts.list_groups_and_recent_text(settings.max_messages),
        )
        .await;

        match flatten_timeout(grouped, "account-groups") {
            Ok(groups) => {
                for (group, texts) in &groups {
                    sources_checked += 1;
                    let tally = self
                        .ingest_texts(group, None, texts, &settings, &mut known_channels)
                        .await;
                    if tally.new_links > 0 {
                        per_source.insert(group.clone(), tally.new_links);
                        self.registry.record_links(group, tally.new_links).await;
                    }
                    discovered_sources += tally.discovered;
                }
            }
            Err(e) => {
                warn!(error = %e.message, "account group check failed");
                errors.push(e);
            }
        }

        // Stamped even on a fully failed cycle.
        self.registry.touch_last_check().await;

        let new_links: u64 = per_source.values().sum();
        let result = CheckCycleResult {
            started_at,
            finished_at: Utc::now(),
            per_source,
            new_links,
            sources_checked,
            discovered_sources,
            errors,
        };

        info!(
            new_links = result.new_links,
            sources_checked = result.sources_checked,
            discovered = result.discovered_sources,
            failed = result.errors.len(),
            "check cycle finished"
        );

        self.maybe_notify(&settings, result.new_links).await;

        result
    }

    /// Extracts, stores, and attributes links from one source's texts, then
    /// feeds the same texts through directory discovery.
    async fn ingest_texts(
        &self,
        source: &str,
        source_category: Option<&str>,
        texts: &[String],
        settings: &CoordinatorSettings,
        known_channels: &mut HashSet<String>,
    ) -> SourceTally {
        let mut tally = SourceTally::default();

        for text in texts {
            for link in extract_telegram_links(text) {
                let outcome = self
                    .links
                    .add(&link, Some(source), Some(text), source_category)
                    .await;
                if outcome.is_new {
                    tally.new_links += 1;
                }
            }

            for candidate in scan_for_directories(text, known_channels, settings.auto_discover) {
                match self
                    .registry
                    .add_channel(&candidate, Some(DIRECTORY_CATEGORY))
                    .await
                {
                    Ok(true) => {
                        info!(channel = %candidate, via = %source, "directory source discovered");
                        known_channels.insert(candidate);
                        tally.discovered += 1;
                    }
                    Ok(false) => {
                        known_channels.insert(candidate);
                    }
                    Err(e) => {
                        debug!(candidate = %candidate, error = %e, "discovered handle rejected");
                    }
                }
            }
        }

        tally
    }

    async fn maybe_notify(&self, settings: &CoordinatorSettings, new_links: u64) {
        if !settings.notify_enabled || new_links < settings.notify_min_links {
            return;
        }
        let Some(destination) = settings.notify_destination.as_deref() else {
            warn!("notifications enabled but no destination configured");
            return;
        };

        if let Err(e) = self.notifier.notify(destination, new_links).await {
            warn!(error = %e, "notification dispatch failed");
        }
    }

    /// Snapshot of the current aggregation state.
    pub async fn status(&self) -> StatusSnapshot {
        StatusSnapshot {
            total_links: self.links.count().await,
            new_links: self.links.new_count().await,
            channels: self.registry.channels().await.len(),
            websites: self.registry.websites().await.len(),
            token_pool_size: self.rotator.pool_size().await,
            last_check: self.registry.last_check().await,
        }
    }
}

/// Truncates a source list to the per-cycle cap.
///
/// TODO: rotate the starting offset between cycles so sources past the cap
/// are not starved on installations with more sources than the cap.
fn apply_batch_cap(mut sources: Vec<String>, cap: usize, pass: &str) -> Vec<String> {
    if sources.len() > cap {
        warn!(
            pass,
            total = sources.len(),
            cap,
            "source list exceeds batch cap, truncating"
        );
        sources.truncate(cap);
    }
    sources
}

fn flatten_timeout<T>(
    fetched: Result<Result<T, AppError>, tokio::time::error::Elapsed>,
    source: &str,
) -> Result<T, SourceError> {
    match fetched {
        Ok(Ok(texts)) => Ok(texts),
        Ok(Err(e)) => Err(SourceError {
            source: source.to_string(),
            message: e.to_string(),
        }),
        Err(_) => Err(SourceError {
            source: source.to_string(),
            message: "source check timed out".to_string(),
        }),
    }
}
