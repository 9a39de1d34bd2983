#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use linkharvest::application::services::{
    Coordinator, CoordinatorSettings, CredentialRotator, LinkStore, SourceRegistry,
};
use linkharvest::domain::collaborators::{
    AccountGroupSource, MessageSource, Notifier, PageFetcher,
};
use linkharvest::error::AppError;
use linkharvest::infrastructure::persistence::{MemoryStore, StateStore};

/// A message source scripted with per-channel texts. Channels in `failures`
/// fail with a transport error; unknown channels yield nothing.
///
/// Records every token it was handed, so tests can assert rotation order.
pub struct ScriptedMessageSource {
    texts: HashMap<String, Vec<String>>,
    failures: HashSet<String>,
    pub seen_tokens: Arc<Mutex<Vec<Option<String>>>>,
}

impl ScriptedMessageSource {
    pub fn new() -> Self {
        Self {
            texts: HashMap::new(),
            failures: HashSet::new(),
            seen_tokens: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_texts(mut self, source: &str, texts: &[&str]) -> Self {
        self.texts
            .insert(source.to_string(), texts.iter().map(|t| t.to_string()).collect());
        self
    }

    pub fn failing(mut self, source: &str) -> Self {
        self.failures.insert(source.to_string());
        self
    }
}

#[async_trait]
impl MessageSource for ScriptedMessageSource {
    async fn list_recent_text(
        &self,
        source: &str,
        token: Option<String>,
        _max_items: usize,
    ) -> Result<Vec<String>, AppError> {
        self.seen_tokens.lock().unwrap().push(token);

        if self.failures.contains(source) {
            return Err(AppError::transport(
                "scripted failure",
                json!({ "source": source }),
            ));
        }

        Ok(self.texts.get(source).cloned().unwrap_or_default())
    }
}

/// A page fetcher scripted with per-URL text segments.
pub struct ScriptedPageFetcher {
    texts: HashMap<String, Vec<String>>,
}

impl ScriptedPageFetcher {
    pub fn new() -> Self {
        Self {
            texts: HashMap::new(),
        }
    }

    pub fn with_texts(mut self, url: &str, texts: &[&str]) -> Self {
        self.texts
            .insert(url.to_string(), texts.iter().map(|t| t.to_string()).collect());
        self
    }
}

#[async_trait]
impl PageFetcher for ScriptedPageFetcher {
    async fn render_and_extract_text(
        &self,
        url: &str,
        _scroll_count: u32,
    ) -> Result<Vec<String>, AppError> {
        Ok(self.texts.get(url).cloned().unwrap_or_default())
    }
}

/// An account source scripted with group feeds.
pub struct ScriptedAccountSource {
    groups: BTreeMap<String, Vec<String>>,
}

impl ScriptedAccountSource {
    pub fn new() -> Self {
        Self {
            groups: BTreeMap::new(),
        }
    }

    pub fn with_group(mut self, group: &str, texts: &[&str]) -> Self {
        self.groups
            .insert(group.to_string(), texts.iter().map(|t| t.to_string()).collect());
        self
    }
}

#[async_trait]
impl AccountGroupSource for ScriptedAccountSource {
    async fn list_groups_and_recent_text(
        &self,
        _max_items_per_group: usize,
    ) -> Result<BTreeMap<String, Vec<String>>, AppError> {
        Ok(self.groups.clone())
    }
}

/// A notifier that records every dispatch.
#[derive(Clone)]
pub struct RecordingNotifier {
    pub calls: Arc<Mutex<Vec<(String, u64)>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, destination: &str, new_link_count: u64) -> Result<(), AppError> {
        self.calls
            .lock()
            .unwrap()
            .push((destination.to_string(), new_link_count));
        Ok(())
    }
}

/// Fully wired services over a shared in-memory store.
pub struct TestApp {
    pub links: Arc<LinkStore>,
    pub registry: Arc<SourceRegistry>,
    pub rotator: Arc<CredentialRotator>,
    pub coordinator: Arc<Coordinator>,
    pub notifier: RecordingNotifier,
}

/// Settings tuned for tests: no pacing, short timeouts, defaults elsewhere.
pub fn fast_settings() -> CoordinatorSettings {
    CoordinatorSettings {
        pacing: Duration::ZERO,
        source_timeout: Duration::from_secs(5),
        ..CoordinatorSettings::default()
    }
}

pub async fn build_app(
    messages: ScriptedMessageSource,
    pages: ScriptedPageFetcher,
    accounts: ScriptedAccountSource,
    settings: CoordinatorSettings,
) -> TestApp {
    let store: Arc<dyn StateStore> = Arc::new(MemoryStore::new());
    build_app_on(store, messages, pages, accounts, settings).await
}

pub async fn build_app_on(
    store: Arc<dyn StateStore>,
    messages: ScriptedMessageSource,
    pages: ScriptedPageFetcher,
    accounts: ScriptedAccountSource,
    settings: CoordinatorSettings,
) -> TestApp {
    let links = Arc::new(LinkStore::load(store.clone()).await);
    let registry = Arc::new(SourceRegistry::load(store.clone()).await);
    let rotator = Arc::new(CredentialRotator::load(store, None).await);
    let notifier = RecordingNotifier::new();

    let coordinator = Arc::new(Coordinator::new(
        links.clone(),
        registry.clone(),
        rotator.clone(),
        Arc::new(messages),
        Arc::new(pages),
        Arc::new(accounts),
        Arc::new(notifier.clone()),
        settings,
    ));

    TestApp {
        links,
        registry,
        rotator,
        coordinator,
        notifier,
    }
}
