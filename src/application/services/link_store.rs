//! Deduplicated link history with categorization and export.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::domain::classify::{classify, default_categories, Category, DEFAULT_CATEGORY};
use crate::domain::entities::LinkRecord;
use crate::domain::normalize::normalize_link;
use crate::error::AppError;
use crate::infrastructure::persistence::StateStore;

const STORE_KEY: &str = "links";

/// Outcome of a single [`LinkStore::add`] call.
///
/// `persisted` is `false` when the post-mutation save failed; the in-memory
/// state is still updated and authoritative, the flag is the non-fatal
/// warning surfaced to the caller.
#[derive(Debug, Clone)]
pub struct AddOutcome {
    pub is_new: bool,
    /// Category assigned at creation; `None` for duplicates.
    pub category: Option<String>,
    pub persisted: bool,
}

/// Persisted document. Additive schema: every field defaults so documents
/// written by older revisions still load.
#[derive(Debug, Serialize, Deserialize)]
struct LinkStoreState {
    #[serde(default)]
    links: Vec<String>,
    #[serde(default)]
    new_links: Vec<String>,
    #[serde(default)]
    records: BTreeMap<String, LinkRecord>,
    #[serde(default)]
    category_index: BTreeMap<String, Vec<String>>,
    #[serde(default = "default_categories")]
    categories: Vec<Category>,
}

impl Default for LinkStoreState {
    fn default() -> Self {
        Self {
            links: Vec::new(),
            new_links: Vec::new(),
            records: BTreeMap::new(),
            category_index: BTreeMap::new(),
            categories: default_categories(),
        }
    }
}

struct Inner {
    state: LinkStoreState,
    /// Fast membership check over `state.links`.
    index: HashSet<String>,
}

/// The deduplicated history of all known links, the new-links buffer, and
/// the category index.
///
/// Every mutating method is one unit of mutual exclusion: the check-then-
/// append inside [`add`](Self::add) runs under a single lock so two
/// concurrent adds of the same new link cannot both report `is_new`.
pub struct LinkStore {
    store: Arc<dyn StateStore>,
    inner: Mutex<Inner>,
}

impl LinkStore {
    /// Loads the link store from persistence, falling back to defaults on a
    /// missing or unreadable document.
    pub async fn load(store: Arc<dyn StateStore>) -> Self {
        let state = match store.load(STORE_KEY).await {
            Ok(Some(doc)) => match serde_json::from_value::<LinkStoreState>(doc) {
                Ok(state) => state,
                Err(e) => {
                    warn!(error = %e, "link store document malformed, starting empty");
                    LinkStoreState::default()
                }
            },
            Ok(None) => LinkStoreState::default(),
            Err(e) => {
                warn!(error = %e, "failed to load link store, starting empty");
                LinkStoreState::default()
            }
        };

        info!(
            links = state.links.len(),
            new = state.new_links.len(),
            categories = state.categories.len(),
            "link store loaded"
        );

        let index = state.links.iter().cloned().collect();
        Self {
            store,
            inner: Mutex::new(Inner { state, index }),
        }
    }

    /// Adds a link to the store.
    ///
    /// The raw string is normalized first, so `@foo`, `t.me/foo`, and
    /// `https://t.me/foo` collide. Duplicates return `is_new: false` with no
    /// side effects. New links are appended to the history and the new-links
    /// buffer, categorized (context keywords, then the source's assigned
    /// category, then the general default), and persisted.
    ///
    /// The category is assigned once at creation and never revisited, even
    /// though keyword tables stay editable afterwards.
    pub async fn add(
        &self,
        raw_link: &str,
        source: Option<&str>,
        context_text: Option<&str>,
        source_category: Option<&str>,
    ) -> AddOutcome {
        let link = normalize_link(raw_link);

        let mut inner = self.inner.lock().await;

        if inner.index.contains(&link) {
            return AddOutcome {
                is_new: false,
                category: None,
                persisted: true,
            };
        }

        let category = context_text
            .and_then(|text| classify(text, &inner.state.categories))
            .map(str::to_string)
            .or_else(|| source_category.map(str::to_string))
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

        inner.index.insert(link.clone());
        inner.state.links.push(link.clone());
        inner.state.new_links.push(link.clone());
        inner.state.records.insert(
            link.clone(),
            LinkRecord::new(link.as_str(), source.map(str::to_string), category.as_str()),
        );

        let bucket = inner
            .state
            .category_index
            .entry(category.clone())
            .or_default();
        if !bucket.contains(&link) {
            bucket.push(link.clone());
        }

        let persisted = self.persist(&inner.state).await;
        info!(link = %link, category = %category, source = ?source, "new link recorded");

        AddOutcome {
            is_new: true,
            category: Some(category),
            persisted,
        }
    }

    /// All known links, in discovery order.
    pub async fn all_links(&self) -> Vec<String> {
        self.inner.lock().await.state.links.clone()
    }

    /// Links added since the new-buffer was last cleared.
    pub async fn new_links(&self) -> Vec<String> {
        self.inner.lock().await.state.new_links.clone()
    }

    /// Full metadata record for a link, if known.
    pub async fn record(&self, link: &str) -> Option<LinkRecord> {
        self.inner.lock().await.state.records.get(link).cloned()
    }

    /// Links in one category.
    pub async fn links_in_category(&self, category: &str) -> Vec<String> {
        self.inner
            .lock()
            .await
            .state
            .category_index
            .get(category)
            .cloned()
            .unwrap_or_default()
    }

    /// All category buckets.
    pub async fn links_by_category(&self) -> BTreeMap<String, Vec<String>> {
        self.inner.lock().await.state.category_index.clone()
    }

    /// Category names in table order.
    pub async fn categories(&self) -> Vec<String> {
        self.inner
            .lock()
            .await
            .state
            .categories
            .iter()
            .map(|c| c.name.clone())
            .collect()
    }

    /// Keyword list for one category; empty when unknown.
    pub async fn category_keywords(&self, category: &str) -> Vec<String> {
        self.inner
            .lock()
            .await
            .state
            .categories
            .iter()
            .find(|c| c.name == category)
            .map(|c| c.keywords.clone())
            .unwrap_or_default()
    }

    /// Replaces the keyword list for `category`, creating the category at
    /// the end of the table when it does not exist yet. Classification
    /// always reads the live table, so edits take effect on the next add.
    pub async fn update_category_keywords(&self, category: &str, keywords: Vec<String>) -> bool {
        let mut inner = self.inner.lock().await;

        match inner
            .state
            .categories
            .iter_mut()
            .find(|c| c.name == category)
        {
            Some(existing) => existing.keywords = keywords,
            None => inner.state.categories.push(Category {
                name: category.to_string(),
                keywords,
            }),
        }

        self.persist(&inner.state).await
    }

    /// Wipes history, new-buffer, metadata, and the category index together.
    ///
    /// These are never cleared independently: dropping the history while
    /// keeping category buckets would leave dangling entries.
    pub async fn clear_all(&self) -> bool {
        let mut inner = self.inner.lock().await;

        inner.index.clear();
        inner.state.links.clear();
        inner.state.new_links.clear();
        inner.state.records.clear();
        inner.state.category_index.clear();

        let persisted = self.persist(&inner.state).await;
        info!("all links cleared");
        persisted
    }

    /// Empties only the new-links buffer.
    pub async fn clear_new(&self) -> bool {
        let mut inner = self.inner.lock().await;
        inner.state.new_links.clear();
        self.persist(&inner.state).await
    }

    /// Number of known links.
    pub async fn count(&self) -> usize {
        self.inner.lock().await.state.links.len()
    }

    /// Number of links in the new-buffer.
    pub async fn new_count(&self) -> usize {
        self.inner.lock().await.state.new_links.len()
    }

    /// Exports link records to a CSV file, optionally filtered by category.
    ///
    /// When the CSV writer fails, degrades to a plain tab-delimited text file
    /// at the same path instead of failing the export.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] when there is nothing to export and
    /// [`AppError::Persistence`] when even the fallback write fails.
    pub async fn export_csv(
        &self,
        path: &Path,
        category: Option<&str>,
    ) -> Result<PathBuf, AppError> {
        let rows: Vec<LinkRecord> = {
            let inner = self.inner.lock().await;
            inner
                .state
                .links
                .iter()
                .filter_map(|link| inner.state.records.get(link))
                .filter(|record| category.is_none_or(|c| record.category == c))
                .cloned()
                .collect()
        };

        if rows.is_empty() {
            return Err(AppError::not_found(
                "No links to export",
                json!({ "category": category }),
            ));
        }

        match write_csv(path, &rows) {
            Ok(()) => Ok(path.to_path_buf()),
            Err(e) => {
                warn!(error = %e, "CSV export failed, falling back to tab-delimited text");
                write_delimited(path, &rows)?;
                Ok(path.to_path_buf())
            }
        }
    }

    /// Saves the current state, logging (not propagating) failures.
    async fn persist(&self, state: &LinkStoreState) -> bool {
        let document = match serde_json::to_value(state) {
            Ok(doc) => doc,
            Err(e) => {
                warn!(error = %e, "failed to serialize link store state");
                return false;
            }
        };

        match self.store.save(STORE_KEY, document).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "failed to persist link store, in-memory state kept");
                false
            }
        }
    }
}

fn write_csv(path: &Path, rows: &[LinkRecord]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["URL", "Category", "Source", "Timestamp"])?;

    for record in rows {
        writer.write_record([
            record.url.as_str(),
            record.category.as_str(),
            record.source.as_deref().unwrap_or(""),
            &record.discovered_at.to_rfc3339(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn write_delimited(path: &Path, rows: &[LinkRecord]) -> Result<(), AppError> {
    let mut out = String::from("URL\tCategory\tSource\tTimestamp\n");
    for record in rows {
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\n",
            record.url,
            record.category,
            record.source.as_deref().unwrap_or(""),
            record.discovered_at.to_rfc3339()
        ));
    }

    std::fs::write(path, out).map_err(|e| {
        AppError::persistence(
            "Failed to write export file",
            json!({ "path": path.display().to_string(), "reason": e.to_string() }),
        )
    })
}
