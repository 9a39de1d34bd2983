//! No-op collaborator implementations for disabled transports.

use crate::domain::collaborators::{AccountGroupSource, MessageSource, Notifier, PageFetcher};
use crate::error::AppError;
use async_trait::async_trait;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// A message source that yields nothing.
///
/// Used when no bot transport is wired in, e.g. a dry run of the daemon or
/// an installation that only crawls websites. Every check succeeds with zero
/// messages, so cycles complete and timestamps advance normally.
pub struct NullMessageSource;

impl NullMessageSource {
    pub fn new() -> Self {
        debug!("Using NullMessageSource (channel checking disabled)");
        Self
    }
}

impl Default for NullMessageSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageSource for NullMessageSource {
    async fn list_recent_text(
        &self,
        _source: &str,
        _token: Option<String>,
        _max_items: usize,
    ) -> Result<Vec<String>, AppError> {
        Ok(Vec::new())
    }
}

/// A page fetcher that renders nothing.
pub struct NullPageFetcher;

impl NullPageFetcher {
    pub fn new() -> Self {
        debug!("Using NullPageFetcher (website crawling disabled)");
        Self
    }
}

impl Default for NullPageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageFetcher for NullPageFetcher {
    async fn render_and_extract_text(
        &self,
        _url: &str,
        _scroll_count: u32,
    ) -> Result<Vec<String>, AppError> {
        Ok(Vec::new())
    }
}

/// An account source with no joined groups.
pub struct NullAccountGroupSource;

impl NullAccountGroupSource {
    pub fn new() -> Self {
        debug!("Using NullAccountGroupSource (account checking disabled)");
        Self
    }
}

impl Default for NullAccountGroupSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountGroupSource for NullAccountGroupSource {
    async fn list_groups_and_recent_text(
        &self,
        _max_items_per_group: usize,
    ) -> Result<BTreeMap<String, Vec<String>>, AppError> {
        Ok(BTreeMap::new())
    }
}

/// A notifier that only writes to the log.
///
/// Stands in for the SMS transport when it is not configured; the dispatch
/// decision (threshold, enablement) still runs in the coordinator, so the
/// log line is a faithful record of when a real notification would have gone
/// out.
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        debug!("Using LogNotifier (SMS delivery disabled)");
        Self
    }
}

impl Default for LogNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, destination: &str, new_link_count: u64) -> Result<(), AppError> {
        info!(destination, new_link_count, "notification (log only)");
        Ok(())
    }
}
