//! Collaborator interfaces consumed by the ingestion coordinator.
//!
//! The transport mechanics behind these traits (bot API polling, headless
//! page rendering, user-account sessions, SMS delivery) are implemented
//! elsewhere; the core only ever sees text blobs and a failure contract.
//! Every method can fail with [`AppError::Transport`], which the coordinator
//! catches at per-source granularity.

use crate::error::AppError;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Yields recent message text from a bot-monitored channel.
///
/// `token` is the rotated bot credential selected by the coordinator for this
/// check; `None` when no credential is configured.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Returns up to `max_items` recent message texts from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Transport`] on timeouts or API failures.
    async fn list_recent_text(
        &self,
        source: &str,
        token: Option<String>,
        max_items: usize,
    ) -> Result<Vec<String>, AppError>;
}

/// Renders a web page (scrolling as needed for dynamic content) and returns
/// its text segments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Returns text segments extracted from `url` after `scroll_count` scrolls.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Transport`] on timeouts or rendering failures.
    async fn render_and_extract_text(
        &self,
        url: &str,
        scroll_count: u32,
    ) -> Result<Vec<String>, AppError>;
}

/// Yields recent text from every group a user account has joined.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountGroupSource: Send + Sync {
    /// Returns recent message texts keyed by group name.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Transport`] when the account session fails.
    async fn list_groups_and_recent_text(
        &self,
        max_items_per_group: usize,
    ) -> Result<BTreeMap<String, Vec<String>>, AppError>;
}

/// Best-effort notification dispatch.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Notifies `destination` that `new_link_count` new links arrived.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Transport`] on delivery failure; the coordinator
    /// logs and ignores it.
    async fn notify(&self, destination: &str, new_link_count: u64) -> Result<(), AppError>;
}
