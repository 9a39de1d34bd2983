//! Ephemeral aggregate produced by one check cycle. Never persisted.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// A single source failure captured during a cycle.
///
/// Failures are recorded and counted, never propagated: one hung or broken
/// source must not abort the remaining sources in a pass.
#[derive(Debug, Clone)]
pub struct SourceError {
    pub source: String,
    pub message: String,
}

/// Aggregate result of one full check cycle over all configured sources.
#[derive(Debug, Clone)]
pub struct CheckCycleResult {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// New-link count per source that contributed at least one link.
    pub per_source: BTreeMap<String, u64>,
    pub new_links: u64,
    pub sources_checked: u64,
    pub discovered_sources: u64,
    pub errors: Vec<SourceError>,
}

impl CheckCycleResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Number of sources that completed without a transport failure.
    pub fn sources_succeeded(&self) -> u64 {
        self.sources_checked.saturating_sub(self.errors.len() as u64)
    }
}
