//! Auto-discovery of new link-directory sources from ingested text.
//!
//! Channels that exist to republish group links ("linkdoni" channels) are
//! worth monitoring directly: one discovered directory yields far more links
//! than the post that mentioned it.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Reserved category under which discovered directory sources are filed.
pub const DIRECTORY_CATEGORY: &str = "لینکدونی";

/// Keywords that mark a channel or its surrounding text as a link directory.
const DIRECTORY_KEYWORDS: &[&str] = &[
    "لینکدونی",
    "لینک دونی",
    "لینکیاب",
    "لینک یاب",
    "گروه یاب",
    "گپ یاب",
    "linkdoni",
    "linkyab",
    "link directory",
];

/// Distinct surrounding-text keyword hits required when the handle itself
/// carries no directory keyword.
const MIN_CONTEXT_HITS: usize = 2;

static HANDLE_MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:t\.me/|@)([a-zA-Z0-9_]+)").unwrap());

/// Scans `text` for channel mentions that look like link directories.
///
/// Returns candidate handles (bare, without `@`) to propose to the source
/// registry under [`DIRECTORY_CATEGORY`]. Returns nothing when auto-discovery
/// is disabled, regardless of content. Handles already present in
/// `existing_sources` are skipped; the registry add is idempotent anyway, but
/// skipping keeps the proposal list meaningful.
pub fn scan_for_directories(
    text: &str,
    existing_sources: &HashSet<String>,
    auto_discover_enabled: bool,
) -> Vec<String> {
    if !auto_discover_enabled {
        return Vec::new();
    }

    let haystack = text.to_lowercase();
    let context_hits = DIRECTORY_KEYWORDS
        .iter()
        .filter(|k| haystack.contains(&k.to_lowercase()))
        .count();

    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for caps in HANDLE_MENTION.captures_iter(text) {
        let handle = caps[1].to_string();
        let lowered = handle.to_lowercase();

        if lowered == "joinchat" {
            continue;
        }
        if existing_sources.contains(&handle) || !seen.insert(lowered.clone()) {
            continue;
        }

        let handle_is_directory = DIRECTORY_KEYWORDS
            .iter()
            .any(|k| lowered.contains(&k.to_lowercase()));

        if handle_is_directory || context_hits >= MIN_CONTEXT_HITS {
            candidates.push(handle);
        }
    }

    candidates
}
