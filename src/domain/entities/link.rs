//! Link record entity: a normalized link plus discovery metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored link with its discovery metadata.
///
/// Created atomically with the link on first sight; the URL is never mutated
/// and the category is assigned once at creation. `source` is absent for
/// links whose origin was not attributable (e.g. pasted directly).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkRecord {
    pub url: String,
    #[serde(default)]
    pub source: Option<String>,
    pub category: String,
    pub discovered_at: DateTime<Utc>,
}

impl LinkRecord {
    /// Creates a record stamped with the current time.
    pub fn new(url: impl Into<String>, source: Option<String>, category: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            source,
            category: category.into(),
            discovered_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_creation() {
        let record = LinkRecord::new(
            "https://t.me/foo",
            Some("somechannel".to_string()),
            "عمومی",
        );
        assert_eq!(record.url, "https://t.me/foo");
        assert_eq!(record.source.as_deref(), Some("somechannel"));
        assert_eq!(record.category, "عمومی");
    }

    #[test]
    fn test_record_source_defaults_on_load() {
        // Older documents may lack the source field entirely.
        let json = r#"{"url":"https://t.me/foo","category":"عمومی","discovered_at":"2025-01-01T00:00:00Z"}"#;
        let record: LinkRecord = serde_json::from_str(json).unwrap();
        assert!(record.source.is_none());
    }
}
