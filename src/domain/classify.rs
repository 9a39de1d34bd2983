//! Keyword-scored topical classification of link context text.

use serde::{Deserialize, Serialize};

/// Default category for links and sources with no better signal.
pub const DEFAULT_CATEGORY: &str = "عمومی";

/// A topical category with its ordered keyword list.
///
/// The table is an ordered list, not a map: tie-breaking during
/// classification is "first category in table order", so order is part of
/// the data model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub keywords: Vec<String>,
}

impl Category {
    pub fn new(name: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            name: name.into(),
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
        }
    }
}

/// The seeded default category table.
///
/// Persian-first keyword lists with Latin synonyms, matching the categories
/// the operators started from. The set is open: operators add categories and
/// edit keyword lists at runtime.
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new("عمومی", &["عمومی", "گروه", "چت", "گپ"]),
        Category::new(
            "فیلم و سریال",
            &["فیلم", "سریال", "انیمیشن", "کارتون", "movie", "film", "cinema", "پویا"],
        ),
        Category::new("موسیقی", &["موسیقی", "آهنگ", "موزیک", "music", "song", "mp3"]),
        Category::new(
            "ورزشی",
            &["ورزش", "فوتبال", "والیبال", "بسکتبال", "استقلال", "پرسپولیس", "sport"],
        ),
        Category::new("خبری", &["خبر", "اخبار", "news", "جدید", "تازه"]),
        Category::new(
            "علمی و آموزشی",
            &["آموزش", "علم", "دانش", "یادگیری", "learn", "education", "کنکور", "درس"],
        ),
        Category::new("سرگرمی", &["سرگرمی", "جوک", "طنز", "خنده", "فان"]),
    ]
}

/// Minimum distinct keyword hits for a confident classification.
const MIN_SCORE: usize = 2;

/// Scores `text` against the keyword table and returns the best category.
///
/// Each keyword contributes at most 1 to its category's score: this is a
/// presence test, not a frequency count. The strictly highest score wins;
/// ties resolve to the first category in table order. A category is returned
/// only when its score reaches 2, fewer keyword hits is not a confident
/// classification and the caller falls back to the source's category.
pub fn classify<'a>(text: &str, table: &'a [Category]) -> Option<&'a str> {
    let haystack = text.to_lowercase();

    let mut best: Option<&str> = None;
    let mut best_score = 0usize;

    for category in table {
        let score = category
            .keywords
            .iter()
            .filter(|k| haystack.contains(&k.to_lowercase()))
            .count();

        if score > best_score {
            best_score = score;
            best = Some(category.name.as_str());
        }
    }

    if best_score >= MIN_SCORE { best } else { None }
}
