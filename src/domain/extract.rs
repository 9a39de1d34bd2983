//! Telegram link extraction from free text.
//!
//! Scans raw message text or rendered page text for candidate destinations in
//! three shapes: invite links, public `t.me` links, and bare `@username`
//! mentions. Candidates come back in first-seen order, deduplicated within
//! one text; normalization happens downstream.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Invite links to private groups/channels. Scraped text frequently drops
/// the scheme, so it is optional.
static INVITE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:https?://)?(?:www\.)?t(?:elegram)?\.me/(?:joinchat/|\+)([a-zA-Z0-9_-]+)")
        .unwrap()
});

/// Public `t.me/<username>` links, scheme optional.
static USERNAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:https?://)?(?:www\.)?t(?:elegram)?\.me/([a-zA-Z][a-zA-Z0-9_]{3,})").unwrap()
});

/// Bare `@username` mentions, common on directory sites that list groups
/// without full links.
static AT_MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([a-zA-Z][a-zA-Z0-9_]{3,})").unwrap());

/// Telegram site paths that look like usernames but are not channels.
const RESERVED_PATHS: &[&str] = &[
    "joinchat", "share", "home", "login", "download", "features", "contact", "privacy", "faq",
    "blog", "terms", "apps", "premium",
];

/// Mention tokens that are almost always mail providers, not channels.
const MAIL_PROVIDERS: &[&str] = &["gmail", "yahoo", "hotmail", "outlook", "mail", "email"];

/// Extracts candidate Telegram links from `text`.
///
/// Invite links come back canonicalized to `https://t.me/joinchat/<id>`,
/// public links as `https://t.me/<username>`, and mentions in raw `@username`
/// form for downstream normalization.
pub fn extract_telegram_links(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    let mut push = |candidate: String| {
        if seen.insert(candidate.clone()) {
            links.push(candidate);
        }
    };

    for caps in INVITE.captures_iter(text) {
        push(format!("https://t.me/joinchat/{}", &caps[1]));
    }

    for caps in USERNAME.captures_iter(text) {
        let handle = &caps[1];
        if !RESERVED_PATHS.contains(&handle.to_lowercase().as_str()) {
            push(format!("https://t.me/{handle}"));
        }
    }

    for caps in AT_MENTION.captures_iter(text) {
        let handle = &caps[1];
        if !MAIL_PROVIDERS.contains(&handle.to_lowercase().as_str()) {
            push(format!("@{handle}"));
        }
    }

    links
}
