//! Post and profile ID extraction
//!
//! Facebook exposes the same post under many URL shapes. This module
//! recovers a canonical identifier from any of them using an ordered rule
//! list; rules are tried highest-priority first and the first match wins.
//!
//! # Supported post URL shapes
//!
//! - `/posts/<id>/` permalinks
//! - `groups/<group>/permalink/<post>/` (composite, both components kept)
//! - `story.php?story_fbid=<digits>`
//! - `photo.php?fbid=<digits>`
//! - `permalink.php?story_fbid=<digits>`
//! - `/videos/<id>/`
//! - any `fbid=<digits>` query parameter
//! - fallback: `<digits>_<digits>` or the first digit run in the URL path
//!
//! # Example
//!
//! ```
//! use libfbengage::extract::{extract_post_id, PostId};
//!
//! let url = "https://www.facebook.com/groups/111/permalink/222/";
//! let id = extract_post_id(url).unwrap();
//! assert_eq!(id.canonical(), "111_222");
//! assert!(matches!(id, PostId::Composite { .. }));
//! ```

use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

lazy_static! {
    // Coarse host check, not a URL validator
    static ref PLATFORM_URL: Regex =
        Regex::new(r"facebook\.com/.+|fb\.com/.+|web\.facebook\.com/.+").unwrap();

    static ref BARE_POST_ID: Regex = Regex::new(r"^\d+(_\d+)?$").unwrap();
    static ref BARE_PROFILE_ID: Regex = Regex::new(r"^\d+$").unwrap();

    // Post rules, highest priority first
    static ref POST_PERMALINK: Regex = Regex::new(r"/posts/([\w\d]+)/").unwrap();
    static ref GROUP_PERMALINK: Regex = Regex::new(r"groups/(\d+)/permalink/(\d+)/").unwrap();
    static ref STORY_FBID: Regex = Regex::new(r"story\.php\?story_fbid=(\d+)").unwrap();
    static ref PHOTO_FBID: Regex = Regex::new(r"photo\.php\?fbid=(\d+)").unwrap();
    static ref PERMALINK_STORY: Regex = Regex::new(r"permalink\.php\?story_fbid=(\d+)").unwrap();
    static ref VIDEO_ID: Regex = Regex::new(r"/videos/([0-9a-zA-Z]+)/").unwrap();
    static ref ANY_FBID: Regex = Regex::new(r"fbid=(\d+)").unwrap();

    // Path fallbacks when no rule matched
    static ref PATH_COMPOSITE: Regex = Regex::new(r"(\d+)_(\d+)").unwrap();
    static ref PATH_DIGITS: Regex = Regex::new(r"(\d+)").unwrap();

    // Profile rules, highest priority first
    static ref PROFILE_NUMERIC: Regex =
        Regex::new(r"facebook\.com/(?:profile\.php\?id=)?(\d+)").unwrap();
    static ref PROFILE_VANITY: Regex = Regex::new(r"facebook\.com/([^/?]+)").unwrap();
}

/// Canonical post identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostId {
    /// Single component: pure digits or a platform slug
    Simple(String),
    /// Two components, e.g. a group-permalink pair. Both are kept; the
    /// canonical string joins them with `_`.
    Composite { parent: String, child: String },
}

impl PostId {
    /// Canonical string form, used for cooldown keys and API paths
    #[must_use]
    pub fn canonical(&self) -> String {
        match self {
            PostId::Simple(id) => id.clone(),
            PostId::Composite { parent, child } => format!("{}_{}", parent, child),
        }
    }

    /// Accept a bare numeric or numeric-composite string as-is, without
    /// running extraction
    #[must_use]
    pub fn from_bare(text: &str) -> Option<Self> {
        if !BARE_POST_ID.is_match(text) {
            return None;
        }
        match text.split_once('_') {
            Some((parent, child)) => Some(PostId::Composite {
                parent: parent.to_string(),
                child: child.to_string(),
            }),
            None => Some(PostId::Simple(text.to_string())),
        }
    }
}

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

/// Coarse check that `text` points at one of the known host spellings.
/// Does not validate URL structure.
#[must_use]
pub fn looks_like_platform_url(text: &str) -> bool {
    PLATFORM_URL.is_match(text)
}

/// True when the input is already a canonical post identifier
/// (`^\d+(_\d+)?$`)
#[must_use]
pub fn is_bare_post_id(text: &str) -> bool {
    BARE_POST_ID.is_match(text)
}

/// True when the input is already a numeric profile identifier (`^\d+$`)
#[must_use]
pub fn is_bare_profile_id(text: &str) -> bool {
    BARE_PROFILE_ID.is_match(text)
}

/// Extract a post identifier from a URL.
///
/// Tries the rule list in priority order, then falls back to scanning the
/// URL path for raw digits. Returns `None` when nothing matches.
#[must_use]
pub fn extract_post_id(text: &str) -> Option<PostId> {
    if let Some(caps) = POST_PERMALINK.captures(text) {
        return Some(PostId::Simple(caps[1].to_string()));
    }
    if let Some(caps) = GROUP_PERMALINK.captures(text) {
        return Some(PostId::Composite {
            parent: caps[1].to_string(),
            child: caps[2].to_string(),
        });
    }
    if let Some(caps) = STORY_FBID.captures(text) {
        return Some(PostId::Simple(caps[1].to_string()));
    }
    if let Some(caps) = PHOTO_FBID.captures(text) {
        return Some(PostId::Simple(caps[1].to_string()));
    }
    if let Some(caps) = PERMALINK_STORY.captures(text) {
        return Some(PostId::Simple(caps[1].to_string()));
    }
    if let Some(caps) = VIDEO_ID.captures(text) {
        return Some(PostId::Simple(caps[1].to_string()));
    }
    if let Some(caps) = ANY_FBID.captures(text) {
        return Some(PostId::Simple(caps[1].to_string()));
    }

    // No rule matched; scan the URL path for raw digits
    let path = url_path(text);
    if let Some(caps) = PATH_COMPOSITE.captures(&path) {
        return Some(PostId::Composite {
            parent: caps[1].to_string(),
            child: caps[2].to_string(),
        });
    }
    if let Some(caps) = PATH_DIGITS.captures(&path) {
        return Some(PostId::Simple(caps[1].to_string()));
    }

    None
}

/// Extract a profile identifier from a URL.
///
/// Numeric IDs win over vanity names; `fbid=` query parameters sit in
/// between.
#[must_use]
pub fn extract_profile_id(text: &str) -> Option<String> {
    if let Some(caps) = PROFILE_NUMERIC.captures(text) {
        return Some(caps[1].to_string());
    }
    if let Some(caps) = ANY_FBID.captures(text) {
        return Some(caps[1].to_string());
    }
    if let Some(caps) = PROFILE_VANITY.captures(text) {
        return Some(caps[1].to_string());
    }

    None
}

/// Path component of `text`, or the text itself when it does not parse as
/// an absolute URL
fn url_path(text: &str) -> String {
    match Url::parse(text) {
        Ok(url) => url.path().to_string(),
        Err(_) => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Post rule tests, one per rule
    // =========================================================================

    #[test]
    fn test_post_permalink_rule() {
        let url = "https://www.facebook.com/someuser/posts/pfbid0abc123XYZ/";
        assert_eq!(
            extract_post_id(url),
            Some(PostId::Simple("pfbid0abc123XYZ".to_string()))
        );
    }

    #[test]
    fn test_group_permalink_rule_keeps_both_components() {
        let url = "https://www.facebook.com/groups/123456789/permalink/987654321/";
        assert_eq!(
            extract_post_id(url),
            Some(PostId::Composite {
                parent: "123456789".to_string(),
                child: "987654321".to_string(),
            })
        );
    }

    #[test]
    fn test_story_fbid_rule() {
        let url = "https://m.facebook.com/story.php?story_fbid=456789&id=1000123";
        assert_eq!(
            extract_post_id(url),
            Some(PostId::Simple("456789".to_string()))
        );
    }

    #[test]
    fn test_photo_fbid_rule() {
        let url = "https://www.facebook.com/photo.php?fbid=123123123";
        assert_eq!(
            extract_post_id(url),
            Some(PostId::Simple("123123123".to_string()))
        );
    }

    #[test]
    fn test_permalink_story_rule() {
        let url = "https://www.facebook.com/permalink.php?story_fbid=555666&id=777";
        assert_eq!(
            extract_post_id(url),
            Some(PostId::Simple("555666".to_string()))
        );
    }

    #[test]
    fn test_video_rule() {
        let url = "https://www.facebook.com/somepage/videos/1234abcd567/";
        assert_eq!(
            extract_post_id(url),
            Some(PostId::Simple("1234abcd567".to_string()))
        );
    }

    #[test]
    fn test_any_fbid_rule() {
        let url = "https://www.facebook.com/media/set/?fbid=111222333";
        assert_eq!(
            extract_post_id(url),
            Some(PostId::Simple("111222333".to_string()))
        );
    }

    // =========================================================================
    // Fallback path scan
    // =========================================================================

    #[test]
    fn test_fallback_composite_in_path() {
        let url = "https://www.facebook.com/123456_789012";
        assert_eq!(
            extract_post_id(url),
            Some(PostId::Composite {
                parent: "123456".to_string(),
                child: "789012".to_string(),
            })
        );
    }

    #[test]
    fn test_fallback_first_digit_run_in_path() {
        let url = "https://www.facebook.com/watch/123456789";
        assert_eq!(
            extract_post_id(url),
            Some(PostId::Simple("123456789".to_string()))
        );
    }

    #[test]
    fn test_fallback_ignores_query_digits() {
        // The fallback scans the path only, so digits in the query string
        // do not leak in
        let url = "https://www.facebook.com/watch/?v=987654";
        assert_eq!(extract_post_id(url), None);
    }

    #[test]
    fn test_fallback_on_scheme_less_input() {
        // Inputs that fail URL parsing are scanned as a raw path string
        let input = "facebook.com/123456789";
        assert_eq!(
            extract_post_id(input),
            Some(PostId::Simple("123456789".to_string()))
        );
    }

    #[test]
    fn test_unresolvable_url() {
        let url = "https://www.facebook.com/somevanityname";
        assert_eq!(extract_post_id(url), None);
    }

    // =========================================================================
    // Rule priority
    // =========================================================================

    #[test]
    fn test_posts_rule_beats_fbid_parameter() {
        let url = "https://www.facebook.com/user/posts/13579/?fbid=999999";
        assert_eq!(
            extract_post_id(url),
            Some(PostId::Simple("13579".to_string()))
        );
    }

    #[test]
    fn test_group_rule_beats_fbid_parameter() {
        let url = "https://m.facebook.com/groups/111/permalink/222/?fbid=999999";
        assert_eq!(
            extract_post_id(url),
            Some(PostId::Composite {
                parent: "111".to_string(),
                child: "222".to_string(),
            })
        );
    }

    #[test]
    fn test_story_rule_beats_fbid_parameter() {
        let url = "https://m.facebook.com/story.php?story_fbid=123&fbid=999";
        assert_eq!(extract_post_id(url), Some(PostId::Simple("123".to_string())));
    }

    #[test]
    fn test_rule_table() {
        let cases = [
            (
                "https://www.facebook.com/page/posts/246810/",
                "246810",
            ),
            (
                "https://www.facebook.com/groups/13/permalink/37/",
                "13_37",
            ),
            (
                "https://m.facebook.com/story.php?story_fbid=11223344",
                "11223344",
            ),
            (
                "https://www.facebook.com/photo.php?fbid=55667788",
                "55667788",
            ),
            (
                "https://www.facebook.com/permalink.php?story_fbid=99887766&id=4",
                "99887766",
            ),
            (
                "https://www.facebook.com/page/videos/abc999/",
                "abc999",
            ),
            (
                "https://web.facebook.com/photos/?fbid=424242",
                "424242",
            ),
            (
                "https://www.facebook.com/1111_2222",
                "1111_2222",
            ),
        ];

        for (input, expected) in cases {
            let id = extract_post_id(input)
                .unwrap_or_else(|| panic!("no ID extracted from {}", input));
            assert_eq!(id.canonical(), expected, "wrong ID for {}", input);
        }
    }

    // =========================================================================
    // Profile extraction
    // =========================================================================

    #[test]
    fn test_profile_numeric_id() {
        let url = "https://www.facebook.com/profile.php?id=100012345678901";
        assert_eq!(
            extract_profile_id(url),
            Some("100012345678901".to_string())
        );
    }

    #[test]
    fn test_profile_bare_numeric_path() {
        let url = "https://www.facebook.com/100012345678901";
        assert_eq!(
            extract_profile_id(url),
            Some("100012345678901".to_string())
        );
    }

    #[test]
    fn test_profile_fbid_parameter() {
        let url = "https://example.test/redirect?fbid=100099999";
        assert_eq!(extract_profile_id(url), Some("100099999".to_string()));
    }

    #[test]
    fn test_profile_vanity_name() {
        let url = "https://www.facebook.com/some.vanity.name";
        assert_eq!(
            extract_profile_id(url),
            Some("some.vanity.name".to_string())
        );
    }

    #[test]
    fn test_profile_vanity_stops_at_path_separator() {
        let url = "https://www.facebook.com/zuck/about";
        assert_eq!(extract_profile_id(url), Some("zuck".to_string()));
    }

    #[test]
    fn test_profile_numeric_beats_vanity() {
        let url = "https://www.facebook.com/profile.php?id=4";
        assert_eq!(extract_profile_id(url), Some("4".to_string()));
    }

    #[test]
    fn test_profile_no_match() {
        assert_eq!(extract_profile_id("https://example.com/whoever"), None);
    }

    // =========================================================================
    // Bare identifiers
    // =========================================================================

    #[test]
    fn test_bare_post_id_digits() {
        assert!(is_bare_post_id("123456789"));
        assert_eq!(
            PostId::from_bare("123456789"),
            Some(PostId::Simple("123456789".to_string()))
        );
    }

    #[test]
    fn test_bare_post_id_composite() {
        assert!(is_bare_post_id("123_456"));
        assert_eq!(
            PostId::from_bare("123_456"),
            Some(PostId::Composite {
                parent: "123".to_string(),
                child: "456".to_string(),
            })
        );
    }

    #[test]
    fn test_bare_post_id_rejects_urls_and_slugs() {
        assert!(!is_bare_post_id("https://facebook.com/123"));
        assert!(!is_bare_post_id("123_456_789"));
        assert!(!is_bare_post_id("abc123"));
        assert!(!is_bare_post_id(""));
        assert_eq!(PostId::from_bare("abc123"), None);
    }

    #[test]
    fn test_bare_profile_id_is_digits_only() {
        assert!(is_bare_profile_id("100012345678901"));
        assert!(!is_bare_profile_id("123_456"));
        assert!(!is_bare_profile_id("zuck"));
    }

    // =========================================================================
    // Host check
    // =========================================================================

    #[test]
    fn test_looks_like_platform_url_known_hosts() {
        assert!(looks_like_platform_url("https://www.facebook.com/x"));
        assert!(looks_like_platform_url("https://fb.com/x"));
        assert!(looks_like_platform_url("https://web.facebook.com/x"));
        assert!(looks_like_platform_url("facebook.com/groups/1/permalink/2/"));
    }

    #[test]
    fn test_looks_like_platform_url_rejects_other_hosts() {
        assert!(!looks_like_platform_url("https://example.com/facebook"));
        assert!(!looks_like_platform_url("123456789"));
        assert!(!looks_like_platform_url("https://facebook.com"));
    }

    // =========================================================================
    // Canonical form
    // =========================================================================

    #[test]
    fn test_canonical_display_matches() {
        let composite = PostId::Composite {
            parent: "11".to_string(),
            child: "22".to_string(),
        };
        assert_eq!(composite.canonical(), "11_22");
        assert_eq!(composite.to_string(), "11_22");

        let simple = PostId::Simple("4455".to_string());
        assert_eq!(simple.canonical(), "4455");
        assert_eq!(simple.to_string(), "4455");
    }
}
