//! Mobile-site session scraping
//!
//! Cookie-backed commenting goes through the mobile site, which expects the
//! anti-forgery fields `fb_dtsg` and `jazoest` from the post page and a
//! comment form whose action endpoint changes between page loads. This
//! module pulls both out of raw HTML; the fetching wrappers live at the
//! bottom and handle transport and status errors.

use lazy_static::lazy_static;
use reqwest::blocking::Client;
use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::error::BackendError;

/// Base URL for the mobile site
pub const MOBILE_BASE: &str = "https://m.facebook.com";

/// Endpoint used when no comment form can be located in the page
pub const FALLBACK_COMMENT_PATH: &str = "/a/comment.php";

/// Substrings that mark a form action as a comment submission endpoint.
/// Matching is case-sensitive.
const FORM_KEYWORDS: [&str; 3] = ["comment", "composer", "add"];

lazy_static! {
    static ref INPUT_SELECTOR: Selector = Selector::parse("input").unwrap();
    static ref FORM_SELECTOR: Selector = Selector::parse("form").unwrap();
}

/// Anti-forgery fields scraped from a mobile post page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionTokens {
    pub fb_dtsg: Option<String>,
    pub jazoest: Option<String>,
}

impl SessionTokens {
    /// True when a usable `fb_dtsg` value is present. An empty value
    /// counts as missing; the server rejects it anyway.
    #[must_use]
    pub fn has_antiforgery(&self) -> bool {
        self.fb_dtsg.as_deref().is_some_and(|v| !v.is_empty())
    }
}

/// Pull `fb_dtsg` and `jazoest` out of hidden form inputs.
///
/// When the page repeats an input name, the last occurrence wins.
#[must_use]
pub fn parse_session_tokens(html: &str) -> SessionTokens {
    let doc = Html::parse_document(html);
    let mut tokens = SessionTokens::default();

    for input in doc.select(&INPUT_SELECTOR) {
        let name = match input.value().attr("name") {
            Some(name) => name,
            None => continue,
        };
        let value = input.value().attr("value").unwrap_or("").to_string();
        match name {
            "fb_dtsg" => tokens.fb_dtsg = Some(value),
            "jazoest" => tokens.jazoest = Some(value),
            _ => {}
        }
    }

    tokens
}

/// Find the first form whose action looks like a comment endpoint
#[must_use]
pub fn find_comment_form_action(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);

    for form in doc.select(&FORM_SELECTOR) {
        let action = match form.value().attr("action") {
            Some(action) => action,
            None => continue,
        };
        if FORM_KEYWORDS.iter().any(|kw| action.contains(kw)) {
            return Some(action.to_string());
        }
    }

    None
}

/// Resolve a scraped form action against the page it came from.
///
/// Site-absolute actions attach to the mobile base, full URLs pass through
/// unchanged, and anything else is joined onto the page URL.
#[must_use]
pub fn normalize_form_action(action: &str, page_url: &str) -> String {
    if action.starts_with('/') {
        format!("{}{}", MOBILE_BASE, action)
    } else if action.starts_with("http") {
        action.to_string()
    } else {
        format!("{}/{}", page_url.trim_end_matches('/'), action)
    }
}

/// Fetch a post page and scrape its anti-forgery tokens.
///
/// Transport failures are errors; a non-success HTTP status only logs a
/// warning and yields empty tokens, since the caller decides whether a
/// missing `fb_dtsg` is fatal.
pub fn fetch_session_tokens(client: &Client, url: &str) -> Result<SessionTokens, BackendError> {
    let resp = client
        .get(url)
        .send()
        .map_err(|e| BackendError::from_transport("token fetch", e))?;

    if !resp.status().is_success() {
        warn!("Token page returned HTTP {}", resp.status());
        return Ok(SessionTokens::default());
    }

    let body = resp
        .text()
        .map_err(|e| BackendError::from_transport("token fetch", e))?;
    Ok(parse_session_tokens(&body))
}

/// Fetch a post page and locate its comment submission endpoint.
///
/// The page is fetched fresh rather than reusing the token fetch, since
/// the form markup rotates between loads. Falls back to the legacy
/// endpoint when no form is found.
pub fn resolve_comment_endpoint(client: &Client, page_url: &str) -> Result<String, BackendError> {
    let resp = client
        .get(page_url)
        .send()
        .map_err(|e| BackendError::from_transport("form discovery", e))?;

    let body = resp
        .text()
        .map_err(|e| BackendError::from_transport("form discovery", e))?;

    match find_comment_form_action(&body) {
        Some(action) => Ok(normalize_form_action(&action, page_url)),
        None => {
            debug!("No comment form found, using fallback endpoint");
            Ok(format!("{}{}", MOBILE_BASE, FALLBACK_COMMENT_PATH))
        }
    }
}
