//! Browser-session backend
//!
//! Drives the mobile site with session cookies lifted from a logged-in
//! browser. Cookies arrive either as a raw `Cookie:` header string or as
//! an appstate JSON export; both reduce to name/value pairs loaded into
//! the client's cookie jar.
//!
//! Only commenting is supported here. The other actions would need the
//! full browser-automation stack, so [`Backend::supports`] reports them as
//! unavailable and they never reach the network.

use lazy_static::lazy_static;
use reqwest::blocking::Client;
use reqwest::cookie::Jar;
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::backends::Backend;
use crate::config::Config;
use crate::error::BackendError;
use crate::scrape::{fetch_session_tokens, resolve_comment_endpoint, MOBILE_BASE};
use crate::types::{Action, PostTarget};

lazy_static! {
    static ref COOKIE_ORIGIN: reqwest::Url = "https://facebook.com".parse().unwrap();
}

/// Cookie-session backend speaking to the mobile site
#[derive(Debug)]
pub struct WebBackend {
    client: Client,
}

impl WebBackend {
    /// Create a web backend from raw cookie input.
    ///
    /// # Errors
    ///
    /// Returns an authentication error when no cookie pairs can be parsed
    /// from the input, and a network error if the HTTP client cannot be
    /// constructed.
    pub fn new(raw_cookies: &str, config: &Config) -> Result<Self, BackendError> {
        let pairs = parse_cookie_pairs(raw_cookies);
        if pairs.is_empty() {
            return Err(BackendError::Authentication(
                "No cookies could be parsed from the input".to_string(),
            ));
        }
        debug!("Loaded {} cookies into session jar", pairs.len());

        let jar = Arc::new(Jar::default());
        for (name, value) in &pairs {
            let cookie = format!("{}={}; Domain=.facebook.com; Path=/", name, value);
            jar.add_cookie_str(&cookie, &COOKIE_ORIGIN);
        }

        let client = Client::builder()
            .user_agent(&config.http.user_agent)
            .timeout(Duration::from_secs(config.http.timeout_secs))
            .cookie_provider(jar)
            .build()
            .map_err(|e| BackendError::from_transport("client build", e))?;

        Ok(Self { client })
    }

    /// Page to scrape tokens and forms from. The original URL is preferred
    /// when the target came from one, since tokens must match the page the
    /// comment lands on; bare IDs get a mobile permalink built for them.
    fn page_url(target: &PostTarget) -> String {
        target
            .source_url
            .as_deref()
            .filter(|u| u.starts_with("http"))
            .map(String::from)
            .unwrap_or_else(|| format!("{}/{}", MOBILE_BASE, target.id.canonical()))
    }
}

impl Backend for WebBackend {
    fn name(&self) -> &str {
        "web"
    }

    fn supports(&self, action: Action) -> bool {
        matches!(action, Action::Comment)
    }

    fn comment(&self, target: &PostTarget, message: &str) -> Result<(), BackendError> {
        let page_url = Self::page_url(target);

        let tokens = fetch_session_tokens(&self.client, &page_url)?;
        if !tokens.has_antiforgery() {
            return Err(BackendError::Scrape(
                "no fb_dtsg token in page, cookies may be expired or invalid".to_string(),
            ));
        }

        let endpoint = resolve_comment_endpoint(&self.client, &page_url)?;
        debug!("Submitting comment to {}", endpoint);

        let fb_dtsg = tokens.fb_dtsg.unwrap_or_default();
        let jazoest = tokens.jazoest.unwrap_or_default();
        let form = [
            ("fb_dtsg", fb_dtsg.as_str()),
            ("jazoest", jazoest.as_str()),
            ("comment_text", message),
            ("submit", "Send"),
        ];

        let resp = self
            .client
            .post(&endpoint)
            .form(&form)
            .send()
            .map_err(|e| BackendError::from_transport("comment", e))?;

        let status = resp.status();
        if comment_accepted(status) {
            Ok(())
        } else {
            Err(BackendError::Api(format!(
                "comment rejected (HTTP {})",
                status
            )))
        }
    }
}

/// Reduce raw cookie input to name/value pairs.
///
/// Accepts a `Cookie:` header string (`name=value; name=value`) or an
/// appstate JSON array of `{"key"/"name": ..., "value": ...}` objects.
/// Malformed segments and entries are dropped rather than failing the
/// whole parse.
#[must_use]
pub fn parse_cookie_pairs(raw: &str) -> Vec<(String, String)> {
    let trimmed = raw.trim();

    if trimmed.starts_with('[') {
        if let Ok(serde_json::Value::Array(entries)) = serde_json::from_str(trimmed) {
            return entries.iter().filter_map(appstate_entry).collect();
        }
    }

    trimmed
        .split(';')
        .filter_map(|segment| {
            let (name, value) = segment.trim().split_once('=')?;
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}

/// One appstate entry. Both `key` and `name` spellings occur in exports.
fn appstate_entry(entry: &serde_json::Value) -> Option<(String, String)> {
    let name = entry.get("key").or_else(|| entry.get("name"))?.as_str()?;
    let value = entry.get("value")?.as_str()?;
    Some((name.to_string(), value.to_string()))
}

/// An accepted comment submission answers with the post page (200) or a
/// redirect back to it (302); any other status, 2xx included, is a
/// rejection
fn comment_accepted(status: StatusCode) -> bool {
    matches!(status.as_u16(), 200 | 302)
}
