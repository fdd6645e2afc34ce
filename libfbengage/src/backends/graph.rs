//! Graph API backend
//!
//! Drives the official Graph API with a user access token. This is the
//! full-capability backend: commenting, reacting, following and credential
//! validation all work here, subject to the permissions granted to the
//! token.

use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

use crate::backends::Backend;
use crate::config::Config;
use crate::error::BackendError;
use crate::types::{AccountInfo, PostTarget, Reaction};

/// Base URL for Graph API calls
pub const GRAPH_BASE: &str = "https://graph.facebook.com";

/// Access-token backend speaking the Graph API
pub struct GraphBackend {
    /// Blocking HTTP client, configured from [`Config::http`]
    client: Client,

    /// User access token, sent with every request
    token: String,
}

impl GraphBackend {
    /// Create a Graph API backend from an access token.
    ///
    /// # Arguments
    ///
    /// * `token` - A user access token with the permissions the intended
    ///   actions need
    /// * `config` - Source of the user agent and request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use libfbengage::backends::{Backend, GraphBackend};
    /// use libfbengage::config::Config;
    ///
    /// let config = Config::default();
    /// let backend = GraphBackend::new("EAAF...".to_string(), &config)?;
    /// let account = backend.validate()?;
    /// println!("Token belongs to {}", account.id);
    /// # Ok::<(), libfbengage::error::BackendError>(())
    /// ```
    pub fn new(token: String, config: &Config) -> Result<Self, BackendError> {
        let client = Client::builder()
            .user_agent(&config.http.user_agent)
            .timeout(Duration::from_secs(config.http.timeout_secs))
            .build()
            .map_err(|e| BackendError::from_transport("client build", e))?;

        Ok(Self { client, token })
    }

    /// POST a form to a Graph API edge and classify the outcome.
    ///
    /// `require_id` enforces the comment contract, where the API signals
    /// success by echoing the new object's ID rather than by status alone.
    fn post_edge(
        &self,
        context: &str,
        object_id: &str,
        edge: &str,
        fields: &[(&str, &str)],
        require_id: bool,
    ) -> Result<(), BackendError> {
        let url = format!("{}/{}/{}", GRAPH_BASE, object_id, edge);
        debug!("POST {}", url);

        let mut form: Vec<(&str, &str)> = vec![("access_token", self.token.as_str())];
        form.extend_from_slice(fields);

        let resp = self
            .client
            .post(&url)
            .form(&form)
            .send()
            .map_err(|e| BackendError::from_transport(context, e))?;

        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| BackendError::from_transport(context, e))?;

        let ok = if require_id {
            status.is_success() && body_has_id(&body)
        } else {
            status.is_success()
        };

        if ok {
            Ok(())
        } else {
            Err(classify_failure(context, status, &body))
        }
    }
}

impl Backend for GraphBackend {
    fn name(&self) -> &str {
        "graph"
    }

    fn comment(&self, target: &PostTarget, message: &str) -> Result<(), BackendError> {
        self.post_edge(
            "comment",
            &target.id.canonical(),
            "comments",
            &[("message", message)],
            true,
        )
    }

    fn react(&self, target: &PostTarget, reaction: Reaction) -> Result<(), BackendError> {
        self.post_edge(
            "react",
            &target.id.canonical(),
            "reactions",
            &[("type", reaction.as_str())],
            false,
        )
    }

    fn follow(&self, profile_id: &str) -> Result<(), BackendError> {
        self.post_edge("follow", profile_id, "subscribers", &[], false)
    }

    fn validate(&self) -> Result<AccountInfo, BackendError> {
        let url = format!("{}/me", GRAPH_BASE);
        debug!("GET {}", url);

        let resp = self
            .client
            .get(&url)
            .query(&[("fields", "id,name"), ("access_token", self.token.as_str())])
            .send()
            .map_err(|e| BackendError::from_transport("validate", e))?;

        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| BackendError::from_transport("validate", e))?;

        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
        match parsed.get("id").and_then(|v| v.as_str()) {
            Some(id) => Ok(AccountInfo {
                id: id.to_string(),
                name: parsed
                    .get("name")
                    .and_then(|v| v.as_str())
                    .map(String::from),
            }),
            None => {
                let detail = graph_error_message(&body)
                    .unwrap_or_else(|| format!("credential rejected (HTTP {})", status));
                Err(BackendError::Authentication(detail))
            }
        }
    }
}

/// True when a response body is a JSON object carrying an `id` field
fn body_has_id(body: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(body)
        .map(|v| v.get("id").is_some())
        .unwrap_or(false)
}

/// Pull the human-readable message out of a Graph API error envelope
/// (`{"error": {"message": ...}}`)
fn graph_error_message(body: &str) -> Option<String> {
    let parsed: serde_json::Value = serde_json::from_str(body).ok()?;
    parsed
        .get("error")?
        .get("message")?
        .as_str()
        .map(String::from)
}

/// Map a failed Graph API response to a backend error.
///
/// 401 and 403 become authentication errors so callers can exit with the
/// credential-specific code; everything else is an API error carrying the
/// server's message when one is present.
fn classify_failure(context: &str, status: StatusCode, body: &str) -> BackendError {
    let detail = graph_error_message(body).unwrap_or_else(|| format!("HTTP {}", status));
    match status.as_u16() {
        401 | 403 => BackendError::Authentication(format!("{}: {}", context, detail)),
        _ => BackendError::Api(format!("{}: {}", context, detail)),
    }
}
