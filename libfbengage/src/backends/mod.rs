//! Engagement backends
//!
//! A backend turns an action into HTTP calls against one credential kind.
//! Two implementations exist: [`GraphBackend`] drives the Graph API with an
//! access token and supports every action, [`WebBackend`] drives the mobile
//! site with session cookies and only supports commenting.
//!
//! Callers should check [`Backend::supports`] before invoking an action;
//! the default method bodies return [`BackendError::NotImplemented`] as a
//! backstop for direct use.

pub mod graph;
pub mod web;

pub mod mock;

pub use graph::GraphBackend;
pub use web::WebBackend;

use crate::config::Config;
use crate::error::BackendError;
use crate::types::{AccountInfo, Action, Credential, PostTarget, Reaction};

/// One credential kind's view of the engagement operations
pub trait Backend {
    /// Short backend name for logs and messages
    fn name(&self) -> &str;

    /// Whether this backend can perform `action` at all. Checked before
    /// dispatch so unsupported actions never reach the network.
    fn supports(&self, _action: Action) -> bool {
        true
    }

    /// Leave a comment on a post
    fn comment(&self, target: &PostTarget, message: &str) -> Result<(), BackendError>;

    /// React to a post
    fn react(&self, _target: &PostTarget, _reaction: Reaction) -> Result<(), BackendError> {
        Err(BackendError::NotImplemented(format!(
            "{} backend does not support reactions",
            self.name()
        )))
    }

    /// Follow a profile or page
    fn follow(&self, _profile_id: &str) -> Result<(), BackendError> {
        Err(BackendError::NotImplemented(format!(
            "{} backend does not support following",
            self.name()
        )))
    }

    /// Check the credential and return the account it belongs to
    fn validate(&self) -> Result<AccountInfo, BackendError> {
        Err(BackendError::NotImplemented(format!(
            "{} backend does not support validation",
            self.name()
        )))
    }
}

/// Build the backend matching a credential kind
pub fn create_backend(
    credential: Credential,
    config: &Config,
) -> Result<Box<dyn Backend>, BackendError> {
    match credential {
        Credential::Token(token) => Ok(Box::new(GraphBackend::new(token, config)?)),
        Credential::Cookies(raw) => Ok(Box::new(WebBackend::new(&raw, config)?)),
    }
}
