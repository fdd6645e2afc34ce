//! Action dispatch
//!
//! Every engagement action flows through one pipeline: resolve the target,
//! check the per-post cooldown (comments only), check that the backend
//! supports the action, execute it, and record the attempt. Inputs that
//! fail resolution and actions the backend cannot perform stop before the
//! network and before the stats counters.
//!
//! Backend failures are part of the normal flow and come back as
//! [`Outcome::Failure`]; only storage problems surface as errors.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::backends::Backend;
use crate::cooldown::CooldownGate;
use crate::error::{BackendError, Result};
use crate::extract::{
    extract_post_id, extract_profile_id, is_bare_profile_id, looks_like_platform_url, PostId,
};
use crate::store::StateStore;
use crate::types::{AccountInfo, Action, PostTarget, Reaction};

/// Result of dispatching a single action
#[derive(Debug)]
pub enum Outcome {
    /// The backend performed the action. `account` is set by validation.
    Success { account: Option<AccountInfo> },

    /// The backend tried and failed. Already counted as a failed run.
    Failure { error: BackendError },

    /// The post was commented on too recently. Nothing was sent or
    /// recorded.
    CooldownActive { remaining_minutes: i64 },

    /// The input did not resolve to a target. Nothing was sent or
    /// recorded.
    Rejected { reason: String },

    /// The backend does not support this action. Nothing was sent or
    /// recorded.
    Unsupported { backend: String, action: Action },
}

impl Outcome {
    /// True only for [`Outcome::Success`]
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }
}

/// Dispatches actions against one backend, one store and one cooldown gate
pub struct Dispatcher {
    backend: Box<dyn Backend>,
    store: Arc<Mutex<StateStore>>,
    gate: CooldownGate,
}

impl Dispatcher {
    /// Create a dispatcher.
    ///
    /// The store is shared so interrupt handlers and UI code can read and
    /// flush it independently.
    pub fn new(backend: Box<dyn Backend>, store: Arc<Mutex<StateStore>>, gate: CooldownGate) -> Self {
        Self {
            backend,
            store,
            gate,
        }
    }

    /// Name of the backend this dispatcher drives
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Comment on a post.
    ///
    /// `input` may be a bare post ID, a composite ID or a post URL. The
    /// post's cooldown is checked first and marked on success.
    pub fn comment(&self, input: &str, message: &str) -> Result<Outcome> {
        let target = match resolve_post_target(input) {
            Ok(target) => target,
            Err(reason) => return Ok(reject(Action::Comment, reason)),
        };

        let key = target.id.canonical();
        {
            let store = self.store.lock().unwrap();
            let status = self.gate.status(&store, &key, Utc::now().timestamp());
            if status.in_cooldown {
                info!(
                    "Post {} was commented on recently, {} minute(s) left",
                    key, status.remaining_minutes
                );
                return Ok(Outcome::CooldownActive {
                    remaining_minutes: status.remaining_minutes,
                });
            }
        }

        if let Some(unsupported) = self.check_supported(Action::Comment) {
            return Ok(unsupported);
        }

        info!("Commenting on {} via {} backend", key, self.backend.name());
        let result = self.backend.comment(&target, message);

        let mut store = self.store.lock().unwrap();
        store.record_attempt(result.is_ok())?;
        match result {
            Ok(()) => {
                self.gate
                    .mark_used(&mut store, &key, Utc::now().timestamp())?;
                Ok(Outcome::Success { account: None })
            }
            Err(error) => {
                warn!("Comment on {} failed: {}", key, error);
                Ok(Outcome::Failure { error })
            }
        }
    }

    /// React to a post. Reactions are not subject to the cooldown.
    pub fn react(&self, input: &str, reaction: Reaction) -> Result<Outcome> {
        let target = match resolve_post_target(input) {
            Ok(target) => target,
            Err(reason) => return Ok(reject(Action::React, reason)),
        };

        if let Some(unsupported) = self.check_supported(Action::React) {
            return Ok(unsupported);
        }

        info!("Reacting {} to {}", reaction, target.id);
        let result = self.backend.react(&target, reaction);
        self.record(result)
    }

    /// Follow a profile or page
    pub fn follow(&self, input: &str) -> Result<Outcome> {
        let profile = match resolve_profile_target(input) {
            Ok(profile) => profile,
            Err(reason) => return Ok(reject(Action::Follow, reason)),
        };

        if let Some(unsupported) = self.check_supported(Action::Follow) {
            return Ok(unsupported);
        }

        info!("Following {}", profile);
        let result = self.backend.follow(&profile);
        self.record(result)
    }

    /// Check the credential and report the account it belongs to
    pub fn validate(&self) -> Result<Outcome> {
        if let Some(unsupported) = self.check_supported(Action::Validate) {
            return Ok(unsupported);
        }

        info!("Validating credential via {} backend", self.backend.name());
        let result = self.backend.validate();

        let mut store = self.store.lock().unwrap();
        store.record_attempt(result.is_ok())?;
        match result {
            Ok(account) => Ok(Outcome::Success {
                account: Some(account),
            }),
            Err(error) => {
                warn!("Validation failed: {}", error);
                Ok(Outcome::Failure { error })
            }
        }
    }

    fn check_supported(&self, action: Action) -> Option<Outcome> {
        if self.backend.supports(action) {
            None
        } else {
            info!(
                "{} backend does not support the {} action",
                self.backend.name(),
                action
            );
            Some(Outcome::Unsupported {
                backend: self.backend.name().to_string(),
                action,
            })
        }
    }

    fn record(&self, result: std::result::Result<(), BackendError>) -> Result<Outcome> {
        let mut store = self.store.lock().unwrap();
        store.record_attempt(result.is_ok())?;
        match result {
            Ok(()) => Ok(Outcome::Success { account: None }),
            Err(error) => {
                warn!("Action failed: {}", error);
                Ok(Outcome::Failure { error })
            }
        }
    }
}

fn reject(action: Action, reason: String) -> Outcome {
    debug!("Rejected {} input: {}", action, reason);
    Outcome::Rejected { reason }
}

/// Turn user input into a post target, or a rejection reason
fn resolve_post_target(input: &str) -> std::result::Result<PostTarget, String> {
    let trimmed = input.trim();

    if let Some(id) = PostId::from_bare(trimmed) {
        return Ok(PostTarget::new(id, None));
    }

    if looks_like_platform_url(trimmed) {
        return match extract_post_id(trimmed) {
            Some(id) => Ok(PostTarget::new(id, Some(trimmed.to_string()))),
            None => Err("no post ID found in the URL".to_string()),
        };
    }

    Err("input is not a post ID or a facebook.com URL".to_string())
}

/// Turn user input into a profile identifier, or a rejection reason
fn resolve_profile_target(input: &str) -> std::result::Result<String, String> {
    let trimmed = input.trim();

    if is_bare_profile_id(trimmed) {
        return Ok(trimmed.to_string());
    }

    if looks_like_platform_url(trimmed) {
        return match extract_profile_id(trimmed) {
            Some(profile) => Ok(profile),
            None => Err("no profile found in the URL".to_string()),
        };
    }

    Err("input is not a numeric profile ID or a facebook.com URL".to_string())
}
