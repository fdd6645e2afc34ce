//! Mock backend for testing
//!
//! A configurable backend that records every call and returns scripted
//! results, so dispatch logic can be tested without credentials or network
//! access. Shared call counters survive moving the backend into a
//! dispatcher: clone the config first and inspect the clone afterwards.

use std::sync::{Arc, Mutex};

use crate::backends::Backend;
use crate::error::BackendError;
use crate::types::{AccountInfo, Action, PostTarget, Reaction};

/// Configuration for mock backend behavior
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Backend name reported by `name()`
    pub name: String,

    /// When set, only `Action::Comment` is reported as supported
    pub comment_only: bool,

    /// Whether actions succeed
    pub succeeds: bool,

    /// Error returned when `succeeds` is false
    pub error: BackendError,

    /// Account returned by a successful `validate`
    pub account: AccountInfo,

    /// Number of times each action has been called
    pub comment_calls: Arc<Mutex<usize>>,
    pub react_calls: Arc<Mutex<usize>>,
    pub follow_calls: Arc<Mutex<usize>>,
    pub validate_calls: Arc<Mutex<usize>>,

    /// Comments that were submitted, as (canonical ID, message) pairs
    pub comments: Arc<Mutex<Vec<(String, String)>>>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            name: "mock".to_string(),
            comment_only: false,
            succeeds: true,
            error: BackendError::Api("mock failure".to_string()),
            account: AccountInfo {
                id: "100000000000001".to_string(),
                name: Some("Mock Account".to_string()),
            },
            comment_calls: Arc::new(Mutex::new(0)),
            react_calls: Arc::new(Mutex::new(0)),
            follow_calls: Arc::new(Mutex::new(0)),
            validate_calls: Arc::new(Mutex::new(0)),
            comments: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl MockConfig {
    /// Total calls across all actions
    pub fn total_calls(&self) -> usize {
        *self.comment_calls.lock().unwrap()
            + *self.react_calls.lock().unwrap()
            + *self.follow_calls.lock().unwrap()
            + *self.validate_calls.lock().unwrap()
    }
}

/// Mock backend for testing
pub struct MockBackend {
    config: MockConfig,
}

impl MockBackend {
    /// Create a mock backend with the given configuration
    pub fn new(config: MockConfig) -> Self {
        Self { config }
    }

    /// Create a mock backend where every action succeeds
    pub fn success(name: &str) -> Self {
        Self::new(MockConfig {
            name: name.to_string(),
            ..Default::default()
        })
    }

    /// Create a mock backend where every action fails with `error`
    pub fn failing(name: &str, error: BackendError) -> Self {
        Self::new(MockConfig {
            name: name.to_string(),
            succeeds: false,
            error,
            ..Default::default()
        })
    }

    /// Create a mock backend that only supports commenting
    pub fn comment_only(name: &str) -> Self {
        Self::new(MockConfig {
            name: name.to_string(),
            comment_only: true,
            ..Default::default()
        })
    }

    /// Shared handle to this mock's configuration and counters
    pub fn config(&self) -> MockConfig {
        self.config.clone()
    }

    /// Number of times `comment` was called
    pub fn comment_call_count(&self) -> usize {
        *self.config.comment_calls.lock().unwrap()
    }

    /// Comments submitted so far
    pub fn submitted_comments(&self) -> Vec<(String, String)> {
        self.config.comments.lock().unwrap().clone()
    }

    fn outcome(&self) -> Result<(), BackendError> {
        if self.config.succeeds {
            Ok(())
        } else {
            Err(self.config.error.clone())
        }
    }
}

impl Backend for MockBackend {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn supports(&self, action: Action) -> bool {
        if self.config.comment_only {
            matches!(action, Action::Comment)
        } else {
            true
        }
    }

    fn comment(&self, target: &PostTarget, message: &str) -> Result<(), BackendError> {
        *self.config.comment_calls.lock().unwrap() += 1;
        self.config
            .comments
            .lock()
            .unwrap()
            .push((target.id.canonical(), message.to_string()));
        self.outcome()
    }

    fn react(&self, _target: &PostTarget, _reaction: Reaction) -> Result<(), BackendError> {
        *self.config.react_calls.lock().unwrap() += 1;
        self.outcome()
    }

    fn follow(&self, _profile_id: &str) -> Result<(), BackendError> {
        *self.config.follow_calls.lock().unwrap() += 1;
        self.outcome()
    }

    fn validate(&self) -> Result<AccountInfo, BackendError> {
        *self.config.validate_calls.lock().unwrap() += 1;
        if self.config.succeeds {
            Ok(self.config.account.clone())
        } else {
            Err(self.config.error.clone())
        }
    }
}
