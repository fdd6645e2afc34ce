//! Fbengage - interactive engagement console for Facebook accounts you own
//!
//! This library provides the core functionality for commenting, reacting,
//! following and credential validation through either the Graph API or a
//! cookie-backed browser session, with per-post comment cooldowns and
//! persistent run statistics.

pub mod backends;
pub mod config;
pub mod cooldown;
pub mod dispatcher;
pub mod error;
pub mod extract;
pub mod scrape;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use backends::{create_backend, Backend};
pub use config::Config;
pub use cooldown::{CooldownGate, CooldownStatus};
pub use dispatcher::{Dispatcher, Outcome};
pub use error::{EngageError, Result};
pub use extract::PostId;
pub use store::{StateStore, Stats};
pub use types::{AccountInfo, Action, Credential, PostTarget, Reaction};
