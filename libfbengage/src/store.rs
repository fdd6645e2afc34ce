//! Persistent engagement state
//!
//! One JSON document holds the cooldown map and the lifetime stats
//! counters. It is loaded once at startup, mutated in memory, and
//! rewritten in full after every state-changing action. There is no dirty
//! tracking and no batching; a mutation is durable as soon as the method
//! returns.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, StoreError};

/// Lifetime action counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub runs: u64,
    pub success: u64,
    pub fail: u64,
}

/// The on-disk document: cooldown timestamps plus stats.
///
/// Cooldowns are keyed by canonical identifier. A `BTreeMap` keeps the
/// serialized key order stable across rewrites.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDocument {
    #[serde(default)]
    pub cooldowns: BTreeMap<String, i64>,
    #[serde(default)]
    pub stats: Stats,
}

/// Owned handle to the persistent document
#[derive(Debug)]
pub struct StateStore {
    path: PathBuf,
    doc: StateDocument,
}

impl StateStore {
    /// Open the store at `path`, loading the existing document or starting
    /// from an empty one when the file does not exist
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let doc = if path.exists() {
            let content = fs::read_to_string(&path).map_err(StoreError::ReadError)?;
            serde_json::from_str(&content).map_err(StoreError::Json)?
        } else {
            StateDocument::default()
        };
        debug!(
            "Opened state store at {} ({} cooldown records)",
            path.display(),
            doc.cooldowns.len()
        );
        Ok(Self { path, doc })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn stats(&self) -> &Stats {
        &self.doc.stats
    }

    pub fn cooldowns(&self) -> &BTreeMap<String, i64> {
        &self.doc.cooldowns
    }

    pub fn document(&self) -> &StateDocument {
        &self.doc
    }

    /// Timestamp of the last recorded action for `id`, if any
    pub fn last_used(&self, id: &str) -> Option<i64> {
        self.doc.cooldowns.get(id).copied()
    }

    /// Overwrite the cooldown record for `id` and flush
    pub fn set_last_used(&mut self, id: &str, timestamp: i64) -> Result<()> {
        self.doc.cooldowns.insert(id.to_string(), timestamp);
        self.flush()
    }

    /// Count one attempt into the stats and flush. `runs` always moves;
    /// exactly one of `success`/`fail` moves with it.
    pub fn record_attempt(&mut self, success: bool) -> Result<()> {
        self.doc.stats.runs += 1;
        if success {
            self.doc.stats.success += 1;
        } else {
            self.doc.stats.fail += 1;
        }
        self.flush()
    }

    /// Rewrite the whole document at its path
    pub fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(StoreError::WriteError)?;
            }
        }

        let content = serde_json::to_string_pretty(&self.doc).map_err(StoreError::Json)?;
        fs::write(&self.path, content).map_err(StoreError::WriteError)?;
        debug!("Flushed state to {}", self.path.display());
        Ok(())
    }
}
