//! Cooldown gating for repeat comments
//!
//! Tracks when an identifier was last commented on and blocks further
//! comments until the window elapses. Only the comment action consults
//! this gate; reactions and follows go straight through.

use crate::error::Result;
use crate::store::StateStore;

/// Result of a cooldown lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownStatus {
    pub in_cooldown: bool,
    /// Whole minutes left, rounded up so the message never understates
    /// the wait
    pub remaining_minutes: i64,
}

/// Seconds left on a window that started at `last_timestamp`; zero once
/// the window has elapsed, never negative
#[must_use]
pub fn remaining_cooldown(last_timestamp: i64, now: i64, window: i64) -> i64 {
    let elapsed = now - last_timestamp;
    (window - elapsed).max(0)
}

/// Cooldown gate with one fixed window shared by all identifiers
#[derive(Debug, Clone)]
pub struct CooldownGate {
    window: i64,
}

impl CooldownGate {
    pub fn new(window_secs: i64) -> Self {
        Self {
            window: window_secs,
        }
    }

    pub fn window_secs(&self) -> i64 {
        self.window
    }

    /// Look up the cooldown state for `id` at time `now`
    pub fn status(&self, store: &StateStore, id: &str, now: i64) -> CooldownStatus {
        let remaining = match store.last_used(id) {
            Some(last) => remaining_cooldown(last, now, self.window),
            None => 0,
        };

        CooldownStatus {
            in_cooldown: remaining > 0,
            remaining_minutes: (remaining + 59) / 60,
        }
    }

    /// Record that `id` was just actioned. Overwrites any prior record and
    /// flushes the whole document.
    pub fn mark_used(&self, store: &mut StateStore, id: &str, now: i64) -> Result<()> {
        store.set_last_used(id, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, StateStore) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("engagement.json");
        let store = StateStore::open(&path).unwrap();
        (temp_dir, store)
    }

    // =========================================================================
    // remaining_cooldown
    // =========================================================================

    #[test]
    fn test_remaining_mid_window() {
        let t = 1_700_000_000;
        assert_eq!(remaining_cooldown(t, t + 300, 600), 300);
    }

    #[test]
    fn test_remaining_after_window_is_zero() {
        let t = 1_700_000_000;
        assert_eq!(remaining_cooldown(t, t + 900, 600), 0);
    }

    #[test]
    fn test_remaining_never_negative() {
        let t = 1_700_000_000;
        assert_eq!(remaining_cooldown(t, t + 100_000, 600), 0);
    }

    #[test]
    fn test_remaining_at_exact_boundary() {
        let t = 1_700_000_000;
        // At exactly `window` elapsed the cooldown is over
        assert_eq!(remaining_cooldown(t, t + 600, 600), 0);
        assert_eq!(remaining_cooldown(t, t + 599, 600), 1);
    }

    #[test]
    fn test_remaining_at_mark_time_is_full_window() {
        let t = 1_700_000_000;
        assert_eq!(remaining_cooldown(t, t, 600), 600);
    }

    // =========================================================================
    // CooldownGate::status
    // =========================================================================

    #[test]
    fn test_status_unknown_id_not_in_cooldown() {
        let (_temp, store) = temp_store();
        let gate = CooldownGate::new(600);

        let status = gate.status(&store, "12345", 1_700_000_000);
        assert!(!status.in_cooldown);
        assert_eq!(status.remaining_minutes, 0);
    }

    #[test]
    fn test_status_minutes_round_up() {
        let (_temp, mut store) = temp_store();
        // 601 seconds remaining must report as 11 minutes, not 10
        let gate = CooldownGate::new(1_000);
        let t = 1_700_000_000;
        store.set_last_used("12345", t).unwrap();

        let status = gate.status(&store, "12345", t + 399);
        assert!(status.in_cooldown);
        assert_eq!(status.remaining_minutes, 11);
    }

    #[test]
    fn test_status_exact_minutes_do_not_round() {
        let (_temp, mut store) = temp_store();
        let gate = CooldownGate::new(600);
        let t = 1_700_000_000;
        store.set_last_used("12345", t).unwrap();

        // 120 seconds remaining is exactly 2 minutes
        let status = gate.status(&store, "12345", t + 480);
        assert_eq!(status.remaining_minutes, 2);
    }

    #[test]
    fn test_status_immediately_after_mark() {
        let (_temp, mut store) = temp_store();
        let gate = CooldownGate::new(600);
        let t = 1_700_000_000;

        gate.mark_used(&mut store, "12345", t).unwrap();

        let status = gate.status(&store, "12345", t);
        assert!(status.in_cooldown);
        // ceil(600 / 60) = 10
        assert_eq!(status.remaining_minutes, 10);
    }

    #[test]
    fn test_status_expired_record() {
        let (_temp, mut store) = temp_store();
        let gate = CooldownGate::new(600);
        let t = 1_700_000_000;

        gate.mark_used(&mut store, "12345", t).unwrap();

        let status = gate.status(&store, "12345", t + 600);
        assert!(!status.in_cooldown);
        assert_eq!(status.remaining_minutes, 0);
    }

    #[test]
    fn test_gate_window_from_config_value() {
        let gate = CooldownGate::new(120);
        assert_eq!(gate.window_secs(), 120);
    }

    // =========================================================================
    // CooldownGate::mark_used
    // =========================================================================

    #[test]
    fn test_mark_used_overwrites_and_persists() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("engagement.json");
        let mut store = StateStore::open(&path).unwrap();
        let gate = CooldownGate::new(600);

        gate.mark_used(&mut store, "12345", 1_000).unwrap();
        gate.mark_used(&mut store, "12345", 5_000).unwrap();

        // The rewrite is visible to a fresh load
        let reloaded = StateStore::open(&path).unwrap();
        assert_eq!(reloaded.last_used("12345"), Some(5_000));
    }

    #[test]
    fn test_identifiers_cool_down_independently() {
        let (_temp, mut store) = temp_store();
        let gate = CooldownGate::new(600);
        let t = 1_700_000_000;

        gate.mark_used(&mut store, "111", t).unwrap();

        assert!(gate.status(&store, "111", t + 10).in_cooldown);
        assert!(!gate.status(&store, "222", t + 10).in_cooldown);
    }
}
