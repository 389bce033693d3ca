//! Update Throttle & Dismissal Tracker
//!
//! Decides whether a check is due and whether a given version was
//! previously dismissed. Both facts live in the shared key-value store and
//! survive restarts.

use crate::prefs::KeyValueStore;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

/// Persisted key: string-encoded epoch milliseconds of the last check.
pub const LAST_CHECK_KEY: &str = "last_update_check";

/// Persisted key: raw tag of the most recently dismissed release.
pub const DISMISSED_KEY: &str = "dismissed_version";

pub struct UpdateTracker {
    prefs: Arc<dyn KeyValueStore>,
    interval: Duration,
    prefix: String,
}

impl UpdateTracker {
    pub fn new(prefs: Arc<dyn KeyValueStore>, interval: Duration, prefix: String) -> Self {
        Self {
            prefs,
            interval,
            prefix,
        }
    }

    fn key(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    /// True if `force`, if no check was ever recorded, or if the throttle
    /// window has elapsed. An unreadable timestamp counts as never checked.
    pub fn is_check_due(&self, force: bool) -> bool {
        if force {
            return true;
        }
        let Some(raw) = self.prefs.get(&self.key(LAST_CHECK_KEY)) else {
            return true;
        };
        let Ok(last_ms) = raw.parse::<i64>() else {
            return true;
        };
        let elapsed_ms = Utc::now().timestamp_millis().saturating_sub(last_ms);
        elapsed_ms >= self.interval.as_millis() as i64
    }

    /// Overwrite the last-check timestamp with now.
    ///
    /// Called before the network fetch, so a slow or failed fetch (or a
    /// crash mid-check) still consumes the throttle window.
    pub fn record_check_performed(&self) {
        let now = Utc::now().timestamp_millis().to_string();
        if let Err(e) = self.prefs.set(&self.key(LAST_CHECK_KEY), &now) {
            tracing::warn!("failed to persist last check time: {}", e);
        }
    }

    /// Exact string equality on the raw tag, prefix included. Dismissal is
    /// per-tag, not per-semantic-version: "v1.2.0" and "1.2.0" differ.
    pub fn is_dismissed(&self, version: &str) -> bool {
        self.prefs.get(&self.key(DISMISSED_KEY)).as_deref() == Some(version)
    }

    /// Remember `version` as dismissed, forgetting any earlier dismissal.
    pub fn dismiss(&self, version: &str) {
        if let Err(e) = self.prefs.set(&self.key(DISMISSED_KEY), version) {
            tracing::warn!("failed to persist dismissed version: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::MemoryPrefs;

    fn tracker_with_prefs() -> (UpdateTracker, Arc<MemoryPrefs>) {
        let prefs = Arc::new(MemoryPrefs::new());
        let tracker = UpdateTracker::new(
            prefs.clone(),
            Duration::from_secs(24 * 60 * 60),
            "perkdeck.".to_string(),
        );
        (tracker, prefs)
    }

    #[test]
    fn test_first_check_is_due() {
        let (tracker, _) = tracker_with_prefs();
        assert!(tracker.is_check_due(false));
    }

    #[test]
    fn test_not_due_after_record() {
        let (tracker, _) = tracker_with_prefs();
        tracker.record_check_performed();
        assert!(!tracker.is_check_due(false));
    }

    #[test]
    fn test_due_after_interval_elapses() {
        let (tracker, prefs) = tracker_with_prefs();
        let stale = Utc::now().timestamp_millis() - 25 * 60 * 60 * 1000;
        prefs
            .set("perkdeck.last_update_check", &stale.to_string())
            .unwrap();
        assert!(tracker.is_check_due(false));
    }

    #[test]
    fn test_force_bypasses_interval() {
        let (tracker, _) = tracker_with_prefs();
        tracker.record_check_performed();
        assert!(tracker.is_check_due(true));
    }

    #[test]
    fn test_unparsable_timestamp_counts_as_due() {
        let (tracker, prefs) = tracker_with_prefs();
        prefs
            .set("perkdeck.last_update_check", "not-a-number")
            .unwrap();
        assert!(tracker.is_check_due(false));
    }

    #[test]
    fn test_dismissal_exact_tag_semantics() {
        let (tracker, _) = tracker_with_prefs();
        assert!(!tracker.is_dismissed("v1.2.0"));

        tracker.dismiss("v1.2.0");
        assert!(tracker.is_dismissed("v1.2.0"));
        assert!(!tracker.is_dismissed("1.2.0"));
        assert!(!tracker.is_dismissed("v1.2.1"));
    }

    #[test]
    fn test_dismissal_holds_single_version() {
        let (tracker, _) = tracker_with_prefs();
        tracker.dismiss("v1.9.0");
        tracker.dismiss("v2.0.0");
        assert!(tracker.is_dismissed("v2.0.0"));
        assert!(!tracker.is_dismissed("v1.9.0"));
    }

    #[test]
    fn test_keys_are_namespaced() {
        let (tracker, prefs) = tracker_with_prefs();
        tracker.record_check_performed();
        tracker.dismiss("v1.0.0");
        assert!(prefs.get("perkdeck.last_update_check").is_some());
        assert_eq!(prefs.get("perkdeck.dismissed_version").as_deref(), Some("v1.0.0"));
        assert!(prefs.get("last_update_check").is_none());
    }
}
