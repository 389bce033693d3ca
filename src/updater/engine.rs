//! Update Decision Engine
//!
//! Combines the fetched release, the running version, throttle state and
//! dismissal state into a prompt/skip decision. The engine owns no UI: the
//! presentation layer renders the three-choice prompt and calls back into
//! `tracker().dismiss` for "don't ask again".

use super::fetch::{ReleaseDescriptor, ReleaseFetcher};
use super::tracker::UpdateTracker;
use crate::config::CoreConfig;
use crate::prefs::KeyValueStore;
use crate::version;
use serde::Serialize;
use std::sync::Arc;

/// What the presentation layer should do after a check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateDecision {
    NoUpdate,
    UpdateAvailable {
        version: String,
        download_url: String,
    },
}

/// Structured result for an explicit settings-screen "check now" action.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateCheckOutcome {
    pub has_update: bool,
    pub latest_version: Option<String>,
    pub download_url: Option<String>,
}

pub struct UpdateEngine {
    cfg: CoreConfig,
    fetcher: ReleaseFetcher,
    tracker: UpdateTracker,
}

impl UpdateEngine {
    pub fn new(cfg: CoreConfig, prefs: Arc<dyn KeyValueStore>) -> Self {
        let tracker = UpdateTracker::new(prefs, cfg.check_interval, cfg.prefs_prefix.clone());
        let fetcher = ReleaseFetcher::new(cfg.clone());
        Self {
            cfg,
            fetcher,
            tracker,
        }
    }

    /// Dismissal lives here so the prompt's "don't ask again" can reach it.
    pub fn tracker(&self) -> &UpdateTracker {
        &self.tracker
    }

    /// Run one check cycle and return the decision.
    ///
    /// The non-forced path is gated by the 24h throttle and by a previous
    /// dismissal of the remote tag. `force` (an explicit user action)
    /// bypasses both, but never the record-before-fetch ordering: the
    /// throttle window is consumed before any network work.
    pub async fn check_for_updates(&self, force: bool) -> UpdateDecision {
        if !self.tracker.is_check_due(force) {
            tracing::debug!("update check skipped, inside throttle window");
            return UpdateDecision::NoUpdate;
        }
        self.tracker.record_check_performed();

        let Some(release) = self.fetcher.fetch_latest().await else {
            return UpdateDecision::NoUpdate;
        };

        if !version::is_newer(&release.tag, &self.cfg.current_version) {
            tracing::debug!(tag = %release.tag, current = %self.cfg.current_version, "already up to date");
            return UpdateDecision::NoUpdate;
        }

        if !force && self.tracker.is_dismissed(&release.tag) {
            tracing::debug!(tag = %release.tag, "update previously dismissed");
            return UpdateDecision::NoUpdate;
        }

        tracing::info!(tag = %release.tag, "update available");
        UpdateDecision::UpdateAvailable {
            version: release.tag.clone(),
            download_url: self.select_download_url(&release),
        }
    }

    /// Forced variant for an explicit "check now": always fetches and
    /// compares, and reports a structured outcome instead of a prompt.
    pub async fn force_check_for_updates(&self) -> UpdateCheckOutcome {
        match self.check_for_updates(true).await {
            UpdateDecision::UpdateAvailable {
                version,
                download_url,
            } => UpdateCheckOutcome {
                has_update: true,
                latest_version: Some(version),
                download_url: Some(download_url),
            },
            UpdateDecision::NoUpdate => UpdateCheckOutcome {
                has_update: false,
                latest_version: None,
                download_url: None,
            },
        }
    }

    /// First asset carrying the platform package extension, falling back
    /// to the human-readable release page when none matches.
    fn select_download_url(&self, release: &ReleaseDescriptor) -> String {
        release
            .assets
            .iter()
            .find(|asset| asset.name.ends_with(&self.cfg.package_extension))
            .map(|asset| asset.download_url.clone())
            .unwrap_or_else(|| release.page_url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::MemoryPrefs;
    use crate::updater::fetch::ReleaseAsset;

    fn engine_with(cfg: CoreConfig) -> UpdateEngine {
        UpdateEngine::new(cfg, Arc::new(MemoryPrefs::new()))
    }

    fn release_with_assets(assets: Vec<ReleaseAsset>) -> ReleaseDescriptor {
        ReleaseDescriptor {
            tag: "v1.1.0".to_string(),
            display_name: "PerkDeck 1.1.0".to_string(),
            page_url: "https://example.com/releases/v1.1.0".to_string(),
            notes: String::new(),
            published_at: None,
            assets,
        }
    }

    #[test]
    fn test_selects_package_asset() {
        let engine = engine_with(CoreConfig::default());
        let release = release_with_assets(vec![
            ReleaseAsset {
                name: "checksums.txt".to_string(),
                download_url: "https://example.com/checksums.txt".to_string(),
            },
            ReleaseAsset {
                name: "app-release.apk".to_string(),
                download_url: "https://example.com/app-release.apk".to_string(),
            },
        ]);
        assert_eq!(
            engine.select_download_url(&release),
            "https://example.com/app-release.apk"
        );
    }

    #[test]
    fn test_falls_back_to_page_url() {
        let engine = engine_with(CoreConfig::default());
        let release = release_with_assets(vec![ReleaseAsset {
            name: "notes.md".to_string(),
            download_url: "https://example.com/notes.md".to_string(),
        }]);
        assert_eq!(
            engine.select_download_url(&release),
            "https://example.com/releases/v1.1.0"
        );
    }
}
