//! Release Fetcher
//!
//! Retrieves the latest published release descriptor from the release
//! index. Fails closed to `None`: the caller cannot distinguish "no
//! releases" from "fetch failed", and never needs to.

use crate::config::CoreConfig;
use chrono::{DateTime, Utc};
use reqwest::header::ACCEPT;
use serde::Deserialize;
use thiserror::Error;

/// Metadata for a single published build, fetched fresh each check and
/// never cached beyond the decision cycle.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseDescriptor {
    #[serde(rename = "tag_name")]
    pub tag: String,
    #[serde(rename = "name", default)]
    pub display_name: String,
    #[serde(rename = "html_url", default)]
    pub page_url: String,
    #[serde(rename = "body", default)]
    pub notes: String,
    #[serde(rename = "published_at", default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    #[serde(rename = "browser_download_url")]
    pub download_url: String,
}

#[derive(Error, Debug)]
enum FetchError {
    #[error("release index returned HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("release index request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

pub struct ReleaseFetcher {
    cfg: CoreConfig,
    client: reqwest::Client,
}

impl ReleaseFetcher {
    pub fn new(cfg: CoreConfig) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .timeout(cfg.fetch_timeout)
            .build()
            .unwrap_or_default();
        Self { cfg, client }
    }

    /// Fetch the latest release, collapsing every failure to `None`.
    ///
    /// A 404 means nothing has been published yet and is handled the same
    /// as "no update". Timeouts cancel the in-flight request.
    pub async fn fetch_latest(&self) -> Option<ReleaseDescriptor> {
        match self.try_fetch().await {
            Ok(release) => release,
            Err(e) => {
                tracing::warn!("release check failed (ignored): {}", e);
                None
            }
        }
    }

    async fn try_fetch(&self) -> Result<Option<ReleaseDescriptor>, FetchError> {
        let response = self
            .client
            .get(&self.cfg.releases_url)
            .header(ACCEPT, self.cfg.releases_accept.as_str())
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            tracing::debug!("release index has no published releases");
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        Ok(Some(response.json().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_wire_shape() {
        let json = r#"{
            "tag_name": "v1.1.0",
            "name": "PerkDeck 1.1.0",
            "html_url": "https://example.com/releases/v1.1.0",
            "body": "Bug fixes",
            "published_at": "2024-06-01T12:00:00Z",
            "assets": [
                {"name": "app-release.apk", "browser_download_url": "https://example.com/app-release.apk"},
                {"name": "checksums.txt", "browser_download_url": "https://example.com/checksums.txt"}
            ]
        }"#;
        let release: ReleaseDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(release.tag, "v1.1.0");
        assert_eq!(release.display_name, "PerkDeck 1.1.0");
        assert_eq!(release.assets.len(), 2);
        assert_eq!(release.assets[0].name, "app-release.apk");
        assert!(release.published_at.is_some());
    }

    #[test]
    fn test_descriptor_tolerates_missing_fields() {
        let release: ReleaseDescriptor =
            serde_json::from_str(r#"{"tag_name": "v0.1.0"}"#).unwrap();
        assert_eq!(release.tag, "v0.1.0");
        assert!(release.assets.is_empty());
        assert!(release.published_at.is_none());
        assert_eq!(release.page_url, "");
    }
}
