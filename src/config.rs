//! PerkDeck Core Configuration
//! Built once at startup and threaded to each component constructor.

use std::time::Duration;

/// Attestation verification endpoint.
pub const VERIFY_URL: &str = "https://api.perkdeck.app/v1/attestation/verify";

/// Latest-release endpoint of the release index.
pub const RELEASES_LATEST_URL: &str =
    "https://api.github.com/repos/perkdeck/perkdeck-app/releases/latest";

/// Accept header for the release index (v3 JSON media type).
pub const RELEASES_ACCEPT: &str = "application/vnd.github.v3+json";

/// App identifier sent as User-Agent on every request.
pub const USER_AGENT: &str = "PerkDeck-App";

/// Minimum elapsed time between two automatic update checks.
pub const CHECK_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Deadline for the release-index fetch; the in-flight request is
/// cancelled when it elapses.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Namespace prefix for persisted keys, so the shared store does not
/// collide with unrelated host state.
pub const PREFS_PREFIX: &str = "perkdeck.";

/// Platform package file extension used to pick a download asset.
pub const PACKAGE_EXTENSION: &str = ".apk";

/// Runtime configuration for the trust and update subsystem.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    pub verify_url: String,
    pub releases_url: String,
    pub releases_accept: String,
    pub user_agent: String,
    /// Cloud project id the attestation service is bound to. Absence is a
    /// configuration failure, not a crash: the provider reports Failed.
    pub cloud_project_id: Option<u64>,
    pub check_interval: Duration,
    pub fetch_timeout: Duration,
    pub attest_timeout: Duration,
    pub package_extension: String,
    pub prefs_prefix: String,
    /// Version of the running app, compared against release tags.
    pub current_version: String,
    /// Fail-open policy: attestation transport or configuration failures
    /// count as genuine. Only an explicit backend rejection does not.
    pub degrade_on_error: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            verify_url: VERIFY_URL.to_string(),
            releases_url: RELEASES_LATEST_URL.to_string(),
            releases_accept: RELEASES_ACCEPT.to_string(),
            user_agent: USER_AGENT.to_string(),
            cloud_project_id: build_time_project_id(),
            check_interval: CHECK_INTERVAL,
            fetch_timeout: FETCH_TIMEOUT,
            attest_timeout: FETCH_TIMEOUT,
            package_extension: PACKAGE_EXTENSION.to_string(),
            prefs_prefix: PREFS_PREFIX.to_string(),
            current_version: env!("CARGO_PKG_VERSION").to_string(),
            degrade_on_error: true,
        }
    }
}

/// Cloud project id bound at build time via PERKDECK_CLOUD_PROJECT_ID.
fn build_time_project_id() -> Option<u64> {
    option_env!("PERKDECK_CLOUD_PROJECT_ID").and_then(|raw| raw.parse().ok())
}
