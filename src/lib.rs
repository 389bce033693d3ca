//! PerkDeck Core
//!
//! Device trust and release-update verification for the PerkDeck
//! discount-program app. Two independent flows:
//!
//! - attestation: prove the running binary/device pair is genuine before
//!   trusting client-reported data, degrading gracefully (fail-open) when
//!   the platform or the backend cannot answer;
//! - update discovery: poll the release index at most once per day,
//!   compare versions, respect per-version dismissal, and hand the
//!   presentation layer a prompt/skip decision.
//!
//! Nothing in this crate is fatal to the host application: both flows fail
//! toward doing nothing rather than toward blocking usage.

pub mod attestation;
pub mod config;
pub mod prefs;
pub mod updater;
pub mod version;

pub use attestation::{
    AttestationResult, AttestationVerifier, IntegrityTokenSource, TokenProvider, TrustError,
    UnsupportedTokenSource,
};
pub use config::CoreConfig;
pub use prefs::{FilePrefs, KeyValueStore, MemoryPrefs, PrefsError};
pub use updater::{
    ReleaseAsset, ReleaseDescriptor, ReleaseFetcher, UpdateCheckOutcome, UpdateDecision,
    UpdateEngine, UpdateTracker,
};
