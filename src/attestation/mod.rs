//! Device Attestation
//!
//! Proves the running binary/device pair is genuine before client-reported
//! data is trusted. Two pieces:
//! - `provider` - one-time integrity tokens from the platform trust service
//! - `verifier` - remote verdict relay with an explicit fail-open policy
//!
//! The whole flow is advisory: it upgrades trust when it works and degrades
//! to permissive when it cannot. No failure here may lock out a user.

pub mod provider;
pub mod verifier;

pub use provider::{
    platform_token_source, IntegrityTokenSource, TokenProvider, UnsupportedTokenSource,
};
pub use verifier::{AttestationResult, AttestationVerifier};

use thiserror::Error;

/// Attestation-path failures.
///
/// Everything except `VerificationRejected` is absorbed into a permissive
/// verdict by `AttestationVerifier::is_genuine_environment`.
#[derive(Error, Debug)]
pub enum TrustError {
    /// Not an error so much as a capability fact: this platform has no
    /// trust service to ask.
    #[error("attestation is not available on this platform")]
    PlatformUnsupported,
    #[error("no cloud project id configured for attestation")]
    ConfigurationMissing,
    #[error("platform trust service returned no token")]
    TokenUnavailable,
    #[error("verification transport failed: {0}")]
    VerificationTransport(String),
    #[error("verification rejected by the backend")]
    VerificationRejected,
}
