//! Attestation Token Provider
//!
//! Obtains one-time integrity tokens from the platform trust service.
//! Initialization is capability-gated, idempotent and single-flight.

use super::TrustError;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Source of one-time integrity tokens.
///
/// The real implementation bridges to the platform trust service; hosts
/// without one use [`UnsupportedTokenSource`], tests substitute fakes.
#[async_trait]
pub trait IntegrityTokenSource: Send + Sync {
    /// Whether this platform exposes the attestation capability at all.
    fn is_supported(&self) -> bool;

    /// One-time platform initialization, bound to a cloud project id.
    async fn prepare(&self, cloud_project_id: u64) -> Result<(), TrustError>;

    /// Request a fresh one-time token.
    async fn request_token(&self) -> Result<String, TrustError>;
}

/// Token source for platforms without an attestation capability.
///
/// Desktop and CI builds land here; the mobile shells inject their own
/// bridge at startup.
pub struct UnsupportedTokenSource;

#[async_trait]
impl IntegrityTokenSource for UnsupportedTokenSource {
    fn is_supported(&self) -> bool {
        false
    }

    async fn prepare(&self, _cloud_project_id: u64) -> Result<(), TrustError> {
        Err(TrustError::PlatformUnsupported)
    }

    async fn request_token(&self) -> Result<String, TrustError> {
        Err(TrustError::PlatformUnsupported)
    }
}

/// Token source for the current build target.
///
/// Desktop builds have no platform trust service; the mobile shells
/// replace this with their own bridge at startup.
pub fn platform_token_source() -> Arc<dyn IntegrityTokenSource> {
    Arc::new(UnsupportedTokenSource)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InitState {
    Uninitialized,
    Ready,
    Failed,
}

/// Owns the `Uninitialized -> Ready | Failed` lifecycle of the platform
/// trust service binding.
///
/// The state lock is held across the platform call, so concurrent callers
/// single-flight: the second caller waits, then observes `Ready` and
/// returns without a second platform initialization.
pub struct TokenProvider {
    source: Arc<dyn IntegrityTokenSource>,
    cloud_project_id: Option<u64>,
    state: Mutex<InitState>,
}

impl TokenProvider {
    pub fn new(source: Arc<dyn IntegrityTokenSource>, cloud_project_id: Option<u64>) -> Self {
        Self {
            source,
            cloud_project_id,
            state: Mutex::new(InitState::Uninitialized),
        }
    }

    pub fn is_supported(&self) -> bool {
        self.source.is_supported()
    }

    /// Bind to the platform trust service. Idempotent once `Ready`; a
    /// previous failure is retried on the next call.
    pub async fn initialize(&self) -> Result<(), TrustError> {
        let mut state = self.state.lock().await;
        if *state == InitState::Ready {
            return Ok(());
        }

        if !self.source.is_supported() {
            *state = InitState::Failed;
            return Err(TrustError::PlatformUnsupported);
        }

        let Some(project_id) = self.cloud_project_id else {
            tracing::warn!("attestation cloud project id missing, provider disabled");
            *state = InitState::Failed;
            return Err(TrustError::ConfigurationMissing);
        };

        match self.source.prepare(project_id).await {
            Ok(()) => {
                tracing::debug!(project_id, "attestation token provider ready");
                *state = InitState::Ready;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("attestation token provider initialization failed: {}", e);
                *state = InitState::Failed;
                Err(e)
            }
        }
    }

    /// Fetch a fresh one-time token, initializing on demand.
    pub async fn token(&self) -> Result<String, TrustError> {
        self.initialize().await?;
        self.source.request_token().await
    }
}
