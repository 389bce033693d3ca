//! Attestation Verifier
//!
//! Submits the platform token to the verification endpoint and relays its
//! verdict. The verifier is transport only: it makes no local trust
//! decision beyond the fail-open policy in `is_genuine_environment`.

use super::provider::TokenProvider;
use crate::config::CoreConfig;
use serde::{Deserialize, Serialize};

/// Verdict for one verification call. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestationResult {
    pub valid: bool,
    /// Verdict labels such as MEETS_DEVICE_INTEGRITY, in backend order.
    #[serde(default)]
    pub device_integrity_verdicts: Vec<String>,
    #[serde(default)]
    pub app_integrity_verdict: Option<String>,
    /// Set whenever the verdict could not actually be obtained. Callers
    /// are expected to apply the fail-open policy rather than read
    /// `valid` on its own.
    #[serde(default)]
    pub error: Option<String>,
}

impl AttestationResult {
    fn passed() -> Self {
        Self {
            valid: true,
            device_integrity_verdicts: Vec::new(),
            app_integrity_verdict: None,
            error: None,
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            device_integrity_verdicts: Vec::new(),
            app_integrity_verdict: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Serialize)]
struct VerifyRequest<'a> {
    #[serde(rename = "integrityToken")]
    integrity_token: &'a str,
}

pub struct AttestationVerifier {
    cfg: CoreConfig,
    provider: TokenProvider,
    client: reqwest::Client,
}

impl AttestationVerifier {
    pub fn new(cfg: CoreConfig, provider: TokenProvider) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .timeout(cfg.attest_timeout)
            .build()
            .unwrap_or_default();
        Self {
            cfg,
            provider,
            client,
        }
    }

    /// Run one verification round trip.
    ///
    /// On platforms without attestation this returns `valid: true`
    /// immediately: trust is not enforceable there and the system does not
    /// pretend otherwise. On a 2xx response the body is relayed verbatim.
    pub async fn verify(&self) -> AttestationResult {
        if !self.provider.is_supported() {
            return AttestationResult::passed();
        }

        if let Err(e) = self.provider.initialize().await {
            tracing::warn!("attestation provider not ready: {}", e);
            return AttestationResult::failed("not initialized");
        }

        let token = match self.provider.token().await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("no attestation token: {}", e);
                return AttestationResult::failed("no token");
            }
        };

        let response = match self
            .client
            .post(&self.cfg.verify_url)
            .json(&VerifyRequest {
                integrity_token: &token,
            })
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("attestation verify call failed: {}", e);
                return AttestationResult::failed(format!("verification failed: {}", e));
            }
        };

        if !response.status().is_success() {
            return AttestationResult::failed(format!(
                "verification failed: {}",
                response.status()
            ));
        }

        match response.json::<AttestationResult>().await {
            Ok(result) => result,
            Err(e) => AttestationResult::failed(format!("verification failed: {}", e)),
        }
    }

    /// Overall session verdict with the named fail-open policy applied.
    ///
    /// Any `error` in the result (missing token, network failure, non-2xx)
    /// degrades to `true` while `degrade_on_error` is set; an unreachable
    /// verification backend must never lock out legitimate users. Only an
    /// explicit `valid: false` with no error propagates as `false`.
    pub async fn is_genuine_environment(&self) -> bool {
        let result = self.verify().await;

        if let Some(error) = &result.error {
            if self.cfg.degrade_on_error {
                tracing::warn!(error = %error, "attestation degraded to genuine on error");
                return true;
            }
            return false;
        }

        result.valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_wire_shape() {
        let json = r#"{
            "valid": true,
            "deviceIntegrityVerdicts": ["MEETS_DEVICE_INTEGRITY", "MEETS_BASIC_INTEGRITY"],
            "appIntegrityVerdict": "PLAY_RECOGNIZED"
        }"#;
        let result: AttestationResult = serde_json::from_str(json).unwrap();
        assert!(result.valid);
        assert_eq!(result.device_integrity_verdicts.len(), 2);
        assert_eq!(
            result.app_integrity_verdict.as_deref(),
            Some("PLAY_RECOGNIZED")
        );
        assert!(result.error.is_none());
    }

    #[test]
    fn test_result_defaults_for_sparse_body() {
        let result: AttestationResult = serde_json::from_str(r#"{"valid": false}"#).unwrap();
        assert!(!result.valid);
        assert!(result.device_integrity_verdicts.is_empty());
        assert!(result.error.is_none());
    }

    #[test]
    fn test_request_wire_shape() {
        let body = serde_json::to_value(VerifyRequest {
            integrity_token: "abc",
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "integrityToken": "abc" }));
    }
}
