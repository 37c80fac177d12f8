//! Error taxonomy shared across the workspace.
//!
//! [`CoreError`] covers domain-level failures. [`DegradedReason`] is the
//! wire-stable classification attached to a failed reconciliation attempt;
//! it is data, not an exception — no reason here is ever fatal to the host
//! process.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Why a reconciliation attempt ended `DEGRADED`.
///
/// Retry semantics:
/// - `NotLinked` and `VendorRejected` are terminal within an attempt.
/// - `VendorUnreachable` and `ProofTimeout` are retryable by re-running
///   the attempt from scratch.
/// - `BindMismatch` has already consumed its one in-attempt retry with a
///   corrected payload shape by the time it is reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DegradedReason {
    /// No device mapping exists for the location.
    NotLinked,
    /// Network-level failure talking to the device-management service.
    VendorUnreachable,
    /// The vendor returned a non-2xx status; raw body is in the step log.
    VendorRejected,
    /// The device did not accept the content-source bind even after the
    /// corrected-payload retry.
    BindMismatch,
    /// Remote content-source kind is still not `sequence`.
    SourceNotSequence,
    /// The bound sequence resolved to zero items.
    SequenceEmpty,
    /// The vendor exposes no screenshot for the device.
    NoScreenshot,
    /// The vendor itself reports the device is rendering nothing.
    VendorReportsEmptyContent,
    /// The device is offline according to the normalized state.
    DeviceOffline,
    /// Screenshot stayed below the placeholder-size threshold.
    NoContentDetected,
    /// The verification deadline elapsed without a plausible proof.
    ProofTimeout,
    /// Another attempt holds the per-location lock.
    ConcurrentModification,
}

impl DegradedReason {
    /// String representation for display, logging, and storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotLinked => "not-linked",
            Self::VendorUnreachable => "vendor-unreachable",
            Self::VendorRejected => "vendor-rejected",
            Self::BindMismatch => "bind-mismatch",
            Self::SourceNotSequence => "source-not-sequence",
            Self::SequenceEmpty => "sequence-empty",
            Self::NoScreenshot => "no-screenshot",
            Self::VendorReportsEmptyContent => "vendor-reports-empty-content",
            Self::DeviceOffline => "device-offline",
            Self::NoContentDetected => "no-content-detected",
            Self::ProofTimeout => "proof-timeout",
            Self::ConcurrentModification => "concurrent-modification",
        }
    }

    /// Whether re-running `reconcile` from scratch may clear this reason
    /// without any other change in the world.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::VendorUnreachable
                | Self::ProofTimeout
                | Self::NoScreenshot
                | Self::ConcurrentModification
        )
    }
}

impl std::fmt::Display for DegradedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_str_matches_wire_form() {
        assert_eq!(DegradedReason::NotLinked.as_str(), "not-linked");
        assert_eq!(DegradedReason::ProofTimeout.as_str(), "proof-timeout");
        assert_eq!(
            DegradedReason::VendorReportsEmptyContent.as_str(),
            "vendor-reports-empty-content"
        );
    }

    #[test]
    fn serde_uses_kebab_case() {
        let json = serde_json::to_string(&DegradedReason::SourceNotSequence).unwrap();
        assert_eq!(json, "\"source-not-sequence\"");
        let parsed: DegradedReason = serde_json::from_str("\"bind-mismatch\"").unwrap();
        assert_eq!(parsed, DegradedReason::BindMismatch);
    }

    #[test]
    fn terminal_reasons_are_not_retryable() {
        assert!(!DegradedReason::NotLinked.is_retryable());
        assert!(!DegradedReason::VendorRejected.is_retryable());
        assert!(!DegradedReason::BindMismatch.is_retryable());
    }

    #[test]
    fn transient_reasons_are_retryable() {
        assert!(DegradedReason::VendorUnreachable.is_retryable());
        assert!(DegradedReason::ProofTimeout.is_retryable());
        assert!(DegradedReason::ConcurrentModification.is_retryable());
    }
}
