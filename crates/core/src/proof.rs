//! Screenshot-derived proof of play.

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// Evidence extracted from one device screenshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofOfPlay {
    /// SHA-256 hex digest of the screenshot bytes.
    pub hash: String,
    pub byte_size: u64,
    pub captured_at: Timestamp,
    /// Set when the image fell below the placeholder-size threshold.
    ///
    /// The threshold is vendor-version-dependent and best-effort; treat
    /// this as a strong hint, not ground truth.
    pub no_content: bool,
}

/// Classify screenshot bytes against the placeholder threshold.
///
/// Anything at or below `placeholder_min_bytes` is flagged as the vendor's
/// "no content" placeholder image regardless of other metadata.
pub fn classify_screenshot(
    bytes: &[u8],
    placeholder_min_bytes: u64,
    captured_at: Timestamp,
) -> ProofOfPlay {
    let byte_size = bytes.len() as u64;
    ProofOfPlay {
        hash: crate::hashing::sha256_hex(bytes),
        byte_size,
        captured_at,
        no_content: byte_size <= placeholder_min_bytes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn tiny_image_is_flagged_no_content() {
        let proof = classify_screenshot(&[0u8; 100], 5_120, Utc::now());
        assert!(proof.no_content);
        assert_eq!(proof.byte_size, 100);
    }

    #[test]
    fn large_image_is_not_flagged() {
        let proof = classify_screenshot(&vec![7u8; 100_000], 5_120, Utc::now());
        assert!(!proof.no_content);
    }

    #[test]
    fn boundary_size_is_still_placeholder() {
        let proof = classify_screenshot(&vec![0u8; 5_120], 5_120, Utc::now());
        assert!(proof.no_content);
    }

    #[test]
    fn hash_distinguishes_different_frames() {
        let a = classify_screenshot(&vec![1u8; 50_000], 5_120, Utc::now());
        let b = classify_screenshot(&vec![2u8; 50_000], 5_120, Utc::now());
        assert_ne!(a.hash, b.hash);
        assert_eq!(a.hash.len(), 64);
    }
}
