//! Proof verification: bounded screenshot polling with backoff.
//!
//! A reconciliation only counts as converged once the device shows a
//! plausible, non-placeholder screenshot. A changed hash versus the
//! previously stored proof is positive evidence of a real update; an
//! unchanged hash is inconclusive, not a failure — the content may simply
//! look the same.

use chrono::Utc;
use tokio::time::Instant;

use adscreen_core::error::DegradedReason;
use adscreen_core::proof::{classify_screenshot, ProofOfPlay};

use crate::config::EngineConfig;
use crate::gateway::ScreenGateway;
use crate::result::StepLog;

/// Result of the verification phase.
#[derive(Debug)]
pub enum VerifyOutcome {
    Converged(ProofOfPlay),
    Degraded {
        reason: DegradedReason,
        /// The last proof observed, if any screenshot arrived at all.
        proof: Option<ProofOfPlay>,
        detail: Option<String>,
    },
}

/// Poll the screenshot until it shows real content, the vendor keeps
/// serving a placeholder, or the hard deadline elapses.
pub async fn verify_proof(
    gateway: &dyn ScreenGateway,
    screenshot_url: Option<&str>,
    previous_hash: Option<&str>,
    config: &EngineConfig,
    log: &mut StepLog,
) -> VerifyOutcome {
    let Some(url) = screenshot_url else {
        log.note("verifier", "no-screenshot-exposed");
        return VerifyOutcome::Degraded {
            reason: DegradedReason::NoScreenshot,
            proof: None,
            detail: Some("vendor exposes no screenshot for this device".to_string()),
        };
    };

    let deadline = Instant::now() + config.proof_deadline;
    let mut delays = config.proof_backoff.delays();
    let mut last_proof: Option<ProofOfPlay> = None;
    let mut last_error: Option<String> = None;
    let mut poll = 0u32;

    loop {
        poll += 1;

        match gateway.fetch_screenshot(url).await {
            Ok(bytes) => {
                let proof = classify_screenshot(&bytes, config.placeholder_min_bytes, Utc::now());
                let hash_changed = previous_hash.map(|h| h != proof.hash);

                log.record(
                    "verifier",
                    format!("screenshot-poll-{poll}"),
                    None,
                    Some(serde_json::json!({
                        "byte_size": proof.byte_size,
                        "hash": proof.hash,
                        "no_content": proof.no_content,
                        "hash_changed": hash_changed,
                    })),
                );

                if !proof.no_content {
                    // Plausible real content. A changed hash confirms the
                    // update; an unchanged one is inconclusive but not a
                    // reason to keep the operator waiting.
                    log.note("verifier", "proof-accepted");
                    return VerifyOutcome::Converged(proof);
                }
                last_proof = Some(proof);
            }
            Err(e) => {
                last_error = Some(e.to_string());
                log.record(
                    "verifier",
                    format!("screenshot-poll-{poll}-failed"),
                    None,
                    Some(serde_json::json!({ "error": e.to_string() })),
                );
            }
        }

        // Only placeholder frames or fetch errors so far; back off and
        // retry unless the next wait would cross the deadline.
        let delay = delays.next().unwrap_or(config.proof_backoff.max_delay);
        if Instant::now() + delay >= deadline {
            break;
        }
        tokio::time::sleep(delay).await;
    }

    match last_proof {
        Some(proof) => VerifyOutcome::Degraded {
            reason: DegradedReason::NoContentDetected,
            detail: Some(format!(
                "screenshot stayed at or below the {}-byte placeholder threshold across {poll} polls",
                config.placeholder_min_bytes
            )),
            proof: Some(proof),
        },
        None => VerifyOutcome::Degraded {
            reason: DegradedReason::ProofTimeout,
            proof: None,
            detail: last_error
                .or_else(|| Some("no screenshot arrived before the deadline".to_string())),
        },
    }
}
