//! Periodic background sweep over all linked locations.
//!
//! The sweep is a safety net behind the operator-triggered reconcile: it
//! visits every linked location on an interval, with bounded concurrency
//! so a large fleet cannot stampede the vendor API. Locations already
//! being reconciled are skipped, not queued.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::reconciler::ReconcileEngine;
use crate::result::Outcome;

/// Sweep loop tuning.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Pause between full passes.
    pub interval: Duration,
    /// Locations reconciled at once within a pass.
    pub concurrency: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(300),
            concurrency: 4,
        }
    }
}

/// Run sweep passes until cancelled. Intended to be spawned as a
/// background task next to the API server.
pub async fn run_sweep(
    engine: Arc<ReconcileEngine>,
    config: SweepConfig,
    cancel: CancellationToken,
) {
    tracing::info!(
        interval_secs = config.interval.as_secs(),
        concurrency = config.concurrency,
        "Screen sweep started",
    );

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Screen sweep stopping");
                return;
            }
            _ = tokio::time::sleep(config.interval) => {}
        }

        sweep_once(&engine, config.concurrency).await;
    }
}

/// One full pass over the linked locations.
pub async fn sweep_once(engine: &ReconcileEngine, concurrency: usize) {
    let targets = match engine.sweep_targets().await {
        Ok(targets) => targets,
        Err(e) => {
            tracing::error!(error = %e, "Sweep could not list linked locations");
            return;
        }
    };

    if targets.is_empty() {
        return;
    }
    tracing::debug!(count = targets.len(), "Sweep pass starting");

    let (mut converged, mut degraded, mut failed) = (0usize, 0usize, 0usize);

    let results = stream::iter(targets)
        .map(|location_id| async move {
            (location_id, engine.try_reconcile(location_id).await)
        })
        .buffer_unordered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

    for (location_id, result) in results {
        match result {
            Ok(r) => match &r.outcome {
                Outcome::Converged => converged += 1,
                Outcome::Degraded { reason, .. } => {
                    degraded += 1;
                    tracing::debug!(
                        location_id,
                        reason = reason.as_str(),
                        "Sweep left location degraded",
                    );
                }
            },
            Err(e) => {
                failed += 1;
                tracing::error!(location_id, error = %e, "Sweep attempt failed");
            }
        }
    }

    tracing::info!(converged, degraded, failed, "Sweep pass finished");
}
