//! The reconciliation state machine.
//!
//! One attempt walks `INSPECTING -> PLAN -> APPLYING -> REFRESHING ->
//! VERIFYING` and ends `CONVERGED` or `DEGRADED`. Attempts are stateless
//! between runs: every run re-reads the world and is safe to repeat.
//! Collaborator failures (database, directory) surface as `Err`; anything
//! that went wrong on the vendor side is attempt-scoped data inside the
//! returned [`ReconciliationResult`].

use std::sync::Arc;

use chrono::Utc;

use adscreen_core::content::{DesiredState, ItemTag};
use adscreen_core::device::{OnlineState, RemoteSnapshot, SourceKind};
use adscreen_core::error::{CoreError, DegradedReason};
use adscreen_core::proof::ProofOfPlay;
use adscreen_core::providers::{
    ApprovedAdsProvider, BaselineTemplateProvider, DeviceBinding, LocationDirectory, StateStore,
};
use adscreen_core::types::DbId;

use crate::composer::compose_desired;
use crate::config::EngineConfig;
use crate::gateway::{GatewayError, ScreenGateway};
use crate::locks::LocationLocks;
use crate::plan::{build_plan, Plan, SequenceTarget};
use crate::reader::read_remote;
use crate::reporter::{canonical_status, HealthStatus};
use crate::resolver::resolve;
use crate::result::{Outcome, Phase, ReconciliationResult, StepLog};
use crate::verifier::{verify_proof, VerifyOutcome};
use crate::writer::{apply_plan, ApplyError};
use crate::{plan, refresh};

/// The engine. One instance per process; cheap to share via `Arc`.
pub struct ReconcileEngine {
    gateway: Arc<dyn ScreenGateway>,
    directory: Arc<dyn LocationDirectory>,
    ads: Arc<dyn ApprovedAdsProvider>,
    baseline: Arc<dyn BaselineTemplateProvider>,
    store: Arc<dyn StateStore>,
    locks: LocationLocks,
    config: EngineConfig,
}

impl ReconcileEngine {
    pub fn new(
        gateway: Arc<dyn ScreenGateway>,
        directory: Arc<dyn LocationDirectory>,
        ads: Arc<dyn ApprovedAdsProvider>,
        baseline: Arc<dyn BaselineTemplateProvider>,
        store: Arc<dyn StateStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            gateway,
            directory,
            ads,
            baseline,
            store,
            locks: LocationLocks::new(),
            config,
        }
    }

    /// Full synchronous reconciliation attempt. Waits for the
    /// per-location lock, so overlapping calls for one location are
    /// serialized rather than interleaved.
    pub async fn reconcile(&self, location_id: DbId) -> Result<ReconciliationResult, CoreError> {
        let _guard = self.locks.acquire(location_id).await;
        self.attempt(location_id, false).await
    }

    /// Sweep entry point: skip rather than queue when the location is
    /// already being reconciled.
    pub async fn try_reconcile(
        &self,
        location_id: DbId,
    ) -> Result<ReconciliationResult, CoreError> {
        match self.locks.try_acquire(location_id).await {
            Some(_guard) => self.attempt(location_id, false).await,
            None => {
                let started_at = Utc::now();
                let mut log = StepLog::default();
                log.note("reconciler", "location-busy-skipping");
                Ok(finish(
                    location_id,
                    Outcome::degraded(DegradedReason::ConcurrentModification),
                    log,
                    None,
                    None,
                    None,
                    started_at,
                ))
            }
        }
    }

    /// Reset the device to a minimal baseline-only sequence, then run the
    /// standard attempt body. For states the diff engine cannot otherwise
    /// escape (e.g. a corrupted remote sequence the vendor keeps
    /// half-accepting).
    pub async fn force_reset(&self, location_id: DbId) -> Result<ReconciliationResult, CoreError> {
        let _guard = self.locks.acquire(location_id).await;
        self.attempt(location_id, true).await
    }

    /// Cheap read-only status for dashboards; never touches the vendor.
    pub async fn canonical_status(&self, location_id: DbId) -> Result<HealthStatus, CoreError> {
        canonical_status(
            self.directory.as_ref(),
            self.ads.as_ref(),
            self.baseline.as_ref(),
            self.store.as_ref(),
            location_id,
        )
        .await
    }

    /// Locations the periodic sweep should visit.
    pub async fn sweep_targets(&self) -> Result<Vec<DbId>, CoreError> {
        self.directory.linked_location_ids().await
    }

    // -----------------------------------------------------------------
    // The attempt body
    // -----------------------------------------------------------------

    async fn attempt(
        &self,
        location_id: DbId,
        force_reset: bool,
    ) -> Result<ReconciliationResult, CoreError> {
        let started_at = Utc::now();
        let mut log = StepLog::default();

        // --- INSPECTING ---
        log.phase(Phase::Inspecting);

        let Some(mut binding) = resolve(self.directory.as_ref(), location_id, &mut log).await?
        else {
            return Ok(finish(
                location_id,
                Outcome::degraded(DegradedReason::NotLinked),
                log,
                None,
                None,
                None,
                started_at,
            ));
        };

        let desired = compose_desired(
            self.baseline.as_ref(),
            self.ads.as_ref(),
            location_id,
            &self.config,
            &mut log,
        )
        .await?;

        if force_reset {
            match self
                .reset_to_baseline(location_id, &binding, &desired, &mut log)
                .await
            {
                Ok(sequence_id) => binding.sequence_id = Some(sequence_id),
                Err(e) => {
                    return Ok(finish(
                        location_id,
                        apply_outcome(e)?,
                        log,
                        None,
                        None,
                        None,
                        started_at,
                    ));
                }
            }
        }

        let remote = match read_remote(
            self.gateway.as_ref(),
            &binding.vendor_device_id,
            binding.sequence_id.as_deref(),
            &mut log,
        )
        .await
        {
            Ok(remote) => remote,
            Err(e) => {
                return Ok(finish(
                    location_id,
                    Outcome::degraded_with(e.reason(), e.to_string()),
                    log,
                    None,
                    None,
                    None,
                    started_at,
                ));
            }
        };

        let before_snapshot = remote.snapshot();
        self.store
            .record_snapshot(location_id, &before_snapshot)
            .await?;
        let before = Some(before_snapshot);

        // --- PLAN ---
        log.phase(Phase::Plan);
        let plan = build_plan(
            location_id,
            &desired,
            &remote,
            binding.sequence_id.as_deref(),
        );
        log.record(
            "planner",
            if plan.is_noop() { "no-drift" } else { "planned-writes" },
            Some(serde_json::json!({
                "source_kind": remote.player.source_kind.as_str(),
                "source_id": remote.player.source_id,
                "remote_item_count": remote.items.as_ref().map(|i| i.len()),
            })),
            Some(serde_json::to_value(&plan).unwrap_or_default()),
        );

        // --- APPLYING ---
        log.phase(Phase::Applying);
        let sequence_id = match apply_plan(
            self.gateway.as_ref(),
            self.directory.as_ref(),
            location_id,
            &binding.vendor_device_id,
            &plan,
            &desired,
            &mut log,
        )
        .await
        {
            Ok(sequence_id) => sequence_id,
            Err(e) => {
                return Ok(finish(
                    location_id,
                    apply_outcome(e)?,
                    log,
                    before,
                    None,
                    None,
                    started_at,
                ));
            }
        };

        // --- REFRESHING ---
        log.phase(Phase::Refreshing);
        if let Err(e) = refresh::trigger_refresh(
            self.gateway.as_ref(),
            &binding.vendor_device_id,
            &sequence_id,
            self.config.bind_settle,
            &mut log,
        )
        .await
        {
            return Ok(finish(
                location_id,
                Outcome::degraded_with(e.reason(), e.to_string()),
                log,
                before,
                None,
                None,
                started_at,
            ));
        }

        // --- VERIFYING ---
        log.phase(Phase::Verifying);
        let post = match read_remote(
            self.gateway.as_ref(),
            &binding.vendor_device_id,
            Some(&sequence_id),
            &mut log,
        )
        .await
        {
            Ok(post) => post,
            Err(e) => {
                return Ok(finish(
                    location_id,
                    Outcome::degraded_with(e.reason(), e.to_string()),
                    log,
                    before,
                    None,
                    None,
                    started_at,
                ));
            }
        };

        let after_snapshot = post.snapshot();
        self.store
            .record_snapshot(location_id, &after_snapshot)
            .await?;
        let after = Some(after_snapshot);

        // Structural checks before spending the proof budget.
        if let Some(reason) = structural_problem(&post.player.source_kind, post.player.source_id.as_deref(), &sequence_id, post.items.as_deref().map(|i| i.len()), post.player.online, post.player.reports_empty) {
            return Ok(finish(
                location_id,
                Outcome::degraded(reason),
                log,
                before,
                after,
                None,
                started_at,
            ));
        }

        let previous_hash = self
            .store
            .latest_proof(location_id)
            .await?
            .map(|p| p.hash);

        let verify = verify_proof(
            self.gateway.as_ref(),
            post.player.screenshot_url.as_deref(),
            previous_hash.as_deref(),
            &self.config,
            &mut log,
        )
        .await;

        match verify {
            VerifyOutcome::Converged(proof) => {
                self.store.record_proof(location_id, &proof).await?;
                Ok(finish(
                    location_id,
                    Outcome::Converged,
                    log,
                    before,
                    after,
                    Some(proof),
                    started_at,
                ))
            }
            VerifyOutcome::Degraded {
                reason,
                proof,
                detail,
            } => {
                if let Some(proof) = &proof {
                    self.store.record_proof(location_id, proof).await?;
                }
                let outcome = match detail {
                    Some(detail) => Outcome::degraded_with(reason, detail),
                    None => Outcome::degraded(reason),
                };
                Ok(finish(
                    location_id, outcome, log, before, after, proof, started_at,
                ))
            }
        }
    }

    /// The force-reset preamble: rewrite the sequence to baseline-only
    /// items and rebind, regardless of what the diff would say.
    ///
    /// The recorded sequence id is probed first; a sequence deleted
    /// out-of-band gets re-created under the stable name instead of
    /// failing the reset on a 404 write.
    async fn reset_to_baseline(
        &self,
        location_id: DbId,
        binding: &DeviceBinding,
        desired: &DesiredState,
        log: &mut StepLog,
    ) -> Result<String, ApplyError> {
        log.note("reconciler", "force-reset-to-baseline");

        let minimal = DesiredState {
            items: desired
                .items
                .iter()
                .filter(|i| i.tag == ItemTag::Baseline)
                .cloned()
                .collect(),
        };

        let sequence = match &binding.sequence_id {
            Some(id) => match self.gateway.fetch_sequence_items(id).await {
                Ok(_) => SequenceTarget::Existing {
                    sequence_id: id.clone(),
                },
                Err(GatewayError::Rejected { status: 404, body }) => {
                    log.record(
                        "reconciler",
                        "sequence-missing-remotely",
                        Some(serde_json::json!({ "sequence_id": id })),
                        Some(serde_json::json!({ "status": 404, "body": body })),
                    );
                    SequenceTarget::Create {
                        name: plan::sequence_name(location_id),
                    }
                }
                Err(e) => return Err(e.into()),
            },
            None => SequenceTarget::Create {
                name: plan::sequence_name(location_id),
            },
        };

        let plan = Plan {
            sequence,
            replace_items: true,
            rebind: true,
        };

        apply_plan(
            self.gateway.as_ref(),
            self.directory.as_ref(),
            location_id,
            &binding.vendor_device_id,
            &plan,
            &minimal,
            log,
        )
        .await
    }
}

/// Map an apply failure to its attempt outcome, or bubble a collaborator
/// failure up to the host.
fn apply_outcome(err: ApplyError) -> Result<Outcome, CoreError> {
    match err {
        ApplyError::Gateway(e) => Ok(Outcome::degraded_with(e.reason(), e.to_string())),
        ApplyError::BindMismatch { detail } => Ok(Outcome::degraded_with(
            DegradedReason::BindMismatch,
            detail,
        )),
        ApplyError::Internal(core) => Err(core),
    }
}

/// Post-write structural checks, strongest signal first.
fn structural_problem(
    source_kind: &SourceKind,
    source_id: Option<&str>,
    expected_sequence: &str,
    item_count: Option<usize>,
    online: OnlineState,
    reports_empty: Option<bool>,
) -> Option<DegradedReason> {
    if *source_kind != SourceKind::Sequence || source_id != Some(expected_sequence) {
        return Some(DegradedReason::SourceNotSequence);
    }
    if item_count == Some(0) {
        return Some(DegradedReason::SequenceEmpty);
    }
    if reports_empty == Some(true) {
        return Some(DegradedReason::VendorReportsEmptyContent);
    }
    if online == OnlineState::Offline {
        return Some(DegradedReason::DeviceOffline);
    }
    None
}

/// Assemble the final result and emit the one summary log line. The step
/// trail always ends with the terminal phase.
fn finish(
    location_id: DbId,
    outcome: Outcome,
    mut log: StepLog,
    before: Option<RemoteSnapshot>,
    after: Option<RemoteSnapshot>,
    proof: Option<ProofOfPlay>,
    started_at: adscreen_core::types::Timestamp,
) -> ReconciliationResult {
    match &outcome {
        Outcome::Converged => {
            log.phase(Phase::Converged);
            tracing::info!(location_id, "Reconciliation converged");
        }
        Outcome::Degraded { reason, detail } => {
            log.phase(Phase::Degraded);
            tracing::warn!(
                location_id,
                reason = reason.as_str(),
                detail = detail.as_deref().unwrap_or(""),
                "Reconciliation degraded",
            );
        }
    }

    ReconciliationResult {
        location_id,
        outcome,
        steps: log.into_records(),
        before,
        after,
        proof,
        started_at,
        finished_at: Utc::now(),
    }
}
