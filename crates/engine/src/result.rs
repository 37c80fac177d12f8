//! Attempt results and the operator-facing step log.
//!
//! Every reconciliation attempt returns a [`ReconciliationResult`] whether
//! it converged or not. The ordered step log is the primary debugging
//! artifact: one record per transition or external call, carrying the
//! before/after values (including raw vendor bodies at a failing step).

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use adscreen_core::device::RemoteSnapshot;
use adscreen_core::error::DegradedReason;
use adscreen_core::proof::ProofOfPlay;
use adscreen_core::types::{DbId, Timestamp};

/// The reconciliation state machine's phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Inspecting,
    Plan,
    Applying,
    Refreshing,
    Verifying,
    Converged,
    Degraded,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inspecting => "inspecting",
            Self::Plan => "plan",
            Self::Applying => "applying",
            Self::Refreshing => "refreshing",
            Self::Verifying => "verifying",
            Self::Converged => "converged",
            Self::Degraded => "degraded",
        }
    }
}

/// One entry in the attempt's ordered step log.
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    /// Which component acted (`resolver`, `reader`, `planner`, `writer`,
    /// `refresh`, `verifier`, `reconciler`).
    pub component: &'static str,
    pub action: String,
    pub before: Option<Value>,
    pub after: Option<Value>,
    pub at: Timestamp,
}

/// Ordered, append-only log of an attempt. Also mirrors each record to
/// tracing at debug level.
#[derive(Debug, Default)]
pub struct StepLog {
    records: Vec<StepRecord>,
}

impl StepLog {
    pub fn record(
        &mut self,
        component: &'static str,
        action: impl Into<String>,
        before: Option<Value>,
        after: Option<Value>,
    ) {
        let action = action.into();
        tracing::debug!(component, %action, "reconcile step");
        self.records.push(StepRecord {
            component,
            action,
            before,
            after,
            at: Utc::now(),
        });
    }

    /// Shorthand for a step with no before/after payloads.
    pub fn note(&mut self, component: &'static str, action: impl Into<String>) {
        self.record(component, action, None, None);
    }

    /// Record a state-machine transition, e.g. `state-verifying`.
    pub fn phase(&mut self, phase: Phase) {
        self.note("reconciler", format!("state-{}", phase.as_str()));
    }

    pub fn into_records(self) -> Vec<StepRecord> {
        self.records
    }
}

/// Final classification of one attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum Outcome {
    Converged,
    Degraded {
        reason: DegradedReason,
        /// Raw error detail from the failing step, when there is one.
        detail: Option<String>,
    },
}

impl Outcome {
    pub fn degraded(reason: DegradedReason) -> Self {
        Self::Degraded {
            reason,
            detail: None,
        }
    }

    pub fn degraded_with(reason: DegradedReason, detail: impl Into<String>) -> Self {
        Self::Degraded {
            reason,
            detail: Some(detail.into()),
        }
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, Self::Converged)
    }
}

/// Outcome of one reconciliation attempt, always returned in full.
#[derive(Debug, Serialize)]
pub struct ReconciliationResult {
    pub location_id: DbId,
    pub outcome: Outcome,
    /// Ordered step trail (component, action, before, after).
    pub steps: Vec<StepRecord>,
    /// Remote snapshot as first observed this attempt.
    pub before: Option<RemoteSnapshot>,
    /// Remote snapshot after the writes and refresh.
    pub after: Option<RemoteSnapshot>,
    /// Proof captured during verification, when any screenshot arrived.
    pub proof: Option<ProofOfPlay>,
    pub started_at: Timestamp,
    pub finished_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_log_preserves_order() {
        let mut log = StepLog::default();
        log.note("resolver", "resolve");
        log.note("reader", "fetch-player");
        log.record(
            "writer",
            "bind-device",
            Some(serde_json::json!({"kind": "layout"})),
            Some(serde_json::json!({"kind": "sequence"})),
        );

        let records = log.into_records();
        let actions: Vec<&str> = records.iter().map(|r| r.action.as_str()).collect();
        assert_eq!(actions, vec!["resolve", "fetch-player", "bind-device"]);
        assert!(records[2].before.is_some());
    }

    #[test]
    fn phase_notes_use_the_wire_form() {
        let mut log = StepLog::default();
        log.phase(Phase::Inspecting);
        log.phase(Phase::Verifying);
        log.phase(Phase::Converged);

        let actions: Vec<String> = log.into_records().into_iter().map(|r| r.action).collect();
        assert_eq!(
            actions,
            vec!["state-inspecting", "state-verifying", "state-converged"]
        );
    }

    #[test]
    fn outcome_serializes_reason() {
        let outcome = Outcome::degraded_with(DegradedReason::ProofTimeout, "deadline after 90s");
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["state"], "degraded");
        assert_eq!(json["reason"], "proof-timeout");
        assert_eq!(json["detail"], "deadline after 90s");
    }

    #[test]
    fn converged_outcome() {
        assert!(Outcome::Converged.is_converged());
        assert!(!Outcome::degraded(DegradedReason::NotLinked).is_converged());
    }
}
