//! Read-only health aggregation for dashboards.
//!
//! Answers entirely from stored state and cheap collaborator reads; no
//! vendor call is ever made on this path.

use serde::Serialize;

use adscreen_core::device::{OnlineState, RemoteSnapshot};
use adscreen_core::error::CoreError;
use adscreen_core::proof::ProofOfPlay;
use adscreen_core::providers::{
    ApprovedAdsProvider, BaselineTemplateProvider, LocationDirectory, StateStore,
};
use adscreen_core::types::DbId;

/// Aggregated last-known state for one location's screen.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub location_id: DbId,
    pub linked: bool,
    pub online: OnlineState,
    /// Device is bound to its own sequence with at least one item.
    pub canonical_mode: bool,
    pub ads_count: usize,
    pub baseline_count: usize,
    pub last_snapshot: Option<RemoteSnapshot>,
    pub last_proof: Option<ProofOfPlay>,
    /// Short actionable hints when something looks off.
    pub hints: Vec<String>,
}

/// Build the status for one location.
pub async fn canonical_status(
    directory: &dyn LocationDirectory,
    ads: &dyn ApprovedAdsProvider,
    baseline: &dyn BaselineTemplateProvider,
    store: &dyn StateStore,
    location_id: DbId,
) -> Result<HealthStatus, CoreError> {
    let linked = directory.get_device_binding(location_id).await?.is_some();

    let (snapshot, proof, ads_count, baseline_count) = if linked {
        (
            store.latest_snapshot(location_id).await?,
            store.latest_proof(location_id).await?,
            ads.approved_ads(location_id).await?.len(),
            baseline.baseline_items().await?.len(),
        )
    } else {
        (None, None, 0, 0)
    };

    let online = snapshot
        .as_ref()
        .map(|s| s.online)
        .unwrap_or(OnlineState::Unknown);
    let canonical_mode = snapshot.as_ref().map(|s| s.is_canonical()).unwrap_or(false);

    let hints = build_hints(linked, online, canonical_mode, ads_count, proof.as_ref());

    Ok(HealthStatus {
        location_id,
        linked,
        online,
        canonical_mode,
        ads_count,
        baseline_count,
        last_snapshot: snapshot,
        last_proof: proof,
        hints,
    })
}

/// Derive the operator hints. Pure so the wording stays tested.
fn build_hints(
    linked: bool,
    online: OnlineState,
    canonical_mode: bool,
    ads_count: usize,
    proof: Option<&ProofOfPlay>,
) -> Vec<String> {
    let mut hints = Vec::new();

    if !linked {
        hints.push("location is not linked to a device".to_string());
        return hints;
    }
    if online == OnlineState::Offline {
        hints.push("device is offline; check power and network".to_string());
    }
    if !canonical_mode {
        hints.push("device is not playing its content sequence; run reconcile".to_string());
    }
    if ads_count == 0 {
        hints.push("no approved ads for this location; baseline filler only".to_string());
    }
    if proof.map(|p| p.no_content).unwrap_or(false) {
        hints.push("last screenshot looked like the vendor's blank placeholder".to_string());
    }

    hints
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn proof(no_content: bool) -> ProofOfPlay {
        ProofOfPlay {
            hash: "h".into(),
            byte_size: 100,
            captured_at: Utc::now(),
            no_content,
        }
    }

    #[test]
    fn unlinked_gets_single_hint() {
        let hints = build_hints(false, OnlineState::Unknown, false, 0, None);
        assert_eq!(hints.len(), 1);
        assert!(hints[0].contains("not linked"));
    }

    #[test]
    fn healthy_location_with_ads_has_no_hints() {
        let hints = build_hints(true, OnlineState::Online, true, 3, Some(&proof(false)));
        assert!(hints.is_empty());
    }

    #[test]
    fn zero_ads_is_called_out() {
        let hints = build_hints(true, OnlineState::Online, true, 0, Some(&proof(false)));
        assert_eq!(hints.len(), 1);
        assert!(hints[0].contains("no approved ads"));
    }

    #[test]
    fn offline_and_noncanonical_stack_up() {
        let hints = build_hints(true, OnlineState::Offline, false, 2, Some(&proof(true)));
        assert_eq!(hints.len(), 3);
    }
}
