//! Collaborator interfaces consumed by the reconciliation engine.
//!
//! Advertiser/contract management, the ad-approval workflow, and location
//! administration are separate systems; the engine only ever reads their
//! outputs (and writes back the one sequence id it owns). Each interface is
//! an async trait so the engine can be exercised against in-memory fakes.

use async_trait::async_trait;

use crate::content::ScheduledMedia;
use crate::device::RemoteSnapshot;
use crate::error::CoreError;
use crate::proof::ProofOfPlay;
use crate::types::{DbId, VendorId};

/// The device mapping a location directory holds for one location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceBinding {
    pub vendor_device_id: VendorId,
    /// The content sequence created for this location, once one exists.
    pub sequence_id: Option<VendorId>,
}

/// Maps internal locations to external devices and remembers the sequence
/// id the engine created for each.
#[async_trait]
pub trait LocationDirectory: Send + Sync {
    /// `Ok(None)` means the location exists but has never been linked to a
    /// device — the engine reports `NotLinked` and makes no vendor calls.
    async fn get_device_binding(
        &self,
        location_id: DbId,
    ) -> Result<Option<DeviceBinding>, CoreError>;

    async fn set_sequence_id(
        &self,
        location_id: DbId,
        sequence_id: &str,
    ) -> Result<(), CoreError>;

    /// All locations the periodic sweep should visit.
    async fn linked_location_ids(&self) -> Result<Vec<DbId>, CoreError>;
}

/// Supplies the location's currently approved, active ads in schedule
/// order. The approval workflow itself lives elsewhere.
#[async_trait]
pub trait ApprovedAdsProvider: Send + Sync {
    async fn approved_ads(&self, location_id: DbId) -> Result<Vec<ScheduledMedia>, CoreError>;
}

/// Supplies the shared baseline filler template, in order.
#[async_trait]
pub trait BaselineTemplateProvider: Send + Sync {
    async fn baseline_items(&self) -> Result<Vec<ScheduledMedia>, CoreError>;
}

/// Persists the last-known remote state and proof per location so the
/// health reporter can answer without touching the vendor.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn record_snapshot(
        &self,
        location_id: DbId,
        snapshot: &RemoteSnapshot,
    ) -> Result<(), CoreError>;

    async fn record_proof(&self, location_id: DbId, proof: &ProofOfPlay)
        -> Result<(), CoreError>;

    async fn latest_snapshot(&self, location_id: DbId) -> Result<Option<RemoteSnapshot>, CoreError>;

    async fn latest_proof(&self, location_id: DbId) -> Result<Option<ProofOfPlay>, CoreError>;
}
