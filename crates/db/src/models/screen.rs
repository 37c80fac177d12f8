//! Row models for the `screen_devices` table.

use serde::Serialize;
use sqlx::FromRow;

use adscreen_core::device::{OnlineState, RemoteSnapshot, SourceKind};
use adscreen_core::proof::ProofOfPlay;
use adscreen_core::types::{DbId, Timestamp};

/// A row from `screen_devices`.
///
/// Snapshot and proof columns are stored denormalized on the device row:
/// the platform only ever needs the latest of each, and the health
/// reporter must answer without joins or vendor calls.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ScreenDevice {
    pub id: DbId,
    pub location_id: DbId,
    pub vendor_device_id: String,
    pub sequence_id: Option<String>,

    pub online: String,
    pub source_kind: String,
    pub source_id: Option<String>,
    pub item_count: Option<i32>,
    pub snapshot_observed_at: Option<Timestamp>,

    pub proof_hash: Option<String>,
    pub proof_byte_size: Option<i64>,
    pub proof_captured_at: Option<Timestamp>,
    pub proof_no_content: Option<bool>,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ScreenDevice {
    /// Reassemble the stored snapshot columns, when a snapshot has been
    /// recorded at all.
    pub fn snapshot(&self) -> Option<RemoteSnapshot> {
        let observed_at = self.snapshot_observed_at?;
        Some(RemoteSnapshot {
            online: OnlineState::parse(&self.online),
            source_kind: SourceKind::parse(&self.source_kind),
            source_id: self.source_id.clone(),
            item_count: self.item_count.map(|n| n.max(0) as u32),
            observed_at,
        })
    }

    /// Reassemble the stored proof columns, when a proof has been
    /// recorded at all.
    pub fn proof(&self) -> Option<ProofOfPlay> {
        Some(ProofOfPlay {
            hash: self.proof_hash.clone()?,
            byte_size: self.proof_byte_size.unwrap_or(0).max(0) as u64,
            captured_at: self.proof_captured_at?,
            no_content: self.proof_no_content.unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn row() -> ScreenDevice {
        ScreenDevice {
            id: 1,
            location_id: 10,
            vendor_device_id: "dev-1".into(),
            sequence_id: Some("seq-1".into()),
            online: "online".into(),
            source_kind: "sequence".into(),
            source_id: Some("seq-1".into()),
            item_count: Some(4),
            snapshot_observed_at: Some(Utc::now()),
            proof_hash: Some("abc".into()),
            proof_byte_size: Some(40_000),
            proof_captured_at: Some(Utc::now()),
            proof_no_content: Some(false),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn snapshot_roundtrips_enums() {
        let snapshot = row().snapshot().unwrap();
        assert_eq!(snapshot.online, OnlineState::Online);
        assert_eq!(snapshot.source_kind, SourceKind::Sequence);
        assert_eq!(snapshot.item_count, Some(4));
    }

    #[test]
    fn snapshot_is_none_before_first_observation() {
        let mut device = row();
        device.snapshot_observed_at = None;
        assert!(device.snapshot().is_none());
    }

    #[test]
    fn proof_is_none_without_hash() {
        let mut device = row();
        device.proof_hash = None;
        assert!(device.proof().is_none());
    }
}
