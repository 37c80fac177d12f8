//! Remote state reading: fetch and normalize the device's live
//! configuration, plus the canonical sequence's items when one exists.

use chrono::Utc;

use adscreen_core::device::{RemoteSnapshot, SourceKind};
use adscreen_vendor::normalize::{NormalizedPlayer, RemoteItem};

use crate::gateway::{GatewayError, ScreenGateway};
use crate::result::StepLog;

/// The live-fetched remote state for one attempt. Ephemeral; read fresh
/// on every attempt.
#[derive(Debug)]
pub struct RemoteConfig {
    pub player: NormalizedPlayer,
    /// Items of the location's canonical sequence (preferred) or, absent
    /// one, of whatever sequence the device happens to be bound to.
    pub items: Option<Vec<RemoteItem>>,
    /// The canonical sequence id we hold was deleted on the vendor side
    /// (404 on read). The planner must re-create rather than patch.
    pub canonical_missing: bool,
}

impl RemoteConfig {
    /// Persisted summary of this read.
    pub fn snapshot(&self) -> RemoteSnapshot {
        RemoteSnapshot {
            online: self.player.online,
            source_kind: self.player.source_kind,
            source_id: self.player.source_id.clone(),
            item_count: self.items.as_ref().map(|items| items.len() as u32),
            observed_at: Utc::now(),
        }
    }
}

/// Fetch the player and the relevant sequence items.
///
/// Normalization warnings are carried in the player's provenance and
/// logged here so the step trail shows which raw fields were trusted.
pub async fn read_remote(
    gateway: &dyn ScreenGateway,
    device_id: &str,
    canonical_sequence_id: Option<&str>,
    log: &mut StepLog,
) -> Result<RemoteConfig, GatewayError> {
    let player = gateway.fetch_player(device_id).await?;

    log.record(
        "reader",
        "fetched-player",
        None,
        Some(serde_json::json!({
            "online": player.online.as_str(),
            "source_kind": player.source_kind.as_str(),
            "source_id": player.source_id,
            "provenance": player.provenance,
        })),
    );

    // Prefer the canonical sequence for the diff; fall back to whatever
    // sequence the device is bound to, purely for diagnostics.
    let sequence_to_read = canonical_sequence_id
        .map(str::to_string)
        .or_else(|| {
            (player.source_kind == SourceKind::Sequence)
                .then(|| player.source_id.clone())
                .flatten()
        });

    let mut canonical_missing = false;
    let items = match sequence_to_read {
        Some(sequence_id) => match gateway.fetch_sequence_items(&sequence_id).await {
            Ok(items) => {
                log.record(
                    "reader",
                    "fetched-sequence-items",
                    None,
                    Some(serde_json::json!({
                        "sequence_id": sequence_id,
                        "item_count": items.len(),
                    })),
                );
                Some(items)
            }
            // Deleted out-of-band via the vendor console. Not fatal: the
            // planner re-creates it.
            Err(GatewayError::Rejected { status: 404, body }) => {
                canonical_missing = canonical_sequence_id == Some(sequence_id.as_str());
                log.record(
                    "reader",
                    "sequence-missing-remotely",
                    Some(serde_json::json!({ "sequence_id": sequence_id })),
                    Some(serde_json::json!({ "status": 404, "body": body })),
                );
                None
            }
            Err(e) => return Err(e),
        },
        None => {
            log.note("reader", "no-sequence-to-read");
            None
        }
    };

    Ok(RemoteConfig {
        player,
        items,
        canonical_missing,
    })
}
