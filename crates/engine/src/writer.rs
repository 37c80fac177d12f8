//! Content sequence writes: idempotent create, full item replace, and the
//! verified device bind.
//!
//! All writes are safe to repeat; an attempt never assumes partial
//! progress from a previous one.

use adscreen_core::content::DesiredState;
use adscreen_core::error::CoreError;
use adscreen_core::providers::LocationDirectory;
use adscreen_core::types::{DbId, VendorId};
use adscreen_core::device::SourceKind;
use adscreen_vendor::wire::BindPayloadShape;

use crate::gateway::{GatewayError, ScreenGateway};
use crate::plan::{Plan, SequenceTarget};
use crate::result::StepLog;

/// Failures while applying planned writes. Any of these aborts the
/// attempt; the raw vendor error stays attached for the step log.
#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The device did not accept the bind even after the corrected
    /// payload-shape retry.
    #[error("device did not accept content-source bind: {detail}")]
    BindMismatch { detail: String },

    /// A collaborator (directory) failed while recording the sequence id.
    #[error(transparent)]
    Internal(#[from] CoreError),
}

/// Execute a plan's writes in order: ensure sequence, replace items,
/// rebind. Returns the sequence id the device now targets.
pub async fn apply_plan(
    gateway: &dyn ScreenGateway,
    directory: &dyn LocationDirectory,
    location_id: DbId,
    device_id: &str,
    plan: &Plan,
    desired: &DesiredState,
    log: &mut StepLog,
) -> Result<VendorId, ApplyError> {
    let sequence_id = ensure_sequence(gateway, directory, location_id, &plan.sequence, log).await?;

    if plan.replace_items {
        gateway.replace_items(&sequence_id, &desired.items).await?;
        log.record(
            "writer",
            "replaced-items",
            None,
            Some(serde_json::json!({
                "sequence_id": sequence_id,
                "item_count": desired.items.len(),
            })),
        );
    }

    if plan.rebind {
        bind_verified(gateway, device_id, &sequence_id, log).await?;
    }

    Ok(sequence_id)
}

/// Idempotent create-or-return by the stable per-location name.
///
/// A lost directory write (created remotely, crash before recording) is
/// healed here: the search by name finds the earlier sequence instead of
/// creating a duplicate.
async fn ensure_sequence(
    gateway: &dyn ScreenGateway,
    directory: &dyn LocationDirectory,
    location_id: DbId,
    target: &SequenceTarget,
    log: &mut StepLog,
) -> Result<VendorId, ApplyError> {
    let name = match target {
        SequenceTarget::Existing { sequence_id } => return Ok(sequence_id.clone()),
        SequenceTarget::Create { name } => name,
    };

    let sequence_id = match gateway.find_sequence(name).await? {
        Some(existing) => {
            log.record(
                "writer",
                "reused-existing-sequence",
                None,
                Some(serde_json::json!({ "name": name, "sequence_id": existing })),
            );
            existing
        }
        None => {
            let created = gateway.create_sequence(name).await?;
            log.record(
                "writer",
                "created-sequence",
                None,
                Some(serde_json::json!({ "name": name, "sequence_id": created })),
            );
            created
        }
    };

    directory.set_sequence_id(location_id, &sequence_id).await?;
    Ok(sequence_id)
}

/// Bind the device to the sequence, then read back to confirm the vendor
/// actually applied it (it answers 200 to payload shapes it silently
/// ignores). On mismatch, retry once with the alternate payload shape.
async fn bind_verified(
    gateway: &dyn ScreenGateway,
    device_id: &str,
    sequence_id: &str,
    log: &mut StepLog,
) -> Result<(), ApplyError> {
    let mut shape = BindPayloadShape::Flat;

    for attempt in 0..2 {
        gateway.bind_source(device_id, sequence_id, shape).await?;

        let player = gateway.fetch_player(device_id).await?;
        let accepted = player.source_kind == SourceKind::Sequence
            && player.source_id.as_deref() == Some(sequence_id);

        log.record(
            "writer",
            "bind-device",
            Some(serde_json::json!({ "shape": format!("{shape:?}"), "attempt": attempt })),
            Some(serde_json::json!({
                "accepted": accepted,
                "source_kind": player.source_kind.as_str(),
                "source_id": player.source_id,
            })),
        );

        if accepted {
            return Ok(());
        }

        tracing::warn!(
            device_id,
            sequence_id,
            ?shape,
            "Bind read-back mismatch; retrying with alternate payload shape",
        );
        shape = shape.alternate();
    }

    Err(ApplyError::BindMismatch {
        detail: format!("device {device_id} still not bound to sequence {sequence_id} after both payload shapes"),
    })
}
