//! Device refresh trigger: make the device re-pull its configuration.

use std::time::Duration;

use serde::Serialize;

use adscreen_vendor::wire::BindPayloadShape;

use crate::gateway::{GatewayError, ScreenGateway};
use crate::result::StepLog;

/// Which refresh path took effect. Recorded in the step log so operators
/// can see when a fleet has drifted onto the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RefreshMethod {
    /// Explicit remote restart call.
    Restart,
    /// Re-issued the same bind as a no-op write and waited a settle
    /// period; observed to provoke a config re-pull on firmware where
    /// the restart endpoint is broken.
    ToggleNudge,
}

/// Force the device to re-pull configuration.
///
/// Tries the explicit restart first; on failure falls back to the toggle
/// nudge. Only if both fail does the attempt abort.
pub async fn trigger_refresh(
    gateway: &dyn ScreenGateway,
    device_id: &str,
    sequence_id: &str,
    settle: Duration,
    log: &mut StepLog,
) -> Result<RefreshMethod, GatewayError> {
    match gateway.restart_device(device_id).await {
        Ok(()) => {
            log.note("refresh", "restarted-device");
            return Ok(RefreshMethod::Restart);
        }
        Err(e) => {
            tracing::warn!(device_id, error = %e, "Restart call failed; falling back to toggle nudge");
            log.record(
                "refresh",
                "restart-failed",
                None,
                Some(serde_json::json!({ "error": e.to_string() })),
            );
        }
    }

    gateway
        .bind_source(device_id, sequence_id, BindPayloadShape::Flat)
        .await?;
    tokio::time::sleep(settle).await;

    log.record(
        "refresh",
        "toggle-nudge",
        None,
        Some(serde_json::json!({ "settle_secs": settle.as_secs() })),
    );
    Ok(RefreshMethod::ToggleNudge)
}
