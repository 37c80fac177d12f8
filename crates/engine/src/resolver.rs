//! Identity resolution: internal location -> external device.

use adscreen_core::error::CoreError;
use adscreen_core::providers::{DeviceBinding, LocationDirectory};
use adscreen_core::types::DbId;

use crate::result::StepLog;

/// Look up the device binding for a location.
///
/// `Ok(None)` means the location is not linked to any device; the attempt
/// ends there with `not-linked` and no vendor call is ever made.
pub async fn resolve(
    directory: &dyn LocationDirectory,
    location_id: DbId,
    log: &mut StepLog,
) -> Result<Option<DeviceBinding>, CoreError> {
    let binding = directory.get_device_binding(location_id).await?;

    match &binding {
        Some(found) => log.record(
            "resolver",
            "resolved-device-binding",
            None,
            Some(serde_json::json!({
                "vendor_device_id": found.vendor_device_id,
                "sequence_id": found.sequence_id,
            })),
        ),
        None => log.note("resolver", "location-not-linked"),
    }

    Ok(binding)
}
