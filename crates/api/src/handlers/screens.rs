//! Handlers for the screen reconciliation endpoints.
//!
//! Reconcile and force-reset are deliberately synchronous: the caller
//! blocks until the attempt finishes and receives the full result with
//! the step trail, whether the outcome is converged or degraded. Status
//! answers from stored state only.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use adscreen_core::types::DbId;
use adscreen_db::models::screen::ScreenDevice;
use adscreen_db::repositories::ScreenRepo;
use adscreen_engine::ReconciliationResult;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for linking a location to a vendor device.
#[derive(Debug, Deserialize)]
pub struct LinkRequest {
    pub vendor_device_id: String,
}

/// POST /screens/{location_id}/reconcile
///
/// Run a full reconciliation attempt for the location's screen. Waits
/// for the per-location lock, so concurrent calls serialize.
pub async fn reconcile(
    State(state): State<AppState>,
    Path(location_id): Path<DbId>,
) -> AppResult<Json<DataResponse<ReconciliationResult>>> {
    let result = state.engine.reconcile(location_id).await?;
    Ok(Json(DataResponse { data: result }))
}

/// GET /screens/{location_id}/status
///
/// Last-known health for the location's screen, served from stored state
/// without touching the vendor.
pub async fn status(
    State(state): State<AppState>,
    Path(location_id): Path<DbId>,
) -> AppResult<Json<DataResponse<adscreen_engine::reporter::HealthStatus>>> {
    let status = state.engine.canonical_status(location_id).await?;
    Ok(Json(DataResponse { data: status }))
}

/// POST /screens/{location_id}/link
///
/// Link (or re-link) a location to a vendor device. The first
/// reconciliation after linking creates and binds the content sequence.
pub async fn link(
    State(state): State<AppState>,
    Path(location_id): Path<DbId>,
    Json(body): Json<LinkRequest>,
) -> AppResult<Json<DataResponse<ScreenDevice>>> {
    let device_id = body.vendor_device_id.trim();
    if device_id.is_empty() {
        return Err(AppError::BadRequest(
            "vendor_device_id must not be empty".to_string(),
        ));
    }
    let device = ScreenRepo::link(&state.pool, location_id, device_id).await?;
    Ok(Json(DataResponse { data: device }))
}

/// POST /screens/{location_id}/force-reset
///
/// Rewrite the screen's sequence to baseline-only, rebind, then run a
/// normal reconciliation attempt. Escape hatch for remote states the
/// diff engine cannot otherwise recover from.
pub async fn force_reset(
    State(state): State<AppState>,
    Path(location_id): Path<DbId>,
) -> AppResult<Json<DataResponse<ReconciliationResult>>> {
    let result = state.engine.force_reset(location_id).await?;
    Ok(Json(DataResponse { data: result }))
}
