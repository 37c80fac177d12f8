//! Route definitions for the screen reconciliation endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::screens;
use crate::state::AppState;

/// Screen routes, nested under `/screens`.
///
/// ```text
/// POST   /{location_id}/link           link
/// POST   /{location_id}/reconcile      reconcile
/// GET    /{location_id}/status         status
/// POST   /{location_id}/force-reset    force_reset
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{location_id}/link", post(screens::link))
        .route("/{location_id}/reconcile", post(screens::reconcile))
        .route("/{location_id}/status", get(screens::status))
        .route("/{location_id}/force-reset", post(screens::force_reset))
}
