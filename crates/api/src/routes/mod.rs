pub mod health;
pub mod screens;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /screens/{location_id}/link          link location to a device (POST)
/// /screens/{location_id}/reconcile     run a reconciliation attempt (POST)
/// /screens/{location_id}/status        last-known health (GET)
/// /screens/{location_id}/force-reset   baseline reset + reconcile (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/screens", screens::router())
}
