use std::sync::Arc;

use adscreen_engine::ReconcileEngine;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: adscreen_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// The reconciliation engine, shared with the background sweep.
    pub engine: Arc<ReconcileEngine>,
}
