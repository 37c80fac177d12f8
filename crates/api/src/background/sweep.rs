//! Spawns the periodic reconciliation sweep.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use adscreen_engine::sweep::{run_sweep, SweepConfig};
use adscreen_engine::ReconcileEngine;

use crate::config::ServerConfig;

/// Spawn the sweep loop. Cancel the token to stop it.
pub fn start(
    engine: Arc<ReconcileEngine>,
    config: &ServerConfig,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    let sweep_config = SweepConfig {
        interval: Duration::from_secs(config.sweep_interval_secs),
        concurrency: config.sweep_concurrency,
    };
    tokio::spawn(run_sweep(engine, sweep_config, cancel))
}
