//! The screen content reconciliation engine.
//!
//! Computes what each screen should be playing (baseline filler plus the
//! location's approved ads), compares it against what the remote device
//! actually reports, and drives the remote side into agreement with
//! verifiable proof of success.
//!
//! Control flow per attempt: resolver -> reader -> composer -> planner ->
//! writer -> refresh -> verifier -> reporter, expressed as the state
//! machine in [`reconciler`]. Every attempt is safe to re-run from
//! scratch.

pub mod composer;
pub mod config;
pub mod gateway;
pub mod locks;
pub mod plan;
pub mod reader;
pub mod reconciler;
pub mod refresh;
pub mod reporter;
pub mod resolver;
pub mod result;
pub mod sweep;
pub mod verifier;
pub mod writer;

pub use config::EngineConfig;
pub use reconciler::ReconcileEngine;
pub use result::{Outcome, ReconciliationResult};
