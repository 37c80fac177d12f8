//! Domain types and pure logic for the screen-network reconciliation
//! platform.
//!
//! Everything in this crate is free of I/O: content composition, the
//! normalized device model, the reconciliation error taxonomy, the shared
//! backoff schedule, and the collaborator interfaces consumed by the
//! engine crate.

pub mod backoff;
pub mod content;
pub mod device;
pub mod error;
pub mod hashing;
pub mod proof;
pub mod providers;
pub mod types;
