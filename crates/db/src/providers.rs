//! Database-backed implementations of the core collaborator traits.
//!
//! The engine only sees the traits; these adapters translate them onto the
//! repositories and map `sqlx::Error` into the domain error type.

use async_trait::async_trait;
use sqlx::PgPool;

use adscreen_core::content::ScheduledMedia;
use adscreen_core::device::RemoteSnapshot;
use adscreen_core::error::CoreError;
use adscreen_core::proof::ProofOfPlay;
use adscreen_core::providers::{
    ApprovedAdsProvider, BaselineTemplateProvider, DeviceBinding, LocationDirectory, StateStore,
};
use adscreen_core::types::DbId;

use crate::repositories::{ContentRepo, ScreenRepo};

fn db_err(e: sqlx::Error) -> CoreError {
    CoreError::Internal(format!("database error: {e}"))
}

/// Location directory over the `screen_devices` table.
pub struct DbLocationDirectory {
    pool: PgPool,
}

impl DbLocationDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LocationDirectory for DbLocationDirectory {
    async fn get_device_binding(
        &self,
        location_id: DbId,
    ) -> Result<Option<DeviceBinding>, CoreError> {
        let device = ScreenRepo::find_by_location(&self.pool, location_id)
            .await
            .map_err(db_err)?;
        Ok(device.map(|d| DeviceBinding {
            vendor_device_id: d.vendor_device_id,
            sequence_id: d.sequence_id,
        }))
    }

    async fn set_sequence_id(&self, location_id: DbId, sequence_id: &str) -> Result<(), CoreError> {
        ScreenRepo::set_sequence_id(&self.pool, location_id, sequence_id)
            .await
            .map_err(db_err)
    }

    async fn linked_location_ids(&self) -> Result<Vec<DbId>, CoreError> {
        ScreenRepo::linked_location_ids(&self.pool)
            .await
            .map_err(db_err)
    }
}

/// Approved-ads reads over the `approved_ads` table.
pub struct DbApprovedAds {
    pool: PgPool,
    /// Contract-defined slot cap, applied in SQL.
    max_slots: i64,
}

impl DbApprovedAds {
    pub fn new(pool: PgPool, max_slots: usize) -> Self {
        Self {
            pool,
            max_slots: max_slots as i64,
        }
    }
}

#[async_trait]
impl ApprovedAdsProvider for DbApprovedAds {
    async fn approved_ads(&self, location_id: DbId) -> Result<Vec<ScheduledMedia>, CoreError> {
        let rows = ContentRepo::approved_ads(&self.pool, location_id, self.max_slots)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(ScheduledMedia::from).collect())
    }
}

/// Baseline template reads over the `baseline_items` table.
pub struct DbBaselineTemplate {
    pool: PgPool,
    max_items: i64,
}

impl DbBaselineTemplate {
    pub fn new(pool: PgPool, max_items: usize) -> Self {
        Self {
            pool,
            max_items: max_items as i64,
        }
    }
}

#[async_trait]
impl BaselineTemplateProvider for DbBaselineTemplate {
    async fn baseline_items(&self) -> Result<Vec<ScheduledMedia>, CoreError> {
        let rows = ContentRepo::baseline_items(&self.pool, self.max_items)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(ScheduledMedia::from).collect())
    }
}

/// Snapshot/proof persistence over the `screen_devices` row.
pub struct DbStateStore {
    pool: PgPool,
}

impl DbStateStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StateStore for DbStateStore {
    async fn record_snapshot(
        &self,
        location_id: DbId,
        snapshot: &RemoteSnapshot,
    ) -> Result<(), CoreError> {
        ScreenRepo::record_snapshot(&self.pool, location_id, snapshot)
            .await
            .map_err(db_err)
    }

    async fn record_proof(&self, location_id: DbId, proof: &ProofOfPlay) -> Result<(), CoreError> {
        ScreenRepo::record_proof(&self.pool, location_id, proof)
            .await
            .map_err(db_err)
    }

    async fn latest_snapshot(
        &self,
        location_id: DbId,
    ) -> Result<Option<RemoteSnapshot>, CoreError> {
        let device = ScreenRepo::find_by_location(&self.pool, location_id)
            .await
            .map_err(db_err)?;
        Ok(device.and_then(|d| d.snapshot()))
    }

    async fn latest_proof(&self, location_id: DbId) -> Result<Option<ProofOfPlay>, CoreError> {
        let device = ScreenRepo::find_by_location(&self.pool, location_id)
            .await
            .map_err(db_err)?;
        Ok(device.and_then(|d| d.proof()))
    }
}
