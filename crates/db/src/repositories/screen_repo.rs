//! Repository for the `screen_devices` table.

use sqlx::PgPool;

use adscreen_core::device::RemoteSnapshot;
use adscreen_core::proof::ProofOfPlay;
use adscreen_core::types::DbId;

use crate::models::screen::ScreenDevice;

/// Column list for `screen_devices` queries.
const COLUMNS: &str = "\
    id, location_id, vendor_device_id, sequence_id, \
    online, source_kind, source_id, item_count, snapshot_observed_at, \
    proof_hash, proof_byte_size, proof_captured_at, proof_no_content, \
    created_at, updated_at";

/// Provides lookups and state updates for screen devices.
pub struct ScreenRepo;

impl ScreenRepo {
    /// Find the device row for a location, if it has ever been linked.
    pub async fn find_by_location(
        pool: &PgPool,
        location_id: DbId,
    ) -> Result<Option<ScreenDevice>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM screen_devices WHERE location_id = $1");
        sqlx::query_as::<_, ScreenDevice>(&query)
            .bind(location_id)
            .fetch_optional(pool)
            .await
    }

    /// All location ids with a device link, for the sweep.
    pub async fn linked_location_ids(pool: &PgPool) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> =
            sqlx::query_as("SELECT location_id FROM screen_devices ORDER BY location_id ASC")
                .fetch_all(pool)
                .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Remember the sequence id the engine created for this location.
    pub async fn set_sequence_id(
        pool: &PgPool,
        location_id: DbId,
        sequence_id: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE screen_devices SET sequence_id = $2, updated_at = NOW() \
             WHERE location_id = $1",
        )
        .bind(location_id)
        .bind(sequence_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Store the latest normalized remote snapshot on the device row.
    pub async fn record_snapshot(
        pool: &PgPool,
        location_id: DbId,
        snapshot: &RemoteSnapshot,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE screen_devices SET \
                online = $2, source_kind = $3, source_id = $4, item_count = $5, \
                snapshot_observed_at = $6, updated_at = NOW() \
             WHERE location_id = $1",
        )
        .bind(location_id)
        .bind(snapshot.online.as_str())
        .bind(snapshot.source_kind.as_str())
        .bind(&snapshot.source_id)
        .bind(snapshot.item_count.map(|n| n as i32))
        .bind(snapshot.observed_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Store the latest proof of play on the device row.
    pub async fn record_proof(
        pool: &PgPool,
        location_id: DbId,
        proof: &ProofOfPlay,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE screen_devices SET \
                proof_hash = $2, proof_byte_size = $3, proof_captured_at = $4, \
                proof_no_content = $5, updated_at = NOW() \
             WHERE location_id = $1",
        )
        .bind(location_id)
        .bind(&proof.hash)
        .bind(proof.byte_size as i64)
        .bind(proof.captured_at)
        .bind(proof.no_content)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Link a location to a vendor device (operator action), or update the
    /// device id on conflict.
    pub async fn link(
        pool: &PgPool,
        location_id: DbId,
        vendor_device_id: &str,
    ) -> Result<ScreenDevice, sqlx::Error> {
        let query = format!(
            "INSERT INTO screen_devices (location_id, vendor_device_id) \
             VALUES ($1, $2) \
             ON CONFLICT (location_id) DO UPDATE SET \
                vendor_device_id = EXCLUDED.vendor_device_id, \
                updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ScreenDevice>(&query)
            .bind(location_id)
            .bind(vendor_device_id)
            .fetch_one(pool)
            .await
    }
}
