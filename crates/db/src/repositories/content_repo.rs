//! Read-only repository for the baseline template and approved-ads
//! tables. The workflows that write these tables live outside this
//! service.

use sqlx::PgPool;

use adscreen_core::types::DbId;

use crate::models::content::{ApprovedAd, BaselineItem};

/// Column list for `baseline_items` queries.
const BASELINE_COLUMNS: &str = "id, media_id, duration_seconds, position, is_active, created_at";

/// Column list for `approved_ads` queries.
const AD_COLUMNS: &str =
    "id, location_id, media_id, duration_seconds, position, is_active, approved_at";

/// Capped, ordered reads of schedulable content.
pub struct ContentRepo;

impl ContentRepo {
    /// Active baseline template items in schedule order, capped.
    pub async fn baseline_items(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<BaselineItem>, sqlx::Error> {
        let query = format!(
            "SELECT {BASELINE_COLUMNS} FROM baseline_items \
             WHERE is_active ORDER BY position ASC LIMIT $1"
        );
        sqlx::query_as::<_, BaselineItem>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Active approved ads for a location in schedule order, capped at the
    /// contract-defined slot count.
    pub async fn approved_ads(
        pool: &PgPool,
        location_id: DbId,
        limit: i64,
    ) -> Result<Vec<ApprovedAd>, sqlx::Error> {
        let query = format!(
            "SELECT {AD_COLUMNS} FROM approved_ads \
             WHERE location_id = $1 AND is_active \
             ORDER BY position ASC LIMIT $2"
        );
        sqlx::query_as::<_, ApprovedAd>(&query)
            .bind(location_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
