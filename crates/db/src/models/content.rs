//! Row models for the baseline template and approved-ads tables.

use serde::Serialize;
use sqlx::FromRow;

use adscreen_core::content::ScheduledMedia;
use adscreen_core::types::{DbId, Timestamp};

/// A row from `baseline_items`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BaselineItem {
    pub id: DbId,
    pub media_id: String,
    pub duration_seconds: i32,
    pub position: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
}

/// A row from `approved_ads`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ApprovedAd {
    pub id: DbId,
    pub location_id: DbId,
    pub media_id: String,
    pub duration_seconds: i32,
    pub position: i32,
    pub is_active: bool,
    pub approved_at: Timestamp,
}

impl From<BaselineItem> for ScheduledMedia {
    fn from(row: BaselineItem) -> Self {
        ScheduledMedia {
            media_id: row.media_id,
            duration_seconds: row.duration_seconds.max(0) as u32,
        }
    }
}

impl From<ApprovedAd> for ScheduledMedia {
    fn from(row: ApprovedAd) -> Self {
        ScheduledMedia {
            media_id: row.media_id,
            duration_seconds: row.duration_seconds.max(0) as u32,
        }
    }
}
