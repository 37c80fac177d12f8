//! Desired-state composition from the collaborator providers.

use adscreen_core::content::{compose, DesiredState};
use adscreen_core::error::CoreError;
use adscreen_core::providers::{ApprovedAdsProvider, BaselineTemplateProvider};
use adscreen_core::types::DbId;

use crate::config::EngineConfig;
use crate::result::StepLog;

/// Build the target item list: baseline template (capped) then the
/// location's approved ads (capped by slot count). Never empty — zero
/// approved ads still yields the baseline items.
pub async fn compose_desired(
    baseline: &dyn BaselineTemplateProvider,
    ads: &dyn ApprovedAdsProvider,
    location_id: DbId,
    config: &EngineConfig,
    log: &mut StepLog,
) -> Result<DesiredState, CoreError> {
    let baseline_items = baseline.baseline_items().await?;
    let ad_items = ads.approved_ads(location_id).await?;

    let desired = compose(
        &baseline_items,
        &ad_items,
        config.max_baseline_items,
        config.max_ad_slots,
    )?;

    log.record(
        "composer",
        "composed-desired-state",
        None,
        Some(serde_json::json!({
            "baseline_count": desired.baseline_count(),
            "ad_count": desired.ad_count(),
            "media_ids": desired.items.iter().map(|i| i.media_id.as_str()).collect::<Vec<_>>(),
        })),
    );

    Ok(desired)
}
