//! Content items and desired-state composition.
//!
//! A device's target playlist is always the shared baseline filler followed
//! by the location's approved ads. Composition is pure; the engine fetches
//! the inputs from collaborators and calls [`compose`] on every attempt.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Whether a scheduled item is shared filler or location-specific paid
/// content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemTag {
    Baseline,
    Ad,
}

impl ItemTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Baseline => "baseline",
            Self::Ad => "ad",
        }
    }
}

/// One entry in a content sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Vendor media id of the asset to play.
    pub media_id: String,
    /// Playback duration in seconds.
    pub duration_seconds: u32,
    pub tag: ItemTag,
}

/// A media reference as provided by the baseline-template and approved-ads
/// collaborators, before tagging and ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledMedia {
    pub media_id: String,
    pub duration_seconds: u32,
}

/// The computed target item list for one device. Never persisted; rebuilt
/// fresh on every reconciliation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DesiredState {
    /// Baseline items first, then ads, in collaborator order.
    pub items: Vec<ContentItem>,
}

impl DesiredState {
    pub fn baseline_count(&self) -> usize {
        self.items
            .iter()
            .filter(|i| i.tag == ItemTag::Baseline)
            .count()
    }

    pub fn ad_count(&self) -> usize {
        self.items.iter().filter(|i| i.tag == ItemTag::Ad).count()
    }
}

/// Build the desired state: baseline items (capped at `max_baseline`)
/// followed by approved ads (capped at `max_ad_slots`).
///
/// The result is never empty as long as the baseline template has at least
/// one item; an empty template is a platform misconfiguration and is
/// rejected rather than silently producing a blank screen target.
pub fn compose(
    baseline: &[ScheduledMedia],
    ads: &[ScheduledMedia],
    max_baseline: usize,
    max_ad_slots: usize,
) -> Result<DesiredState, CoreError> {
    if baseline.is_empty() {
        return Err(CoreError::Validation(
            "Baseline template is empty; refusing to compose a blank target".to_string(),
        ));
    }

    let mut items: Vec<ContentItem> = Vec::with_capacity(
        baseline.len().min(max_baseline) + ads.len().min(max_ad_slots),
    );

    for media in baseline.iter().take(max_baseline) {
        items.push(ContentItem {
            media_id: media.media_id.clone(),
            duration_seconds: media.duration_seconds,
            tag: ItemTag::Baseline,
        });
    }

    for media in ads.iter().take(max_ad_slots) {
        items.push(ContentItem {
            media_id: media.media_id.clone(),
            duration_seconds: media.duration_seconds,
            tag: ItemTag::Ad,
        });
    }

    Ok(DesiredState { items })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media(id: &str) -> ScheduledMedia {
        ScheduledMedia {
            media_id: id.to_string(),
            duration_seconds: 10,
        }
    }

    #[test]
    fn baseline_precedes_ads() {
        let state = compose(&[media("b1"), media("b2")], &[media("a1")], 10, 10).unwrap();
        let tags: Vec<ItemTag> = state.items.iter().map(|i| i.tag).collect();
        assert_eq!(tags, vec![ItemTag::Baseline, ItemTag::Baseline, ItemTag::Ad]);
    }

    #[test]
    fn zero_ads_still_yields_baseline() {
        let state = compose(&[media("b1"), media("b2"), media("b3")], &[], 10, 10).unwrap();
        assert_eq!(state.items.len(), 3);
        assert_eq!(state.baseline_count(), 3);
        assert_eq!(state.ad_count(), 0);
    }

    #[test]
    fn baseline_cap_applies() {
        let baseline: Vec<ScheduledMedia> = (0..8).map(|i| media(&format!("b{i}"))).collect();
        let state = compose(&baseline, &[], 5, 10).unwrap();
        assert_eq!(state.items.len(), 5);
        assert_eq!(state.items[0].media_id, "b0");
        assert_eq!(state.items[4].media_id, "b4");
    }

    #[test]
    fn ad_slot_cap_applies() {
        let ads: Vec<ScheduledMedia> = (0..6).map(|i| media(&format!("a{i}"))).collect();
        let state = compose(&[media("b1")], &ads, 10, 2).unwrap();
        assert_eq!(state.ad_count(), 2);
        assert_eq!(state.items.last().unwrap().media_id, "a1");
    }

    #[test]
    fn collaborator_order_is_preserved() {
        let state = compose(
            &[media("b2"), media("b1")],
            &[media("a9"), media("a1")],
            10,
            10,
        )
        .unwrap();
        let ids: Vec<&str> = state.items.iter().map(|i| i.media_id.as_str()).collect();
        assert_eq!(ids, vec!["b2", "b1", "a9", "a1"]);
    }

    #[test]
    fn empty_baseline_is_rejected() {
        let err = compose(&[], &[media("a1")], 10, 10).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }
}
