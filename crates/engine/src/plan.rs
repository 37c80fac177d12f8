//! Planning: the pure diff between desired and remote state.
//!
//! Decides which writes the attempt needs. No I/O here — everything the
//! planner knows arrives as arguments, which is what makes the decision
//! logic exhaustively testable.

use serde::Serialize;

use adscreen_core::content::DesiredState;
use adscreen_core::device::SourceKind;
use adscreen_core::types::{DbId, VendorId};
use adscreen_vendor::normalize::RemoteItem;

use crate::reader::RemoteConfig;

/// The sequence this attempt converges the device onto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "target", rename_all = "kebab-case")]
pub enum SequenceTarget {
    /// The location already owns a live sequence.
    Existing { sequence_id: VendorId },
    /// No usable sequence yet; create one under the stable name.
    Create { name: String },
}

/// The writes an attempt will perform, in order: ensure sequence,
/// replace items, rebind device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub sequence: SequenceTarget,
    /// Full item replace needed (list differs, is empty, or the sequence
    /// is fresh).
    pub replace_items: bool,
    /// Device bind differs from canonical and must be rewritten.
    pub rebind: bool,
}

impl Plan {
    pub fn is_noop(&self) -> bool {
        matches!(self.sequence, SequenceTarget::Existing { .. })
            && !self.replace_items
            && !self.rebind
    }
}

/// Stable, idempotent sequence name for a location.
///
/// Creating "the location's sequence" twice must land on the same remote
/// object, so the key is derived from the internal id only.
pub fn sequence_name(location_id: DbId) -> String {
    format!("loc-{location_id}-content")
}

/// Compare desired vs. actual and decide the writes.
///
/// Rules:
/// - No known sequence id, or the known one was deleted remotely, means
///   create (and therefore seed items and bind).
/// - Any non-`sequence` source kind is always overridden toward the
///   canonical kind; there is no adaptive dual-mode support.
/// - Items are replaced when identity or order differs; durations ride
///   along in the same full replace.
pub fn build_plan(
    location_id: DbId,
    desired: &DesiredState,
    remote: &RemoteConfig,
    known_sequence_id: Option<&str>,
) -> Plan {
    let sequence = match known_sequence_id {
        Some(id) if !remote.canonical_missing => SequenceTarget::Existing {
            sequence_id: id.to_string(),
        },
        _ => SequenceTarget::Create {
            name: sequence_name(location_id),
        },
    };

    let (replace_items, rebind) = match &sequence {
        SequenceTarget::Create { .. } => (true, true),
        SequenceTarget::Existing { sequence_id } => {
            let replace = match &remote.items {
                Some(items) => !items_match(items, desired),
                None => true,
            };
            let bound_correctly = remote.player.source_kind == SourceKind::Sequence
                && remote.player.source_id.as_deref() == Some(sequence_id.as_str());
            (replace, !bound_correctly)
        }
    };

    Plan {
        sequence,
        replace_items,
        rebind,
    }
}

/// Item lists match when the media ids agree in identity and order.
fn items_match(remote: &[RemoteItem], desired: &DesiredState) -> bool {
    if remote.is_empty() {
        // Never leave a sequence empty; the baseline seed always applies.
        return false;
    }
    remote.len() == desired.items.len()
        && remote
            .iter()
            .zip(desired.items.iter())
            .all(|(r, d)| r.media_id == d.media_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use adscreen_core::content::{ContentItem, ItemTag};
    use adscreen_core::device::OnlineState;
    use adscreen_vendor::normalize::NormalizedPlayer;

    fn desired(ids: &[&str]) -> DesiredState {
        DesiredState {
            items: ids
                .iter()
                .map(|id| ContentItem {
                    media_id: id.to_string(),
                    duration_seconds: 10,
                    tag: ItemTag::Baseline,
                })
                .collect(),
        }
    }

    fn remote_item(id: &str, position: u32) -> RemoteItem {
        RemoteItem {
            media_id: id.to_string(),
            duration_seconds: 10,
            position,
        }
    }

    fn player(kind: SourceKind, source_id: Option<&str>) -> NormalizedPlayer {
        NormalizedPlayer {
            online: OnlineState::Online,
            source_kind: kind,
            source_id: source_id.map(str::to_string),
            last_seen: None,
            screenshot_url: None,
            reports_empty: None,
            provenance: Vec::new(),
        }
    }

    fn remote(
        kind: SourceKind,
        source_id: Option<&str>,
        items: Option<Vec<RemoteItem>>,
    ) -> RemoteConfig {
        RemoteConfig {
            player: player(kind, source_id),
            items,
            canonical_missing: false,
        }
    }

    #[test]
    fn converged_state_is_a_noop_plan() {
        let remote = remote(
            SourceKind::Sequence,
            Some("seq-1"),
            Some(vec![remote_item("a", 0), remote_item("b", 1)]),
        );
        let plan = build_plan(1, &desired(&["a", "b"]), &remote, Some("seq-1"));
        assert!(plan.is_noop());
    }

    #[test]
    fn no_known_sequence_means_create_seed_and_bind() {
        let remote = remote(SourceKind::None, None, None);
        let plan = build_plan(7, &desired(&["a"]), &remote, None);
        assert_eq!(
            plan.sequence,
            SequenceTarget::Create {
                name: "loc-7-content".into()
            }
        );
        assert!(plan.replace_items);
        assert!(plan.rebind);
    }

    #[test]
    fn layout_bound_device_is_always_rebound() {
        let remote = remote(
            SourceKind::Layout,
            Some("layout-3"),
            Some(vec![remote_item("a", 0)]),
        );
        let plan = build_plan(1, &desired(&["a"]), &remote, Some("seq-1"));
        assert!(plan.rebind);
        assert!(!plan.replace_items);
    }

    #[test]
    fn schedule_bound_device_is_always_rebound() {
        let remote = remote(SourceKind::Schedule, Some("sch-9"), Some(vec![remote_item("a", 0)]));
        let plan = build_plan(1, &desired(&["a"]), &remote, Some("seq-1"));
        assert!(plan.rebind);
    }

    #[test]
    fn bound_to_foreign_sequence_is_rebound() {
        let remote = remote(
            SourceKind::Sequence,
            Some("someone-elses"),
            Some(vec![remote_item("a", 0)]),
        );
        let plan = build_plan(1, &desired(&["a"]), &remote, Some("seq-1"));
        assert!(plan.rebind);
    }

    #[test]
    fn item_order_difference_triggers_replace() {
        let remote = remote(
            SourceKind::Sequence,
            Some("seq-1"),
            Some(vec![remote_item("b", 0), remote_item("a", 1)]),
        );
        let plan = build_plan(1, &desired(&["a", "b"]), &remote, Some("seq-1"));
        assert!(plan.replace_items);
        assert!(!plan.rebind);
    }

    #[test]
    fn extra_remote_item_triggers_replace() {
        let remote = remote(
            SourceKind::Sequence,
            Some("seq-1"),
            Some(vec![remote_item("a", 0), remote_item("x", 1)]),
        );
        let plan = build_plan(1, &desired(&["a"]), &remote, Some("seq-1"));
        assert!(plan.replace_items);
    }

    #[test]
    fn empty_sequence_is_reseeded() {
        let remote = remote(SourceKind::Sequence, Some("seq-1"), Some(vec![]));
        let plan = build_plan(1, &desired(&["a"]), &remote, Some("seq-1"));
        assert!(plan.replace_items);
    }

    #[test]
    fn deleted_canonical_sequence_forces_create() {
        let mut config = remote(SourceKind::Sequence, Some("seq-1"), None);
        config.canonical_missing = true;
        let plan = build_plan(3, &desired(&["a"]), &config, Some("seq-1"));
        assert_eq!(
            plan.sequence,
            SequenceTarget::Create {
                name: "loc-3-content".into()
            }
        );
        assert!(plan.replace_items);
        assert!(plan.rebind);
    }

    #[test]
    fn sequence_name_is_stable() {
        assert_eq!(sequence_name(42), sequence_name(42));
        assert_eq!(sequence_name(42), "loc-42-content");
    }
}
