//! Normalized device model.
//!
//! The vendor reports playback state in several shapes across firmware and
//! API versions. The vendor crate collapses them into these fixed types;
//! nothing downstream of normalization ever sees a raw payload.

use serde::{Deserialize, Serialize};

use crate::types::{Timestamp, VendorId};

/// Device connectivity as inferred from the vendor payload.
///
/// `Unknown` is an explicit value, not an error: several vendor responses
/// simply omit every online-ish field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnlineState {
    Online,
    Offline,
    Unknown,
}

impl OnlineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Unknown => "unknown",
        }
    }

    /// Parse the stored string form; anything else is `Unknown`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "online" => Self::Online,
            "offline" => Self::Offline,
            _ => Self::Unknown,
        }
    }
}

/// The content-source mode a device is bound to.
///
/// The engine converges every device toward `Sequence`; all other kinds are
/// actively un-done during reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Sequence,
    Layout,
    Schedule,
    /// The device has no content source at all.
    None,
    /// The payload named a kind we have never seen.
    Unknown,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sequence => "sequence",
            Self::Layout => "layout",
            Self::Schedule => "schedule",
            Self::None => "none",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a vendor kind string, case-insensitively.
    ///
    /// The vendor has used `playlist` and `sequence` interchangeably for the
    /// canonical mode.
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "sequence" | "playlist" => Self::Sequence,
            "layout" => Self::Layout,
            "schedule" => Self::Schedule,
            "none" | "" => Self::None,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted summary of the last remote state observed for a device.
///
/// This is what the health reporter reads; it deliberately carries only the
/// normalized fields, never raw vendor diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSnapshot {
    pub online: OnlineState,
    pub source_kind: SourceKind,
    pub source_id: Option<VendorId>,
    /// Item count of the bound sequence, when one was resolved.
    pub item_count: Option<u32>,
    pub observed_at: Timestamp,
}

impl RemoteSnapshot {
    /// Whether the device is in the canonical mode: bound to a sequence
    /// with at least one resolved item.
    pub fn is_canonical(&self) -> bool {
        self.source_kind == SourceKind::Sequence
            && self.source_id.is_some()
            && self.item_count.map(|n| n > 0).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn parse_known_kinds() {
        assert_eq!(SourceKind::parse("sequence"), SourceKind::Sequence);
        assert_eq!(SourceKind::parse("PLAYLIST"), SourceKind::Sequence);
        assert_eq!(SourceKind::parse("layout"), SourceKind::Layout);
        assert_eq!(SourceKind::parse("schedule"), SourceKind::Schedule);
        assert_eq!(SourceKind::parse(""), SourceKind::None);
    }

    #[test]
    fn parse_unseen_kind_is_unknown_not_error() {
        assert_eq!(SourceKind::parse("widget"), SourceKind::Unknown);
    }

    #[test]
    fn canonical_requires_sequence_with_items() {
        let mut snapshot = RemoteSnapshot {
            online: OnlineState::Online,
            source_kind: SourceKind::Sequence,
            source_id: Some("seq-1".into()),
            item_count: Some(3),
            observed_at: Utc::now(),
        };
        assert!(snapshot.is_canonical());

        snapshot.item_count = Some(0);
        assert!(!snapshot.is_canonical());

        snapshot.item_count = Some(3);
        snapshot.source_kind = SourceKind::Layout;
        assert!(!snapshot.is_canonical());
    }
}
