//! Gateway seam between the engine and the device-management service.
//!
//! The engine only talks to [`ScreenGateway`]; [`VendorGateway`] is the
//! production implementation over the REST client, and the integration
//! tests substitute an in-memory fake.

use async_trait::async_trait;

use adscreen_core::content::ContentItem;
use adscreen_core::error::DegradedReason;
use adscreen_core::types::VendorId;
use adscreen_vendor::api::{VendorApi, VendorApiError};
use adscreen_vendor::normalize::{normalize_player, normalize_playlist_items, NormalizedPlayer, RemoteItem};
use adscreen_vendor::wire::{items_body, BindPayloadShape};

/// Errors crossing the gateway seam.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Network-level failure; retryable by re-running the attempt.
    #[error("vendor unreachable: {0}")]
    Unreachable(String),

    /// The vendor refused the request; terminal within an attempt. The
    /// raw body is preserved for the step log.
    #[error("vendor rejected request ({status}): {body}")]
    Rejected { status: u16, body: String },
}

impl GatewayError {
    /// The degraded reason this error classifies an attempt as.
    pub fn reason(&self) -> DegradedReason {
        match self {
            Self::Unreachable(_) => DegradedReason::VendorUnreachable,
            Self::Rejected { .. } => DegradedReason::VendorRejected,
        }
    }
}

impl From<VendorApiError> for GatewayError {
    fn from(err: VendorApiError) -> Self {
        match err {
            VendorApiError::Request(e) => Self::Unreachable(e.to_string()),
            VendorApiError::Api { status, body } => Self::Rejected { status, body },
        }
    }
}

/// The vendor operations the engine needs, in normalized terms.
#[async_trait]
pub trait ScreenGateway: Send + Sync {
    /// Fetch and normalize a player's configuration.
    async fn fetch_player(&self, device_id: &str) -> Result<NormalizedPlayer, GatewayError>;

    /// Fetch and normalize a sequence's items.
    async fn fetch_sequence_items(
        &self,
        sequence_id: &str,
    ) -> Result<Vec<RemoteItem>, GatewayError>;

    /// Find an existing sequence by exact name.
    async fn find_sequence(&self, name: &str) -> Result<Option<VendorId>, GatewayError>;

    /// Create a sequence and return its id.
    async fn create_sequence(&self, name: &str) -> Result<VendorId, GatewayError>;

    /// Replace a sequence's items wholesale.
    async fn replace_items(
        &self,
        sequence_id: &str,
        items: &[ContentItem],
    ) -> Result<(), GatewayError>;

    /// Set the device's content source using the given payload shape.
    /// Callers must verify by read-back; the vendor silently ignores
    /// shapes it does not understand.
    async fn bind_source(
        &self,
        device_id: &str,
        sequence_id: &str,
        shape: BindPayloadShape,
    ) -> Result<(), GatewayError>;

    /// Ask the device to restart its playback application.
    async fn restart_device(&self, device_id: &str) -> Result<(), GatewayError>;

    /// Download the current screenshot bytes.
    async fn fetch_screenshot(&self, url: &str) -> Result<Vec<u8>, GatewayError>;
}

/// Production gateway over the REST client.
pub struct VendorGateway {
    api: VendorApi,
}

impl VendorGateway {
    pub fn new(api: VendorApi) -> Self {
        Self { api }
    }

    /// Pull an id out of a raw created/listed object. The id key has
    /// varied across API versions.
    fn extract_id(raw: &serde_json::Value) -> Option<VendorId> {
        for key in ["id", "playlist_id", "uuid"] {
            match raw.get(key) {
                Some(serde_json::Value::String(s)) if !s.is_empty() => return Some(s.clone()),
                Some(serde_json::Value::Number(n)) => return Some(n.to_string()),
                _ => {}
            }
        }
        None
    }
}

#[async_trait]
impl ScreenGateway for VendorGateway {
    async fn fetch_player(&self, device_id: &str) -> Result<NormalizedPlayer, GatewayError> {
        let raw = self.api.get_player(device_id).await?;
        Ok(normalize_player(&raw))
    }

    async fn fetch_sequence_items(
        &self,
        sequence_id: &str,
    ) -> Result<Vec<RemoteItem>, GatewayError> {
        let raw = self.api.get_playlist(sequence_id).await?;
        Ok(normalize_playlist_items(&raw))
    }

    async fn find_sequence(&self, name: &str) -> Result<Option<VendorId>, GatewayError> {
        let raw = self.api.search_playlists(name).await?;
        // Search results arrive either as a bare array or under "items";
        // the search itself is prefix-based, so match names exactly here.
        let entries = raw
            .as_array()
            .or_else(|| raw.get("items").and_then(serde_json::Value::as_array));
        let Some(entries) = entries else {
            return Ok(None);
        };
        for entry in entries {
            let matches = entry
                .get("name")
                .and_then(serde_json::Value::as_str)
                .map(|n| n == name)
                .unwrap_or(false);
            if matches {
                return Ok(Self::extract_id(entry));
            }
        }
        Ok(None)
    }

    async fn create_sequence(&self, name: &str) -> Result<VendorId, GatewayError> {
        let raw = self.api.create_playlist(name).await?;
        Self::extract_id(&raw).ok_or_else(|| GatewayError::Rejected {
            status: 200,
            body: format!("created playlist has no recognizable id: {raw}"),
        })
    }

    async fn replace_items(
        &self,
        sequence_id: &str,
        items: &[ContentItem],
    ) -> Result<(), GatewayError> {
        let body = items_body(items);
        self.api.replace_playlist_items(sequence_id, &body).await?;
        Ok(())
    }

    async fn bind_source(
        &self,
        device_id: &str,
        sequence_id: &str,
        shape: BindPayloadShape,
    ) -> Result<(), GatewayError> {
        let body = shape.bind_body(sequence_id);
        self.api.update_player(device_id, &body).await?;
        Ok(())
    }

    async fn restart_device(&self, device_id: &str) -> Result<(), GatewayError> {
        self.api.restart_player(device_id).await?;
        Ok(())
    }

    async fn fetch_screenshot(&self, url: &str) -> Result<Vec<u8>, GatewayError> {
        Ok(self.api.fetch_screenshot(url).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extract_id_handles_string_and_number() {
        assert_eq!(
            VendorGateway::extract_id(&json!({ "id": "abc" })).as_deref(),
            Some("abc")
        );
        assert_eq!(
            VendorGateway::extract_id(&json!({ "id": 42 })).as_deref(),
            Some("42")
        );
        assert_eq!(
            VendorGateway::extract_id(&json!({ "playlist_id": 7 })).as_deref(),
            Some("7")
        );
        assert_eq!(VendorGateway::extract_id(&json!({ "name": "x" })), None);
    }

    #[test]
    fn gateway_error_reasons() {
        let unreachable = GatewayError::Unreachable("timeout".into());
        assert_eq!(unreachable.reason(), DegradedReason::VendorUnreachable);

        let rejected = GatewayError::Rejected {
            status: 422,
            body: "bad".into(),
        };
        assert_eq!(rejected.reason(), DegradedReason::VendorRejected);
    }
}
