//! Push message payloads shown as notifications by the service worker.

use serde::{Deserialize, Serialize};
use tracing::info;

/// Vibration pattern attached to every notification, in milliseconds.
pub const VIBRATE_PATTERN: [u32; 2] = [200, 200];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PushPayload {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub vibrate: [u32; 2],
}

impl From<PushPayload> for Notification {
    fn from(payload: PushPayload) -> Self {
        Notification {
            title: payload.title,
            body: payload.body,
            vibrate: VIBRATE_PATTERN,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum NotificationError {
    #[error("invalid push payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Turn a push message into a notification. Messages without data are
/// ignored; data that is present must be a JSON payload, even when blank.
pub fn notification_for_push(data: Option<&str>) -> Result<Option<Notification>, NotificationError> {
    let Some(data) = data else {
        info!("Ignoring push message with no data");
        return Ok(None);
    };
    let payload: PushPayload = serde_json::from_str(data)?;
    info!(title = %payload.title, "Received push notification");
    Ok(Some(payload.into()))
}
