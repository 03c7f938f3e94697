//! Notification value types.

use chrono::{DateTime, Utc};
use folio_core::NotificationId;
use serde::{Deserialize, Serialize};

/// Visual intent of a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// A completed action.
    Success,
    /// A failed action.
    Error,
}

/// A transient message shown as a banner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique identity, also the key of the expiry timer.
    pub id: NotificationId,
    /// Text to display.
    pub message: String,
    /// Success or error styling.
    pub kind: NotificationKind,
    /// When the notification was published.
    pub created_at: DateTime<Utc>,
}

/// Why a notification left the queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemovalReason {
    /// The visible duration elapsed.
    Expired,
    /// Removed explicitly before expiry.
    Dismissed,
}

/// Change to the visible queue, delivered to subscribers.
#[derive(Clone, Debug, PartialEq)]
pub enum NotificationEvent {
    /// A notification was appended.
    Published(Notification),
    /// A notification was removed.
    Removed {
        /// Identity of the removed notification.
        id: NotificationId,
        /// Expiry or dismissal.
        reason: RemovalReason,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&NotificationKind::Success).unwrap(),
            "\"success\""
        );
        assert_eq!(
            serde_json::to_string(&NotificationKind::Error).unwrap(),
            "\"error\""
        );
    }

    #[test]
    fn notification_serializes_camel_case() {
        let n = Notification {
            id: NotificationId::from("n-1"),
            message: "Saved".to_string(),
            kind: NotificationKind::Success,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["id"], "n-1");
        assert!(json["createdAt"].is_string());
    }
}
