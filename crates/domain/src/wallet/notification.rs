//! Notifications and notification preferences

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A notification sent to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Notification id.
    pub id: Uuid,
    /// Recipient user.
    pub user_id: Uuid,
    /// Delivery channel, e.g. `EMAIL`.
    pub channel: String,
    /// Kind of event, e.g. `DEPOSIT_COMPLETED`.
    pub notification_type: String,
    /// Channel-specific address.
    pub recipient: String,
    /// Subject line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Delivery status.
    pub status: String,
    /// Delivery attempts so far.
    #[serde(default)]
    pub attempts: u32,
    /// Last delivery error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Business object the notification is about.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<Uuid>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Delivery time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
}

/// Per-user notification settings.
///
/// The backend owns the set of keys, so they are kept as an open map.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationPreferences(pub BTreeMap<String, serde_json::Value>);

impl NotificationPreferences {
    /// Returns a setting by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    /// Sets a setting, returning the previous value.
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Option<serde_json::Value> {
        self.0.insert(key.into(), value.into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_preferences_round_trip_as_plain_object() {
        let mut prefs: NotificationPreferences =
            serde_json::from_value(json!({ "email": "ALL", "sms": false })).unwrap();
        assert_eq!(prefs.get("email"), Some(&json!("ALL")));

        prefs.set("push", "IMPORTANT");
        assert_eq!(
            serde_json::to_value(&prefs).unwrap(),
            json!({ "email": "ALL", "push": "IMPORTANT", "sms": false })
        );
    }

    #[test]
    fn test_notification_from_backend_json() {
        let notification: Notification = serde_json::from_value(json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "userId": "660e8400-e29b-41d4-a716-446655440001",
            "channel": "EMAIL",
            "notificationType": "DEPOSIT_COMPLETED",
            "recipient": "john@example.com",
            "subject": "Deposit received",
            "status": "SENT",
            "attempts": 1
        }))
        .unwrap();
        assert_eq!(notification.attempts, 1);
        assert_eq!(notification.sent_at, None);
    }
}
