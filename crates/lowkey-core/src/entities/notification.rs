//! Notification entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Notification as returned by `/notifications*`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_user_id: Option<String>,
    /// Set on `dm` notifications
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Notification {
    /// Kind of the notification fanned out for a direct message
    pub const DM: &'static str = "dm";

    /// Check whether this is a direct-message notification sent by `sender_id`
    pub fn is_dm_from(&self, sender_id: &str) -> bool {
        self.kind == Self::DM && self.from_user_id.as_deref() == Some(sender_id)
    }
}

/// `{ "success": bool }` acknowledgement body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}
