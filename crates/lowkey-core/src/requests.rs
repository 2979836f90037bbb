//! Request bodies sent to the API
//!
//! Field names follow the API's camelCase JSON.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Password used for every account the harness registers
pub const DEFAULT_PASSWORD: &str = "securepassword123";

/// Short random suffix for unique test data (first 8 hex chars of a UUIDv4)
pub fn unique_suffix() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}

/// POST /auth/register
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

impl RegisterRequest {
    /// Credentials with a random suffix so repeated runs never collide.
    /// `tag` is folded into both the email and the display name.
    pub fn unique(tag: &str) -> Self {
        let suffix = unique_suffix();
        Self {
            email: format!("testuser_{tag}_{suffix}@example.com"),
            password: DEFAULT_PASSWORD.to_string(),
            display_name: format!("TestUser_{tag}_{suffix}"),
        }
    }
}

/// POST /auth/login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Email or display name
    pub identifier: String,
    pub password: String,
}

impl LoginRequest {
    pub fn with_email(reg: &RegisterRequest) -> Self {
        Self {
            identifier: reg.email.clone(),
            password: reg.password.clone(),
        }
    }

    pub fn with_display_name(reg: &RegisterRequest) -> Self {
        Self {
            identifier: reg.display_name.clone(),
            password: reg.password.clone(),
        }
    }
}

/// POST /auth/forgot-password
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// POST /auth/reset-password
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub email: String,
    pub password: String,
}

/// PUT /users/{id}/verify
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub verified: bool,
}

/// POST /conversations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConversationRequest {
    pub participants: [String; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_from_non_friend: Option<bool>,
}

impl CreateConversationRequest {
    pub fn between(a: &str, b: &str) -> Self {
        Self {
            participants: [a.to_string(), b.to_string()],
            is_from_non_friend: None,
        }
    }

    /// Conversation opened by someone who is not yet a friend; the API holds
    /// it unaccepted until the recipient accepts
    pub fn from_non_friend(a: &str, b: &str) -> Self {
        Self {
            participants: [a.to_string(), b.to_string()],
            is_from_non_friend: Some(true),
        }
    }
}

/// POST /messages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub conversation_id: String,
    pub sender_id: String,
    pub content: String,
}

/// POST /notifications
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationRequest {
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub from_user_id: String,
}

/// POST /friends/request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequest {
    pub from_user_id: String,
    pub to_user_id: String,
}

/// POST /friends/accept
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptFriendRequest {
    pub user_id: String,
    pub friend_id: String,
}
