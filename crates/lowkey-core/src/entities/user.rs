//! User entity - an account registered with the API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User as returned by `/auth/*` and `/users/*`
///
/// The API strips the password hash before responding, so only public
/// profile fields are modelled here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub display_name: String,
    #[serde(default)]
    pub verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Check whether `identifier` names this user, the way `/auth/login`
    /// resolves it: email or display name, case-insensitive
    pub fn matches_identifier(&self, identifier: &str) -> bool {
        let identifier = identifier.to_lowercase();
        self.email.to_lowercase() == identifier || self.display_name.to_lowercase() == identifier
    }
}

/// Response body of `/auth/register` and `/auth/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}
