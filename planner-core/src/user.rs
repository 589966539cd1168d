//! Authenticated user identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A planner user. Identity is the username; there is no separate numeric id.
///
/// Serialized camelCase to stay compatible with previously stored sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// A user record with a fresh login timestamp.
    pub fn logged_in(username: &str) -> Self {
        User {
            username: username.to_string(),
            last_login: Some(Utc::now()),
        }
    }
}
