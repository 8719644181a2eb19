//! User directory profiles

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A minimal user directory entry.
///
/// Profiles carry just enough identity for membership display and mention
/// resolution: a display name and an email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// When the profile was registered
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Creates a new profile registered now.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            email: email.into(),
            created_at: Utc::now(),
        }
    }

    /// The local part of the email address (before the `@`).
    pub fn email_local(&self) -> &str {
        self.email.split('@').next().unwrap_or(&self.email)
    }
}
