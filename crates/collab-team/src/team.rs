//! Team domain models
//!
//! This module provides the core Team entity. Teams are named groups of
//! users that own issues and comment threads, identified by a short unique
//! code used in UI references and issue listings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::membership::TeamRole;

/// A team is a named group of users that owns issues and their discussions.
///
/// Users can belong to multiple teams with different roles. Each team has a
/// short code (unique across the deployment), display branding, and an
/// optional description.
///
/// # Architecture
///
/// ```text
/// Team
///   ├─ Members (via TeamMembership)
///   ├─ Invitations (via TeamInvitation)
///   └─ Issues (owned by the team)
/// ```
///
/// # Examples
///
/// ```
/// use collab_team::Team;
///
/// let team = Team::new("CORE", "Core Commerce");
/// assert_eq!(team.code, "CORE");
/// assert_eq!(team.name, "Core Commerce");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    /// Unique identifier for the team
    pub id: Uuid,

    /// Short code (unique across the deployment), e.g. "CORE"
    pub code: String,

    /// Human-readable name
    pub name: String,

    /// Icon identifier for display
    pub icon: Option<String>,

    /// Accent color for display (hex string)
    pub color: Option<String>,

    /// Optional description
    pub description: Option<String>,

    /// When the team was created
    pub created_at: DateTime<Utc>,

    /// When the team was last updated
    pub updated_at: DateTime<Utc>,
}

impl Team {
    /// Creates a new team.
    ///
    /// The team is created with:
    /// - A newly generated UUID v7 ID
    /// - No icon, color, or description
    /// - Current timestamp for created_at and updated_at
    ///
    /// # Arguments
    ///
    /// * `code` - Short code, unique across the deployment
    /// * `name` - The team name
    ///
    /// # Examples
    ///
    /// ```
    /// use collab_team::Team;
    ///
    /// let team = Team::new("OPS", "Operations");
    /// ```
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            code: code.into(),
            name: name.into(),
            icon: None,
            color: None,
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the icon (builder style).
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Sets the accent color (builder style).
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Sets the description (builder style).
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Marks the team as updated now.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Summary of a team for list displays.
///
/// This is a lightweight representation of a team that includes aggregated
/// counts and the viewing user's role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSummary {
    /// Team ID
    pub id: Uuid,

    /// Short code
    pub code: String,

    /// Team name
    pub name: String,

    /// Icon identifier
    pub icon: Option<String>,

    /// Accent color
    pub color: Option<String>,

    /// Viewing user's role in this team
    pub user_role: TeamRole,

    /// Number of members
    pub member_count: u32,

    /// Number of issues owned by the team
    pub issue_count: u32,
}
