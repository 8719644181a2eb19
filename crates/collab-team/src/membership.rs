//! Team membership and roles
//!
//! This module defines the membership relationship between users and teams,
//! and the two-level role hierarchy within a team. At most one membership
//! exists per (team, user) pair; the stateful services enforce uniqueness.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Team Roles
// ============================================================================

/// Role of a user within a team.
///
/// Roles are ordered: `Member < Lead`. Leads can manage the team's settings
/// and membership; members participate in issues and discussions.
///
/// # Examples
///
/// ```
/// use collab_team::TeamRole;
///
/// assert!(TeamRole::Lead > TeamRole::Member);
/// assert!(TeamRole::Lead.can_manage_team());
/// assert!(!TeamRole::Member.can_manage_team());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamRole {
    /// Regular member: participates in issues and discussions
    Member = 0,
    /// Team lead: manages team settings and membership
    Lead = 1,
}

impl TeamRole {
    /// Returns the string representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            TeamRole::Member => "member",
            TeamRole::Lead => "lead",
        }
    }

    /// Parses a role from its string representation.
    ///
    /// Returns `None` for unknown values.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "member" => Some(TeamRole::Member),
            "lead" => Some(TeamRole::Lead),
            _ => None,
        }
    }

    /// Returns a human-friendly display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            TeamRole::Member => "Member",
            TeamRole::Lead => "Lead",
        }
    }

    /// Whether this role can update team settings and manage membership.
    pub fn can_manage_team(&self) -> bool {
        matches!(self, TeamRole::Lead)
    }
}

impl std::fmt::Display for TeamRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Team Membership
// ============================================================================

/// A user's membership in a team.
///
/// At most one membership exists per (team, user) pair. The role determines
/// what the user can do within the team; see [`TeamRole`].
///
/// # Examples
///
/// ```
/// use collab_team::{TeamMembership, TeamRole};
/// use uuid::Uuid;
///
/// let team_id = Uuid::now_v7();
/// let user_id = Uuid::now_v7();
/// let membership = TeamMembership::new(team_id, user_id, TeamRole::Member);
/// assert!(!membership.is_lead());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMembership {
    /// Unique identifier for the membership record
    pub id: Uuid,

    /// Team ID
    pub team_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// Role within the team
    pub role: TeamRole,

    /// When the user joined the team
    pub joined_at: DateTime<Utc>,
}

impl TeamMembership {
    /// Creates a new membership joining now.
    pub fn new(team_id: Uuid, user_id: Uuid, role: TeamRole) -> Self {
        Self {
            id: Uuid::now_v7(),
            team_id,
            user_id,
            role,
            joined_at: Utc::now(),
        }
    }

    /// Whether this membership carries the lead role.
    pub fn is_lead(&self) -> bool {
        self.role == TeamRole::Lead
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_ordering() {
        assert!(TeamRole::Lead > TeamRole::Member);
        assert!(TeamRole::Member < TeamRole::Lead);
    }

    #[test]
    fn test_role_string_round_trip() {
        for role in [TeamRole::Member, TeamRole::Lead] {
            assert_eq!(TeamRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(TeamRole::parse("owner"), None);
    }

    #[test]
    fn test_role_capabilities() {
        assert!(TeamRole::Lead.can_manage_team());
        assert!(!TeamRole::Member.can_manage_team());
    }

    #[test]
    fn test_membership_creation() {
        let team_id = Uuid::now_v7();
        let user_id = Uuid::now_v7();
        let membership = TeamMembership::new(team_id, user_id, TeamRole::Lead);

        assert_eq!(membership.team_id, team_id);
        assert_eq!(membership.user_id, user_id);
        assert_eq!(membership.role, TeamRole::Lead);
        assert!(membership.is_lead());
    }

    #[test]
    fn test_display() {
        assert_eq!(TeamRole::Lead.to_string(), "lead");
        assert_eq!(TeamRole::Member.display_name(), "Member");
    }
}
