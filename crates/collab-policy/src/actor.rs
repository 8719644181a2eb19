//! Actors and workspace-level roles
//!
//! The actor is the authenticated caller of every mutating operation. Its
//! workspace roles are coarse, deployment-wide capabilities; fine-grained
//! team roles live on memberships in `collab-team`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Workspace-level role of a user.
///
/// Roles are ordered: `Member < Manager < Admin`. Managers hold the coarse
/// manage-all-teams capability; admins additionally bypass team-scoped
/// checks on issues and comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceRole {
    /// Regular workspace member
    Member = 0,
    /// Can create, update, and delete any team
    Manager = 1,
    /// Full access across the workspace
    Admin = 2,
}

impl WorkspaceRole {
    /// Returns the string representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkspaceRole::Member => "member",
            WorkspaceRole::Manager => "manager",
            WorkspaceRole::Admin => "admin",
        }
    }

    /// Parses a role from its string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "member" => Some(WorkspaceRole::Member),
            "manager" => Some(WorkspaceRole::Manager),
            "admin" => Some(WorkspaceRole::Admin),
            _ => None,
        }
    }

    /// Returns a human-friendly display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            WorkspaceRole::Member => "Member",
            WorkspaceRole::Manager => "Manager",
            WorkspaceRole::Admin => "Administrator",
        }
    }
}

impl std::fmt::Display for WorkspaceRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The authenticated caller of an operation.
///
/// Every mutating operation takes the actor explicitly; nothing is read from
/// ambient context. An actor with no elevated roles is a plain workspace
/// member whose reach is determined entirely by team memberships.
///
/// # Examples
///
/// ```
/// use collab_policy::{Actor, WorkspaceRole};
/// use uuid::Uuid;
///
/// let actor = Actor::new(Uuid::now_v7()).with_role(WorkspaceRole::Manager);
/// assert!(actor.can_manage_all_teams());
/// assert!(!actor.is_admin());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// User ID of the caller
    pub id: Uuid,

    /// Workspace roles held by the caller
    pub roles: BTreeSet<WorkspaceRole>,
}

impl Actor {
    /// Creates an actor with the plain member role.
    pub fn new(id: Uuid) -> Self {
        let mut roles = BTreeSet::new();
        roles.insert(WorkspaceRole::Member);
        Self { id, roles }
    }

    /// Adds a workspace role (builder style).
    pub fn with_role(mut self, role: WorkspaceRole) -> Self {
        self.roles.insert(role);
        self
    }

    /// Whether the actor holds the given role.
    pub fn has_role(&self, role: WorkspaceRole) -> bool {
        self.roles.contains(&role)
    }

    /// Whether the actor is a workspace admin.
    pub fn is_admin(&self) -> bool {
        self.has_role(WorkspaceRole::Admin)
    }

    /// Whether the actor holds the coarse manage-all-teams capability.
    ///
    /// Managers and admins both qualify.
    pub fn can_manage_all_teams(&self) -> bool {
        self.roles
            .iter()
            .any(|role| *role >= WorkspaceRole::Manager)
    }
}
