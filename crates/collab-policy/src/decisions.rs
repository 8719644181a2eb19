//! # Authorization Decisions
//!
//! Pure decision functions over an actor and its team context. Each function
//! returns a plain `bool`; callers are responsible for resolving the actor's
//! role in the relevant team and for surfacing a `false` as an authorization
//! failure.
//!
//! Team-scoped rules follow two patterns:
//! - **Participation**: workspace admins bypass, otherwise any membership in
//!   the issue's team suffices (view, create, edit)
//! - **Management**: the coarse manage-all capability bypasses, otherwise the
//!   lead role is required (team settings, membership changes)

use uuid::Uuid;

use crate::actor::Actor;
use collab_team::TeamRole;

// ============================================================================
// Comment decisions
// ============================================================================

/// May the actor view comments on an issue in a team where they hold
/// `team_role` (if any)?
///
/// Admins bypass; otherwise any membership suffices.
pub fn can_view_comment(actor: &Actor, team_role: Option<TeamRole>) -> bool {
    actor.is_admin() || team_role.is_some()
}

/// May the actor comment on an issue in a team where they hold `team_role`?
///
/// Same rule as viewing: admins bypass, otherwise any membership suffices.
pub fn can_create_comment(actor: &Actor, team_role: Option<TeamRole>) -> bool {
    actor.is_admin() || team_role.is_some()
}

/// May the actor edit a comment authored by `author_id`?
///
/// Admins bypass; otherwise only the author may edit. Team leads get no
/// special edit rights over other people's words.
pub fn can_update_comment(actor: &Actor, author_id: Uuid) -> bool {
    actor.is_admin() || actor.id == author_id
}

/// May the actor delete a comment authored by `author_id` on an issue in a
/// team where they hold `team_role`?
///
/// Admins bypass; the author may always delete; leads of the issue's team
/// may moderate.
pub fn can_delete_comment(actor: &Actor, author_id: Uuid, team_role: Option<TeamRole>) -> bool {
    actor.is_admin() || actor.id == author_id || team_role == Some(TeamRole::Lead)
}

// ============================================================================
// Team decisions
// ============================================================================

/// May the actor create a new team?
pub fn can_create_team(actor: &Actor) -> bool {
    actor.can_manage_all_teams()
}

/// May the actor update the settings of a team where they hold `team_role`?
pub fn can_update_team(actor: &Actor, team_role: Option<TeamRole>) -> bool {
    actor.can_manage_all_teams() || team_role == Some(TeamRole::Lead)
}

/// May the actor add, remove, or re-role members of a team where they hold
/// `team_role`? Also gates sending and listing invitations.
pub fn can_manage_members(actor: &Actor, team_role: Option<TeamRole>) -> bool {
    actor.can_manage_all_teams() || team_role == Some(TeamRole::Lead)
}

/// May the actor delete a team outright?
///
/// Deletion cascades to memberships, invitations, and issues, so it stays
/// with the manage-all capability rather than team leads.
pub fn can_delete_team(actor: &Actor) -> bool {
    actor.can_manage_all_teams()
}

/// May the actor leave a team where they hold `team_role`?
///
/// Any member may leave, leads included.
pub fn can_leave_team(team_role: Option<TeamRole>) -> bool {
    team_role.is_some()
}

// ============================================================================
// Issue decisions
// ============================================================================

/// May the actor view an issue in a team where they hold `team_role`?
pub fn can_view_issue(actor: &Actor, team_role: Option<TeamRole>) -> bool {
    actor.is_admin() || team_role.is_some()
}

/// May the actor create or edit issues in a team where they hold `team_role`?
pub fn can_edit_issue(actor: &Actor, team_role: Option<TeamRole>) -> bool {
    actor.is_admin() || team_role.is_some()
}

/// May the actor delete an issue created by `creator_id` in a team where
/// they hold `team_role`?
///
/// Admins bypass; the creator may delete their own issue; leads may delete
/// any issue in their team.
pub fn can_delete_issue(actor: &Actor, creator_id: Uuid, team_role: Option<TeamRole>) -> bool {
    actor.is_admin() || actor.id == creator_id || team_role == Some(TeamRole::Lead)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::WorkspaceRole;

    fn admin() -> Actor {
        Actor::new(Uuid::now_v7()).with_role(WorkspaceRole::Admin)
    }

    fn manager() -> Actor {
        Actor::new(Uuid::now_v7()).with_role(WorkspaceRole::Manager)
    }

    fn member() -> Actor {
        Actor::new(Uuid::now_v7())
    }

    #[test]
    fn test_comment_view_and_create() {
        for decide in [can_view_comment, can_create_comment] {
            // Admin bypasses even without membership.
            assert!(decide(&admin(), None));

            // Members of the team pass, regardless of role.
            assert!(decide(&member(), Some(TeamRole::Member)));
            assert!(decide(&member(), Some(TeamRole::Lead)));

            // Outsiders fail, manage-all does not help here.
            assert!(!decide(&member(), None));
            assert!(!decide(&manager(), None));
        }
    }

    #[test]
    fn test_comment_update_is_author_or_admin() {
        let author = member();
        let other = member();

        assert!(can_update_comment(&author, author.id));
        assert!(!can_update_comment(&other, author.id));
        assert!(can_update_comment(&admin(), author.id));

        // Leads do not get edit rights via their team role.
        let lead = member();
        assert!(!can_update_comment(&lead, author.id));
    }

    #[test]
    fn test_comment_delete_adds_lead_moderation() {
        let author = member();
        let other = member();

        assert!(can_delete_comment(&author, author.id, Some(TeamRole::Member)));
        assert!(can_delete_comment(&other, author.id, Some(TeamRole::Lead)));
        assert!(can_delete_comment(&admin(), author.id, None));
        assert!(!can_delete_comment(&other, author.id, Some(TeamRole::Member)));
        assert!(!can_delete_comment(&other, author.id, None));
    }

    #[test]
    fn test_team_update_and_member_management() {
        for decide in [can_update_team, can_manage_members] {
            assert!(decide(&manager(), None));
            assert!(decide(&admin(), None));
            assert!(decide(&member(), Some(TeamRole::Lead)));
            assert!(!decide(&member(), Some(TeamRole::Member)));
            assert!(!decide(&member(), None));
        }
    }

    #[test]
    fn test_team_create_and_delete_need_manage_all() {
        assert!(can_create_team(&manager()));
        assert!(can_create_team(&admin()));
        assert!(!can_create_team(&member()));

        assert!(can_delete_team(&manager()));
        assert!(!can_delete_team(&member()));
    }

    #[test]
    fn test_leave_team() {
        assert!(can_leave_team(Some(TeamRole::Member)));
        assert!(can_leave_team(Some(TeamRole::Lead)));
        assert!(!can_leave_team(None));
    }

    #[test]
    fn test_issue_decisions() {
        assert!(can_view_issue(&admin(), None));
        assert!(can_view_issue(&member(), Some(TeamRole::Member)));
        assert!(!can_view_issue(&member(), None));

        assert!(can_edit_issue(&member(), Some(TeamRole::Member)));
        assert!(!can_edit_issue(&manager(), None));

        let creator = member();
        let other = member();
        assert!(can_delete_issue(&creator, creator.id, Some(TeamRole::Member)));
        assert!(can_delete_issue(&other, creator.id, Some(TeamRole::Lead)));
        assert!(!can_delete_issue(&other, creator.id, Some(TeamRole::Member)));
    }
}
