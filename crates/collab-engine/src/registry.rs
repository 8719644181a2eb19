//! Membership registry service
//!
//! Owns the user directory, teams, and membership rows. Role changes that
//! touch two rows (lead transfer) and removals that touch issues
//! (unassignment) run under a single write guard, so they are atomic from
//! the outside.

use std::sync::Arc;

use uuid::Uuid;

use collab_policy::{decisions, Actor};
use collab_team::{Team, TeamMembership, TeamRole, TeamSummary, UserProfile};

use crate::error::{CollabError, CollabResult};
use crate::store::CollabStore;

/// Parameters for creating a team.
#[derive(Debug, Clone, Default)]
pub struct NewTeam {
    /// Short code, unique across the deployment
    pub code: String,
    /// Team name
    pub name: String,
    /// Icon identifier
    pub icon: Option<String>,
    /// Accent color
    pub color: Option<String>,
    /// Description
    pub description: Option<String>,
}

/// Partial update of a team's settings. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct TeamUpdate {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
}

/// Stateful service for users, teams, and memberships.
///
/// All mutating operations take the acting user explicitly and enforce
/// authorization through `collab-policy` before touching state.
#[derive(Clone)]
pub struct MembershipRegistry {
    store: Arc<CollabStore>,
}

impl MembershipRegistry {
    /// Creates a registry over the shared store.
    pub fn new(store: Arc<CollabStore>) -> Self {
        Self { store }
    }

    // ========================================================================
    // User directory
    // ========================================================================

    /// Registers a user in the directory.
    ///
    /// Names must be non-empty and emails must look like `local@domain` and
    /// be unique (case-insensitive).
    pub async fn register_user(
        &self,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> CollabResult<UserProfile> {
        let name = name.into();
        let email = email.into();
        if name.trim().is_empty() {
            return Err(CollabError::ValidationFailed(
                "user name must not be empty".into(),
            ));
        }
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
            _ => {
                return Err(CollabError::ValidationFailed(
                    "email must have the form local@domain".into(),
                ))
            }
        }

        let mut state = self.store.write().await;
        let lowered = email.to_lowercase();
        if state
            .users
            .values()
            .any(|user| user.email.to_lowercase() == lowered)
        {
            return Err(CollabError::ValidationFailed(
                "email is already registered".into(),
            ));
        }

        let profile = UserProfile::new(name, email);
        state.users.insert(profile.id, profile.clone());
        tracing::info!(user_id = %profile.id, email = %profile.email, "Registered user");
        Ok(profile)
    }

    /// Looks up a user by ID.
    pub async fn user(&self, user_id: Uuid) -> CollabResult<UserProfile> {
        let state = self.store.read().await;
        state.user(user_id).cloned()
    }

    // ========================================================================
    // Teams
    // ========================================================================

    /// Creates a team; the acting user becomes its first lead.
    pub async fn create_team(&self, actor: &Actor, new_team: NewTeam) -> CollabResult<Team> {
        if !decisions::can_create_team(actor) {
            return Err(CollabError::Unauthorized(
                "only team managers may create teams".into(),
            ));
        }
        let code = new_team.code.trim().to_string();
        if code.is_empty() || code.contains(char::is_whitespace) {
            return Err(CollabError::ValidationFailed(
                "team code must be non-empty without whitespace".into(),
            ));
        }
        if new_team.name.trim().is_empty() {
            return Err(CollabError::ValidationFailed(
                "team name must not be empty".into(),
            ));
        }

        let mut state = self.store.write().await;
        state.user(actor.id)?;
        if state.teams.values().any(|team| team.code == code) {
            return Err(CollabError::ValidationFailed(format!(
                "team code {code} is already in use"
            )));
        }

        let mut team = Team::new(code, new_team.name);
        team.icon = new_team.icon;
        team.color = new_team.color;
        team.description = new_team.description;
        state.teams.insert(team.id, team.clone());
        state.insert_membership(team.id, actor.id, TeamRole::Lead)?;

        tracing::info!(team_id = %team.id, code = %team.code, "Created team");
        Ok(team)
    }

    /// Looks up a team by ID.
    pub async fn team(&self, team_id: Uuid) -> CollabResult<Team> {
        let state = self.store.read().await;
        state.team(team_id).cloned()
    }

    /// All teams, ordered by code.
    pub async fn teams(&self) -> Vec<Team> {
        let state = self.store.read().await;
        let mut teams: Vec<Team> = state.teams.values().cloned().collect();
        teams.sort_by(|a, b| a.code.cmp(&b.code));
        teams
    }

    /// Summaries of every team the user belongs to, ordered by code.
    pub async fn teams_for_user(&self, user_id: Uuid) -> Vec<TeamSummary> {
        let state = self.store.read().await;
        let mut summaries: Vec<TeamSummary> = state
            .memberships
            .values()
            .filter(|membership| membership.user_id == user_id)
            .filter_map(|membership| {
                let team = state.teams.get(&membership.team_id)?;
                Some(TeamSummary {
                    id: team.id,
                    code: team.code.clone(),
                    name: team.name.clone(),
                    icon: team.icon.clone(),
                    color: team.color.clone(),
                    user_role: membership.role,
                    member_count: state.team_memberships(team.id).len() as u32,
                    issue_count: state
                        .issues
                        .values()
                        .filter(|issue| issue.team_id == team.id)
                        .count() as u32,
                })
            })
            .collect();
        summaries.sort_by(|a, b| a.code.cmp(&b.code));
        summaries
    }

    /// Updates a team's settings.
    pub async fn update_team(
        &self,
        actor: &Actor,
        team_id: Uuid,
        update: TeamUpdate,
    ) -> CollabResult<Team> {
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(CollabError::ValidationFailed(
                    "team name must not be empty".into(),
                ));
            }
        }

        let mut state = self.store.write().await;
        state.team(team_id)?;
        let actor_role = state.role_of(team_id, actor.id);
        if !decisions::can_update_team(actor, actor_role) {
            return Err(CollabError::Unauthorized(
                "only team leads or managers may update a team".into(),
            ));
        }

        let team = state.team_mut(team_id)?;
        if let Some(name) = update.name {
            team.name = name;
        }
        if let Some(icon) = update.icon {
            team.icon = Some(icon);
        }
        if let Some(color) = update.color {
            team.color = Some(color);
        }
        if let Some(description) = update.description {
            team.description = Some(description);
        }
        team.touch();
        let team = team.clone();

        tracing::info!(team_id = %team.id, "Updated team");
        Ok(team)
    }

    /// Deletes a team, cascading to memberships, invitations, issues,
    /// comments, subscriptions, and inbox items.
    pub async fn delete_team(&self, actor: &Actor, team_id: Uuid) -> CollabResult<()> {
        if !decisions::can_delete_team(actor) {
            return Err(CollabError::Unauthorized(
                "only team managers may delete teams".into(),
            ));
        }

        let mut state = self.store.write().await;
        state.team(team_id)?;
        state.remove_team_cascade(team_id);

        tracing::info!(team_id = %team_id, "Deleted team");
        Ok(())
    }

    // ========================================================================
    // Membership management
    // ========================================================================

    /// Adds a registered user to a team.
    pub async fn add_member(
        &self,
        actor: &Actor,
        team_id: Uuid,
        user_id: Uuid,
        role: TeamRole,
    ) -> CollabResult<TeamMembership> {
        let mut state = self.store.write().await;
        state.team(team_id)?;
        state.user(user_id)?;
        let actor_role = state.role_of(team_id, actor.id);
        if !decisions::can_manage_members(actor, actor_role) {
            return Err(CollabError::Unauthorized(
                "only team leads or managers may add members".into(),
            ));
        }

        let membership = state.insert_membership(team_id, user_id, role)?;
        tracing::info!(
            team_id = %team_id,
            user_id = %user_id,
            role = %role,
            "Added team member"
        );
        Ok(membership)
    }

    /// Removes a member, atomically clearing their assignments on the
    /// team's issues.
    pub async fn remove_member(
        &self,
        actor: &Actor,
        team_id: Uuid,
        user_id: Uuid,
    ) -> CollabResult<()> {
        let mut state = self.store.write().await;
        state.team(team_id)?;
        let actor_role = state.role_of(team_id, actor.id);
        if !decisions::can_manage_members(actor, actor_role) {
            return Err(CollabError::Unauthorized(
                "only team leads or managers may remove members".into(),
            ));
        }

        let removed = state.remove_membership(team_id, user_id)?;
        let unassigned = state.unassign_team_issues(team_id, user_id);
        if removed.is_lead() && state.lead_count(team_id) == 0 {
            tracing::warn!(team_id = %team_id, "Team has no leads left");
        }

        tracing::info!(
            team_id = %team_id,
            user_id = %user_id,
            unassigned = %unassigned,
            "Removed team member"
        );
        Ok(())
    }

    /// Removes the acting user from a team, with the same unassignment
    /// cascade as [`remove_member`](Self::remove_member).
    pub async fn leave_team(&self, actor: &Actor, team_id: Uuid) -> CollabResult<()> {
        let mut state = self.store.write().await;
        state.team(team_id)?;
        let actor_role = state.role_of(team_id, actor.id);
        if !decisions::can_leave_team(actor_role) {
            return Err(CollabError::NotMember {
                team_id,
                user_id: actor.id,
            });
        }

        let removed = state.remove_membership(team_id, actor.id)?;
        let unassigned = state.unassign_team_issues(team_id, actor.id);
        if removed.is_lead() && state.lead_count(team_id) == 0 {
            tracing::warn!(team_id = %team_id, "Team has no leads left");
        }

        tracing::info!(
            team_id = %team_id,
            user_id = %actor.id,
            unassigned = %unassigned,
            "Member left team"
        );
        Ok(())
    }

    /// Promotes a member to lead.
    pub async fn promote_member(
        &self,
        actor: &Actor,
        team_id: Uuid,
        user_id: Uuid,
    ) -> CollabResult<TeamMembership> {
        self.change_role(actor, team_id, user_id, TeamRole::Lead)
            .await
    }

    /// Demotes a lead to member.
    ///
    /// A team may end up with no leads; managers can still administer it.
    pub async fn demote_member(
        &self,
        actor: &Actor,
        team_id: Uuid,
        user_id: Uuid,
    ) -> CollabResult<TeamMembership> {
        self.change_role(actor, team_id, user_id, TeamRole::Member)
            .await
    }

    async fn change_role(
        &self,
        actor: &Actor,
        team_id: Uuid,
        user_id: Uuid,
        new_role: TeamRole,
    ) -> CollabResult<TeamMembership> {
        let mut state = self.store.write().await;
        state.team(team_id)?;
        let actor_role = state.role_of(team_id, actor.id);
        if !decisions::can_manage_members(actor, actor_role) {
            return Err(CollabError::Unauthorized(
                "only team leads or managers may change member roles".into(),
            ));
        }

        let current = state
            .role_of(team_id, user_id)
            .ok_or(CollabError::NotMember { team_id, user_id })?;
        if current == new_role {
            return Err(CollabError::InvalidRoleTransition(format!(
                "user already has the {new_role} role"
            )));
        }

        let membership = state
            .membership_mut(team_id, user_id)
            .ok_or(CollabError::NotMember { team_id, user_id })?;
        membership.role = new_role;
        let membership = membership.clone();
        if new_role == TeamRole::Member && state.lead_count(team_id) == 0 {
            tracing::warn!(team_id = %team_id, "Team has no leads left");
        }

        tracing::info!(
            team_id = %team_id,
            user_id = %user_id,
            role = %new_role,
            "Changed member role"
        );
        Ok(membership)
    }

    /// Demotes `from_user` and promotes `to_user` as one atomic step.
    ///
    /// Fails without changing anything when either half is invalid:
    /// missing memberships, `from_user` not a lead, or `to_user` already
    /// a lead.
    pub async fn transfer_lead(
        &self,
        actor: &Actor,
        team_id: Uuid,
        from_user: Uuid,
        to_user: Uuid,
    ) -> CollabResult<()> {
        if from_user == to_user {
            return Err(CollabError::ValidationFailed(
                "cannot transfer the lead role to the same user".into(),
            ));
        }

        let mut state = self.store.write().await;
        state.team(team_id)?;
        let actor_role = state.role_of(team_id, actor.id);
        if !decisions::can_manage_members(actor, actor_role) {
            return Err(CollabError::Unauthorized(
                "only team leads or managers may transfer the lead role".into(),
            ));
        }

        // Validate both halves before touching either row.
        let from_role = state.role_of(team_id, from_user).ok_or(CollabError::NotMember {
            team_id,
            user_id: from_user,
        })?;
        if from_role != TeamRole::Lead {
            return Err(CollabError::InvalidRoleTransition(
                "source user is not a lead".into(),
            ));
        }
        let to_role = state.role_of(team_id, to_user).ok_or(CollabError::NotMember {
            team_id,
            user_id: to_user,
        })?;
        if to_role == TeamRole::Lead {
            return Err(CollabError::InvalidRoleTransition(
                "target user is already a lead".into(),
            ));
        }

        if let Some(membership) = state.membership_mut(team_id, from_user) {
            membership.role = TeamRole::Member;
        }
        if let Some(membership) = state.membership_mut(team_id, to_user) {
            membership.role = TeamRole::Lead;
        }

        tracing::info!(
            team_id = %team_id,
            from_user = %from_user,
            to_user = %to_user,
            "Transferred lead role"
        );
        Ok(())
    }

    // ========================================================================
    // Membership queries
    // ========================================================================

    /// All memberships of a team, ordered by user ID.
    pub async fn members_of(&self, team_id: Uuid) -> CollabResult<Vec<TeamMembership>> {
        let state = self.store.read().await;
        state.team(team_id)?;
        Ok(state
            .team_memberships(team_id)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Whether the user belongs to the team.
    pub async fn is_member(&self, team_id: Uuid, user_id: Uuid) -> bool {
        self.role_of(team_id, user_id).await.is_some()
    }

    /// Whether the user is a lead of the team.
    pub async fn is_lead(&self, team_id: Uuid, user_id: Uuid) -> bool {
        self.role_of(team_id, user_id).await == Some(TeamRole::Lead)
    }

    /// The user's role in the team, if any.
    pub async fn role_of(&self, team_id: Uuid, user_id: Uuid) -> Option<TeamRole> {
        let state = self.store.read().await;
        state.role_of(team_id, user_id)
    }
}
