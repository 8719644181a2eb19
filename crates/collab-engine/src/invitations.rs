//! Invitation workflow service
//!
//! Drives the pending → accepted | declined state machine. Acceptance
//! creates the membership in the same write guard that flips the status, so
//! either both happen or neither does. Validation runs on a detached copy
//! of the invitation and nothing is written back until every check has
//! passed.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use collab_policy::{decisions, Actor};
use collab_team::{TeamInvitation, TeamRole};

use crate::config::CollabConfig;
use crate::error::{CollabError, CollabResult};
use crate::store::CollabStore;

/// Parameters for sending an invitation.
#[derive(Debug, Clone)]
pub struct NewInvitation {
    /// Team the user is invited to join
    pub team_id: Uuid,
    /// User being invited
    pub invitee_id: Uuid,
    /// Role granted on acceptance
    pub role: TeamRole,
    /// Optional message from the inviter
    pub message: Option<String>,
    /// Explicit deadline; when `None`, the configured default TTL applies
    pub expires_at: Option<chrono::DateTime<Utc>>,
}

impl NewInvitation {
    /// Invitation for the member role with no message and the default TTL.
    pub fn member(team_id: Uuid, invitee_id: Uuid) -> Self {
        Self {
            team_id,
            invitee_id,
            role: TeamRole::Member,
            message: None,
            expires_at: None,
        }
    }
}

/// Stateful service for team invitations.
#[derive(Clone)]
pub struct InvitationWorkflow {
    store: Arc<CollabStore>,
    config: Arc<CollabConfig>,
}

impl InvitationWorkflow {
    /// Creates a workflow over the shared store.
    pub fn new(store: Arc<CollabStore>, config: Arc<CollabConfig>) -> Self {
        Self { store, config }
    }

    /// Sends an invitation.
    ///
    /// The actor must be able to manage the team's members. Inviting a
    /// current member fails with `AlreadyMember`; a second effectively
    /// pending invitation for the same user and team is rejected, though an
    /// expired one does not block re-inviting.
    pub async fn invite(
        &self,
        actor: &Actor,
        new_invitation: NewInvitation,
    ) -> CollabResult<TeamInvitation> {
        let NewInvitation {
            team_id,
            invitee_id,
            role,
            message,
            expires_at,
        } = new_invitation;

        let mut state = self.store.write().await;
        state.team(team_id)?;
        let actor_role = state.role_of(team_id, actor.id);
        if !decisions::can_manage_members(actor, actor_role) {
            return Err(CollabError::Unauthorized(
                "only team leads or managers may send invitations".into(),
            ));
        }
        state.user(invitee_id)?;
        if state.role_of(team_id, invitee_id).is_some() {
            return Err(CollabError::AlreadyMember {
                team_id,
                user_id: invitee_id,
            });
        }

        let now = Utc::now();
        let has_pending = state.invitations.values().any(|invitation| {
            invitation.team_id == team_id
                && invitation.invitee_id == invitee_id
                && invitation.is_pending()
                && !invitation.is_expired_at(now)
        });
        if has_pending {
            return Err(CollabError::ValidationFailed(
                "user already has a pending invitation to this team".into(),
            ));
        }

        let mut invitation = TeamInvitation::new(team_id, invitee_id, actor.id, role);
        invitation.message = message;
        invitation.expires_at =
            expires_at.or_else(|| self.config.invitation_ttl.map(|ttl| now + ttl));
        state.invitations.insert(invitation.id, invitation.clone());

        tracing::info!(
            invitation_id = %invitation.id,
            team_id = %team_id,
            invitee_id = %invitee_id,
            role = %role,
            "Sent invitation"
        );
        Ok(invitation)
    }

    /// Accepts an invitation, creating the membership atomically.
    ///
    /// Only the invited user may accept. If the invitee became a member
    /// through another path in the meantime, the acceptance fails with
    /// `AlreadyMember` and the invitation stays pending.
    pub async fn accept(&self, actor: &Actor, invitation_id: Uuid) -> CollabResult<TeamInvitation> {
        let mut state = self.store.write().await;
        let mut invitation = state.invitation(invitation_id)?.clone();
        if invitation.invitee_id != actor.id {
            return Err(CollabError::Unauthorized(
                "only the invited user may respond to an invitation".into(),
            ));
        }

        invitation.accept()?;
        state.insert_membership(invitation.team_id, invitation.invitee_id, invitation.role)?;
        state.invitations.insert(invitation.id, invitation.clone());

        tracing::info!(
            invitation_id = %invitation.id,
            team_id = %invitation.team_id,
            invitee_id = %invitation.invitee_id,
            "Accepted invitation"
        );
        Ok(invitation)
    }

    /// Declines an invitation.
    ///
    /// Only the invited user may decline. Declining works even past the
    /// deadline, so stale invitations can be cleared.
    pub async fn decline(&self, actor: &Actor, invitation_id: Uuid) -> CollabResult<TeamInvitation> {
        let mut state = self.store.write().await;
        let mut invitation = state.invitation(invitation_id)?.clone();
        if invitation.invitee_id != actor.id {
            return Err(CollabError::Unauthorized(
                "only the invited user may respond to an invitation".into(),
            ));
        }

        invitation.decline()?;
        state.invitations.insert(invitation.id, invitation.clone());

        tracing::info!(
            invitation_id = %invitation.id,
            team_id = %invitation.team_id,
            invitee_id = %invitation.invitee_id,
            "Declined invitation"
        );
        Ok(invitation)
    }

    /// Looks up an invitation by ID.
    pub async fn invitation(&self, invitation_id: Uuid) -> CollabResult<TeamInvitation> {
        let state = self.store.read().await;
        state.invitation(invitation_id).cloned()
    }

    /// All invitations addressed to a user, newest first.
    pub async fn invitations_for_user(&self, user_id: Uuid) -> Vec<TeamInvitation> {
        let state = self.store.read().await;
        let mut invitations: Vec<TeamInvitation> = state
            .invitations
            .values()
            .filter(|invitation| invitation.invitee_id == user_id)
            .cloned()
            .collect();
        invitations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        invitations
    }

    /// All invitations for a team, newest first.
    ///
    /// This is a management view, gated like other member management.
    pub async fn invitations_for_team(
        &self,
        actor: &Actor,
        team_id: Uuid,
    ) -> CollabResult<Vec<TeamInvitation>> {
        let state = self.store.read().await;
        state.team(team_id)?;
        let actor_role = state.role_of(team_id, actor.id);
        if !decisions::can_manage_members(actor, actor_role) {
            return Err(CollabError::Unauthorized(
                "only team leads or managers may list a team's invitations".into(),
            ));
        }

        let mut invitations: Vec<TeamInvitation> = state
            .invitations
            .values()
            .filter(|invitation| invitation.team_id == team_id)
            .cloned()
            .collect();
        invitations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(invitations)
    }
}
