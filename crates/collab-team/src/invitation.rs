//! Team invitations
//!
//! This module provides the invitation state machine. An invitation is an
//! offer for a specific user to join a specific team with a proposed role.
//! It resolves exactly once: `pending → accepted` or `pending → declined`.
//!
//! Expiry is lazy. An expired invitation keeps its stored `pending` status;
//! acceptance fails once the deadline has passed, while declining remains
//! possible so the invitee can clear it from their list. Use
//! [`TeamInvitation::effective_status`] for display.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::membership::TeamRole;

/// Status of a team invitation.
///
/// Only `Pending`, `Accepted`, and `Declined` are ever stored. `Expired` is
/// a computed view of a pending invitation whose deadline has passed; see
/// [`TeamInvitation::effective_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    /// Awaiting a response from the invitee
    Pending,
    /// Accepted; membership has been created
    Accepted,
    /// Declined by the invitee
    Declined,
    /// Pending but past its deadline (computed, never stored)
    Expired,
}

impl InvitationStatus {
    /// Returns the string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Pending => "pending",
            InvitationStatus::Accepted => "accepted",
            InvitationStatus::Declined => "declined",
            InvitationStatus::Expired => "expired",
        }
    }

    /// Parses a status from its string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(InvitationStatus::Pending),
            "accepted" => Some(InvitationStatus::Accepted),
            "declined" => Some(InvitationStatus::Declined),
            "expired" => Some(InvitationStatus::Expired),
            _ => None,
        }
    }
}

impl std::fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors from invitation state transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvitationError {
    /// The invitation was already accepted or declined
    #[error("invitation has already been resolved")]
    AlreadyResolved,

    /// The invitation deadline has passed
    #[error("invitation has expired")]
    Expired,
}

/// An offer for a specific user to join a specific team.
///
/// Invitations resolve exactly once. Acceptance creates the membership
/// atomically with the status change (handled by the invitation service);
/// this entity only guards the state machine itself.
///
/// # Examples
///
/// ```
/// use collab_team::{TeamInvitation, TeamRole, InvitationStatus};
/// use uuid::Uuid;
///
/// let team_id = Uuid::now_v7();
/// let inviter = Uuid::now_v7();
/// let invitee = Uuid::now_v7();
///
/// let mut invitation = TeamInvitation::new(team_id, invitee, inviter, TeamRole::Member);
/// assert!(invitation.is_pending());
///
/// invitation.accept().unwrap();
/// assert_eq!(invitation.status, InvitationStatus::Accepted);
/// assert!(invitation.accept().is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamInvitation {
    /// Unique identifier for the invitation
    pub id: Uuid,

    /// Team the invitee is being offered to join
    pub team_id: Uuid,

    /// User being invited
    pub invitee_id: Uuid,

    /// User who sent the invitation
    pub inviter_id: Uuid,

    /// Role the invitee will receive on acceptance
    pub role: TeamRole,

    /// Optional message from the inviter
    pub message: Option<String>,

    /// Stored status (never `Expired`)
    pub status: InvitationStatus,

    /// Optional deadline; past this, acceptance fails
    pub expires_at: Option<DateTime<Utc>>,

    /// When the invitation was created
    pub created_at: DateTime<Utc>,

    /// When the invitation was accepted or declined
    pub responded_at: Option<DateTime<Utc>>,
}

impl TeamInvitation {
    /// Creates a new pending invitation with no message and no deadline.
    pub fn new(team_id: Uuid, invitee_id: Uuid, inviter_id: Uuid, role: TeamRole) -> Self {
        Self {
            id: Uuid::now_v7(),
            team_id,
            invitee_id,
            inviter_id,
            role,
            message: None,
            status: InvitationStatus::Pending,
            expires_at: None,
            created_at: Utc::now(),
            responded_at: None,
        }
    }

    /// Sets the inviter's message (builder style).
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the deadline (builder style).
    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Whether the invitation is still awaiting a response.
    pub fn is_pending(&self) -> bool {
        self.status == InvitationStatus::Pending
    }

    /// Whether the deadline had passed at the given instant.
    ///
    /// Invitations without a deadline never expire.
    pub fn is_expired_at(&self, at: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(deadline) => at > deadline,
            None => false,
        }
    }

    /// Whether the deadline has passed.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// The status as seen by the invitee at the given instant.
    ///
    /// A pending invitation past its deadline reads as `Expired` even though
    /// `Pending` remains stored.
    pub fn effective_status_at(&self, at: DateTime<Utc>) -> InvitationStatus {
        if self.is_pending() && self.is_expired_at(at) {
            InvitationStatus::Expired
        } else {
            self.status
        }
    }

    /// The status as seen by the invitee right now.
    pub fn effective_status(&self) -> InvitationStatus {
        self.effective_status_at(Utc::now())
    }

    /// Accepts the invitation at the given instant.
    ///
    /// Fails with [`InvitationError::Expired`] once the deadline has passed,
    /// regardless of stored status, and with
    /// [`InvitationError::AlreadyResolved`] if the invitation was already
    /// accepted or declined.
    pub fn accept_at(&mut self, at: DateTime<Utc>) -> Result<(), InvitationError> {
        if self.is_expired_at(at) {
            return Err(InvitationError::Expired);
        }
        if !self.is_pending() {
            return Err(InvitationError::AlreadyResolved);
        }
        self.status = InvitationStatus::Accepted;
        self.responded_at = Some(at);
        Ok(())
    }

    /// Accepts the invitation now.
    pub fn accept(&mut self) -> Result<(), InvitationError> {
        self.accept_at(Utc::now())
    }

    /// Declines the invitation at the given instant.
    ///
    /// Declining an expired invitation is allowed so the invitee can clear
    /// it from their list. Fails only if the invitation was already resolved.
    pub fn decline_at(&mut self, at: DateTime<Utc>) -> Result<(), InvitationError> {
        if !self.is_pending() {
            return Err(InvitationError::AlreadyResolved);
        }
        self.status = InvitationStatus::Declined;
        self.responded_at = Some(at);
        Ok(())
    }

    /// Declines the invitation now.
    pub fn decline(&mut self) -> Result<(), InvitationError> {
        self.decline_at(Utc::now())
    }
}
