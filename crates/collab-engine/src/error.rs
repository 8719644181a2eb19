//! Error types for collaboration operations
//!
//! This module defines all error types that can occur across membership,
//! invitation, issue, comment, and notification operations. Errors carry
//! stable codes and HTTP status hints so API layers can map them without
//! matching on variants.

use thiserror::Error;
use uuid::Uuid;

use collab_team::InvitationError;

/// Collaboration error types.
///
/// These errors cover all failures surfaced by the stateful services:
/// missing entities, membership conflicts, invitation state machine
/// violations, authorization denials, and input validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollabError {
    /// Referenced team does not exist
    #[error("Team not found: {0}")]
    TeamNotFound(Uuid),

    /// Referenced user does not exist
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    /// Referenced issue does not exist
    #[error("Issue not found: {0}")]
    IssueNotFound(Uuid),

    /// No issue carries the given code
    #[error("Issue not found: {0}")]
    IssueCodeNotFound(String),

    /// Referenced comment does not exist
    #[error("Comment not found: {0}")]
    CommentNotFound(Uuid),

    /// Referenced invitation does not exist
    #[error("Invitation not found: {0}")]
    InvitationNotFound(Uuid),

    /// Referenced label does not exist
    #[error("Label not found: {0}")]
    LabelNotFound(Uuid),

    /// Referenced inbox item does not exist
    #[error("Notification not found: {0}")]
    NotificationNotFound(Uuid),

    /// The user already belongs to the team
    #[error("User {user_id} is already a member of team {team_id}")]
    AlreadyMember { team_id: Uuid, user_id: Uuid },

    /// The user does not belong to the team
    #[error("User {user_id} is not a member of team {team_id}")]
    NotMember { team_id: Uuid, user_id: Uuid },

    /// A promote, demote, or transfer precondition does not hold
    #[error("Invalid role transition: {0}")]
    InvalidRoleTransition(String),

    /// The invitation was already accepted or declined
    #[error("Invitation has already been resolved")]
    InvitationAlreadyResolved,

    /// The invitation deadline has passed
    #[error("Invitation has expired")]
    InvitationExpired,

    /// The actor is not allowed to perform this operation
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Input failed validation
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

/// Result type for collaboration operations.
pub type CollabResult<T> = Result<T, CollabError>;

impl CollabError {
    /// Whether this error means a referenced entity does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CollabError::TeamNotFound(_)
                | CollabError::UserNotFound(_)
                | CollabError::IssueNotFound(_)
                | CollabError::IssueCodeNotFound(_)
                | CollabError::CommentNotFound(_)
                | CollabError::InvitationNotFound(_)
                | CollabError::LabelNotFound(_)
                | CollabError::NotificationNotFound(_)
        )
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            CollabError::TeamNotFound(_)
            | CollabError::UserNotFound(_)
            | CollabError::IssueNotFound(_)
            | CollabError::IssueCodeNotFound(_)
            | CollabError::CommentNotFound(_)
            | CollabError::InvitationNotFound(_)
            | CollabError::LabelNotFound(_)
            | CollabError::NotificationNotFound(_) => 404,
            CollabError::AlreadyMember { .. }
            | CollabError::NotMember { .. }
            | CollabError::InvalidRoleTransition(_)
            | CollabError::InvitationAlreadyResolved => 409,
            CollabError::InvitationExpired => 410,
            CollabError::Unauthorized(_) => 403,
            CollabError::ValidationFailed(_) => 422,
        }
    }

    /// Get machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            CollabError::TeamNotFound(_) => "TEAM_NOT_FOUND",
            CollabError::UserNotFound(_) => "USER_NOT_FOUND",
            CollabError::IssueNotFound(_) | CollabError::IssueCodeNotFound(_) => "ISSUE_NOT_FOUND",
            CollabError::CommentNotFound(_) => "COMMENT_NOT_FOUND",
            CollabError::InvitationNotFound(_) => "INVITATION_NOT_FOUND",
            CollabError::LabelNotFound(_) => "LABEL_NOT_FOUND",
            CollabError::NotificationNotFound(_) => "NOTIFICATION_NOT_FOUND",
            CollabError::AlreadyMember { .. } => "ALREADY_MEMBER",
            CollabError::NotMember { .. } => "NOT_MEMBER",
            CollabError::InvalidRoleTransition(_) => "INVALID_ROLE_TRANSITION",
            CollabError::InvitationAlreadyResolved => "INVITATION_ALREADY_RESOLVED",
            CollabError::InvitationExpired => "INVITATION_EXPIRED",
            CollabError::Unauthorized(_) => "UNAUTHORIZED",
            CollabError::ValidationFailed(_) => "VALIDATION_FAILED",
        }
    }
}

impl From<InvitationError> for CollabError {
    fn from(err: InvitationError) -> Self {
        match err {
            InvitationError::AlreadyResolved => CollabError::InvitationAlreadyResolved,
            InvitationError::Expired => CollabError::InvitationExpired,
        }
    }
}
