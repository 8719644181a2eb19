//! # Team Management
//!
//! This crate provides the team-scoped entities for the Mercato collaboration
//! core: teams, memberships, invitations, and the user directory profiles they
//! reference.
//!
//! ## Overview
//!
//! The collab-team crate handles:
//! - **Teams**: Named groups with a unique short code, icon, and color
//! - **Memberships**: User-team relationships carrying a team role
//! - **Roles**: The two-level member/lead hierarchy within a team
//! - **Invitations**: Pending offers to join a team, with expiry
//! - **Profiles**: Minimal user directory entries (name + email)
//!
//! ## Architecture
//!
//! ```text
//! UserProfile
//!   ├─ TeamMembership ─→ Team
//!   │      └─ TeamRole (member | lead)
//!   └─ TeamInvitation ─→ Team
//!          └─ InvitationStatus (pending → accepted | declined)
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use collab_team::{Team, TeamMembership, TeamRole, TeamInvitation};
//! use uuid::Uuid;
//!
//! // Create a team
//! let team = Team::new("CORE", "Core Commerce");
//!
//! // Add a member
//! let user_id = Uuid::now_v7();
//! let membership = TeamMembership::new(team.id, user_id, TeamRole::Lead);
//!
//! // Invite another user
//! let inviter_id = user_id;
//! let invitee_id = Uuid::now_v7();
//! let invitation = TeamInvitation::new(team.id, invitee_id, inviter_id, TeamRole::Member);
//! ```
//!
//! ## Cross-Crate Integration
//!
//! This crate is designed to work with:
//! - `collab-policy`: Authorization decisions over team roles
//! - `collab-issue`: Issues scoped to a team
//! - `collab-engine`: Stateful services orchestrating these entities
//!
//! ## Feature Flags
//!
//! - `serde`: Serialization support (enabled by default)

pub mod invitation;
pub mod membership;
pub mod profile;
pub mod team;

// Re-export main types for convenience
pub use invitation::{InvitationError, InvitationStatus, TeamInvitation};
pub use membership::{TeamMembership, TeamRole};
pub use profile::UserProfile;
pub use team::{Team, TeamSummary};
