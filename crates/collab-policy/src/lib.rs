//! # Collaboration Policy
//!
//! This crate provides the authorization layer for the Mercato collaboration
//! core: who may read and mutate teams, issues, and comment threads.
//!
//! ## Overview
//!
//! The collab-policy crate handles:
//! - **Actors**: The authenticated caller and their workspace-level roles
//! - **Workspace Roles**: The coarse member/manager/admin hierarchy
//! - **Decisions**: Pure functions answering "may this actor do X?"
//!
//! ## Architecture
//!
//! ```text
//! Decision = Actor (workspace roles) + team context (Option<TeamRole>)
//!
//! Examples:
//!   can_view_comment(actor, Some(TeamRole::Member))  -> true
//!   can_update_team(actor, None)                     -> only with manage-all
//!   can_delete_comment(actor, author_id, team_role)  -> admin | author | lead
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use collab_policy::{decisions, Actor, WorkspaceRole};
//! use collab_team::TeamRole;
//! use uuid::Uuid;
//!
//! let admin = Actor::new(Uuid::now_v7()).with_role(WorkspaceRole::Admin);
//! assert!(decisions::can_view_comment(&admin, None));
//!
//! let member = Actor::new(Uuid::now_v7());
//! assert!(decisions::can_view_comment(&member, Some(TeamRole::Member)));
//! assert!(!decisions::can_update_team(&member, Some(TeamRole::Member)));
//! ```
//!
//! ## Design
//!
//! Decisions are pure: they never touch storage. Callers resolve the actor's
//! membership in the relevant team and pass it in, then turn a `false` into a
//! surfaced authorization failure. The stateful services in `collab-engine`
//! are the primary consumers.
//!
//! ## Feature Flags
//!
//! - `serde`: Serialization support (enabled by default)

pub mod actor;
pub mod decisions;

// Re-export main types for convenience
pub use actor::{Actor, WorkspaceRole};
