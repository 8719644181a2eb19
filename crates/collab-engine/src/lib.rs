//! # Collaboration Engine
//!
//! This crate wires the Mercato collaboration entities into stateful,
//! concurrency-safe services over a single in-memory store.
//!
//! ## Overview
//!
//! The collab-engine crate handles:
//! - **Membership**: User directory, teams, and role management
//! - **Invitations**: Issuing, accepting, and declining team invitations
//! - **Issues**: Creation with sequential codes, lifecycle updates, labels
//! - **Comments**: Threaded discussion on issues
//! - **Notifications**: Mention fan-out, subscriptions, and the inbox
//!
//! ## Architecture
//!
//! ```text
//! CollabCore
//!   ├─ MembershipRegistry ──┐
//!   ├─ InvitationWorkflow ──┤
//!   ├─ IssueLifecycle ──────┼─→ CollabStore (RwLock'd state)
//!   ├─ CommentThread ───────┤
//!   └─ MentionNotifier ─────┘
//! ```
//!
//! Every service holds the same [`CollabStore`]; composite operations run
//! under one write guard, so concurrent readers see either none or all of
//! an operation's effects.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use collab_engine::{CollabConfig, CollabCore, NewIssue, NewTeam};
//! use collab_policy::{Actor, WorkspaceRole};
//!
//! # async fn demo() -> Result<(), collab_engine::CollabError> {
//! let core = CollabCore::new(CollabConfig::new("SHOP"));
//!
//! // Register a user and give them a team
//! let profile = core
//!     .membership()
//!     .register_user("Mara Vance", "mara@mercato.dev")
//!     .await?;
//! let actor = Actor::new(profile.id).with_role(WorkspaceRole::Manager);
//! let team = core
//!     .membership()
//!     .create_team(
//!         &actor,
//!         NewTeam {
//!             code: "CORE".into(),
//!             name: "Core Commerce".into(),
//!             ..Default::default()
//!         },
//!     )
//!     .await?;
//!
//! // File the first issue
//! let issue = core
//!     .issues()
//!     .create_issue(&actor, NewIssue::new(team.id, "Set up the storefront"))
//!     .await?;
//! assert_eq!(issue.code.to_string(), "SHOP-1");
//! # Ok(())
//! # }
//! ```
//!
//! ## Cross-Crate Integration
//!
//! This crate is designed to work with:
//! - `collab-team`: Teams, memberships, invitations, profiles
//! - `collab-policy`: Actor model and authorization decisions
//! - `collab-issue`: Issues, labels, comments, rank schemes
//! - `collab-notify`: Subscriptions, mentions, and the inbox

pub mod comments;
pub mod config;
pub mod core;
pub mod error;
pub mod invitations;
pub mod issues;
pub mod notifier;
pub mod registry;
pub mod store;

// Re-export main types for convenience
pub use comments::{CommentThread, NewComment};
pub use config::CollabConfig;
pub use crate::core::CollabCore;
pub use error::{CollabError, CollabResult};
pub use invitations::{InvitationWorkflow, NewInvitation};
pub use issues::{IssueLifecycle, NewIssue, NewLabel};
pub use notifier::MentionNotifier;
pub use registry::{MembershipRegistry, NewTeam, TeamUpdate};
pub use store::CollabStore;
