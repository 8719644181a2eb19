//! # Notifications
//!
//! This crate provides the notification entities and pure helpers for the
//! Mercato collaboration core: issue subscriptions, inbox items, mention
//! parsing, and snippet extraction.
//!
//! ## Overview
//!
//! The collab-notify crate handles:
//! - **Subscriptions**: Which users follow which issues
//! - **Inbox Items**: Per-user notification records with read state
//! - **Mentions**: Extracting `@tokens` from comment text and resolving
//!   them against team members
//! - **Snippets**: Trimming comment bodies for notification previews
//!
//! ## Architecture
//!
//! ```text
//! comment text ─→ mention_tokens ─→ resolve_mentions ─→ mentioned user IDs
//!
//! IssueSubscription (issue × user)
//! InboxItem (recipient, issue, kind, snippet, actor, read state)
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use collab_notify::{mention_tokens, resolve_mentions, snippet};
//! use collab_team::UserProfile;
//!
//! let members = vec![
//!     UserProfile::new("Ada Lovelace", "ada@mercato.dev"),
//!     UserProfile::new("Grace Hopper", "grace@mercato.dev"),
//! ];
//!
//! let text = "Looks good @ada, can you double-check the rounding?";
//! let tokens = mention_tokens(text);
//! let mentioned = resolve_mentions(&tokens, &members);
//! assert_eq!(mentioned, vec![members[0].id]);
//!
//! let preview = snippet(text, 200);
//! ```
//!
//! ## Cross-Crate Integration
//!
//! This crate is designed to work with:
//! - `collab-team`: Mention resolution matches against member profiles
//! - `collab-issue`: Subscriptions and inbox items reference issues
//! - `collab-engine`: The mention notifier drives fan-out using these types
//!
//! ## Feature Flags
//!
//! - `serde`: Serialization support (enabled by default)

pub mod inbox;
pub mod mention;
pub mod snippet;
pub mod subscription;

// Re-export main types for convenience
pub use inbox::{InboxItem, NotificationKind};
pub use mention::{mention_tokens, resolve_mentions};
pub use snippet::{snippet, DEFAULT_SNIPPET_LEN};
pub use subscription::IssueSubscription;
