//! # Issue Tracking
//!
//! This crate provides the issue-tracking entities for the Mercato
//! collaboration core: issues with workflow status and manual ordering,
//! labels, and threaded comments.
//!
//! ## Overview
//!
//! The collab-issue crate handles:
//! - **Issues**: Team-owned work items with status, priority, assignee,
//!   due date, and a human-readable sequential code
//! - **Codes**: The `PREFIX-n` identifier format and its parsing
//! - **Status & Priority**: Workflow state and urgency enums
//! - **Labels**: A flat, deployment-wide tagging catalog
//! - **Comments**: Flat comment records with optional parent references
//! - **Ranking**: Pluggable lexicographic rank generation for manual ordering
//!
//! ## Architecture
//!
//! ```text
//! Issue (CORE-7)
//!   ├─ IssueStatus / IssuePriority
//!   ├─ rank (lexicographic sort key)
//!   ├─ label_ids ─→ IssueLabel catalog
//!   └─ IssueComment (parent_id links form the thread tree)
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use collab_issue::{Issue, IssueCode, IssueStatus, IssuePriority, RankStrategy, SuffixRank};
//! use uuid::Uuid;
//!
//! let team_id = Uuid::now_v7();
//! let creator_id = Uuid::now_v7();
//!
//! let code = IssueCode::new("CORE", 7);
//! let rank = SuffixRank.next_rank(None);
//! let issue = Issue::new(code, team_id, creator_id, "Fix checkout totals", rank);
//!
//! assert_eq!(issue.code.to_string(), "CORE-7");
//! assert_eq!(issue.status, IssueStatus::Backlog);
//! assert_eq!(issue.priority, IssuePriority::Medium);
//! ```
//!
//! ## Cross-Crate Integration
//!
//! This crate is designed to work with:
//! - `collab-team`: Teams own issues; members author comments
//! - `collab-notify`: Subscriptions and inbox items reference issues
//! - `collab-engine`: Stateful services orchestrating these entities
//!
//! ## Feature Flags
//!
//! - `serde`: Serialization support (enabled by default)

pub mod code;
pub mod comment;
pub mod issue;
pub mod label;
pub mod rank;
pub mod status;

// Re-export main types for convenience
pub use code::IssueCode;
pub use comment::IssueComment;
pub use issue::Issue;
pub use label::IssueLabel;
pub use rank::{RankStrategy, SuffixRank};
pub use status::{IssuePriority, IssueStatus};
