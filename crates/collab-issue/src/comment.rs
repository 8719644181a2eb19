//! Issue comments
//!
//! Comments are stored flat: every comment points at its issue, and a reply
//! additionally points at its parent comment. Presentation layers rebuild
//! the thread tree from the parent references; nothing here nests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A comment on an issue, optionally a reply to another comment.
///
/// # Examples
///
/// ```
/// use collab_issue::IssueComment;
/// use uuid::Uuid;
///
/// let issue_id = Uuid::now_v7();
/// let author_id = Uuid::now_v7();
///
/// let top = IssueComment::new(issue_id, author_id, "Shipping rates look wrong");
/// let reply = IssueComment::new(issue_id, author_id, "Fixed in the rate table")
///     .with_parent(top.id);
///
/// assert!(!top.is_reply());
/// assert!(reply.is_reply());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueComment {
    /// Unique identifier for the comment
    pub id: Uuid,

    /// Issue the comment belongs to
    pub issue_id: Uuid,

    /// User who wrote the comment
    pub author_id: Uuid,

    /// Parent comment when this is a reply
    pub parent_id: Option<Uuid>,

    /// Comment body
    pub content: String,

    /// When the comment was created
    pub created_at: DateTime<Utc>,

    /// When the comment was last edited, if ever
    pub edited_at: Option<DateTime<Utc>>,
}

impl IssueComment {
    /// Creates a new top-level comment.
    pub fn new(issue_id: Uuid, author_id: Uuid, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            issue_id,
            author_id,
            parent_id: None,
            content: content.into(),
            created_at: Utc::now(),
            edited_at: None,
        }
    }

    /// Makes this comment a reply to `parent_id` (builder style).
    pub fn with_parent(mut self, parent_id: Uuid) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Whether this comment is a reply.
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }

    /// Whether this comment has been edited since creation.
    pub fn is_edited(&self) -> bool {
        self.edited_at.is_some()
    }

    /// Replaces the comment body and records the edit time.
    pub fn edit(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.edited_at = Some(Utc::now());
    }
}
