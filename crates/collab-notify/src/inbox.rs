//! Inbox items
//!
//! An inbox item is one notification delivered to one user. Items are
//! created by the mention notifier (comment and mention kinds) and by issue
//! lifecycle changes (assignment, status, and edit kinds). They reference
//! their issue for navigation but are owned by the recipient: marking one
//! read never touches the issue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Notification Kinds
// ============================================================================

/// What an inbox item is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A new comment on a subscribed issue
    Comment,
    /// The recipient was mentioned in a comment
    Mention,
    /// The recipient was assigned to an issue
    Assignment,
    /// An issue changed status without crossing the closed boundary
    Status,
    /// An issue was closed
    Closed,
    /// A closed issue was reopened
    Reopened,
    /// An issue's title or description was edited
    Edited,
    /// An issue was created with the recipient as assignee
    Created,
}

impl NotificationKind {
    /// Returns the string representation of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Comment => "comment",
            NotificationKind::Mention => "mention",
            NotificationKind::Assignment => "assignment",
            NotificationKind::Status => "status",
            NotificationKind::Closed => "closed",
            NotificationKind::Reopened => "reopened",
            NotificationKind::Edited => "edited",
            NotificationKind::Created => "created",
        }
    }

    /// Parses a kind from its string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "comment" => Some(NotificationKind::Comment),
            "mention" => Some(NotificationKind::Mention),
            "assignment" => Some(NotificationKind::Assignment),
            "status" => Some(NotificationKind::Status),
            "closed" => Some(NotificationKind::Closed),
            "reopened" => Some(NotificationKind::Reopened),
            "edited" => Some(NotificationKind::Edited),
            "created" => Some(NotificationKind::Created),
            _ => None,
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Inbox Items
// ============================================================================

/// One notification delivered to one user.
///
/// # Examples
///
/// ```
/// use collab_notify::{InboxItem, NotificationKind};
/// use uuid::Uuid;
///
/// let recipient = Uuid::now_v7();
/// let issue = Uuid::now_v7();
/// let actor = Uuid::now_v7();
///
/// let mut item = InboxItem::new(recipient, issue, NotificationKind::Mention, "ping", actor);
/// assert!(!item.read);
///
/// assert!(item.mark_read());
/// assert!(!item.mark_read()); // already read, no change
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboxItem {
    /// Unique identifier for the item
    pub id: Uuid,

    /// User this item was delivered to
    pub recipient_id: Uuid,

    /// Issue the notification is about
    pub issue_id: Uuid,

    /// What kind of event produced the item
    pub kind: NotificationKind,

    /// Short content preview
    pub snippet: String,

    /// User whose action triggered the notification
    pub actor_id: Uuid,

    /// Whether the recipient has read the item
    pub read: bool,

    /// When the item was read, if ever
    pub read_at: Option<DateTime<Utc>>,

    /// When the item was created
    pub created_at: DateTime<Utc>,
}

impl InboxItem {
    /// Creates a new unread inbox item.
    pub fn new(
        recipient_id: Uuid,
        issue_id: Uuid,
        kind: NotificationKind,
        snippet: impl Into<String>,
        actor_id: Uuid,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            recipient_id,
            issue_id,
            kind,
            snippet: snippet.into(),
            actor_id,
            read: false,
            read_at: None,
            created_at: Utc::now(),
        }
    }

    /// Marks the item read. Idempotent.
    ///
    /// Returns `true` when the item transitioned from unread to read, and
    /// `false` when it was read already (the original `read_at` stands).
    pub fn mark_read(&mut self) -> bool {
        if self.read {
            return false;
        }
        self.read = true;
        self.read_at = Some(Utc::now());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_string_round_trip() {
        for kind in [
            NotificationKind::Comment,
            NotificationKind::Mention,
            NotificationKind::Assignment,
            NotificationKind::Status,
            NotificationKind::Closed,
            NotificationKind::Reopened,
            NotificationKind::Edited,
            NotificationKind::Created,
        ] {
            assert_eq!(NotificationKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(NotificationKind::parse("digest"), None);
    }

    #[test]
    fn test_serde_form_matches_as_str() {
        // Inbox payloads serialize the kind; it must agree with as_str().
        for kind in [
            NotificationKind::Comment,
            NotificationKind::Mention,
            NotificationKind::Assignment,
            NotificationKind::Status,
            NotificationKind::Closed,
            NotificationKind::Reopened,
            NotificationKind::Edited,
            NotificationKind::Created,
        ] {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, serde_json::Value::String(kind.as_str().into()));
        }
    }

    #[test]
    fn test_new_item_is_unread() {
        let item = InboxItem::new(
            Uuid::now_v7(),
            Uuid::now_v7(),
            NotificationKind::Comment,
            "New comment",
            Uuid::now_v7(),
        );

        assert!(!item.read);
        assert!(item.read_at.is_none());
    }

    #[test]
    fn test_mark_read_is_idempotent() {
        let mut item = InboxItem::new(
            Uuid::now_v7(),
            Uuid::now_v7(),
            NotificationKind::Mention,
            "ping",
            Uuid::now_v7(),
        );

        assert!(item.mark_read());
        let first_read_at = item.read_at;
        assert!(first_read_at.is_some());

        assert!(!item.mark_read());
        assert_eq!(item.read_at, first_read_at);
    }
}
