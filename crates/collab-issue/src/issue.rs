//! Issue domain models
//!
//! This module provides the core Issue entity. Issues are the unit of
//! tracked work: owned by a team, identified by a sequential code, moved
//! through a workflow status, and ordered manually by a lexicographic rank.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::code::IssueCode;
use crate::status::{IssuePriority, IssueStatus};

/// A tracked work item owned by a team.
///
/// Issues carry workflow status, urgency, an optional single assignee, an
/// optional due date, and a set of labels from the deployment-wide catalog.
/// The `rank` string is an opaque sort key; team listings order by it
/// lexicographically.
///
/// # Examples
///
/// ```
/// use collab_issue::{Issue, IssueCode, IssueStatus};
/// use uuid::Uuid;
///
/// let issue = Issue::new(
///     IssueCode::new("CORE", 7),
///     Uuid::now_v7(),
///     Uuid::now_v7(),
///     "Fix checkout totals",
///     "m",
/// );
/// assert_eq!(issue.status, IssueStatus::Backlog);
/// assert!(!issue.is_closed());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Unique identifier for the issue
    pub id: Uuid,

    /// Human-readable code, e.g. "CORE-7"
    pub code: IssueCode,

    /// Team that owns the issue
    pub team_id: Uuid,

    /// User who created the issue
    pub creator_id: Uuid,

    /// Short summary of the work
    pub title: String,

    /// Longer body text
    pub description: Option<String>,

    /// Workflow state
    pub status: IssueStatus,

    /// Urgency
    pub priority: IssuePriority,

    /// Single assignee, if any (must be a member of the owning team)
    pub assignee_id: Option<Uuid>,

    /// Calendar due date, no time-of-day component
    pub due_date: Option<NaiveDate>,

    /// Opaque lexicographic sort key for manual ordering
    pub rank: String,

    /// Attached labels, in attachment order
    pub label_ids: Vec<Uuid>,

    /// When the issue was created
    pub created_at: DateTime<Utc>,

    /// When the issue was last updated
    pub updated_at: DateTime<Utc>,
}

impl Issue {
    /// Creates a new issue in the backlog with medium priority.
    ///
    /// # Arguments
    ///
    /// * `code` - The assigned `PREFIX-n` code
    /// * `team_id` - The owning team
    /// * `creator_id` - The user creating the issue
    /// * `title` - Short summary
    /// * `rank` - Initial sort key
    pub fn new(
        code: IssueCode,
        team_id: Uuid,
        creator_id: Uuid,
        title: impl Into<String>,
        rank: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            code,
            team_id,
            creator_id,
            title: title.into(),
            description: None,
            status: IssueStatus::Backlog,
            priority: IssuePriority::default(),
            assignee_id: None,
            due_date: None,
            rank: rank.into(),
            label_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the description (builder style).
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the initial status (builder style).
    pub fn with_status(mut self, status: IssueStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the initial priority (builder style).
    pub fn with_priority(mut self, priority: IssuePriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the initial assignee (builder style).
    pub fn with_assignee(mut self, assignee_id: Uuid) -> Self {
        self.assignee_id = Some(assignee_id);
        self
    }

    /// Sets the due date (builder style).
    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Whether the issue sits in a closed status.
    pub fn is_closed(&self) -> bool {
        self.status.is_closed()
    }

    /// Whether the issue is assigned to the given user.
    pub fn is_assigned_to(&self, user_id: Uuid) -> bool {
        self.assignee_id == Some(user_id)
    }

    /// Whether the given label is attached.
    pub fn has_label(&self, label_id: Uuid) -> bool {
        self.label_ids.contains(&label_id)
    }

    /// Attaches the label if absent, detaches it if present.
    ///
    /// Returns `true` when the label is attached after the call.
    pub fn toggle_label(&mut self, label_id: Uuid) -> bool {
        if let Some(pos) = self.label_ids.iter().position(|id| *id == label_id) {
            self.label_ids.remove(pos);
            false
        } else {
            self.label_ids.push(label_id);
            true
        }
    }

    /// Marks the issue as updated now.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue() -> Issue {
        Issue::new(
            IssueCode::new("CORE", 1),
            Uuid::now_v7(),
            Uuid::now_v7(),
            "Fix checkout totals",
            "m",
        )
    }

    #[test]
    fn test_issue_creation_defaults() {
        let issue = issue();

        assert_eq!(issue.status, IssueStatus::Backlog);
        assert_eq!(issue.priority, IssuePriority::Medium);
        assert!(issue.description.is_none());
        assert!(issue.assignee_id.is_none());
        assert!(issue.due_date.is_none());
        assert!(issue.label_ids.is_empty());
        assert_eq!(issue.rank, "m");
    }

    #[test]
    fn test_issue_builders() {
        let assignee = Uuid::now_v7();
        let due = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let issue = issue()
            .with_description("Totals drift by one cent on split payments")
            .with_status(IssueStatus::Todo)
            .with_priority(IssuePriority::Urgent)
            .with_assignee(assignee)
            .with_due_date(due);

        assert_eq!(issue.status, IssueStatus::Todo);
        assert!(issue.priority.is_urgent());
        assert!(issue.is_assigned_to(assignee));
        assert_eq!(issue.due_date, Some(due));
    }

    #[test]
    fn test_toggle_label() {
        let mut issue = issue();
        let label = Uuid::now_v7();

        assert!(issue.toggle_label(label));
        assert!(issue.has_label(label));

        assert!(!issue.toggle_label(label));
        assert!(!issue.has_label(label));
    }

    #[test]
    fn test_toggle_label_preserves_attachment_order() {
        let mut issue = issue();
        let first = Uuid::now_v7();
        let second = Uuid::now_v7();

        issue.toggle_label(first);
        issue.toggle_label(second);
        assert_eq!(issue.label_ids, vec![first, second]);

        issue.toggle_label(first);
        assert_eq!(issue.label_ids, vec![second]);
    }

    #[test]
    fn test_closed_states() {
        let mut issue = issue();
        assert!(!issue.is_closed());

        issue.status = IssueStatus::Done;
        assert!(issue.is_closed());

        issue.status = IssueStatus::Cancelled;
        assert!(issue.is_closed());
    }
}
