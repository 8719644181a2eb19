//! Issue workflow status and priority
//!
//! Both enums are ordered by workflow progression and urgency respectively,
//! which keeps board-column and triage sorting a plain comparison.

use serde::{Deserialize, Serialize};

// ============================================================================
// Issue Status
// ============================================================================

/// Workflow state of an issue.
///
/// `Done` and `Cancelled` are the closed states; everything else counts as
/// open. Transitions between any two states are allowed, but crossing the
/// open/closed boundary is what subscriber notifications key on.
///
/// # Examples
///
/// ```
/// use collab_issue::IssueStatus;
///
/// assert!(IssueStatus::Done.is_closed());
/// assert!(!IssueStatus::InProgress.is_closed());
/// assert!(IssueStatus::Backlog < IssueStatus::Done);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    /// Not yet planned
    Backlog = 0,
    /// Planned, not started
    Todo = 1,
    /// Actively being worked on
    InProgress = 2,
    /// Awaiting review
    InReview = 3,
    /// Completed
    Done = 4,
    /// Abandoned without completion
    Cancelled = 5,
}

impl IssueStatus {
    /// Returns the string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::Backlog => "backlog",
            IssueStatus::Todo => "todo",
            IssueStatus::InProgress => "in_progress",
            IssueStatus::InReview => "in_review",
            IssueStatus::Done => "done",
            IssueStatus::Cancelled => "cancelled",
        }
    }

    /// Parses a status from its string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "backlog" => Some(IssueStatus::Backlog),
            "todo" => Some(IssueStatus::Todo),
            "in_progress" => Some(IssueStatus::InProgress),
            "in_review" => Some(IssueStatus::InReview),
            "done" => Some(IssueStatus::Done),
            "cancelled" => Some(IssueStatus::Cancelled),
            _ => None,
        }
    }

    /// Returns a human-friendly display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            IssueStatus::Backlog => "Backlog",
            IssueStatus::Todo => "Todo",
            IssueStatus::InProgress => "In Progress",
            IssueStatus::InReview => "In Review",
            IssueStatus::Done => "Done",
            IssueStatus::Cancelled => "Cancelled",
        }
    }

    /// Whether this status closes the issue.
    pub fn is_closed(&self) -> bool {
        matches!(self, IssueStatus::Done | IssueStatus::Cancelled)
    }

    /// Whether this status leaves the issue open.
    pub fn is_open(&self) -> bool {
        !self.is_closed()
    }
}

impl std::fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Issue Priority
// ============================================================================

/// Urgency of an issue.
///
/// Ordered from `Low` to `Urgent` so triage views can sort by comparison.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum IssuePriority {
    /// Can wait
    Low = 0,
    /// Normal priority
    #[default]
    Medium = 1,
    /// Should be handled soon
    High = 2,
    /// Drop everything
    Urgent = 3,
}

impl IssuePriority {
    /// Returns the string representation of the priority.
    pub fn as_str(&self) -> &'static str {
        match self {
            IssuePriority::Low => "low",
            IssuePriority::Medium => "medium",
            IssuePriority::High => "high",
            IssuePriority::Urgent => "urgent",
        }
    }

    /// Parses a priority from its string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(IssuePriority::Low),
            "medium" => Some(IssuePriority::Medium),
            "high" => Some(IssuePriority::High),
            "urgent" => Some(IssuePriority::Urgent),
            _ => None,
        }
    }

    /// Returns a human-friendly display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            IssuePriority::Low => "Low",
            IssuePriority::Medium => "Medium",
            IssuePriority::High => "High",
            IssuePriority::Urgent => "Urgent",
        }
    }

    /// Whether this priority demands immediate attention.
    pub fn is_urgent(&self) -> bool {
        matches!(self, IssuePriority::Urgent)
    }
}

impl std::fmt::Display for IssuePriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
