//! Issue subscriptions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user following an issue.
///
/// The (issue, user) pair is the identity; there is no surrogate ID and at
/// most one subscription exists per pair. Subscribers receive inbox items
/// for comments and lifecycle changes on the issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSubscription {
    /// Issue being followed
    pub issue_id: Uuid,

    /// User following the issue
    pub user_id: Uuid,

    /// When the subscription was created
    pub created_at: DateTime<Utc>,
}

impl IssueSubscription {
    /// Creates a new subscription starting now.
    pub fn new(issue_id: Uuid, user_id: Uuid) -> Self {
        Self {
            issue_id,
            user_id,
            created_at: Utc::now(),
        }
    }
}
