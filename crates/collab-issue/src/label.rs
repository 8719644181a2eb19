//! Issue labels

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A label from the deployment-wide catalog.
///
/// Labels are flat (no grouping, no hierarchy) and shared by all teams.
/// The slug is the stable machine name; deleting and recreating a label
/// with the same slug yields a new identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueLabel {
    /// Unique identifier for the label
    pub id: Uuid,

    /// Stable machine name, unique across the catalog
    pub slug: String,

    /// Human-readable name
    pub name: String,

    /// Display color (hex string)
    pub color: String,

    /// When the label was created
    pub created_at: DateTime<Utc>,
}

impl IssueLabel {
    /// Creates a new label.
    pub fn new(slug: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            slug: slug.into(),
            name: name.into(),
            color: color.into(),
            created_at: Utc::now(),
        }
    }
}
