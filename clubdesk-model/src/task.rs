//! Task entities.
//!
//! A [`Task`] is a unit of club work with a free-text domain (e.g. `Web`,
//! `Ops`), a fixed [`Priority`] and a fixed [`TaskStatus`]. Tasks are only
//! ever created and deleted by the dashboard; editing happens elsewhere.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ParseEnumError;
use crate::value::DocumentId;

/// Maximum allowed task title length in characters.
pub const MAX_TASK_TITLE_LENGTH: usize = 256;

/// Urgency of a task or announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// Needs attention first.
    High,
    /// Normal urgency.
    Medium,
    /// Can wait.
    Low,
}

impl Priority {
    /// All priorities, in display order.
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    /// The label stored in documents and shown to members.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParseEnumError;

    /// Parses the exact stored label; matching is case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("priority", s))
    }
}

/// Where a task sits on the member's timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Due on a later day.
    Upcoming,
    /// Due today.
    Today,
    /// Done.
    Completed,
}

impl TaskStatus {
    /// All statuses, in display order.
    pub const ALL: [Self; 3] = [Self::Upcoming, Self::Today, Self::Completed];

    /// The label stored in documents and shown to members.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upcoming => "Upcoming",
            Self::Today => "Today",
            Self::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("status", s))
    }
}

/// A normalized task, as held in a dashboard snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Store-assigned identifier.
    pub id: DocumentId,
    /// Short headline.
    pub title: String,
    /// Free-form details (may be empty).
    pub description: String,
    /// Free-text category such as `Web` or `Ops`.
    pub domain: String,
    /// Urgency.
    pub priority: Priority,
    /// Timeline position.
    pub status: TaskStatus,
    /// When the task is due.
    pub due_date: DateTime<Utc>,
    /// Member id of the author.
    pub created_by: String,
    /// Member id of the assignee, if any.
    pub assigned_to: Option<String>,
    /// Server-assigned creation time; the default ordering key.
    pub created_at: DateTime<Utc>,
}

/// Fields submitted when creating a task.
///
/// The store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Short headline.
    pub title: String,
    /// Free-form details.
    pub description: String,
    /// Free-text category.
    pub domain: String,
    /// Urgency.
    pub priority: Priority,
    /// Timeline position.
    pub status: TaskStatus,
    /// When the task is due.
    pub due_date: DateTime<Utc>,
    /// Member id of the author.
    pub created_by: String,
    /// Member id of the assignee, if any.
    pub assigned_to: Option<String>,
}
