//! Announcements posted to the whole society.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::Priority;
use crate::value::DocumentId;

/// A normalized announcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    /// Store-assigned identifier.
    pub id: DocumentId,
    /// Headline.
    pub title: String,
    /// Body text.
    pub content: String,
    /// How prominently it should be shown.
    pub priority: Priority,
    /// Member id of the poster.
    pub created_by: String,
    /// Server-assigned posting time; announcements list newest first.
    pub created_at: DateTime<Utc>,
}

/// Fields submitted when posting an announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAnnouncement {
    /// Headline.
    pub title: String,
    /// Body text.
    pub content: String,
    /// How prominently it should be shown.
    pub priority: Priority,
    /// Member id of the poster.
    pub created_by: String,
}
