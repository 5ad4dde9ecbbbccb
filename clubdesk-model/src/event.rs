//! Calendar events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value::DocumentId;

/// A normalized club event, as held in a dashboard snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Store-assigned identifier.
    pub id: DocumentId,
    /// Event name.
    pub title: String,
    /// Day of the event; the ordering key for the calendar.
    pub date: DateTime<Utc>,
    /// Start time as entered by the organiser (e.g. `14:00`).
    pub time: String,
    /// Where it takes place.
    pub location: String,
    /// Free-form details.
    pub description: String,
    /// Server-assigned creation time.
    pub created_at: DateTime<Utc>,
}

/// Fields submitted when creating an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    /// Event name.
    pub title: String,
    /// Day of the event.
    pub date: DateTime<Utc>,
    /// Start time as free text.
    pub time: String,
    /// Where it takes place.
    pub location: String,
    /// Free-form details.
    pub description: String,
}
