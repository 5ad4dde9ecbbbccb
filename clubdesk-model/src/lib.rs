//! Shared data model for `ClubDesk`.
//!
//! Raw store values ([`value`]) on one side, typed dashboard entities
//! ([`task`], [`event`], [`announcement`]) on the other. Conversion between
//! the two lives in the `clubdesk` crate.

pub mod announcement;
pub mod event;
pub mod filter;
pub mod role;
pub mod task;
pub mod value;

pub use announcement::{Announcement, NewAnnouncement};
pub use event::{Event, NewEvent};
pub use filter::{FilterSelection, FilterValue};
pub use role::Role;
pub use task::{NewTask, Priority, Task, TaskStatus};
pub use value::{Document, DocumentId, Fields, Timestamp, Value};

/// Error returned when text does not name a known enum variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct ParseEnumError {
    /// Which enumeration was being parsed (e.g. `"priority"`).
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
