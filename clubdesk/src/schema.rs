//! Collection and field names as stored in the document database.
//!
//! Field names keep the store's camelCase spelling; both the normalizer and
//! the mutation gateway go through these constants.

/// Task collection.
pub const TASKS: &str = "tasks";
/// Event collection.
pub const EVENTS: &str = "events";
/// Announcement collection.
pub const ANNOUNCEMENTS: &str = "announcements";

pub const TITLE: &str = "title";
pub const DESCRIPTION: &str = "description";
pub const DOMAIN: &str = "domain";
pub const PRIORITY: &str = "priority";
pub const STATUS: &str = "status";
pub const DUE_DATE: &str = "dueDate";
pub const CREATED_BY: &str = "createdBy";
pub const ASSIGNED_TO: &str = "assignedTo";
pub const CREATED_AT: &str = "createdAt";
pub const DATE: &str = "date";
pub const TIME: &str = "time";
pub const LOCATION: &str = "location";
pub const CONTENT: &str = "content";
