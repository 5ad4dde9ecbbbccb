//! Session-scoped dashboard state.
//!
//! A [`DashboardSession`] owns everything one dashboard view needs: the
//! gateway (and through it the store handle), the signed-in member, the
//! three snapshots and the current filter selection. Dropping the session
//! discards all of it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use clubdesk_model::{
    Announcement, DocumentId, Event, FilterSelection, FilterValue, NewAnnouncement, NewEvent,
    NewTask, Priority, Role, Task, TaskStatus,
};
use clubdesk_store::DocumentStore;

use crate::aggregate::{self, FetchError};
use crate::dashboard::{self, DashboardSummary};
use crate::filter;
use crate::gateway::{MutationGateway, WriteError};
use crate::schema;

/// Errors surfaced by session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The member's role does not allow the action.
    #[error("role {role} may not {action}")]
    PermissionDenied {
        /// Role of the signed-in member.
        role: Role,
        /// What was attempted, e.g. `"create tasks"`.
        action: &'static str,
    },

    /// A snapshot fetch failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A write failed.
    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Result of a delete intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The document was removed.
    Deleted,
    /// The confirmation step declined; the store was not contacted.
    Cancelled,
}

/// The signed-in member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Member identifier, recorded as `createdBy` on new documents.
    pub id: String,
    /// Society role.
    pub role: Role,
}

/// The last successfully fetched list of one collection.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    items: Vec<T>,
    fetched_at: Option<DateTime<Utc>>,
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            fetched_at: None,
        }
    }
}

impl<T> Snapshot<T> {
    /// Entities in fetch order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// When the snapshot was last replaced; `None` if never fetched.
    #[must_use]
    pub const fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// Replaces the items on success; keeps them on failure.
    fn update(&mut self, result: Result<Vec<T>, FetchError>) -> Result<(), FetchError> {
        match result {
            Ok(items) => {
                self.items = items;
                self.fetched_at = Some(Utc::now());
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    collection = e.collection(),
                    kept = self.items.len(),
                    "fetch failed, keeping previous snapshot"
                );
                Err(e)
            }
        }
    }
}

/// One member's dashboard view over a shared store.
pub struct DashboardSession<S> {
    gateway: MutationGateway<S>,
    member: Member,
    tasks: Snapshot<Task>,
    events: Snapshot<Event>,
    announcements: Snapshot<Announcement>,
    selection: FilterSelection,
}

impl<S: DocumentStore> DashboardSession<S> {
    /// Creates a session with empty snapshots and no filter constraint.
    pub fn new(store: Arc<S>, member: Member) -> Self {
        Self::with_gateway(MutationGateway::new(store), member)
    }

    /// Creates a session around a preconfigured gateway.
    pub fn with_gateway(gateway: MutationGateway<S>, member: Member) -> Self {
        Self {
            gateway,
            member,
            tasks: Snapshot::default(),
            events: Snapshot::default(),
            announcements: Snapshot::default(),
            selection: FilterSelection::all(),
        }
    }

    /// Fetches all three collections.
    ///
    /// Every collection is attempted; one that fails keeps its previous
    /// snapshot.
    ///
    /// # Errors
    ///
    /// Returns the first [`FetchError`] encountered.
    pub async fn mount(&mut self) -> Result<(), FetchError> {
        let tasks = self.refresh_tasks().await;
        let events = self.refresh_events().await;
        let announcements = self.refresh_announcements().await;
        tracing::info!(
            member = %self.member.id,
            role = %self.member.role,
            tasks = self.tasks.items.len(),
            events = self.events.items.len(),
            announcements = self.announcements.items.len(),
            "dashboard mounted"
        );
        tasks.and(events).and(announcements)
    }

    /// Re-fetches the task snapshot.
    ///
    /// # Errors
    ///
    /// Returns the [`FetchError`]; the previous snapshot is kept.
    pub async fn refresh_tasks(&mut self) -> Result<(), FetchError> {
        let result = aggregate::fetch_tasks(self.gateway.store()).await;
        self.tasks.update(result)
    }

    /// Re-fetches the event snapshot.
    ///
    /// # Errors
    ///
    /// Returns the [`FetchError`]; the previous snapshot is kept.
    pub async fn refresh_events(&mut self) -> Result<(), FetchError> {
        let result = aggregate::fetch_events(self.gateway.store()).await;
        self.events.update(result)
    }

    /// Re-fetches the announcement snapshot.
    ///
    /// # Errors
    ///
    /// Returns the [`FetchError`]; the previous snapshot is kept.
    pub async fn refresh_announcements(&mut self) -> Result<(), FetchError> {
        let result = aggregate::fetch_announcements(self.gateway.store()).await;
        self.announcements.update(result)
    }

    #[must_use]
    pub const fn member(&self) -> &Member {
        &self.member
    }

    /// Whether the member may create and delete.
    #[must_use]
    pub const fn can_edit(&self) -> bool {
        self.member.role.is_senior()
    }

    #[must_use]
    pub const fn tasks(&self) -> &Snapshot<Task> {
        &self.tasks
    }

    #[must_use]
    pub const fn events(&self) -> &Snapshot<Event> {
        &self.events
    }

    #[must_use]
    pub const fn announcements(&self) -> &Snapshot<Announcement> {
        &self.announcements
    }

    /// Whether `collection` has been fetched successfully at least once.
    ///
    /// Unknown collection names are never loaded.
    #[must_use]
    pub fn is_loaded(&self, collection: &str) -> bool {
        match collection {
            schema::TASKS => self.tasks.fetched_at.is_some(),
            schema::EVENTS => self.events.fetched_at.is_some(),
            schema::ANNOUNCEMENTS => self.announcements.fetched_at.is_some(),
            _ => false,
        }
    }

    #[must_use]
    pub const fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    /// Tasks passing the current selection, in snapshot order.
    #[must_use]
    pub fn visible_tasks(&self) -> Vec<&Task> {
        filter::apply(&self.tasks.items, &self.selection)
    }

    /// Domain choices derived from the current task snapshot.
    #[must_use]
    pub fn domain_options(&self) -> Vec<FilterValue<String>> {
        filter::domain_options(&self.tasks.items)
    }

    /// Replaces the whole selection.
    pub fn set_selection(&mut self, selection: FilterSelection) {
        self.selection = selection;
    }

    pub fn set_domain_filter(&mut self, domain: FilterValue<String>) {
        self.selection.domain = domain;
    }

    pub fn set_priority_filter(&mut self, priority: FilterValue<Priority>) {
        self.selection.priority = priority;
    }

    pub fn set_status_filter(&mut self, status: FilterValue<TaskStatus>) {
        self.selection.status = status;
    }

    /// Quick stats over the current snapshots.
    #[must_use]
    pub fn summary(&self, now: DateTime<Utc>) -> DashboardSummary {
        dashboard::summarize(
            &self.tasks.items,
            &self.events.items,
            &self.announcements.items,
            now,
        )
    }

    /// Creates a task authored by the signed-in member, then re-fetches the
    /// task snapshot.
    ///
    /// A re-fetch failure after a committed write is logged and leaves the
    /// snapshot stale; the new id is still returned.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::PermissionDenied`] for non-senior roles or
    /// [`SessionError::Write`] if the gateway rejects the write.
    pub async fn create_task(&mut self, task: &NewTask) -> Result<DocumentId, SessionError> {
        self.require_senior("create tasks")?;
        let task = NewTask {
            created_by: self.member.id.clone(),
            ..task.clone()
        };
        let id = self.gateway.create_task(&task).await?;
        if let Err(e) = self.refresh_tasks().await {
            tracing::warn!(id = %id, error = %e, "task created but refresh failed");
        }
        Ok(id)
    }

    /// Deletes a task after `confirm` approves, then re-fetches.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::PermissionDenied`] for non-senior roles or
    /// [`SessionError::Write`] if the delete fails; the snapshot is then
    /// unchanged.
    pub async fn delete_task(
        &mut self,
        id: &DocumentId,
        confirm: impl FnOnce(&DocumentId) -> bool,
    ) -> Result<DeleteOutcome, SessionError> {
        self.require_senior("delete tasks")?;
        if !confirm(id) {
            tracing::debug!(id = %id, "task delete cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }
        self.gateway.delete_task(id).await?;
        if let Err(e) = self.refresh_tasks().await {
            tracing::warn!(id = %id, error = %e, "task deleted but refresh failed");
        }
        Ok(DeleteOutcome::Deleted)
    }

    /// Creates an event, then re-fetches the event snapshot.
    ///
    /// # Errors
    ///
    /// As for [`create_task`](Self::create_task).
    pub async fn create_event(&mut self, event: &NewEvent) -> Result<DocumentId, SessionError> {
        self.require_senior("create events")?;
        let id = self.gateway.create_event(event).await?;
        if let Err(e) = self.refresh_events().await {
            tracing::warn!(id = %id, error = %e, "event created but refresh failed");
        }
        Ok(id)
    }

    /// Deletes an event after `confirm` approves, then re-fetches.
    ///
    /// # Errors
    ///
    /// As for [`delete_task`](Self::delete_task).
    pub async fn delete_event(
        &mut self,
        id: &DocumentId,
        confirm: impl FnOnce(&DocumentId) -> bool,
    ) -> Result<DeleteOutcome, SessionError> {
        self.require_senior("delete events")?;
        if !confirm(id) {
            tracing::debug!(id = %id, "event delete cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }
        self.gateway.delete_event(id).await?;
        if let Err(e) = self.refresh_events().await {
            tracing::warn!(id = %id, error = %e, "event deleted but refresh failed");
        }
        Ok(DeleteOutcome::Deleted)
    }

    /// Posts an announcement as the signed-in member, then re-fetches.
    ///
    /// # Errors
    ///
    /// As for [`create_task`](Self::create_task).
    pub async fn create_announcement(
        &mut self,
        announcement: &NewAnnouncement,
    ) -> Result<DocumentId, SessionError> {
        self.require_senior("post announcements")?;
        let announcement = NewAnnouncement {
            created_by: self.member.id.clone(),
            ..announcement.clone()
        };
        let id = self.gateway.create_announcement(&announcement).await?;
        if let Err(e) = self.refresh_announcements().await {
            tracing::warn!(id = %id, error = %e, "announcement posted but refresh failed");
        }
        Ok(id)
    }

    /// Deletes an announcement after `confirm` approves, then re-fetches.
    ///
    /// # Errors
    ///
    /// As for [`delete_task`](Self::delete_task).
    pub async fn delete_announcement(
        &mut self,
        id: &DocumentId,
        confirm: impl FnOnce(&DocumentId) -> bool,
    ) -> Result<DeleteOutcome, SessionError> {
        self.require_senior("delete announcements")?;
        if !confirm(id) {
            tracing::debug!(id = %id, "announcement delete cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }
        self.gateway.delete_announcement(id).await?;
        if let Err(e) = self.refresh_announcements().await {
            tracing::warn!(id = %id, error = %e, "announcement deleted but refresh failed");
        }
        Ok(DeleteOutcome::Deleted)
    }

    fn require_senior(&self, action: &'static str) -> Result<(), SessionError> {
        if self.can_edit() {
            Ok(())
        } else {
            tracing::warn!(member = %self.member.id, role = %self.member.role, action, "permission denied");
            Err(SessionError::PermissionDenied {
                role: self.member.role,
                action,
            })
        }
    }
}
