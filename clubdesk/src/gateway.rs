//! Create and delete intents forwarded to the document store.
//!
//! The gateway never touches a snapshot. Callers that want the new state
//! re-fetch afterwards (see [`DashboardSession`](crate::session::DashboardSession)).

use std::sync::Arc;

use clubdesk_model::{
    Announcement, DocumentId, Event, Fields, NewAnnouncement, NewEvent, NewTask, Task, Value,
    task::MAX_TASK_TITLE_LENGTH,
};
use clubdesk_store::{DocumentStore, StoreError};

use crate::normalize::FromDocument;
use crate::schema;

/// Why a write was not applied.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// The submission was rejected before reaching the store.
    #[error("invalid {collection} submission: {reason}")]
    Invalid {
        /// Target collection.
        collection: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The document to delete does not exist.
    #[error("{collection} document {id} does not exist")]
    NotFound {
        /// Target collection.
        collection: &'static str,
        /// Identifier that was not found.
        id: DocumentId,
    },

    /// The store rejected or failed the write.
    #[error("failed to write {collection}: {source}")]
    Store {
        /// Target collection.
        collection: &'static str,
        /// Underlying store error.
        #[source]
        source: StoreError,
    },
}

/// Forwards create/delete intents for tasks, events and announcements.
pub struct MutationGateway<S> {
    store: Arc<S>,
    max_title_len: usize,
}

impl<S: DocumentStore> MutationGateway<S> {
    /// Creates a gateway over `store` with the default title limit.
    pub const fn new(store: Arc<S>) -> Self {
        Self {
            store,
            max_title_len: MAX_TASK_TITLE_LENGTH,
        }
    }

    /// Sets the maximum title length in characters.
    #[must_use]
    pub const fn with_max_title_len(mut self, max: usize) -> Self {
        self.max_title_len = max;
        self
    }

    /// The underlying store, for reads.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Writes a new task; the store stamps `createdAt`.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::Invalid`] for an empty or over-long title or an
    /// empty domain, or [`WriteError::Store`] if the write fails.
    pub async fn create_task(&self, task: &NewTask) -> Result<DocumentId, WriteError> {
        let collection = Task::COLLECTION;
        self.check_title(collection, &task.title)?;
        require_text(collection, schema::DOMAIN, &task.domain)?;
        self.create(collection, task_fields(task)).await
    }

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::NotFound`] if no task has `id`, or
    /// [`WriteError::Store`] if the delete fails.
    pub async fn delete_task(&self, id: &DocumentId) -> Result<(), WriteError> {
        self.delete(Task::COLLECTION, id).await
    }

    /// Writes a new event.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::Invalid`] for a bad title, or
    /// [`WriteError::Store`] if the write fails.
    pub async fn create_event(&self, event: &NewEvent) -> Result<DocumentId, WriteError> {
        let collection = Event::COLLECTION;
        self.check_title(collection, &event.title)?;
        self.create(collection, event_fields(event)).await
    }

    /// Deletes an event.
    ///
    /// # Errors
    ///
    /// As for [`delete_task`](Self::delete_task).
    pub async fn delete_event(&self, id: &DocumentId) -> Result<(), WriteError> {
        self.delete(Event::COLLECTION, id).await
    }

    /// Posts a new announcement.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::Invalid`] for a bad title or empty content, or
    /// [`WriteError::Store`] if the write fails.
    pub async fn create_announcement(
        &self,
        announcement: &NewAnnouncement,
    ) -> Result<DocumentId, WriteError> {
        let collection = Announcement::COLLECTION;
        self.check_title(collection, &announcement.title)?;
        require_text(collection, schema::CONTENT, &announcement.content)?;
        self.create(collection, announcement_fields(announcement))
            .await
    }

    /// Deletes an announcement.
    ///
    /// # Errors
    ///
    /// As for [`delete_task`](Self::delete_task).
    pub async fn delete_announcement(&self, id: &DocumentId) -> Result<(), WriteError> {
        self.delete(Announcement::COLLECTION, id).await
    }

    fn check_title(&self, collection: &'static str, title: &str) -> Result<(), WriteError> {
        require_text(collection, schema::TITLE, title)?;
        let len = title.chars().count();
        if len > self.max_title_len {
            return Err(WriteError::Invalid {
                collection,
                reason: format!(
                    "title is {len} characters, maximum is {}",
                    self.max_title_len
                ),
            });
        }
        Ok(())
    }

    async fn create(&self, collection: &'static str, fields: Fields) -> Result<DocumentId, WriteError> {
        match self.store.add_document(collection, fields).await {
            Ok(id) => {
                tracing::info!(collection, id = %id, "document created");
                Ok(id)
            }
            Err(source) => {
                tracing::warn!(collection, error = %source, "create failed");
                Err(WriteError::Store { collection, source })
            }
        }
    }

    async fn delete(&self, collection: &'static str, id: &DocumentId) -> Result<(), WriteError> {
        match self.store.delete_document(collection, id).await {
            Ok(()) => {
                tracing::info!(collection, id = %id, "document deleted");
                Ok(())
            }
            Err(StoreError::NotFound { .. }) => {
                tracing::warn!(collection, id = %id, "delete of missing document");
                Err(WriteError::NotFound {
                    collection,
                    id: id.clone(),
                })
            }
            Err(source) => {
                tracing::warn!(collection, id = %id, error = %source, "delete failed");
                Err(WriteError::Store { collection, source })
            }
        }
    }
}

fn require_text(collection: &'static str, field: &str, text: &str) -> Result<(), WriteError> {
    if text.trim().is_empty() {
        return Err(WriteError::Invalid {
            collection,
            reason: format!("{field} must not be empty"),
        });
    }
    Ok(())
}

/// Store encoding of a task submission.
#[must_use]
pub fn task_fields(task: &NewTask) -> Fields {
    let mut f = Fields::new();
    f.insert(schema::TITLE.into(), Value::from(task.title.as_str()));
    f.insert(schema::DESCRIPTION.into(), Value::from(task.description.as_str()));
    f.insert(schema::DOMAIN.into(), Value::from(task.domain.as_str()));
    f.insert(schema::PRIORITY.into(), Value::from(task.priority.as_str()));
    f.insert(schema::STATUS.into(), Value::from(task.status.as_str()));
    f.insert(schema::DUE_DATE.into(), Value::from(task.due_date));
    f.insert(schema::CREATED_BY.into(), Value::from(task.created_by.as_str()));
    f.insert(
        schema::ASSIGNED_TO.into(),
        task.assigned_to.as_deref().map_or(Value::Null, Value::from),
    );
    f.insert(schema::CREATED_AT.into(), Value::ServerTimestamp);
    f
}

/// Store encoding of an event submission.
#[must_use]
pub fn event_fields(event: &NewEvent) -> Fields {
    let mut f = Fields::new();
    f.insert(schema::TITLE.into(), Value::from(event.title.as_str()));
    f.insert(schema::DATE.into(), Value::from(event.date));
    f.insert(schema::TIME.into(), Value::from(event.time.as_str()));
    f.insert(schema::LOCATION.into(), Value::from(event.location.as_str()));
    f.insert(schema::DESCRIPTION.into(), Value::from(event.description.as_str()));
    f.insert(schema::CREATED_AT.into(), Value::ServerTimestamp);
    f
}

/// Store encoding of an announcement submission.
#[must_use]
pub fn announcement_fields(announcement: &NewAnnouncement) -> Fields {
    let mut f = Fields::new();
    f.insert(schema::TITLE.into(), Value::from(announcement.title.as_str()));
    f.insert(schema::CONTENT.into(), Value::from(announcement.content.as_str()));
    f.insert(schema::PRIORITY.into(), Value::from(announcement.priority.as_str()));
    f.insert(schema::CREATED_BY.into(), Value::from(announcement.created_by.as_str()));
    f.insert(schema::CREATED_AT.into(), Value::ServerTimestamp);
    f
}
