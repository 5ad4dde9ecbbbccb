//! Whole-collection fetches producing ordered, normalized snapshots.
//!
//! A fetch is all-or-nothing: if the query fails, or any single document
//! fails normalization, the caller gets an error and no partial list.

use chrono::{DateTime, Utc};
use clubdesk_model::{Announcement, Document, Event, Task};
use clubdesk_store::{Direction, DocumentStore, Query, StoreError};

use crate::normalize::{FromDocument, NormalizationError, to_date};
use crate::schema;

/// Why a snapshot could not be produced.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The store query failed.
    #[error("failed to fetch {collection}: {source}")]
    Query {
        /// Collection being fetched.
        collection: String,
        /// Underlying store error.
        #[source]
        source: StoreError,
    },

    /// A document in the result could not be normalized.
    #[error("failed to fetch {collection}: {source}")]
    Normalization {
        /// Collection being fetched.
        collection: String,
        /// First normalization failure encountered.
        #[source]
        source: NormalizationError,
    },
}

impl FetchError {
    /// Collection the failed fetch addressed.
    #[must_use]
    pub fn collection(&self) -> &str {
        match self {
            Self::Query { collection, .. } | Self::Normalization { collection, .. } => collection,
        }
    }
}

/// Fetches every document of `collection` ordered by `order_field` and
/// normalizes each one into `E`.
///
/// Documents that lack `order_field` are not part of an ordered result.
///
/// # Errors
///
/// Returns [`FetchError::Query`] if the store query fails, or
/// [`FetchError::Normalization`] on the first document that cannot be
/// converted.
pub async fn fetch_all<E, S>(
    store: &S,
    collection: &str,
    order_field: &str,
    direction: Direction,
) -> Result<Vec<E>, FetchError>
where
    E: FromDocument,
    S: DocumentStore,
{
    let query = Query::collection(collection).order_by(order_field, direction);
    let docs = store.query(&query).await.map_err(|source| {
        tracing::warn!(%query, error = %source, "snapshot query failed");
        FetchError::Query {
            collection: collection.to_string(),
            source,
        }
    })?;

    let mut keyed = docs
        .iter()
        .map(|doc| Ok((order_key(doc, order_field), E::from_document(doc)?)))
        .collect::<Result<Vec<_>, NormalizationError>>()
        .map_err(|source| {
            tracing::warn!(collection, error = %source, "snapshot normalization failed");
            FetchError::Normalization {
                collection: collection.to_string(),
                source,
            }
        })?;

    // The store orders raw encodings, so a timestamp and a date string for
    // the same field do not compare by instant. Re-sort on the native date
    // whenever every document's order field is one. The sort is stable.
    if keyed.iter().all(|(key, _)| key.is_some()) {
        keyed.sort_by(|(a, _), (b, _)| match direction {
            Direction::Ascending => a.cmp(b),
            Direction::Descending => b.cmp(a),
        });
    }
    let entities: Vec<E> = keyed.into_iter().map(|(_, entity)| entity).collect();

    tracing::debug!(%query, count = entities.len(), "fetched snapshot");
    Ok(entities)
}

fn order_key(doc: &Document, order_field: &str) -> Option<DateTime<Utc>> {
    doc.get(order_field).and_then(|v| to_date(v).ok())
}

/// All tasks, newest first.
///
/// # Errors
///
/// See [`fetch_all`].
pub async fn fetch_tasks<S: DocumentStore>(store: &S) -> Result<Vec<Task>, FetchError> {
    fetch_all(store, Task::COLLECTION, schema::CREATED_AT, Direction::Descending).await
}

/// All events, soonest first.
///
/// # Errors
///
/// See [`fetch_all`].
pub async fn fetch_events<S: DocumentStore>(store: &S) -> Result<Vec<Event>, FetchError> {
    fetch_all(store, Event::COLLECTION, schema::DATE, Direction::Ascending).await
}

/// All announcements, newest first.
///
/// # Errors
///
/// See [`fetch_all`].
pub async fn fetch_announcements<S: DocumentStore>(
    store: &S,
) -> Result<Vec<Announcement>, FetchError> {
    fetch_all(
        store,
        Announcement::COLLECTION,
        schema::CREATED_AT,
        Direction::Descending,
    )
    .await
}
