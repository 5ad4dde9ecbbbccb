//! The [`DocumentStore`] trait and its query types.

use std::fmt;
use std::sync::Arc;

use clubdesk_model::{Document, DocumentId, Fields};

/// Sort direction of an ordered query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

/// Server-side ordering of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// Field to order by.
    pub field: String,
    /// Sort direction.
    pub direction: Direction,
}

/// A read of one whole collection, optionally ordered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Collection to read.
    pub collection: String,
    /// Ordering; `None` returns documents in store order.
    pub order_by: Option<OrderBy>,
}

impl Query {
    /// Reads every document of `collection`.
    pub fn collection(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            order_by: None,
        }
    }

    /// Orders the result by `field`.
    ///
    /// As with hosted document stores, documents that lack `field` are not
    /// returned by an ordered query.
    #[must_use]
    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    /// Checks that the query names a collection and, if ordered, a field.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidQuery`] for an empty collection or field name.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.collection.is_empty() {
            return Err(StoreError::InvalidQuery(
                "collection name is empty".to_string(),
            ));
        }
        if let Some(order) = &self.order_by
            && order.field.is_empty()
        {
            return Err(StoreError::InvalidQuery("order field is empty".to_string()));
        }
        Ok(())
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.collection)?;
        if let Some(order) = &self.order_by {
            write!(f, " order by {} {}", order.field, order.direction)?;
        }
        Ok(())
    }
}

/// Errors reported by a document store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached or refused service.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The addressed document does not exist.
    #[error("document {id} not found in {collection}")]
    NotFound {
        /// Collection that was addressed.
        collection: String,
        /// Identifier that was not found.
        id: DocumentId,
    },

    /// The query or write was malformed.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Backing file could not be read or written.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backing file content could not be (de)serialized.
    #[error("store data error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Async access to a schemaless, collection-based document store.
///
/// Every call is one independent request: a query is a consistent
/// point-in-time read of its collection, and nothing is shared between
/// calls. There is no locking or optimistic concurrency; the last writer wins.
pub trait DocumentStore: Send + Sync {
    /// Reads a whole collection, ordered as requested.
    fn query(
        &self,
        query: &Query,
    ) -> impl std::future::Future<Output = Result<Vec<Document>, StoreError>> + Send;

    /// Writes a new document and returns its store-assigned identifier.
    ///
    /// Any [`Value::ServerTimestamp`](clubdesk_model::Value::ServerTimestamp)
    /// in `fields` is replaced by the store's clock.
    fn add_document(
        &self,
        collection: &str,
        fields: Fields,
    ) -> impl std::future::Future<Output = Result<DocumentId, StoreError>> + Send;

    /// Deletes a document.
    ///
    /// Returns [`StoreError::NotFound`] if no document has that id.
    fn delete_document(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}

impl<S: DocumentStore> DocumentStore for Arc<S> {
    fn query(
        &self,
        query: &Query,
    ) -> impl std::future::Future<Output = Result<Vec<Document>, StoreError>> + Send {
        (**self).query(query)
    }

    fn add_document(
        &self,
        collection: &str,
        fields: Fields,
    ) -> impl std::future::Future<Output = Result<DocumentId, StoreError>> + Send {
        (**self).add_document(collection, fields)
    }

    fn delete_document(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send {
        (**self).delete_document(collection, id)
    }
}
