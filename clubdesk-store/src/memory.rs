//! In-process document store.
//!
//! [`MemoryStore`] keeps every collection as an insertion-ordered list of
//! documents behind a [`RwLock`]. It implements hosted-store semantics that
//! the dashboard relies on (server timestamps, ordered queries that skip
//! documents lacking the order field) and lets tests inject read/write
//! failures.

use std::cmp::Ordering;
use std::collections::HashMap;

use clubdesk_model::{Document, DocumentId, Fields, Timestamp, Value};
use tokio::sync::RwLock;

use crate::store::{Direction, DocumentStore, Query, StoreError};

/// Collection name → documents in insertion order.
pub(crate) type Collections = HashMap<String, Vec<Document>>;

/// Monotonic clock for server-assigned timestamps.
///
/// Two writes never receive the same timestamp, even when the wall clock
/// has not advanced between them.
#[derive(Debug)]
pub(crate) struct ServerClock {
    last: parking_lot::Mutex<Option<Timestamp>>,
}

impl ServerClock {
    pub(crate) fn new() -> Self {
        Self {
            last: parking_lot::Mutex::new(None),
        }
    }

    pub(crate) fn tick(&self) -> Timestamp {
        let mut last = self.last.lock();
        let now = Timestamp::now();
        let ts = match *last {
            Some(prev) if now <= prev => prev.next(),
            _ => now,
        };
        *last = Some(ts);
        ts
    }
}

/// Injected failures, checked before each operation.
#[derive(Debug, Default)]
struct Faults {
    reads: Option<String>,
    writes: Option<String>,
}

/// In-memory [`DocumentStore`].
pub struct MemoryStore {
    collections: RwLock<Collections>,
    clock: ServerClock,
    faults: parking_lot::Mutex<Faults>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            clock: ServerClock::new(),
            faults: parking_lot::Mutex::new(Faults::default()),
        }
    }

    /// Inserts a document exactly as given, bypassing id assignment and
    /// server timestamps. Used to seed fixtures, including malformed ones.
    ///
    /// A document with the same id is replaced in place.
    pub async fn insert_raw(&self, collection: &str, document: Document) {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        if let Some(existing) = docs.iter_mut().find(|d| d.id == document.id) {
            *existing = document;
        } else {
            docs.push(document);
        }
    }

    /// Number of documents currently in `collection`.
    pub async fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }

    /// Makes every subsequent read fail with [`StoreError::Unavailable`].
    pub fn fail_reads(&self, reason: impl Into<String>) {
        self.faults.lock().reads = Some(reason.into());
    }

    /// Makes every subsequent write fail with [`StoreError::Unavailable`].
    pub fn fail_writes(&self, reason: impl Into<String>) {
        self.faults.lock().writes = Some(reason.into());
    }

    /// Clears all injected failures.
    pub fn heal(&self) {
        *self.faults.lock() = Faults::default();
    }

    fn check_read(&self) -> Result<(), StoreError> {
        self.faults
            .lock()
            .reads
            .clone()
            .map_or(Ok(()), |reason| Err(StoreError::Unavailable(reason)))
    }

    fn check_write(&self) -> Result<(), StoreError> {
        self.faults
            .lock()
            .writes
            .clone()
            .map_or(Ok(()), |reason| Err(StoreError::Unavailable(reason)))
    }
}

impl DocumentStore for MemoryStore {
    async fn query(&self, query: &Query) -> Result<Vec<Document>, StoreError> {
        self.check_read()?;
        let collections = self.collections.read().await;
        let docs = run_query(&collections, query)?;
        drop(collections);
        tracing::debug!(query = %query, count = docs.len(), "memory store query");
        Ok(docs)
    }

    async fn add_document(&self, collection: &str, fields: Fields) -> Result<DocumentId, StoreError> {
        self.check_write()?;
        let mut collections = self.collections.write().await;
        let id = insert_document(&mut collections, collection, fields, self.clock.tick())?;
        drop(collections);
        tracing::debug!(collection, id = %id, "memory store add");
        Ok(id)
    }

    async fn delete_document(&self, collection: &str, id: &DocumentId) -> Result<(), StoreError> {
        self.check_write()?;
        let mut collections = self.collections.write().await;
        remove_document(&mut collections, collection, id)?;
        drop(collections);
        tracing::debug!(collection, id = %id, "memory store delete");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Shared collection operations (also used by the JSON file store)
// ---------------------------------------------------------------------------

/// Evaluates `query` against `collections`.
pub(crate) fn run_query(collections: &Collections, query: &Query) -> Result<Vec<Document>, StoreError> {
    query.validate()?;
    let Some(docs) = collections.get(&query.collection) else {
        return Ok(Vec::new());
    };
    let Some(order) = &query.order_by else {
        return Ok(docs.clone());
    };

    let mut matching: Vec<&Document> = docs
        .iter()
        .filter(|d| d.get(&order.field).is_some())
        .collect();
    // Stable sort: ties keep store order in both directions.
    matching.sort_by(|a, b| {
        let ord = match (a.get(&order.field), b.get(&order.field)) {
            (Some(x), Some(y)) => compare_values(x, y),
            _ => Ordering::Equal,
        };
        match order.direction {
            Direction::Ascending => ord,
            Direction::Descending => ord.reverse(),
        }
    });
    Ok(matching.into_iter().cloned().collect())
}

/// Adds a document with a fresh id, resolving server timestamps to `now`.
pub(crate) fn insert_document(
    collections: &mut Collections,
    collection: &str,
    mut fields: Fields,
    now: Timestamp,
) -> Result<DocumentId, StoreError> {
    if collection.is_empty() {
        return Err(StoreError::InvalidQuery("collection name is empty".to_string()));
    }
    for value in fields.values_mut() {
        resolve_server_timestamps(value, now);
    }
    let id = DocumentId::generate();
    collections
        .entry(collection.to_string())
        .or_default()
        .push(Document::new(id.clone(), fields));
    Ok(id)
}

/// Removes a document, failing if it does not exist.
pub(crate) fn remove_document(
    collections: &mut Collections,
    collection: &str,
    id: &DocumentId,
) -> Result<Document, StoreError> {
    let not_found = || StoreError::NotFound {
        collection: collection.to_string(),
        id: id.clone(),
    };
    let docs = collections.get_mut(collection).ok_or_else(not_found)?;
    let pos = docs.iter().position(|d| &d.id == id).ok_or_else(not_found)?;
    Ok(docs.remove(pos))
}

fn resolve_server_timestamps(value: &mut Value, now: Timestamp) {
    match value {
        Value::ServerTimestamp => *value = Value::Timestamp(now),
        Value::Array(items) => {
            for item in items {
                resolve_server_timestamps(item, now);
            }
        }
        Value::Map(map) => {
            for item in map.values_mut() {
                resolve_server_timestamps(item, now);
            }
        }
        _ => {}
    }
}

/// Rank of a value's type in the store's cross-type ordering.
const fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Boolean(_) => 1,
        Value::Integer(_) | Value::Double(_) => 2,
        Value::Timestamp(_) => 3,
        Value::String(_) => 4,
        Value::Array(_) => 5,
        Value::Map(_) => 6,
        Value::ServerTimestamp => 7,
    }
}

/// Total order over values: by type rank first, then by content.
#[allow(clippy::cast_precision_loss)]
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Boolean(x), Value::Boolean(y)) => x.cmp(y),
        (Value::Integer(x), Value::Integer(y)) => x.cmp(y),
        (Value::Integer(x), Value::Double(y)) => (*x as f64).total_cmp(y),
        (Value::Double(x), Value::Integer(y)) => x.total_cmp(&(*y as f64)),
        (Value::Double(x), Value::Double(y)) => x.total_cmp(y),
        (Value::Timestamp(x), Value::Timestamp(y)) => x.cmp(y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => x
            .iter()
            .zip(y)
            .map(|(l, r)| compare_values(l, r))
            .find(|o| o.is_ne())
            .unwrap_or_else(|| x.len().cmp(&y.len())),
        (Value::Map(x), Value::Map(y)) => x
            .iter()
            .zip(y)
            .map(|((lk, lv), (rk, rv))| lk.cmp(rk).then_with(|| compare_values(lv, rv)))
            .find(|o| o.is_ne())
            .unwrap_or_else(|| x.len().cmp(&y.len())),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}
