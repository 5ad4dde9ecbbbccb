//! Document store persisted to a single JSON file.
//!
//! The whole database is loaded at open and rewritten after every
//! successful write (temp file + rename). A write whose file update fails is
//! not applied in memory either, so the file and the in-memory view never
//! diverge.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clubdesk_model::{Document, DocumentId, Fields};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::memory::{Collections, ServerClock, insert_document, remove_document, run_query};
use crate::store::{DocumentStore, Query, StoreError};

/// On-disk layout.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    collections: BTreeMap<String, Vec<Document>>,
}

/// [`DocumentStore`] backed by a JSON file.
pub struct JsonFileStore {
    path: PathBuf,
    collections: RwLock<Collections>,
    clock: ServerClock,
}

impl JsonFileStore {
    /// Opens the store at `path`. A missing file is an empty store; it is
    /// created on the first write.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file exists but cannot be read, or
    /// [`StoreError::Serialization`] if its content is not a valid store.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let file = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => serde_json::from_str::<StoreFile>(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoreFile::default(),
            Err(e) => return Err(e.into()),
        };
        let count: usize = file.collections.values().map(Vec::len).sum();
        tracing::info!(path = %path.display(), documents = count, "opened json store");

        Ok(Self {
            path,
            collections: RwLock::new(file.collections.into_iter().collect()),
            clock: ServerClock::new(),
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, collections: &Collections) -> Result<(), StoreError> {
        let file = StoreFile {
            collections: collections
                .iter()
                .map(|(name, docs)| (name.clone(), docs.clone()))
                .collect(),
        };
        let json = serde_json::to_string_pretty(&file)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

impl DocumentStore for JsonFileStore {
    async fn query(&self, query: &Query) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        run_query(&collections, query)
    }

    async fn add_document(&self, collection: &str, fields: Fields) -> Result<DocumentId, StoreError> {
        let mut collections = self.collections.write().await;
        let mut next = collections.clone();
        let id = insert_document(&mut next, collection, fields, self.clock.tick())?;
        self.persist(&next).await?;
        *collections = next;
        drop(collections);
        tracing::debug!(collection, id = %id, "json store add");
        Ok(id)
    }

    async fn delete_document(&self, collection: &str, id: &DocumentId) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let mut next = collections.clone();
        remove_document(&mut next, collection, id)?;
        self.persist(&next).await?;
        *collections = next;
        drop(collections);
        tracing::debug!(collection, id = %id, "json store delete");
        Ok(())
    }
}
