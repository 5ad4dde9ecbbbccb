//! Document store access for `ClubDesk`.
//!
//! The dashboard talks to a hosted, schemaless document database through the
//! [`DocumentStore`] trait. Two backends ship with the crate:
//! - [`memory::MemoryStore`]: in-process, with fault injection for tests
//! - [`file::JsonFileStore`]: a single JSON file, for local use of the CLI

pub mod file;
pub mod memory;
pub mod store;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use store::{Direction, DocumentStore, OrderBy, Query, StoreError};
