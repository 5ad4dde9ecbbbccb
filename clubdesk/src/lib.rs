//! `ClubDesk`: role-aware society dashboard core.
//!
//! Fetches tasks, events and announcements from a hosted document store,
//! normalizes them into typed entities, derives filtered views for
//! presentation and forwards create/delete intents back to the store.

pub mod aggregate;
pub mod config;
pub mod dashboard;
pub mod filter;
pub mod gateway;
pub mod normalize;
pub mod render;
pub mod schema;
pub mod session;
