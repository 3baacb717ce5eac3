//! # Carnet Store
//!
//! Storage abstraction for the training logbook. Provides a trait-based
//! interface for record, settings and draw-roster persistence with SQLite
//! and in-memory implementations.
//!
//! ## Overview
//!
//! The [`Store`] trait keeps the logbook storage-agnostic. The primary
//! implementation is [`SqliteStore`], with [`MemoryStore`] for testing.
//! Both share the same semantics and run the same conformance tests.
//!
//! ## Key Types
//!
//! - [`Store`] - The async trait for all storage operations
//! - [`StoreExt`] - Defaults and aggregate helpers on top of `Store`
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//! - [`UpdateResult`] - Result of updating a record
//!
//! ## Usage
//!
//! ```rust,no_run
//! use carnet_core::{Collection, Payload};
//! use carnet_store::{SqliteStore, Store};
//!
//! async fn example() -> carnet_store::Result<()> {
//!     let store = SqliteStore::open("carnet.db")?;
//!
//!     let id = store.add_record(Collection::Recherche, &Payload::new()).await?;
//!     let record = store.get_record(Collection::Recherche, id).await?;
//!     assert!(record.is_some());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod memory;
pub mod migration;
mod sequence;
pub mod sqlite;
pub mod traits;

#[cfg(test)]
mod conformance;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{Store, StoreExt, UpdateResult};
