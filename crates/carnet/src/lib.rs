//! # Carnet
//!
//! A training logbook for a detection dog: record sheets for search
//! sessions, weekly obedience and general follow-up, the handler's
//! settings, a fair running-order draw, and portable JSON backups.
//!
//! ## Overview
//!
//! [`Carnet`] is the single entry point the UI layer talks to. It owns a
//! [`Store`](carnet_store::Store) and exposes:
//!
//! - **Records**: add/get/list/update/delete per collection
//! - **Settings**: load/save, first-run detection
//! - **Draw**: roster changes, unbiased shuffles, position statistics
//! - **Backups**: export, preview, import (four document shapes), reset
//!
//! ## Key Rules
//!
//! - **Ids**: assigned by the store, per collection, never reused.
//! - **Delete**: idempotent; deleting a missing id succeeds.
//! - **Roster**: any roster change clears the statistics.
//! - **Import**: validated in full before the first write; each collection
//!   is then replaced in its own transaction.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use carnet::{Carnet, CarnetConfig, Collection};
//! use carnet::store::SqliteStore;
//!
//! async fn example() -> carnet::Result<()> {
//!     let store = SqliteStore::open("carnet.db")?;
//!     let carnet = Carnet::new(store, CarnetConfig::default());
//!
//!     if !carnet.is_onboarding_done().await? {
//!         // send the user through first-run setup
//!     }
//!
//!     carnet.add_participant("Alice").await?;
//!     carnet.add_participant("Bob").await?;
//!     let outcome = carnet.draw().await?;
//!     println!("{}", outcome.to_text());
//!
//!     let backup = carnet.export_json().await?;
//!     let summary = carnet.preview_import(&backup)?;
//!     println!("{} records, {} search sessions", summary.total(), summary.recherche);
//!     assert!(carnet.records(Collection::Recherche).await?.len() == summary.recherche);
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `carnet::core` - Data model (records, settings, draw data, backups)
//! - `carnet::store` - Storage abstraction, SQLite and in-memory stores

pub mod carnet;
pub mod error;

// Re-export component crates
pub use carnet_core as core;
pub use carnet_store as store;

// Re-export main types for convenience
pub use crate::carnet::{Carnet, CarnetConfig};
pub use error::{CarnetError, Result};

// Re-export commonly used core types
pub use carnet_core::{
    BackupShape, Collection, DiversSheet, DrawData, DrawOutcome, ExportDocument, ImportDocument,
    ImportSummary, ObeissanceSheet, ParticipantStats, Payload, Record, RecordId, RechercheSheet,
    Settings, Sheet, WeekSpan,
};
