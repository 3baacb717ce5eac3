//! # Carnet Testkit
//!
//! Testing utilities for the training logbook.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden backups**: one document per accepted import shape, with the
//!   summary each must produce
//! - **Generators**: Proptest strategies for payloads, settings and rosters
//! - **Fixtures**: A ready-made in-memory logbook and sample sheets
//!
//! ## Golden Backups
//!
//! ```rust
//! use carnet_core::ImportDocument;
//! use carnet_testkit::vectors::all_vectors;
//!
//! for vector in all_vectors() {
//!     let doc = ImportDocument::parse(vector.json).unwrap();
//!     assert_eq!(doc.shape(), vector.shape);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use carnet_testkit::generators::draw_data;
//!
//! proptest! {
//!     #[test]
//!     fn generated_draw_data_is_valid(data in draw_data(6)) {
//!         prop_assert!(data.validate().is_ok());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust,no_run
//! use carnet_testkit::fixtures::TestFixture;
//!
//! async fn example() {
//!     let fixture = TestFixture::seeded().await.unwrap();
//!     let backup = fixture.carnet.export_json().await.unwrap();
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::TestFixture;
