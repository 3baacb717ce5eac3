//! # Carnet Core
//!
//! Pure data model for the training logbook: record collections, the
//! settings singleton, the draw roster with its statistics, and the backup
//! document format.
//!
//! This crate contains no I/O and no storage. Persistence lives in
//! `carnet-store`; the user-facing operations live in `carnet`.
//!
//! ## Key Types
//!
//! - [`Record`] / [`RecordId`] / [`Collection`] - stored training sheets
//! - [`Settings`] - dog name, reference lists, onboarding flag
//! - [`DrawData`] - running-order roster and position statistics
//! - [`ExportDocument`] / [`ImportDocument`] - backup format, in and out
//! - [`RechercheSheet`], [`ObeissanceSheet`], [`DiversSheet`] - typed views

mod de;

pub mod backup;
pub mod draw;
pub mod error;
pub mod settings;
pub mod sheet;
pub mod types;
pub mod week;

pub use backup::{
    BackupShape, ExportData, ExportDocument, ImportBundle, ImportDocument, ImportSummary,
    EXPORT_VERSION,
};
pub use draw::{shuffle, DrawData, DrawOutcome, ParticipantStats, RosterChange, MIN_PARTICIPANTS};
pub use error::{DrawError, RosterError, ValidationError};
pub use settings::Settings;
pub use sheet::{
    Charge, DiversSheet, ObeissanceSheet, RechercheSheet, Sheet, WeekHeader, DEFAULT_CHARGE_SLOTS,
};
pub use types::{now_rfc3339, Collection, ImportedRecord, Payload, Record, RecordId};
pub use week::WeekSpan;
