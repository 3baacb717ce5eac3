//! Error types for the carnet core.

use thiserror::Error;

/// A backup document (or a piece of one) that cannot be accepted.
///
/// Raised by the pure parse step, before anything is written.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("document is not valid JSON: {0}")]
    Parse(String),

    #[error("document matches no known backup shape")]
    UnrecognizedShape,

    #[error("unsupported backup version: {0}")]
    UnsupportedVersion(String),

    #[error("{0} must be an object")]
    NotAnObject(String),

    #[error("{0} must be an array")]
    NotAnArray(String),

    #[error("{collection}[{index}] has an invalid id: {value}")]
    InvalidRecordId {
        collection: String,
        index: usize,
        value: String,
    },

    #[error("{collection}[{index}] has an invalid creation time: {value}")]
    InvalidTimestamp {
        collection: String,
        index: usize,
        value: String,
    },

    #[error("{collection} contains id {id} more than once")]
    DuplicateRecordId { collection: String, id: u64 },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("invalid draw data: {0}")]
    InvalidDrawData(String),

    #[error("unknown collection: {0}")]
    UnknownCollection(String),
}

/// Errors raised by the draw engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error("a draw needs at least {required} participants, got {found}")]
    NotEnoughParticipants { required: usize, found: usize },
}

/// Errors raised when changing the participant roster.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("participant name is empty")]
    EmptyName,

    #[error("participant already in the roster: {0}")]
    Duplicate(String),
}
