//! Strong type definitions for the record collections.
//!
//! Identifiers and collection names are newtypes/enums so a recherche id can
//! never be handed to the wrong table by accident.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::error::ValidationError;

/// Free-form field set stored inside a record.
///
/// The store never validates these fields; typed access goes through the
/// [`sheet`](crate::sheet) views.
pub type Payload = Map<String, Value>;

/// Key under which a record's id is serialized.
pub const ID_FIELD: &str = "id";

/// Key under which a record's creation timestamp is serialized.
pub const CREATED_AT_FIELD: &str = "created_at";

/// Spelling of [`CREATED_AT_FIELD`] accepted on read.
pub const CREATED_AT_ALIAS: &str = "createdAt";

/// Identifier of a record, unique within its collection.
///
/// Ids are assigned by the store from a sequence that only moves forward,
/// so an id is never handed out twice.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl RecordId {
    /// Largest id accepted anywhere: the largest integer every JSON reader
    /// holds exactly.
    pub const MAX: RecordId = RecordId((1 << 53) - 1);

    /// Create a record id from its raw value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw value.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The id that follows this one in a sequence.
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RecordId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// One of the three named groups of record sheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    /// Detection (search) sessions.
    Recherche,
    /// Weekly obedience sheets.
    Obeissance,
    /// Weekly miscellaneous follow-up (weight, grooming, vet...).
    Divers,
}

impl Collection {
    /// Every collection, in export order.
    pub const ALL: [Collection; 3] = [
        Collection::Recherche,
        Collection::Obeissance,
        Collection::Divers,
    ];

    /// The name used as table key and backup document key.
    pub const fn as_str(self) -> &'static str {
        match self {
            Collection::Recherche => "recherche",
            Collection::Obeissance => "obeissance",
            Collection::Divers => "divers",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Collection::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownCollection(s.to_string()))
    }
}

/// A stored record: store-owned `id` and `created_at` plus the caller's payload.
///
/// Serializes flat, the way backup documents carry records:
/// `{"id": 3, "created_at": "...", "date": "...", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Store-assigned id.
    pub id: RecordId,
    /// Creation timestamp (RFC 3339). Absent on some very old records.
    #[serde(default, alias = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Everything else.
    #[serde(flatten)]
    pub payload: Payload,
}

impl Record {
    /// Assemble a record, dropping reserved keys from the payload.
    pub fn new(id: RecordId, created_at: Option<String>, mut payload: Payload) -> Self {
        strip_reserved(&mut payload);
        Self {
            id,
            created_at,
            payload,
        }
    }

    /// Raw access to a payload field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.payload.get(name)
    }

    /// A payload field rendered as text, if it holds a string or a number.
    pub fn text(&self, name: &str) -> Option<String> {
        self.payload.get(name).and_then(value_text)
    }

    /// The date used to order records for display.
    ///
    /// Recherche sheets carry `date`; weekly sheets carry `date_debut`.
    /// Empty when neither is present.
    pub fn date_key(&self) -> String {
        self.text("date")
            .filter(|d| !d.is_empty())
            .or_else(|| self.text("date_debut"))
            .unwrap_or_default()
    }
}

/// A record read from a backup document. Its id may be missing, in which
/// case the store assigns one.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedRecord {
    pub id: Option<RecordId>,
    pub created_at: Option<String>,
    pub payload: Payload,
}

impl From<Record> for ImportedRecord {
    fn from(record: Record) -> Self {
        Self {
            id: Some(record.id),
            created_at: record.created_at,
            payload: record.payload,
        }
    }
}

/// Remove the store-owned keys from a caller payload.
pub fn strip_reserved(payload: &mut Payload) {
    payload.remove(ID_FIELD);
    payload.remove(CREATED_AT_FIELD);
    payload.remove(CREATED_AT_ALIAS);
}

/// Render a JSON scalar as text. Strings pass through, numbers and booleans
/// are formatted, anything else yields `None`.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Current UTC time as an RFC 3339 string.
pub fn now_rfc3339() -> String {
    let now = OffsetDateTime::now_utc();
    now.format(&Rfc3339)
        .unwrap_or_else(|_| now.unix_timestamp().to_string())
}
