//! Backup documents: the export format and the import shapes it must accept.
//!
//! Exports are always written as version 2:
//!
//! ```json
//! { "version": 2, "exportDate": "...",
//!   "data": { "recherche": [], "obeissance": [], "divers": [],
//!             "settings": {}, "tirage": {} } }
//! ```
//!
//! Imports are recognised by structure, once, in this order:
//!
//! 1. `fiches` present: legacy shape, records under `fiches`, `settings` at
//!    the top level, never any draw data.
//! 2. `data` present: versioned shape. Version 1 carries no draw data,
//!    version 2 may carry `tirage`.
//! 3. any of the collection names, `settings` or `tirage` at the top level:
//!    raw shape.
//!
//! Parsing is pure. Everything a store needs is validated here so an
//! import can be rejected before the first write.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::draw::DrawData;
use crate::error::ValidationError;
use crate::settings::Settings;
use crate::types::{
    strip_reserved, Collection, ImportedRecord, Record, RecordId, CREATED_AT_ALIAS,
    CREATED_AT_FIELD, ID_FIELD,
};

/// Version written by [`ExportDocument`].
pub const EXPORT_VERSION: u32 = 2;

/// Top-level keys that identify a raw document.
const RAW_KEYS: [&str; 5] = ["recherche", "obeissance", "divers", "settings", "tirage"];

// ─────────────────────────────────────────────────────────────────────────────
// Export
// ─────────────────────────────────────────────────────────────────────────────

/// Full contents of every store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportData {
    pub recherche: Vec<Record>,
    pub obeissance: Vec<Record>,
    pub divers: Vec<Record>,
    pub settings: Settings,
    pub tirage: DrawData,
}

impl ExportData {
    /// Records of one collection.
    pub fn records(&self, collection: Collection) -> &[Record] {
        match collection {
            Collection::Recherche => &self.recherche,
            Collection::Obeissance => &self.obeissance,
            Collection::Divers => &self.divers,
        }
    }
}

/// A version 2 backup document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub version: u32,
    pub export_date: String,
    pub data: ExportData,
}

impl ExportDocument {
    /// Wrap store contents with the current format version.
    pub fn new(export_date: impl Into<String>, data: ExportData) -> Self {
        Self {
            version: EXPORT_VERSION,
            export_date: export_date.into(),
            data,
        }
    }

    /// Serialize to JSON.
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Import
// ─────────────────────────────────────────────────────────────────────────────

/// Which of the accepted layouts a document used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackupShape {
    Legacy,
    V1,
    V2,
    Raw,
}

impl fmt::Display for BackupShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BackupShape::Legacy => "legacy",
            BackupShape::V1 => "v1",
            BackupShape::V2 => "v2",
            BackupShape::Raw => "raw",
        })
    }
}

/// Normalized, validated contents of a backup document.
///
/// `None` for settings or draw data means the document did not carry them
/// and the existing values must be left alone.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImportBundle {
    pub recherche: Vec<ImportedRecord>,
    pub obeissance: Vec<ImportedRecord>,
    pub divers: Vec<ImportedRecord>,
    pub settings: Option<Settings>,
    pub tirage: Option<DrawData>,
}

impl ImportBundle {
    /// Records of one collection.
    pub fn records(&self, collection: Collection) -> &[ImportedRecord] {
        match collection {
            Collection::Recherche => &self.recherche,
            Collection::Obeissance => &self.obeissance,
            Collection::Divers => &self.divers,
        }
    }

    /// Move the records of one collection out of the bundle.
    pub fn take_records(&mut self, collection: Collection) -> Vec<ImportedRecord> {
        match collection {
            Collection::Recherche => std::mem::take(&mut self.recherche),
            Collection::Obeissance => std::mem::take(&mut self.obeissance),
            Collection::Divers => std::mem::take(&mut self.divers),
        }
    }

    fn from_sections(
        records: &Map<String, Value>,
        prefix: &str,
        settings: Option<Value>,
        tirage: Option<Value>,
    ) -> Result<Self, ValidationError> {
        let label = |c: Collection| format!("{prefix}{c}");
        Ok(Self {
            recherche: parse_records(
                records.get(Collection::Recherche.as_str()),
                &label(Collection::Recherche),
            )?,
            obeissance: parse_records(
                records.get(Collection::Obeissance.as_str()),
                &label(Collection::Obeissance),
            )?,
            divers: parse_records(
                records.get(Collection::Divers.as_str()),
                &label(Collection::Divers),
            )?,
            settings: parse_settings(settings)?,
            tirage: parse_draw_data(tirage)?,
        })
    }
}

/// A parsed backup document, tagged with the shape it was found in.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportDocument {
    Legacy(ImportBundle),
    V1(ImportBundle),
    V2(ImportBundle),
    Raw(ImportBundle),
}

impl ImportDocument {
    /// Parse a JSON backup.
    pub fn parse(json: &str) -> Result<Self, ValidationError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| ValidationError::Parse(e.to_string()))?;
        Self::from_value(value)
    }

    /// Detect the shape of an already parsed document and normalize it.
    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        let Value::Object(mut root) = value else {
            return Err(ValidationError::NotAnObject("document".to_string()));
        };

        if let Some(fiches) = take_present(&mut root, "fiches") {
            let fiches = into_object(fiches, "fiches")?;
            let settings = root.remove("settings");
            let bundle = ImportBundle::from_sections(&fiches, "fiches.", settings, None)?;
            return Ok(ImportDocument::Legacy(bundle));
        }

        if let Some(data) = take_present(&mut root, "data") {
            let version = parse_version(root.get("version"))?;
            let mut data = into_object(data, "data")?;
            let settings = data.remove("settings");
            let tirage = data.remove("tirage");
            return Ok(match version {
                1 => ImportDocument::V1(ImportBundle::from_sections(
                    &data, "data.", settings, None,
                )?),
                _ => ImportDocument::V2(ImportBundle::from_sections(
                    &data, "data.", settings, tirage,
                )?),
            });
        }

        if RAW_KEYS.iter().any(|k| root.contains_key(*k)) {
            let settings = root.remove("settings");
            let tirage = root.remove("tirage");
            let bundle = ImportBundle::from_sections(&root, "", settings, tirage)?;
            return Ok(ImportDocument::Raw(bundle));
        }

        Err(ValidationError::UnrecognizedShape)
    }

    /// The layout the document was found in.
    pub fn shape(&self) -> BackupShape {
        match self {
            ImportDocument::Legacy(_) => BackupShape::Legacy,
            ImportDocument::V1(_) => BackupShape::V1,
            ImportDocument::V2(_) => BackupShape::V2,
            ImportDocument::Raw(_) => BackupShape::Raw,
        }
    }

    /// The normalized contents.
    pub fn bundle(&self) -> &ImportBundle {
        match self {
            ImportDocument::Legacy(b)
            | ImportDocument::V1(b)
            | ImportDocument::V2(b)
            | ImportDocument::Raw(b) => b,
        }
    }

    /// Consume the document, keeping only its contents.
    pub fn into_bundle(self) -> ImportBundle {
        match self {
            ImportDocument::Legacy(b)
            | ImportDocument::V1(b)
            | ImportDocument::V2(b)
            | ImportDocument::Raw(b) => b,
        }
    }

    /// What an import of this document would bring in.
    pub fn summary(&self) -> ImportSummary {
        let bundle = self.bundle();
        ImportSummary {
            shape: self.shape(),
            recherche: bundle.recherche.len(),
            obeissance: bundle.obeissance.len(),
            divers: bundle.divers.len(),
            dog_name: bundle
                .settings
                .as_ref()
                .map(|s| s.dog_name.clone())
                .filter(|n| !n.trim().is_empty()),
            has_settings: bundle.settings.is_some(),
            has_draw_data: bundle.tirage.is_some(),
        }
    }
}

impl From<ExportDocument> for ImportDocument {
    fn from(doc: ExportDocument) -> Self {
        let data = doc.data;
        ImportDocument::V2(ImportBundle {
            recherche: data.recherche.into_iter().map(Into::into).collect(),
            obeissance: data.obeissance.into_iter().map(Into::into).collect(),
            divers: data.divers.into_iter().map(Into::into).collect(),
            settings: Some(data.settings),
            tirage: Some(data.tirage),
        })
    }
}

/// Counts shown to the user before confirming an import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub shape: BackupShape,
    pub recherche: usize,
    pub obeissance: usize,
    pub divers: usize,
    /// Dog name carried by the document, if any and not blank.
    pub dog_name: Option<String>,
    pub has_settings: bool,
    pub has_draw_data: bool,
}

impl ImportSummary {
    /// Number of records across all collections.
    pub fn total(&self) -> usize {
        self.recherche + self.obeissance + self.divers
    }
}

impl Serialize for BackupShape {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Section parsers
// ─────────────────────────────────────────────────────────────────────────────

/// Remove `key`, treating `null` like a missing key.
fn take_present(map: &mut Map<String, Value>, key: &str) -> Option<Value> {
    match map.remove(key) {
        None | Some(Value::Null) => None,
        Some(v) => Some(v),
    }
}

fn into_object(value: Value, label: &str) -> Result<Map<String, Value>, ValidationError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ValidationError::NotAnObject(label.to_string())),
    }
}

fn parse_version(value: Option<&Value>) -> Result<u32, ValidationError> {
    let unsupported = |v: &Value| ValidationError::UnsupportedVersion(v.to_string());
    let number = match value {
        None | Some(Value::Null) => return Ok(1),
        Some(v @ Value::Number(n)) => n.as_f64().ok_or_else(|| unsupported(v))?,
        Some(v @ Value::String(s)) => s.trim().parse::<f64>().map_err(|_| unsupported(v))?,
        Some(v) => return Err(unsupported(v)),
    };
    if number == 1.0 {
        Ok(1)
    } else if number == 2.0 {
        Ok(2)
    } else {
        Err(ValidationError::UnsupportedVersion(number.to_string()))
    }
}

fn parse_records(value: Option<&Value>, label: &str) -> Result<Vec<ImportedRecord>, ValidationError> {
    let items = match value {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(ValidationError::NotAnArray(label.to_string())),
    };

    let mut seen = HashSet::with_capacity(items.len());
    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let Value::Object(fields) = item else {
            return Err(ValidationError::NotAnObject(format!("{label}[{index}]")));
        };
        let mut payload = fields.clone();

        let id = match payload.get(ID_FIELD) {
            None | Some(Value::Null) => None,
            Some(raw) => Some(parse_record_id(raw).ok_or_else(|| {
                ValidationError::InvalidRecordId {
                    collection: label.to_string(),
                    index,
                    value: raw.to_string(),
                }
            })?),
        };
        if let Some(id) = id {
            if !seen.insert(id) {
                return Err(ValidationError::DuplicateRecordId {
                    collection: label.to_string(),
                    id: id.get(),
                });
            }
        }

        let created_at = match payload
            .get(CREATED_AT_FIELD)
            .filter(|v| !v.is_null())
            .or_else(|| payload.get(CREATED_AT_ALIAS))
        {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(raw) => {
                return Err(ValidationError::InvalidTimestamp {
                    collection: label.to_string(),
                    index,
                    value: raw.to_string(),
                })
            }
        };
        strip_reserved(&mut payload);

        records.push(ImportedRecord {
            id,
            created_at,
            payload,
        });
    }
    Ok(records)
}

fn parse_record_id(raw: &Value) -> Option<RecordId> {
    let Value::Number(n) = raw else {
        return None;
    };
    if let Some(id) = n.as_u64() {
        return (id > 0 && id <= RecordId::MAX.get()).then_some(RecordId(id));
    }
    let f = n.as_f64()?;
    (f >= 1.0 && f.fract() == 0.0 && f <= RecordId::MAX.get() as f64).then(|| RecordId(f as u64))
}

fn parse_settings(value: Option<Value>) -> Result<Option<Settings>, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(mut fields)) => {
            // Row key of the settings table in older backups.
            fields.remove(ID_FIELD);
            serde_json::from_value(Value::Object(fields))
                .map(Some)
                .map_err(|e| ValidationError::InvalidSettings(e.to_string()))
        }
        Some(_) => Err(ValidationError::InvalidSettings(
            "settings must be an object".to_string(),
        )),
    }
}

fn parse_draw_data(value: Option<Value>) -> Result<Option<DrawData>, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v @ Value::Object(_)) => {
            let data: DrawData = serde_json::from_value(v)
                .map_err(|e| ValidationError::InvalidDrawData(e.to_string()))?;
            data.validate()?;
            Ok(Some(data))
        }
        Some(_) => Err(ValidationError::InvalidDrawData(
            "tirage must be an object".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> ImportDocument {
        ImportDocument::from_value(value).unwrap()
    }

    #[test]
    fn test_legacy_shape() {
        let doc = parse(json!({
            "version": "1.0",
            "settings": {"nom_chien": "Rex", "substances": ["TNT"], "poseurs": []},
            "fiches": {
                "recherche": [{"id": 1, "date": "2023-05-02"}, {"id": 2, "date": "2023-05-09"}],
                "obeissance": []
            },
            "tirage": {"participants": ["ignored", "too"], "stats": {}}
        }));

        assert_eq!(doc.shape(), BackupShape::Legacy);
        let bundle = doc.bundle();
        assert_eq!(bundle.recherche.len(), 2);
        assert_eq!(bundle.recherche[1].id, Some(RecordId(2)));
        assert!(bundle.divers.is_empty());
        assert_eq!(bundle.settings.as_ref().unwrap().dog_name, "Rex");
        assert!(bundle.tirage.is_none());
    }

    #[test]
    fn test_legacy_wins_over_data() {
        let doc = parse(json!({"fiches": {}, "data": {"recherche": [{"id": 1}]}}));
        assert_eq!(doc.shape(), BackupShape::Legacy);
        assert!(doc.bundle().recherche.is_empty());
    }

    #[test]
    fn test_v1_ignores_draw_data() {
        let doc = parse(json!({
            "version": 1,
            "data": {
                "recherche": [],
                "divers": [{"id": 5, "poids": "31"}],
                "settings": {"nom_chien": "Uka", "onboarding_done": true},
                "tirage": {"participants": ["A", "B"]}
            }
        }));
        assert_eq!(doc.shape(), BackupShape::V1);
        assert!(doc.bundle().tirage.is_none());
        assert!(doc.bundle().settings.as_ref().unwrap().onboarding_done);
    }

    #[test]
    fn test_v2_with_draw_data() {
        let doc = parse(json!({
            "version": 2,
            "exportDate": "2024-06-01T10:00:00.000Z",
            "data": {
                "recherche": [],
                "obeissance": [],
                "divers": [],
                "settings": {},
                "tirage": {"id": "tirage", "participants": ["A", "B"], "stats": {
                    "A": {"positions": [1, 0], "total": 1},
                    "B": {"positions": [0, 1], "total": 1}
                }}
            }
        }));
        assert_eq!(doc.shape(), BackupShape::V2);
        let tirage = doc.bundle().tirage.as_ref().unwrap();
        assert_eq!(tirage.participants().len(), 2);
        assert_eq!(tirage.stats()["B"].positions, vec![0, 1]);
    }

    #[test]
    fn test_missing_version_is_v1() {
        let doc = parse(json!({"data": {"recherche": []}}));
        assert_eq!(doc.shape(), BackupShape::V1);
        let doc = parse(json!({"version": "2", "data": {}}));
        assert_eq!(doc.shape(), BackupShape::V2);
    }

    #[test]
    fn test_future_version_rejected() {
        let err = ImportDocument::from_value(json!({"version": 3, "data": {}})).unwrap_err();
        assert!(matches!(err, ValidationError::UnsupportedVersion(_)));
    }

    #[test]
    fn test_raw_shape() {
        let doc = parse(json!({
            "recherche": [{"id": 3, "bilan": "bien"}],
            "tirage": {"participants": ["A", "B"], "stats": {}}
        }));
        assert_eq!(doc.shape(), BackupShape::Raw);
        assert_eq!(doc.bundle().recherche.len(), 1);
        assert!(doc.bundle().settings.is_none());
        assert!(doc.bundle().tirage.is_some());
    }

    #[test]
    fn test_unrecognized_documents() {
        assert!(matches!(
            ImportDocument::from_value(json!({"hello": "world"})),
            Err(ValidationError::UnrecognizedShape)
        ));
        assert!(matches!(
            ImportDocument::from_value(json!({"fiches": null, "data": null})),
            Err(ValidationError::UnrecognizedShape)
        ));
        assert!(matches!(
            ImportDocument::from_value(json!([1, 2, 3])),
            Err(ValidationError::NotAnObject(_))
        ));
        assert!(matches!(
            ImportDocument::parse("{ not json"),
            Err(ValidationError::Parse(_))
        ));
    }

    #[test]
    fn test_bad_collections_rejected() {
        assert!(matches!(
            ImportDocument::from_value(json!({"fiches": {"recherche": {"id": 1}}})),
            Err(ValidationError::NotAnArray(label)) if label == "fiches.recherche"
        ));
        assert!(matches!(
            ImportDocument::from_value(json!({"recherche": ["text"]})),
            Err(ValidationError::NotAnObject(label)) if label == "recherche[0]"
        ));
        assert!(matches!(
            ImportDocument::from_value(json!({"recherche": [{"id": -4}]})),
            Err(ValidationError::InvalidRecordId { index: 0, .. })
        ));
        assert!(matches!(
            ImportDocument::from_value(json!({"recherche": [{"id": "7"}]})),
            Err(ValidationError::InvalidRecordId { .. })
        ));
        assert!(matches!(
            ImportDocument::from_value(json!({"divers": [{"id": 2}, {"id": 2}]})),
            Err(ValidationError::DuplicateRecordId { id: 2, .. })
        ));
    }

    #[test]
    fn test_bad_singletons_rejected() {
        assert!(matches!(
            ImportDocument::from_value(json!({"recherche": [], "settings": "Rex"})),
            Err(ValidationError::InvalidSettings(_))
        ));
        assert!(matches!(
            ImportDocument::from_value(json!({"recherche": [], "settings": {"substances": "TNT"}})),
            Err(ValidationError::InvalidSettings(_))
        ));
        assert!(matches!(
            ImportDocument::from_value(json!({
                "tirage": {"participants": ["A"], "stats": {"A": {"positions": [3], "total": 1}}}
            })),
            Err(ValidationError::InvalidDrawData(_))
        ));
    }

    #[test]
    fn test_settings_keep_unknown_keys() {
        let doc = parse(json!({"settings": {
            "id": 1,
            "nom_chien": "Rex",
            "theme": "sombre"
        }}));
        let settings = doc.bundle().settings.clone().unwrap();
        assert_eq!(settings.dog_name, "Rex");
        assert_eq!(settings.extra.get("theme"), Some(&json!("sombre")));
        assert!(!settings.extra.contains_key("id"));
    }

    #[test]
    fn test_non_string_timestamp_rejected() {
        assert!(matches!(
            ImportDocument::from_value(json!({"divers": [{"created_at": 1704067200000u64}]})),
            Err(ValidationError::InvalidTimestamp { index: 0, .. })
        ));
        assert!(matches!(
            ImportDocument::from_value(json!({"divers": [{"date": "x"}, {"createdAt": {"at": 1}}]})),
            Err(ValidationError::InvalidTimestamp { index: 1, .. })
        ));

        let doc = parse(json!({"divers": [
            {"created_at": null, "createdAt": "2023-03-01T00:00:00Z"},
            {"createdAt": null}
        ]}));
        let records = &doc.bundle().divers;
        assert_eq!(records[0].created_at.as_deref(), Some("2023-03-01T00:00:00Z"));
        assert_eq!(records[1].created_at, None);
    }

    #[test]
    fn test_overflowing_draw_counts_rejected() {
        let result = ImportDocument::parse(
            r#"{"tirage":{"participants":["A","B"],"stats":{"A":{"positions":[18446744073709551615,2],"total":1}}}}"#,
        );
        assert!(matches!(result, Err(ValidationError::InvalidDrawData(_))));
    }

    #[test]
    fn test_records_keep_ids_and_timestamps() {
        let doc = parse(json!({"recherche": [
            {"id": 10, "created_at": "2023-01-01T00:00:00.000Z", "date": "2023-01-01"},
            {"createdAt": "2023-02-01T00:00:00.000Z", "date": "2023-02-01"},
            {"id": 4.0}
        ]}));
        let records = &doc.bundle().recherche;
        assert_eq!(records[0].id, Some(RecordId(10)));
        assert_eq!(records[0].created_at.as_deref(), Some("2023-01-01T00:00:00.000Z"));
        assert_eq!(records[0].payload.len(), 1);
        assert_eq!(records[1].id, None);
        assert_eq!(records[1].created_at.as_deref(), Some("2023-02-01T00:00:00.000Z"));
        assert!(!records[1].payload.contains_key("createdAt"));
        assert_eq!(records[2].id, Some(RecordId(4)));
    }

    #[test]
    fn test_export_document_parses_back() {
        let mut payload = Map::new();
        payload.insert("date".into(), json!("2024-02-02"));
        let record = Record::new(RecordId(7), Some("2024-02-02T08:00:00Z".into()), payload);
        let export = ExportDocument::new(
            "2024-02-03T08:00:00Z",
            ExportData {
                recherche: vec![record.clone()],
                obeissance: vec![],
                divers: vec![],
                settings: Settings {
                    dog_name: "Rex".into(),
                    onboarding_done: true,
                    ..Settings::default()
                },
                tirage: DrawData::with_participants(["A", "B"]).unwrap(),
            },
        );

        let json = export.to_json(true).unwrap();
        let parsed = ImportDocument::parse(&json).unwrap();
        assert_eq!(parsed, ImportDocument::from(export));
        assert_eq!(parsed.bundle().recherche[0], ImportedRecord::from(record));
    }

    #[test]
    fn test_export_wire_layout() {
        let export = ExportDocument::new(
            "2024-01-01T00:00:00Z",
            ExportData {
                recherche: vec![],
                obeissance: vec![],
                divers: vec![],
                settings: Settings::default(),
                tirage: DrawData::default(),
            },
        );
        let value = serde_json::to_value(&export).unwrap();
        assert_eq!(value["version"], json!(2));
        assert_eq!(value["exportDate"], json!("2024-01-01T00:00:00Z"));
        assert_eq!(value["data"]["tirage"], json!({"participants": [], "stats": {}}));
        assert!(value["data"]["recherche"].is_array());
    }

    #[test]
    fn test_summary() {
        let doc = parse(json!({
            "fiches": {"recherche": [{"id": 1}, {"id": 2}], "divers": [{"id": 1}]},
            "settings": {"nom_chien": "  "}
        }));
        let summary = doc.summary();
        assert_eq!(summary.shape, BackupShape::Legacy);
        assert_eq!(summary.total(), 3);
        assert_eq!(summary.dog_name, None);
        assert!(summary.has_settings);
        assert!(!summary.has_draw_data);
    }
}
