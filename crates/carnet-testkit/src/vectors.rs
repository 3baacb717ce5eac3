//! Golden backup documents.
//!
//! One document per accepted import shape, written the way each generation
//! of the application wrote them, with the summary an import must report.

use carnet_core::BackupShape;

/// A golden backup document.
#[derive(Debug, Clone)]
pub struct BackupVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// The document as found on disk.
    pub json: &'static str,
    /// Shape the document must be detected as.
    pub shape: BackupShape,
    /// Expected record counts: recherche, obeissance, divers.
    pub counts: [usize; 3],
    /// Expected dog name, when the document carries a non-blank one.
    pub dog_name: Option<&'static str>,
    pub has_settings: bool,
    pub has_draw_data: bool,
}

/// Get all golden backup documents.
pub fn all_vectors() -> Vec<BackupVector> {
    vec![
        BackupVector {
            name: "legacy fiches export",
            json: r#"{
                "version": "1.0",
                "date_export": "2023-06-01T08:00:00.000Z",
                "fiches": {
                    "recherche": [
                        {"id": 1, "date": "2023-05-02", "type_recherche": "Bâtiment",
                         "charges": [{"substance": "Cannabis", "quantite": "5g"}],
                         "createdAt": "2023-05-02T09:12:00.000Z"},
                        {"id": 3, "date": "2023-05-09", "type_recherche": "Véhicule"}
                    ],
                    "obeissance": [
                        {"id": 1, "semaine_numero": 18, "date_debut": "2023-05-01",
                         "date_fin": "2023-05-07", "observations": "Rappel correct"}
                    ],
                    "divers": []
                },
                "settings": {"nom_chien": "Rex", "substances": ["Cannabis"], "poseurs": ["Paul"]}
            }"#,
            shape: BackupShape::Legacy,
            counts: [2, 1, 0],
            dog_name: Some("Rex"),
            has_settings: true,
            has_draw_data: false,
        },
        BackupVector {
            name: "version 1 data export",
            json: r#"{
                "version": 1,
                "exportDate": "2024-01-10T18:30:00.000Z",
                "data": {
                    "recherche": [],
                    "obeissance": [],
                    "divers": [
                        {"id": 7, "semaine_numero": "2", "date_debut": "2024-01-08",
                         "date_fin": "2024-01-14", "poids": "30.2",
                         "points_attention": "Boite légèrement"}
                    ],
                    "settings": {"nom_chien": "", "substances": [], "poseurs": [],
                                 "onboarding_done": true}
                }
            }"#,
            shape: BackupShape::V1,
            counts: [0, 0, 1],
            dog_name: None,
            has_settings: true,
            has_draw_data: false,
        },
        BackupVector {
            name: "version 2 export with draw data",
            json: r#"{
                "version": 2,
                "exportDate": "2024-09-21T07:45:00.000Z",
                "data": {
                    "recherche": [
                        {"id": 12, "date": "2024-09-20", "types_recherche": ["Bagages"],
                         "created_at": "2024-09-20T16:00:00.000Z"}
                    ],
                    "obeissance": [],
                    "divers": [],
                    "settings": {"nom_chien": "Ulk", "substances": ["Héroïne"], "poseurs": [],
                                 "onboarding_done": true},
                    "tirage": {
                        "participants": ["Alice", "Bob"],
                        "stats": {
                            "Alice": {"positions": [3, 1], "total": 4},
                            "Bob": {"positions": [1, 3], "total": 4}
                        }
                    }
                }
            }"#,
            shape: BackupShape::V2,
            counts: [1, 0, 0],
            dog_name: Some("Ulk"),
            has_settings: true,
            has_draw_data: true,
        },
        BackupVector {
            name: "raw store dump",
            json: r#"{
                "recherche": [{"date": "2022-11-03"}, {"date": "2022-11-10"}],
                "divers": null,
                "tirage": {"participants": ["Zoé", "Yann", "Luc"], "stats": {}}
            }"#,
            shape: BackupShape::Raw,
            counts: [2, 0, 0],
            dog_name: None,
            has_settings: false,
            has_draw_data: true,
        },
    ]
}

/// Documents every import must reject, with a short reason.
pub fn invalid_vectors() -> Vec<(&'static str, &'static str)> {
    vec![
        ("not json", "{ fiches: "),
        ("top level array", "[]"),
        ("no known key", r#"{"notes": []}"#),
        ("future version", r#"{"version": 3, "data": {}}"#),
        ("collection not a list", r#"{"data": {"divers": {}}}"#),
        ("record not an object", r#"{"fiches": {"recherche": [42]}}"#),
        ("fractional id", r#"{"recherche": [{"id": 1.5}]}"#),
        ("duplicate id", r#"{"divers": [{"id": 2}, {"id": 2}]}"#),
        ("settings not an object", r#"{"settings": "Rex"}"#),
        (
            "stats out of balance",
            r#"{"tirage": {"participants": ["A", "B"], "stats": {"A": {"positions": [1, 1], "total": 1}}}}"#,
        ),
        (
            "stats overflow",
            r#"{"tirage": {"participants": ["A", "B"], "stats": {"A": {"positions": [18446744073709551615, 2], "total": 1}}}}"#,
        ),
        ("epoch timestamp", r#"{"recherche": [{"id": 1, "created_at": 1704067200000}]}"#),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use carnet::store::{MemoryStore, SqliteStore};
    use carnet::{Carnet, CarnetConfig, CarnetError, Collection};
    use carnet_core::{DiversSheet, ImportDocument, ObeissanceSheet, RechercheSheet, RecordId};

    #[test]
    fn test_vectors_parse_with_expected_summary() {
        for vector in all_vectors() {
            let summary = ImportDocument::parse(vector.json)
                .unwrap_or_else(|e| panic!("{}: {e}", vector.name))
                .summary();

            assert_eq!(summary.shape, vector.shape, "{}", vector.name);
            assert_eq!(
                [summary.recherche, summary.obeissance, summary.divers],
                vector.counts,
                "{}",
                vector.name
            );
            assert_eq!(summary.dog_name.as_deref(), vector.dog_name, "{}", vector.name);
            assert_eq!(summary.has_settings, vector.has_settings, "{}", vector.name);
            assert_eq!(summary.has_draw_data, vector.has_draw_data, "{}", vector.name);
        }
    }

    #[test]
    fn test_invalid_vectors_rejected() {
        for (reason, json) in invalid_vectors() {
            assert!(ImportDocument::parse(json).is_err(), "accepted: {reason}");
        }
    }

    #[tokio::test]
    async fn test_vectors_import_into_sqlite() {
        let dir = tempfile::tempdir().unwrap();

        for (i, vector) in all_vectors().into_iter().enumerate() {
            let path = dir.path().join(format!("vector-{i}.db"));
            let carnet = Carnet::new(SqliteStore::open(&path).unwrap(), CarnetConfig::default());

            let summary = carnet.import_json(vector.json).await.unwrap();
            assert_eq!(summary.shape, vector.shape);

            for (collection, expected) in Collection::ALL.into_iter().zip(vector.counts) {
                let records = carnet.records(collection).await.unwrap();
                assert_eq!(records.len(), expected, "{} {collection}", vector.name);
            }
        }
    }

    #[tokio::test]
    async fn test_invalid_vectors_leave_store_untouched() {
        let carnet = Carnet::new(MemoryStore::new(), CarnetConfig::default());
        let v2 = &all_vectors()[2];
        carnet.import_json(v2.json).await.unwrap();
        let before = carnet.export_all().await.unwrap().data;

        for (reason, json) in invalid_vectors() {
            let err = carnet.import_json(json).await.unwrap_err();
            assert!(matches!(err, CarnetError::Validation(_)), "{reason}: {err}");
        }

        assert_eq!(carnet.export_all().await.unwrap().data, before);
    }

    #[tokio::test]
    async fn test_legacy_fields_resolved_after_import() {
        let carnet = Carnet::new(MemoryStore::new(), CarnetConfig::default());
        for vector in all_vectors() {
            carnet.import_json(vector.json).await.unwrap();
            match vector.shape {
                BackupShape::Legacy => {
                    let records = carnet.records(Collection::Recherche).await.unwrap();
                    let sheet: RechercheSheet = carnet.sheet(records[0].id).await.unwrap().unwrap();
                    assert_eq!(sheet.types_recherche, vec!["Bâtiment"]);
                    assert_eq!(sheet.charges[0].substance, "Cannabis");

                    assert_eq!(
                        records[0].created_at.as_deref(),
                        Some("2023-05-02T09:12:00.000Z")
                    );

                    let ob: ObeissanceSheet = carnet.sheet(RecordId(1)).await.unwrap().unwrap();
                    assert_eq!(ob.seances[0], "Rappel correct");
                    assert_eq!(ob.week.semaine_numero, "18");
                }
                BackupShape::V1 => {
                    let sheet: DiversSheet = carnet.sheet(RecordId(7)).await.unwrap().unwrap();
                    assert_eq!(sheet.observations_generales, "Boite légèrement");
                    assert_eq!(sheet.poids, "30.2");
                }
                _ => {}
            }
        }
    }
}
