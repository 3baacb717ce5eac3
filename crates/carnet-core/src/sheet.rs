//! Typed views over record payloads.
//!
//! Sheets have evolved: some fields were renamed or widened over time. The
//! old spellings are resolved here, once, when a payload is read:
//!
//! | sheet       | current field            | older field        |
//! |-------------|--------------------------|--------------------|
//! | recherche   | `types_recherche` (list) | `type_recherche`   |
//! | obeissance  | `seance1`                | `observations`     |
//! | divers      | `observations_generales` | `points_attention` |
//!
//! Writing a sheet back always uses the current names.

use serde_json::Value;
use time::Date;

use crate::types::{value_text, Collection, Payload};
use crate::week::{format_iso, WeekSpan};

/// Number of charge rows on a printed recherche sheet.
pub const DEFAULT_CHARGE_SLOTS: usize = 10;

/// A typed view of one kind of record.
pub trait Sheet: Sized {
    /// The collection this sheet is stored in.
    const COLLECTION: Collection;

    /// Read a payload, resolving legacy field names.
    fn from_payload(payload: &Payload) -> Self;

    /// Write the sheet using current field names.
    fn to_payload(&self) -> Payload;
}

// ─────────────────────────────────────────────────────────────────────────────
// Recherche
// ─────────────────────────────────────────────────────────────────────────────

/// One hidden sample on a recherche sheet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Charge {
    pub substance: String,
    pub quantite: String,
    pub hauteur: String,
    pub commentaire: String,
}

impl Charge {
    /// A row without substance counts as unused.
    pub fn is_empty(&self) -> bool {
        self.substance.trim().is_empty()
    }

    fn from_value(value: &Value) -> Self {
        let Value::Object(fields) = value else {
            return Self::default();
        };
        Self {
            substance: text(fields, "substance"),
            quantite: text(fields, "quantite"),
            hauteur: text(fields, "hauteur"),
            commentaire: text(fields, "commentaire"),
        }
    }

    fn to_value(&self) -> Value {
        let mut fields = Payload::new();
        fields.insert("substance".into(), self.substance.clone().into());
        fields.insert("quantite".into(), self.quantite.clone().into());
        fields.insert("hauteur".into(), self.hauteur.clone().into());
        fields.insert("commentaire".into(), self.commentaire.clone().into());
        Value::Object(fields)
    }
}

/// A detection training session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RechercheSheet {
    pub date: String,
    /// Matin, Après-midi or Soir.
    pub plage_horaire: String,
    pub types_recherche: Vec<String>,
    pub ordre_passage: String,
    pub poseur: String,
    pub temps_pose: String,
    pub description: String,
    pub bilan: String,
    pub charges: Vec<Charge>,
}

impl RechercheSheet {
    /// Pad the charge table with empty rows up to `slots`.
    pub fn padded(mut self, slots: usize) -> Self {
        if self.charges.len() < slots {
            self.charges.resize_with(slots, Charge::default);
        }
        self
    }

    /// Charges that actually hold a substance.
    pub fn used_charges(&self) -> impl Iterator<Item = &Charge> {
        self.charges.iter().filter(|c| !c.is_empty())
    }
}

impl Sheet for RechercheSheet {
    const COLLECTION: Collection = Collection::Recherche;

    fn from_payload(payload: &Payload) -> Self {
        let types_recherche = match payload.get("types_recherche") {
            Some(Value::Array(items)) => items.iter().filter_map(value_text).collect(),
            _ => {
                let single = text(payload, "type_recherche");
                if single.is_empty() {
                    Vec::new()
                } else {
                    vec![single]
                }
            }
        };
        let charges = match payload.get("charges") {
            Some(Value::Array(items)) => items.iter().map(Charge::from_value).collect(),
            _ => Vec::new(),
        };

        Self {
            date: text(payload, "date"),
            plage_horaire: text(payload, "plage_horaire"),
            types_recherche,
            ordre_passage: text(payload, "ordre_passage"),
            poseur: text(payload, "poseur"),
            temps_pose: text(payload, "temps_pose"),
            description: text(payload, "description"),
            bilan: text(payload, "bilan"),
            charges,
        }
    }

    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        payload.insert("date".into(), self.date.clone().into());
        payload.insert("plage_horaire".into(), self.plage_horaire.clone().into());
        payload.insert(
            "types_recherche".into(),
            Value::Array(self.types_recherche.iter().cloned().map(Value::from).collect()),
        );
        payload.insert("ordre_passage".into(), self.ordre_passage.clone().into());
        payload.insert("poseur".into(), self.poseur.clone().into());
        payload.insert("temps_pose".into(), self.temps_pose.clone().into());
        payload.insert("description".into(), self.description.clone().into());
        payload.insert("bilan".into(), self.bilan.clone().into());
        payload.insert(
            "charges".into(),
            Value::Array(self.used_charges().map(Charge::to_value).collect()),
        );
        payload
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Weekly sheets
// ─────────────────────────────────────────────────────────────────────────────

/// Week number and bounds shared by the weekly sheets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WeekHeader {
    pub semaine_numero: String,
    pub date_debut: String,
    pub date_fin: String,
}

impl WeekHeader {
    /// Header for the week containing `date`.
    pub fn for_date(date: Date) -> Self {
        let span = WeekSpan::containing(date);
        Self {
            semaine_numero: span.number.to_string(),
            date_debut: format_iso(span.start),
            date_fin: format_iso(span.end),
        }
    }

    /// A weekly sheet without number or bounds cannot be displayed.
    pub fn is_complete(&self) -> bool {
        !self.semaine_numero.is_empty() && !self.date_debut.is_empty() && !self.date_fin.is_empty()
    }

    fn read(payload: &Payload) -> Self {
        Self {
            semaine_numero: text(payload, "semaine_numero"),
            date_debut: text(payload, "date_debut"),
            date_fin: text(payload, "date_fin"),
        }
    }

    fn write(&self, payload: &mut Payload) {
        payload.insert("semaine_numero".into(), self.semaine_numero.clone().into());
        payload.insert("date_debut".into(), self.date_debut.clone().into());
        payload.insert("date_fin".into(), self.date_fin.clone().into());
    }
}

/// A week of obedience work, one note per session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObeissanceSheet {
    pub week: WeekHeader,
    pub seances: [String; 5],
}

impl Sheet for ObeissanceSheet {
    const COLLECTION: Collection = Collection::Obeissance;

    fn from_payload(payload: &Payload) -> Self {
        Self {
            week: WeekHeader::read(payload),
            seances: [
                text_or_legacy(payload, "seance1", "observations"),
                text(payload, "seance2"),
                text(payload, "seance3"),
                text(payload, "seance4"),
                text(payload, "seance5"),
            ],
        }
    }

    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        self.week.write(&mut payload);
        for (i, seance) in self.seances.iter().enumerate() {
            payload.insert(format!("seance{}", i + 1), seance.clone().into());
        }
        payload
    }
}

/// A week of general follow-up.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiversSheet {
    pub week: WeekHeader,
    pub poids: String,
    pub toilettage: String,
    pub alimentation: String,
    pub suivi_veterinaire: String,
    pub activites_physiques: String,
    pub comportement: String,
    pub observations_generales: String,
}

impl Sheet for DiversSheet {
    const COLLECTION: Collection = Collection::Divers;

    fn from_payload(payload: &Payload) -> Self {
        Self {
            week: WeekHeader::read(payload),
            poids: text(payload, "poids"),
            toilettage: text(payload, "toilettage"),
            alimentation: text(payload, "alimentation"),
            suivi_veterinaire: text(payload, "suivi_veterinaire"),
            activites_physiques: text(payload, "activites_physiques"),
            comportement: text(payload, "comportement"),
            observations_generales: text_or_legacy(
                payload,
                "observations_generales",
                "points_attention",
            ),
        }
    }

    fn to_payload(&self) -> Payload {
        let mut payload = Payload::new();
        self.week.write(&mut payload);
        payload.insert("poids".into(), self.poids.clone().into());
        payload.insert("toilettage".into(), self.toilettage.clone().into());
        payload.insert("alimentation".into(), self.alimentation.clone().into());
        payload.insert("suivi_veterinaire".into(), self.suivi_veterinaire.clone().into());
        payload.insert("activites_physiques".into(), self.activites_physiques.clone().into());
        payload.insert("comportement".into(), self.comportement.clone().into());
        payload.insert(
            "observations_generales".into(),
            self.observations_generales.clone().into(),
        );
        payload
    }
}

fn text(payload: &Payload, key: &str) -> String {
    payload.get(key).and_then(value_text).unwrap_or_default()
}

/// `key`, or `legacy` when `key` is missing or empty.
fn text_or_legacy(payload: &Payload, key: &str, legacy: &str) -> String {
    let current = text(payload, key);
    if current.is_empty() {
        text(payload, legacy)
    } else {
        current
    }
}
