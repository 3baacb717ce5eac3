//! The settings singleton: dog name, reference lists and the onboarding flag.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::de::null_as_default;

/// Application settings, persisted as one document under a fixed key.
///
/// Field names on the wire match historical backups (`nom_chien`, `poseurs`,
/// `onboarding_done`); the camelCase spellings are accepted on read.
/// Missing or `null` fields read as their defaults. Keys this type does not
/// know are kept in [`Settings::extra`] and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name of the dog the logbook is about. May be empty.
    #[serde(rename = "nom_chien", alias = "dogName", deserialize_with = "null_as_default")]
    pub dog_name: String,

    /// Substances offered when filling a recherche sheet.
    #[serde(deserialize_with = "null_as_default")]
    pub substances: Vec<String>,

    /// Handlers (people laying the scent) offered on recherche sheets.
    #[serde(rename = "poseurs", alias = "handlers", deserialize_with = "null_as_default")]
    pub handlers: Vec<String>,

    /// Whether first-run setup has been completed.
    #[serde(alias = "onboardingDone", deserialize_with = "null_as_default")]
    pub onboarding_done: bool,

    /// Unrecognised keys, carried through save and export.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Settings {
    /// Whether the caller should send the user through first-run setup.
    ///
    /// True for the default returned when nothing was ever saved, false for
    /// settings saved after onboarding even if every field is blank.
    pub fn is_first_run(&self) -> bool {
        !self.onboarding_done
    }

    /// The dog name, or `fallback` when it is blank.
    pub fn dog_name_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.dog_name.trim().is_empty() {
            fallback
        } else {
            &self.dog_name
        }
    }

    /// Drop blank entries from the reference lists.
    pub fn cleaned(mut self) -> Self {
        self.substances.retain(|s| !s.trim().is_empty());
        self.handlers.retain(|h| !h.trim().is_empty());
        self
    }
}
