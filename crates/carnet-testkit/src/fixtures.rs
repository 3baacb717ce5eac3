//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use carnet::{Carnet, CarnetConfig, Collection, RecordId, Result};
use carnet_core::{Charge, DiversSheet, ObeissanceSheet, RechercheSheet, Settings, WeekHeader};
use carnet_store::MemoryStore;
use time::macros::date;
use time::Date;

/// Participants used by [`TestFixture::seeded`].
pub const SAMPLE_ROSTER: [&str; 3] = ["Alice", "Bob", "Carol"];

/// A logbook over an in-memory store.
pub struct TestFixture {
    pub carnet: Carnet<MemoryStore>,
}

impl TestFixture {
    /// An empty logbook with default configuration.
    pub fn new() -> Self {
        Self::with_config(CarnetConfig::default())
    }

    /// An empty logbook with custom configuration.
    pub fn with_config(config: CarnetConfig) -> Self {
        Self {
            carnet: Carnet::new(MemoryStore::new(), config),
        }
    }

    /// A logbook past onboarding, with one sheet per collection and a
    /// three-person roster that has been drawn once.
    pub async fn seeded() -> Result<Self> {
        let fixture = Self::new();
        let carnet = &fixture.carnet;

        carnet.save_settings(&sample_settings()).await?;
        carnet.add_sheet(&recherche_sheet("2024-04-03")).await?;
        carnet.add_sheet(&obeissance_sheet(date!(2024 - 04 - 01))).await?;
        carnet.add_sheet(&divers_sheet(date!(2024 - 04 - 01))).await?;

        for name in SAMPLE_ROSTER {
            carnet.add_participant(name).await?;
        }
        carnet.draw().await?;

        Ok(fixture)
    }

    /// Ids of every record in a collection, in insertion order.
    pub async fn ids(&self, collection: Collection) -> Result<Vec<RecordId>> {
        Ok(self
            .carnet
            .records(collection)
            .await?
            .into_iter()
            .map(|r| r.id)
            .collect())
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Settings as they look after a typical onboarding.
pub fn sample_settings() -> Settings {
    Settings {
        dog_name: "Rex".to_string(),
        substances: vec![
            "Cannabis".to_string(),
            "Cocaïne".to_string(),
            "Héroïne".to_string(),
        ],
        handlers: vec!["Paul".to_string(), "Marie".to_string()],
        onboarding_done: true,
        ..Settings::default()
    }
}

/// A morning building search with two charges.
pub fn recherche_sheet(date: &str) -> RechercheSheet {
    RechercheSheet {
        date: date.to_string(),
        plage_horaire: "Matin".to_string(),
        types_recherche: vec!["Bâtiment".to_string()],
        ordre_passage: "1".to_string(),
        poseur: "Paul".to_string(),
        temps_pose: "15 min".to_string(),
        description: "Entrepôt, deux niveaux".to_string(),
        bilan: "Marquage franc".to_string(),
        charges: vec![
            Charge {
                substance: "Cannabis".to_string(),
                quantite: "5g".to_string(),
                hauteur: "1m".to_string(),
                commentaire: String::new(),
            },
            Charge {
                substance: "Héroïne".to_string(),
                quantite: "2g".to_string(),
                hauteur: "sol".to_string(),
                commentaire: "Sous palette".to_string(),
            },
        ],
    }
}

/// An obedience week starting at the week containing `date`.
pub fn obeissance_sheet(date: Date) -> ObeissanceSheet {
    ObeissanceSheet {
        week: WeekHeader::for_date(date),
        seances: [
            "Rappel".to_string(),
            "Assis à distance".to_string(),
            String::new(),
            "Marche au pied".to_string(),
            String::new(),
        ],
    }
}

/// A follow-up week starting at the week containing `date`.
pub fn divers_sheet(date: Date) -> DiversSheet {
    DiversSheet {
        week: WeekHeader::for_date(date),
        poids: "31.5".to_string(),
        alimentation: "Croquettes 400g".to_string(),
        comportement: "Calme".to_string(),
        ..DiversSheet::default()
    }
}
