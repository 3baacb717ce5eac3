//! The Carnet: unified API for the training logbook.
//!
//! The Carnet brings together record storage, the settings and draw
//! singletons, and backup import/export behind one interface for the UI.

use std::collections::BTreeMap;
use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info, warn};

use carnet_core::{
    now_rfc3339, Collection, DrawData, DrawOutcome, ExportData, ExportDocument, ImportDocument,
    ImportSummary, ParticipantStats, Payload, Record, RecordId, RechercheSheet, RosterChange,
    Settings, Sheet, DEFAULT_CHARGE_SLOTS,
};
use carnet_store::{Store, StoreError, StoreExt, UpdateResult};

use crate::error::{CarnetError, Result};

/// Configuration for the Carnet.
#[derive(Debug, Clone)]
pub struct CarnetConfig {
    /// Number of charge rows a recherche sheet is padded to when read.
    pub charge_slots: usize,
    /// Whether `export_json` pretty-prints.
    pub pretty_export: bool,
}

impl Default for CarnetConfig {
    fn default() -> Self {
        Self {
            charge_slots: DEFAULT_CHARGE_SLOTS,
            pretty_export: true,
        }
    }
}

/// The main Carnet struct.
///
/// Provides a unified API for:
/// - Adding, reading, updating and deleting record sheets
/// - Loading and saving settings
/// - Managing the draw roster and running draws
/// - Exporting, importing and resetting everything
pub struct Carnet<S: Store> {
    /// The storage backend.
    store: Arc<S>,
    /// Configuration.
    config: CarnetConfig,
}

impl<S: Store> Carnet<S> {
    /// Create a new logbook over `store`.
    pub fn new(store: S, config: CarnetConfig) -> Self {
        Self {
            store: Arc::new(store),
            config,
        }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get the configuration.
    pub fn config(&self) -> &CarnetConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Record Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Store a new record and return its id.
    ///
    /// `id` and `created_at` keys in the payload are ignored; the store
    /// assigns both.
    pub async fn add_record(&self, collection: Collection, payload: &Payload) -> Result<RecordId> {
        let id = self.store.add_record(collection, payload).await?;
        debug!(%collection, %id, "added record");
        Ok(id)
    }

    /// Get a record, or `None` if the id does not exist.
    pub async fn record(&self, collection: Collection, id: RecordId) -> Result<Option<Record>> {
        Ok(self.store.get_record(collection, id).await?)
    }

    /// Every record of a collection, in insertion order.
    pub async fn records(&self, collection: Collection) -> Result<Vec<Record>> {
        Ok(self.store.list_records(collection).await?)
    }

    /// Replace a record's payload, keeping its id and creation time.
    ///
    /// Fails with [`CarnetError::RecordNotFound`] if the id does not exist.
    pub async fn update_record(
        &self,
        collection: Collection,
        id: RecordId,
        payload: &Payload,
    ) -> Result<()> {
        match self.store.update_record(collection, id, payload).await? {
            UpdateResult::Updated => {
                debug!(%collection, %id, "updated record");
                Ok(())
            }
            UpdateResult::NotFound => Err(CarnetError::RecordNotFound { collection, id }),
        }
    }

    /// Delete a record.
    ///
    /// Deleting an id that does not exist succeeds.
    pub async fn delete_record(&self, collection: Collection, id: RecordId) -> Result<()> {
        if self.store.delete_record(collection, id).await? {
            debug!(%collection, %id, "deleted record");
        } else {
            debug!(%collection, %id, "delete of missing record ignored");
        }
        Ok(())
    }

    /// Every record of every collection, newest date first.
    ///
    /// Records are ordered by `date`, or `date_debut` for weekly sheets.
    /// Records without either come last; ties keep insertion order.
    pub async fn records_by_date(&self) -> Result<Vec<(Collection, Record)>> {
        let mut all = Vec::new();
        for collection in Collection::ALL {
            all.extend(
                self.store
                    .list_records(collection)
                    .await?
                    .into_iter()
                    .map(|r| (collection, r)),
            );
        }
        all.sort_by(|(_, a), (_, b)| b.date_key().cmp(&a.date_key()));
        Ok(all)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Typed Sheets
    // ─────────────────────────────────────────────────────────────────────────

    /// Store a typed sheet in its collection.
    pub async fn add_sheet<T: Sheet>(&self, sheet: &T) -> Result<RecordId> {
        self.add_record(T::COLLECTION, &sheet.to_payload()).await
    }

    /// Read a record through its typed view.
    pub async fn sheet<T: Sheet>(&self, id: RecordId) -> Result<Option<T>> {
        Ok(self
            .record(T::COLLECTION, id)
            .await?
            .map(|r| T::from_payload(&r.payload)))
    }

    /// Read a recherche sheet with its charge table padded for editing.
    pub async fn recherche_sheet(&self, id: RecordId) -> Result<Option<RechercheSheet>> {
        Ok(self
            .sheet::<RechercheSheet>(id)
            .await?
            .map(|s| s.padded(self.config.charge_slots)))
    }

    /// Overwrite a record with a typed sheet.
    pub async fn update_sheet<T: Sheet>(&self, id: RecordId, sheet: &T) -> Result<()> {
        self.update_record(T::COLLECTION, id, &sheet.to_payload())
            .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Settings
    // ─────────────────────────────────────────────────────────────────────────

    /// The saved settings, or the first-run defaults.
    pub async fn settings(&self) -> Result<Settings> {
        Ok(self.store.settings_or_default().await?)
    }

    /// Overwrite the settings wholesale.
    pub async fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.store.save_settings(settings).await?;
        debug!(dog = %settings.dog_name, "saved settings");
        Ok(())
    }

    /// Whether first-run setup was completed.
    pub async fn is_onboarding_done(&self) -> Result<bool> {
        Ok(self.settings().await?.onboarding_done)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Draw Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// The roster and its statistics. Empty when never saved.
    pub async fn draw_data(&self) -> Result<DrawData> {
        Ok(self.store.draw_data_or_default().await?)
    }

    /// Overwrite the roster and statistics.
    ///
    /// Rejected if the roster has duplicate names or the statistics do not
    /// add up.
    pub async fn save_draw_data(&self, data: &DrawData) -> Result<()> {
        data.validate()?;
        self.store.save_draw_data(data).await?;
        Ok(())
    }

    /// Add a participant. Clears the statistics.
    pub async fn add_participant(&self, name: &str) -> Result<DrawData> {
        self.change_roster(RosterChange::Add(name.to_string())).await
    }

    /// Remove a participant. Clears the statistics.
    pub async fn remove_participant(&self, name: &str) -> Result<DrawData> {
        self.change_roster(RosterChange::Remove(name.to_string()))
            .await
    }

    /// Empty the roster. Clears the statistics.
    pub async fn clear_participants(&self) -> Result<DrawData> {
        self.change_roster(RosterChange::Clear).await
    }

    /// Clear the statistics, keeping the roster.
    pub async fn reset_draw_stats(&self) -> Result<DrawData> {
        let mut data = self.draw_data().await?;
        data.reset_stats();
        self.store.save_draw_data(&data).await?;
        debug!("reset draw statistics");
        Ok(data)
    }

    /// Shuffle the roster with the thread RNG and record the result.
    pub async fn draw(&self) -> Result<DrawOutcome> {
        let mut data = self.draw_data().await?;
        let order = data.draw(&mut rand::thread_rng())?;
        self.finish_draw(data, order).await
    }

    /// Shuffle the roster with `rng` and record the result.
    pub async fn draw_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<DrawOutcome> {
        let mut data = self.draw_data().await?;
        let order = data.draw(rng)?;
        self.finish_draw(data, order).await
    }

    /// Fold an externally produced order into the statistics.
    pub async fn record_draw_result(
        &self,
        order: &[String],
    ) -> Result<BTreeMap<String, ParticipantStats>> {
        let mut data = self.draw_data().await?;
        let stats = data.record_result(order).clone();
        self.store.save_draw_data(&data).await?;
        Ok(stats)
    }

    async fn change_roster(&self, change: RosterChange) -> Result<DrawData> {
        let mut data = self.draw_data().await?;
        let changed = data.change_roster(change.clone())?;
        self.store.save_draw_data(&data).await?;
        debug!(?change, changed, "roster changed, statistics cleared");
        Ok(data)
    }

    async fn finish_draw(&self, data: DrawData, order: Vec<String>) -> Result<DrawOutcome> {
        self.store.save_draw_data(&data).await?;
        debug!(participants = order.len(), "recorded draw");
        Ok(DrawOutcome {
            order,
            stats: data.stats().clone(),
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Backup Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Snapshot every collection, the settings and the draw data.
    pub async fn export_all(&self) -> Result<ExportDocument> {
        let data = ExportData {
            recherche: self.store.list_records(Collection::Recherche).await?,
            obeissance: self.store.list_records(Collection::Obeissance).await?,
            divers: self.store.list_records(Collection::Divers).await?,
            settings: self.settings().await?,
            tirage: self.draw_data().await?,
        };
        let doc = ExportDocument::new(now_rfc3339(), data);

        info!(
            recherche = doc.data.recherche.len(),
            obeissance = doc.data.obeissance.len(),
            divers = doc.data.divers.len(),
            "exported logbook"
        );
        Ok(doc)
    }

    /// [`export_all`](Self::export_all), serialized.
    pub async fn export_json(&self) -> Result<String> {
        let doc = self.export_all().await?;
        doc.to_json(self.config.pretty_export)
            .map_err(|e| CarnetError::Store(StoreError::from(e)))
    }

    /// Parse a backup and describe what importing it would do.
    ///
    /// Nothing is written.
    pub fn preview_import(&self, json: &str) -> Result<ImportSummary> {
        Ok(ImportDocument::parse(json)?.summary())
    }

    /// Parse a backup and restore it.
    ///
    /// A document that cannot be parsed or matches no known shape is
    /// rejected before anything is written.
    pub async fn import_json(&self, json: &str) -> Result<ImportSummary> {
        let doc = ImportDocument::parse(json)?;
        self.import_document(doc).await
    }

    /// Restore an already parsed backup.
    ///
    /// Each collection is replaced in its own transaction, then settings and
    /// draw data are overwritten if the document carries them. A storage
    /// failure part way leaves the earlier steps applied.
    pub async fn import_document(&self, doc: ImportDocument) -> Result<ImportSummary> {
        let summary = doc.summary();
        let mut bundle = doc.into_bundle();
        let mut applied: Vec<&'static str> = Vec::new();

        let result = async {
            for collection in Collection::ALL {
                let records = bundle.take_records(collection);
                self.store.replace_records(collection, records).await?;
                applied.push(collection.as_str());
            }
            if let Some(settings) = bundle.settings.take() {
                self.store.save_settings(&settings).await?;
                applied.push("settings");
            }
            if let Some(tirage) = bundle.tirage.take() {
                self.store.save_draw_data(&tirage).await?;
                applied.push("tirage");
            }
            Ok::<(), CarnetError>(())
        }
        .await;

        if let Err(e) = result {
            if !applied.is_empty() {
                warn!(?applied, error = %e, "import failed part way, earlier steps kept");
            }
            return Err(e);
        }

        info!(
            shape = %summary.shape,
            records = summary.total(),
            settings = summary.has_settings,
            draw_data = summary.has_draw_data,
            "imported backup"
        );
        Ok(summary)
    }

    /// Delete every record, the settings and the draw data.
    pub async fn reset_all(&self) -> Result<()> {
        for collection in Collection::ALL {
            self.store.clear_records(collection).await?;
        }
        self.store.clear_singletons().await?;
        info!("reset logbook");
        Ok(())
    }
}
