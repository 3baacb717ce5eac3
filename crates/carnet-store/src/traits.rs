//! Store trait: the abstract interface for logbook persistence.
//!
//! This trait allows the logbook to be storage-agnostic. Implementations
//! include SQLite (primary) and in-memory (for tests).

use async_trait::async_trait;
use carnet_core::{Collection, DrawData, ImportedRecord, Payload, Record, RecordId, Settings};

use crate::error::Result;

/// Result of updating a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateResult {
    /// The stored payload was replaced.
    Updated,
    /// No record with that id exists in the collection.
    NotFound,
}

/// The Store trait: async interface for logbook persistence.
///
/// All methods are async to support both sync (SQLite) and async backends.
/// For SQLite, we use `spawn_blocking` internally to avoid blocking the runtime.
///
/// # Design Notes
///
/// - **Reserved keys**: `id` and `created_at` are owned by the store. They are
///   stripped from every payload handed to `add_record` / `update_record`.
/// - **Monotonic ids**: each collection has its own sequence. It never moves
///   backwards, not even after `clear_records`.
/// - **Insertion order**: `list_records` returns records in the order they were
///   written, not sorted by id.
/// - **Idempotent deletes**: deleting a missing record is not an error.
#[async_trait]
pub trait Store: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Record Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert a new record and return its freshly assigned id.
    ///
    /// `created_at` is stamped by the store.
    async fn add_record(&self, collection: Collection, payload: &Payload) -> Result<RecordId>;

    /// Get a record by id.
    async fn get_record(&self, collection: Collection, id: RecordId) -> Result<Option<Record>>;

    /// All records of a collection, in insertion order.
    async fn list_records(&self, collection: Collection) -> Result<Vec<Record>>;

    /// Replace the payload of an existing record.
    ///
    /// The id and `created_at` are preserved.
    async fn update_record(
        &self,
        collection: Collection,
        id: RecordId,
        payload: &Payload,
    ) -> Result<UpdateResult>;

    /// Delete a record. Returns whether it existed.
    async fn delete_record(&self, collection: Collection, id: RecordId) -> Result<bool>;

    /// Number of records in a collection.
    async fn count_records(&self, collection: Collection) -> Result<usize>;

    // ─────────────────────────────────────────────────────────────────────────
    // Bulk Operations (for backup restore)
    // ─────────────────────────────────────────────────────────────────────────

    /// Atomically replace every record of a collection.
    ///
    /// Records keep their id when they carry one; the others get fresh ids
    /// above every kept id. Either all records are written or the collection
    /// is left untouched. Returns the ids in input order.
    async fn replace_records(
        &self,
        collection: Collection,
        records: Vec<ImportedRecord>,
    ) -> Result<Vec<RecordId>>;

    /// Delete every record of a collection. The id sequence is kept.
    async fn clear_records(&self, collection: Collection) -> Result<()>;

    // ─────────────────────────────────────────────────────────────────────────
    // Singleton Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// The stored settings, if any were ever saved.
    async fn load_settings(&self) -> Result<Option<Settings>>;

    /// Overwrite the settings.
    async fn save_settings(&self, settings: &Settings) -> Result<()>;

    /// The stored draw roster and statistics, if any were ever saved.
    async fn load_draw_data(&self) -> Result<Option<DrawData>>;

    /// Overwrite the draw roster and statistics.
    async fn save_draw_data(&self, data: &DrawData) -> Result<()>;

    /// Remove both the settings and the draw data.
    async fn clear_singletons(&self) -> Result<()>;
}

/// Extension trait for common store patterns.
pub trait StoreExt: Store {
    /// The stored settings, or defaults when none were saved.
    fn settings_or_default(&self) -> impl std::future::Future<Output = Result<Settings>> + Send;

    /// The stored draw data, or an empty roster when none was saved.
    fn draw_data_or_default(&self) -> impl std::future::Future<Output = Result<DrawData>> + Send;

    /// Record counts for every collection, in [`Collection::ALL`] order.
    fn count_all(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<(Collection, usize)>>> + Send;
}

impl<S: Store + ?Sized> StoreExt for S {
    async fn settings_or_default(&self) -> Result<Settings> {
        Ok(self.load_settings().await?.unwrap_or_default())
    }

    async fn draw_data_or_default(&self) -> Result<DrawData> {
        Ok(self.load_draw_data().await?.unwrap_or_default())
    }

    async fn count_all(&self) -> Result<Vec<(Collection, usize)>> {
        let mut counts = Vec::with_capacity(Collection::ALL.len());
        for collection in Collection::ALL {
            counts.push((collection, self.count_records(collection).await?));
        }
        Ok(counts)
    }
}
