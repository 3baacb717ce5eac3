//! In-memory implementation of the Store trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use carnet_core::{
    now_rfc3339, Collection, DrawData, ImportedRecord, Payload, Record, RecordId, Settings,
};

use crate::error::{Result, StoreError};
use crate::sequence;
use crate::traits::{Store, UpdateResult};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    /// Records per collection.
    collections: HashMap<Collection, CollectionData>,

    settings: Option<Settings>,

    draw: Option<DrawData>,
}

struct CollectionData {
    /// Records in insertion order.
    records: Vec<Record>,

    /// Next id to hand out.
    next_id: RecordId,
}

impl Default for CollectionData {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            next_id: RecordId(1),
        }
    }
}

impl CollectionData {
    fn position(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner::default()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryStoreInner>> {
        self.inner
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryStoreInner>> {
        self.inner
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn add_record(&self, collection: Collection, payload: &Payload) -> Result<RecordId> {
        let mut inner = self.write()?;
        let data = inner.collections.entry(collection).or_default();

        let id = sequence::allocate(data.next_id)?;
        data.next_id = id.next();
        data.records
            .push(Record::new(id, Some(now_rfc3339()), payload.clone()));

        Ok(id)
    }

    async fn get_record(&self, collection: Collection, id: RecordId) -> Result<Option<Record>> {
        let inner = self.read()?;
        Ok(inner
            .collections
            .get(&collection)
            .and_then(|data| data.records.iter().find(|r| r.id == id))
            .cloned())
    }

    async fn list_records(&self, collection: Collection) -> Result<Vec<Record>> {
        let inner = self.read()?;
        Ok(inner
            .collections
            .get(&collection)
            .map(|data| data.records.clone())
            .unwrap_or_default())
    }

    async fn update_record(
        &self,
        collection: Collection,
        id: RecordId,
        payload: &Payload,
    ) -> Result<UpdateResult> {
        let mut inner = self.write()?;
        let Some(data) = inner.collections.get_mut(&collection) else {
            return Ok(UpdateResult::NotFound);
        };
        let Some(idx) = data.position(id) else {
            return Ok(UpdateResult::NotFound);
        };

        let created_at = data.records[idx].created_at.take();
        data.records[idx] = Record::new(id, created_at, payload.clone());

        Ok(UpdateResult::Updated)
    }

    async fn delete_record(&self, collection: Collection, id: RecordId) -> Result<bool> {
        let mut inner = self.write()?;
        let Some(data) = inner.collections.get_mut(&collection) else {
            return Ok(false);
        };

        match data.position(id) {
            Some(idx) => {
                data.records.remove(idx);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count_records(&self, collection: Collection) -> Result<usize> {
        let inner = self.read()?;
        Ok(inner
            .collections
            .get(&collection)
            .map_or(0, |data| data.records.len()))
    }

    async fn replace_records(
        &self,
        collection: Collection,
        records: Vec<ImportedRecord>,
    ) -> Result<Vec<RecordId>> {
        let mut inner = self.write()?;
        let data = inner.collections.entry(collection).or_default();

        // Plan before touching anything so a bad batch leaves the collection intact.
        let requested: Vec<_> = records.iter().map(|r| r.id).collect();
        let (ids, next_id) = sequence::plan_ids(data.next_id, &requested)?;

        data.records = records
            .into_iter()
            .zip(&ids)
            .map(|(record, &id)| Record::new(id, record.created_at, record.payload))
            .collect();
        data.next_id = next_id;

        Ok(ids)
    }

    async fn clear_records(&self, collection: Collection) -> Result<()> {
        let mut inner = self.write()?;
        if let Some(data) = inner.collections.get_mut(&collection) {
            data.records.clear();
        }
        Ok(())
    }

    async fn load_settings(&self) -> Result<Option<Settings>> {
        Ok(self.read()?.settings.clone())
    }

    async fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.write()?.settings = Some(settings.clone());
        Ok(())
    }

    async fn load_draw_data(&self) -> Result<Option<DrawData>> {
        Ok(self.read()?.draw.clone())
    }

    async fn save_draw_data(&self, data: &DrawData) -> Result<()> {
        self.write()?.draw = Some(data.clone());
        Ok(())
    }

    async fn clear_singletons(&self) -> Result<()> {
        let mut inner = self.write()?;
        inner.settings = None;
        inner.draw = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conformance;

    #[tokio::test]
    async fn test_record_lifecycle() {
        conformance::record_lifecycle(&MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn test_ids_never_reused() {
        conformance::ids_never_reused(&MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn test_ids_stop_at_max() {
        conformance::ids_stop_at_max(&MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn test_insertion_order() {
        conformance::insertion_order(&MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn test_replace_records() {
        conformance::replace_records(&MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn test_replace_rejects_bad_batch() {
        conformance::replace_rejects_bad_batch(&MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn test_singletons() {
        conformance::singletons(&MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn test_collections_are_independent() {
        conformance::collections_are_independent(&MemoryStore::new()).await;
    }
}
