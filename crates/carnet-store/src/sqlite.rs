//! SQLite implementation of the Store trait.
//!
//! This is the primary storage backend for the logbook. It uses rusqlite
//! with bundled SQLite, wrapped in async via `tokio::task::spawn_blocking`.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use serde::de::DeserializeOwned;
use serde::Serialize;

use carnet_core::{
    now_rfc3339, Collection, DrawData, ImportedRecord, Payload, Record, RecordId, Settings,
};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::sequence;
use crate::traits::{Store, UpdateResult};

/// Fixed key of the settings document.
const SETTINGS_KEY: &str = "settings";

/// Fixed key of the draw roster document.
const DRAW_KEY: &str = "tirage";

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file (and missing parent directories) and runs
    /// migrations if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
        migration::migrate(&mut conn)?;

        tracing::info!(path = %path.display(), "opened logbook database");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool.
    async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let mut conn = conn
                .lock()
                .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
            f(&mut conn)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }

    async fn load_singleton<T>(&self, key: &'static str) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.run(move |conn| {
            let value: Option<String> = conn
                .query_row(
                    "SELECT value FROM singletons WHERE key = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()?;

            value
                .map(|v| serde_json::from_str(&v).map_err(StoreError::from))
                .transpose()
        })
        .await
    }

    async fn save_singleton<T: Serialize>(&self, key: &'static str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;

        self.run(move |conn| {
            conn.execute(
                "INSERT INTO singletons (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, json, migration::now_millis()],
            )?;
            Ok(())
        })
        .await
    }
}

// Helper to convert a row to Record
fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<Record> {
    let id: i64 = row.get("id")?;
    let created_at: Option<String> = row.get("created_at")?;
    let payload_json: String = row.get("payload")?;

    let payload: Payload = serde_json::from_str(&payload_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;
    let id = u64::try_from(id)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Integer, Box::new(e)))?;

    Ok(Record::new(RecordId(id), created_at, payload))
}

fn payload_json(payload: &Payload) -> Result<String> {
    let mut payload = payload.clone();
    carnet_core::types::strip_reserved(&mut payload);
    Ok(serde_json::to_string(&payload)?)
}

fn sql_id(id: RecordId) -> Result<i64> {
    i64::try_from(id.get()).map_err(|_| StoreError::InvalidData(format!("record id {id} out of range")))
}

fn row_count(collection: Collection, count: i64) -> Result<usize> {
    usize::try_from(count)
        .map_err(|_| StoreError::InvalidData(format!("corrupt record count {count} for {collection}")))
}

fn next_id(tx: &Transaction<'_>, collection: Collection) -> Result<RecordId> {
    let next: Option<i64> = tx
        .query_row(
            "SELECT next_id FROM record_sequences WHERE collection = ?1",
            params![collection.as_str()],
            |row| row.get(0),
        )
        .optional()?;

    match next {
        Some(n) => u64::try_from(n)
            .map(RecordId)
            .map_err(|_| StoreError::InvalidData(format!("corrupt sequence for {collection}"))),
        None => Ok(RecordId(1)),
    }
}

fn set_next_id(tx: &Transaction<'_>, collection: Collection, next: RecordId) -> Result<()> {
    tx.execute(
        "INSERT INTO record_sequences (collection, next_id) VALUES (?1, ?2)
         ON CONFLICT(collection) DO UPDATE SET next_id = excluded.next_id",
        params![collection.as_str(), sql_id(next)?],
    )?;
    Ok(())
}

#[async_trait]
impl Store for SqliteStore {
    async fn add_record(&self, collection: Collection, payload: &Payload) -> Result<RecordId> {
        let json = payload_json(payload)?;
        let created_at = now_rfc3339();

        self.run(move |conn| {
            let tx = conn.transaction()?;
            let id = sequence::allocate(next_id(&tx, collection)?)?;

            tx.execute(
                "INSERT INTO records (collection, id, created_at, payload) VALUES (?1, ?2, ?3, ?4)",
                params![collection.as_str(), sql_id(id)?, created_at, json],
            )?;
            set_next_id(&tx, collection, id.next())?;

            tx.commit()?;
            Ok(id)
        })
        .await
    }

    async fn get_record(&self, collection: Collection, id: RecordId) -> Result<Option<Record>> {
        let id = sql_id(id)?;

        self.run(move |conn| {
            conn.query_row(
                "SELECT id, created_at, payload FROM records WHERE collection = ?1 AND id = ?2",
                params![collection.as_str(), id],
                row_to_record,
            )
            .optional()
            .map_err(StoreError::from)
        })
        .await
    }

    async fn list_records(&self, collection: Collection) -> Result<Vec<Record>> {
        self.run(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, created_at, payload FROM records WHERE collection = ?1 ORDER BY rowid",
            )?;
            let records = stmt
                .query_map(params![collection.as_str()], row_to_record)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(records)
        })
        .await
    }

    async fn update_record(
        &self,
        collection: Collection,
        id: RecordId,
        payload: &Payload,
    ) -> Result<UpdateResult> {
        let id = sql_id(id)?;
        let json = payload_json(payload)?;

        self.run(move |conn| {
            let changed = conn.execute(
                "UPDATE records SET payload = ?3 WHERE collection = ?1 AND id = ?2",
                params![collection.as_str(), id, json],
            )?;

            Ok(if changed == 0 {
                UpdateResult::NotFound
            } else {
                UpdateResult::Updated
            })
        })
        .await
    }

    async fn delete_record(&self, collection: Collection, id: RecordId) -> Result<bool> {
        let id = sql_id(id)?;

        self.run(move |conn| {
            let changed = conn.execute(
                "DELETE FROM records WHERE collection = ?1 AND id = ?2",
                params![collection.as_str(), id],
            )?;
            Ok(changed > 0)
        })
        .await
    }

    async fn count_records(&self, collection: Collection) -> Result<usize> {
        self.run(move |conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM records WHERE collection = ?1",
                params![collection.as_str()],
                |row| row.get(0),
            )?;
            row_count(collection, count)
        })
        .await
    }

    async fn replace_records(
        &self,
        collection: Collection,
        records: Vec<ImportedRecord>,
    ) -> Result<Vec<RecordId>> {
        let rows = records
            .into_iter()
            .map(|r| Ok((r.id, r.created_at, payload_json(&r.payload)?)))
            .collect::<Result<Vec<_>>>()?;

        self.run(move |conn| {
            let tx = conn.transaction()?;

            let requested: Vec<_> = rows.iter().map(|(id, _, _)| *id).collect();
            let (ids, next) = sequence::plan_ids(next_id(&tx, collection)?, &requested)?;

            tx.execute(
                "DELETE FROM records WHERE collection = ?1",
                params![collection.as_str()],
            )?;
            {
                let mut insert = tx.prepare(
                    "INSERT INTO records (collection, id, created_at, payload) VALUES (?1, ?2, ?3, ?4)",
                )?;
                for ((_, created_at, json), id) in rows.iter().zip(&ids) {
                    insert.execute(params![collection.as_str(), sql_id(*id)?, created_at, json])?;
                }
            }
            set_next_id(&tx, collection, next)?;

            // Dropping the transaction on any early return above rolls back.
            tx.commit()?;
            Ok(ids)
        })
        .await
    }

    async fn clear_records(&self, collection: Collection) -> Result<()> {
        self.run(move |conn| {
            conn.execute(
                "DELETE FROM records WHERE collection = ?1",
                params![collection.as_str()],
            )?;
            Ok(())
        })
        .await
    }

    async fn load_settings(&self) -> Result<Option<Settings>> {
        self.load_singleton(SETTINGS_KEY).await
    }

    async fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.save_singleton(SETTINGS_KEY, settings).await
    }

    async fn load_draw_data(&self) -> Result<Option<DrawData>> {
        self.load_singleton(DRAW_KEY).await
    }

    async fn save_draw_data(&self, data: &DrawData) -> Result<()> {
        self.save_singleton(DRAW_KEY, data).await
    }

    async fn clear_singletons(&self) -> Result<()> {
        self.run(|conn| {
            conn.execute(
                "DELETE FROM singletons WHERE key IN (?1, ?2)",
                params![SETTINGS_KEY, DRAW_KEY],
            )?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conformance;
    use proptest::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_record_lifecycle() {
        conformance::record_lifecycle(&SqliteStore::open_memory().unwrap()).await;
    }

    #[tokio::test]
    async fn test_ids_never_reused() {
        conformance::ids_never_reused(&SqliteStore::open_memory().unwrap()).await;
    }

    #[test]
    fn test_negative_row_count_is_invalid_data() {
        assert_eq!(row_count(Collection::Divers, 3).unwrap(), 3);
        assert!(matches!(
            row_count(Collection::Divers, -1),
            Err(StoreError::InvalidData(_))
        ));
    }

    #[tokio::test]
    async fn test_ids_stop_at_max() {
        conformance::ids_stop_at_max(&SqliteStore::open_memory().unwrap()).await;
    }

    #[tokio::test]
    async fn test_insertion_order() {
        conformance::insertion_order(&SqliteStore::open_memory().unwrap()).await;
    }

    #[tokio::test]
    async fn test_replace_records() {
        conformance::replace_records(&SqliteStore::open_memory().unwrap()).await;
    }

    #[tokio::test]
    async fn test_replace_rejects_bad_batch() {
        conformance::replace_rejects_bad_batch(&SqliteStore::open_memory().unwrap()).await;
    }

    #[tokio::test]
    async fn test_singletons() {
        conformance::singletons(&SqliteStore::open_memory().unwrap()).await;
    }

    #[tokio::test]
    async fn test_collections_are_independent() {
        conformance::collections_are_independent(&SqliteStore::open_memory().unwrap()).await;
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("carnet.db");

        let id = {
            let store = SqliteStore::open(&path).unwrap();
            let payload = json!({ "lieu": "Forêt", "nb_caches": 3 });
            let id = store
                .add_record(Collection::Recherche, payload.as_object().unwrap())
                .await
                .unwrap();
            store
                .save_settings(&Settings {
                    dog_name: "Rex".into(),
                    onboarding_done: true,
                    ..Settings::default()
                })
                .await
                .unwrap();
            id
        };

        let store = SqliteStore::open(&path).unwrap();
        let record = store
            .get_record(Collection::Recherche, id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.field("nb_caches"), Some(&json!(3)));
        assert_eq!(store.load_settings().await.unwrap().unwrap().dog_name, "Rex");

        let next = store
            .add_record(Collection::Recherche, &Payload::new())
            .await
            .unwrap();
        assert_eq!(next, id.next());
    }

    #[tokio::test]
    async fn test_corrupt_singleton_is_reported() {
        let store = SqliteStore::open_memory().unwrap();
        store
            .run(|conn| {
                conn.execute(
                    "INSERT INTO singletons (key, value, updated_at) VALUES ('settings', 'not json', 0)",
                    [],
                )?;
                Ok(())
            })
            .await
            .unwrap();

        assert!(matches!(
            store.load_settings().await,
            Err(StoreError::Serialization(_))
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_ids_unique_and_increasing(ops in prop::collection::vec(any::<bool>(), 1..40)) {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            rt.block_on(async {
                let store = SqliteStore::open_memory().unwrap();
                let c = Collection::Divers;
                let mut last = RecordId(0);

                for add in ops {
                    if add {
                        let id = store.add_record(c, &Payload::new()).await.unwrap();
                        prop_assert!(id > last);
                        last = id;
                    } else if last.get() > 0 {
                        store.delete_record(c, last).await.unwrap();
                    }
                }
                Ok(())
            })?;
        }
    }
}
