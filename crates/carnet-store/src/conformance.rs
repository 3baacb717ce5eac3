//! Behaviour every `Store` backend must share. Each backend's test module
//! runs these against a fresh instance.

use carnet_core::{Collection, DrawData, ImportedRecord, Payload, RecordId, Settings};
use serde_json::json;

use crate::error::StoreError;
use crate::traits::{Store, StoreExt, UpdateResult};

fn payload(value: serde_json::Value) -> Payload {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

fn imported(id: Option<u64>, lieu: &str) -> ImportedRecord {
    ImportedRecord {
        id: id.map(RecordId),
        created_at: Some("2024-01-01T00:00:00Z".into()),
        payload: payload(json!({ "lieu": lieu })),
    }
}

pub(crate) async fn record_lifecycle<S: Store>(store: &S) {
    let c = Collection::Recherche;
    let id = store
        .add_record(c, &payload(json!({ "id": 99, "created_at": "x", "lieu": "Forêt" })))
        .await
        .unwrap();
    assert_eq!(id, RecordId(1));

    let record = store.get_record(c, id).await.unwrap().unwrap();
    assert_eq!(record.id, id);
    assert_eq!(record.text("lieu").as_deref(), Some("Forêt"));
    assert!(!record.payload.contains_key("id"));
    assert!(!record.payload.contains_key("created_at"));
    let created_at = record.created_at.clone().unwrap();
    assert_ne!(created_at, "x");

    let result = store
        .update_record(c, id, &payload(json!({ "lieu": "Plage", "created_at": "y" })))
        .await
        .unwrap();
    assert_eq!(result, UpdateResult::Updated);

    let updated = store.get_record(c, id).await.unwrap().unwrap();
    assert_eq!(updated.text("lieu").as_deref(), Some("Plage"));
    assert_eq!(updated.created_at.as_deref(), Some(created_at.as_str()));

    let missing = store
        .update_record(c, RecordId(42), &Payload::new())
        .await
        .unwrap();
    assert_eq!(missing, UpdateResult::NotFound);

    assert!(store.delete_record(c, id).await.unwrap());
    assert!(!store.delete_record(c, id).await.unwrap());
    assert!(store.get_record(c, id).await.unwrap().is_none());
}

pub(crate) async fn ids_never_reused<S: Store>(store: &S) {
    let c = Collection::Divers;
    let first = store.add_record(c, &Payload::new()).await.unwrap();
    let second = store.add_record(c, &Payload::new()).await.unwrap();
    store.delete_record(c, second).await.unwrap();
    let third = store.add_record(c, &Payload::new()).await.unwrap();
    assert!(first < second && second < third);

    store.clear_records(c).await.unwrap();
    let fourth = store.add_record(c, &Payload::new()).await.unwrap();
    assert!(fourth > third);
}

pub(crate) async fn insertion_order<S: Store>(store: &S) {
    let c = Collection::Obeissance;
    store
        .replace_records(c, vec![imported(Some(5), "a"), imported(Some(2), "b")])
        .await
        .unwrap();
    store.add_record(c, &payload(json!({ "lieu": "c" }))).await.unwrap();

    let lieux: Vec<_> = store
        .list_records(c)
        .await
        .unwrap()
        .iter()
        .filter_map(|r| r.text("lieu"))
        .collect();
    assert_eq!(lieux, vec!["a", "b", "c"]);
}

pub(crate) async fn replace_records<S: Store>(store: &S) {
    let c = Collection::Recherche;
    store.add_record(c, &Payload::new()).await.unwrap();

    let ids = store
        .replace_records(c, vec![imported(Some(10), "kept"), imported(None, "fresh")])
        .await
        .unwrap();
    assert_eq!(ids, vec![RecordId(10), RecordId(11)]);
    assert_eq!(store.count_records(c).await.unwrap(), 2);

    let kept = store.get_record(c, RecordId(10)).await.unwrap().unwrap();
    assert_eq!(kept.created_at.as_deref(), Some("2024-01-01T00:00:00Z"));

    let next = store.add_record(c, &Payload::new()).await.unwrap();
    assert_eq!(next, RecordId(12));
}

pub(crate) async fn replace_rejects_bad_batch<S: Store>(store: &S) {
    let c = Collection::Recherche;
    let id = store.add_record(c, &payload(json!({ "lieu": "keep" }))).await.unwrap();

    let result = store
        .replace_records(c, vec![imported(Some(3), "a"), imported(Some(3), "b")])
        .await;
    assert!(result.is_err());

    let records = store.list_records(c).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, id);
}

pub(crate) async fn ids_stop_at_max<S: Store>(store: &S) {
    let c = Collection::Recherche;
    store
        .replace_records(c, vec![imported(Some(RecordId::MAX.get()), "last")])
        .await
        .unwrap();

    let result = store.add_record(c, &Payload::new()).await;
    assert!(matches!(result, Err(StoreError::InvalidData(_))));
    assert_eq!(store.count_records(c).await.unwrap(), 1);

    let result = store.replace_records(c, vec![imported(None, "fresh")]).await;
    assert!(matches!(result, Err(StoreError::InvalidData(_))));
    let records = store.list_records(c).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, RecordId::MAX);

    let other = store.add_record(Collection::Divers, &Payload::new()).await.unwrap();
    assert_eq!(other, RecordId(1));
}

pub(crate) async fn singletons<S: Store>(store: &S) {
    assert!(store.load_settings().await.unwrap().is_none());
    assert_eq!(store.settings_or_default().await.unwrap(), Settings::default());

    let settings = Settings {
        dog_name: "Rex".into(),
        substances: vec!["Héroïne".into()],
        handlers: vec!["Paul".into()],
        onboarding_done: true,
        extra: payload(json!({ "theme": "sombre" })),
    };
    store.save_settings(&settings).await.unwrap();
    assert_eq!(store.load_settings().await.unwrap(), Some(settings));

    let mut draw = DrawData::with_participants(["Alice", "Bob"]).unwrap();
    draw.record_result(&["Bob".to_string(), "Alice".to_string()]);
    store.save_draw_data(&draw).await.unwrap();
    assert_eq!(store.load_draw_data().await.unwrap(), Some(draw));

    store.clear_singletons().await.unwrap();
    assert!(store.load_settings().await.unwrap().is_none());
    assert!(store.draw_data_or_default().await.unwrap().participants().is_empty());
}

pub(crate) async fn collections_are_independent<S: Store>(store: &S) {
    let a = store.add_record(Collection::Recherche, &Payload::new()).await.unwrap();
    let b = store.add_record(Collection::Divers, &Payload::new()).await.unwrap();
    assert_eq!(a, RecordId(1));
    assert_eq!(b, RecordId(1));

    store.clear_records(Collection::Recherche).await.unwrap();
    let counts = store.count_all().await.unwrap();
    assert_eq!(
        counts,
        vec![
            (Collection::Recherche, 0),
            (Collection::Obeissance, 0),
            (Collection::Divers, 1),
        ]
    );
}
