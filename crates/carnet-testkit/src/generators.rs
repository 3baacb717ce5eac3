//! Proptest generators for property-based testing.

use proptest::prelude::*;
use serde_json::Value;

use carnet_core::{Collection, DrawData, Payload, Settings};

/// Generate a Collection.
pub fn collection() -> impl Strategy<Value = Collection> {
    prop_oneof![
        Just(Collection::Recherche),
        Just(Collection::Obeissance),
        Just(Collection::Divers),
    ]
}

/// Generate a payload field name. Never a reserved key.
pub fn field_name() -> impl Strategy<Value = String> {
    "[a-z][a-z_]{0,15}"
        .prop_filter("reserved key", |k| k != "id" && k != "created_at")
}

/// Generate a scalar field value like the sheet forms produce.
pub fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-zA-Z0-9 àéèç'-]{0,24}".prop_map(Value::from),
        any::<i32>().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        Just(Value::Null),
    ]
}

/// Generate a record payload, possibly with a list of nested rows.
pub fn payload() -> impl Strategy<Value = Payload> {
    let row = prop::collection::btree_map(field_name(), scalar(), 0..4)
        .prop_map(|m| Value::Object(m.into_iter().collect()));
    (
        prop::collection::btree_map(field_name(), scalar(), 0..8),
        prop::option::of(prop::collection::vec(row, 0..4)),
    )
        .prop_map(|(fields, rows)| {
            let mut payload: Payload = fields.into_iter().collect();
            if let Some(rows) = rows {
                payload.insert("charges".to_string(), Value::Array(rows));
            }
            payload
        })
}

/// Generate a participant name.
pub fn participant_name() -> impl Strategy<Value = String> {
    "[A-Z][a-zé]{1,9}"
}

/// Generate a roster of names unique ignoring case.
pub fn roster(max_len: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(participant_name(), 0..=max_len).prop_map(|names| {
        let mut seen = Vec::new();
        names
            .into_iter()
            .filter(|n| {
                let lower = n.to_lowercase();
                let fresh = !seen.contains(&lower);
                seen.push(lower);
                fresh
            })
            .collect()
    })
}

/// Generate settings.
pub fn settings() -> impl Strategy<Value = Settings> {
    (
        "[A-Za-z]{0,12}",
        prop::collection::vec("[A-Za-zé]{1,12}", 0..5),
        prop::collection::vec("[A-Za-z]{1,12}", 0..4),
        any::<bool>(),
    )
        .prop_map(|(dog_name, substances, handlers, onboarding_done)| Settings {
            dog_name,
            substances,
            handlers,
            onboarding_done,
            ..Settings::default()
        })
}

/// Generate draw data: a roster with the statistics of some draws.
///
/// Orders are rotations of the roster, so the statistics are consistent.
pub fn draw_data(max_participants: usize) -> impl Strategy<Value = DrawData> {
    (roster(max_participants), prop::collection::vec(any::<usize>(), 0..20)).prop_map(
        |(names, rotations)| {
            let mut data = DrawData::with_participants(names).unwrap_or_default();
            let roster = data.participants().to_vec();
            if roster.len() >= 2 {
                for r in rotations {
                    let mut order = roster.clone();
                    order.rotate_left(r % roster.len());
                    data.record_result(&order);
                }
            }
            data
        },
    )
}
