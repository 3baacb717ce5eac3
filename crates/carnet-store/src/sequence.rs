//! Id assignment for bulk restores, shared by both backends.

use std::collections::HashSet;

use carnet_core::RecordId;

use crate::error::{Result, StoreError};

/// Hand out `next` as a record id, refusing ids past [`RecordId::MAX`].
pub(crate) fn allocate(next: RecordId) -> Result<RecordId> {
    if next > RecordId::MAX {
        return Err(StoreError::InvalidData(format!(
            "record id sequence exhausted at {}",
            RecordId::MAX
        )));
    }
    Ok(next)
}

/// Decide the id of every restored record and the sequence value after them.
///
/// Kept ids are checked first so that generated ids start above all of them;
/// a record without an id can never collide with one that has an id later
/// in the batch. The sequence only moves forward.
pub(crate) fn plan_ids(
    next_id: RecordId,
    requested: &[Option<RecordId>],
) -> Result<(Vec<RecordId>, RecordId)> {
    let mut seen = HashSet::with_capacity(requested.len());
    let mut next = next_id;

    for &id in requested.iter().flatten() {
        if id.get() == 0 || id > RecordId::MAX {
            return Err(StoreError::InvalidData(format!("record id {id} out of range")));
        }
        if !seen.insert(id) {
            return Err(StoreError::InvalidData(format!("duplicate record id {id}")));
        }
        if id >= next {
            next = id.next();
        }
    }

    let mut ids = Vec::with_capacity(requested.len());
    for requested in requested {
        match *requested {
            Some(id) => ids.push(id),
            None => {
                ids.push(allocate(next)?);
                next = next.next();
            }
        }
    }

    Ok((ids, next))
}
