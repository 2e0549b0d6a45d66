//! Repository layer.
//!
//! Each repository is a zero-sized struct whose methods take the
//! [`KeyValueStore`] and the [`Registry`] they move data between.

pub mod movie_repo;
pub mod person_repo;

pub use movie_repo::MovieRepo;
pub use person_repo::PersonRepo;

use std::collections::BTreeMap;

use reelbase_core::registry::Registry;
use serde::Serialize;
use serde_json::Value;

use crate::store::KeyValueStore;
use crate::{DbError, LoadReport, SkippedRecord};

/// Read one collection as raw per-record JSON values.
///
/// A missing key is an empty collection. A value that is not a JSON object
/// fails the whole collection; individual records are decoded by the caller
/// so one bad record can be skipped on its own.
pub(crate) fn read_collection(
    store: &dyn KeyValueStore,
    collection: &'static str,
) -> Result<BTreeMap<String, Value>, DbError> {
    let Some(raw) = store.get(collection)? else {
        return Ok(BTreeMap::new());
    };
    if raw.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    serde_json::from_str(&raw).map_err(|source| DbError::Serialization { collection, source })
}

/// Serialize and store one collection keyed by string ID.
pub(crate) fn write_collection<T: Serialize>(
    store: &mut dyn KeyValueStore,
    collection: &'static str,
    records: &BTreeMap<String, T>,
) -> Result<(), DbError> {
    let json = serde_json::to_string(records)
        .map_err(|source| DbError::Serialization { collection, source })?;
    store.set(collection, &json)?;
    tracing::debug!(collection, records = records.len(), "Collection saved");
    Ok(())
}

/// Decode and register each record, isolating failures per record.
pub(crate) fn load_records<R, F>(
    collection: &'static str,
    raw: BTreeMap<String, Value>,
    registry: &mut Registry,
    mut register: F,
) -> LoadReport
where
    R: serde::de::DeserializeOwned,
    F: FnMut(&mut Registry, &R) -> Result<(), String>,
{
    let mut report = LoadReport::default();
    for (id, value) in raw {
        let outcome = serde_json::from_value::<R>(value)
            .map_err(|e| format!("malformed record: {e}"))
            .and_then(|record| register(registry, &record));
        match outcome {
            Ok(()) => report.loaded += 1,
            Err(reason) => {
                tracing::warn!(collection, id = %id, reason = %reason, "Skipping stored record");
                report.skipped.push(SkippedRecord {
                    collection,
                    id,
                    reason,
                });
            }
        }
    }
    report
}
