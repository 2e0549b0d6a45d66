//! Persistence for people of every kind.

use std::collections::BTreeMap;

use reelbase_core::person::PersonKind;
use reelbase_core::registry::{DestroyOutcome, Registry};
use reelbase_core::types::PersonId;

use super::{load_records, read_collection, write_collection, MovieRepo};
use crate::models::person::PersonRecord;
use crate::store::KeyValueStore;
use crate::{collection_key, DbError, LoadReport};

/// Loads and saves the `people`, `directors` and `actors` collections.
pub struct PersonRepo;

impl PersonRepo {
    /// Load every person collection into `registry`, plain people first.
    ///
    /// Records go through the validating constructor; a record that fails
    /// (including an ID already taken by an earlier collection) is skipped.
    pub fn retrieve_all(
        store: &dyn KeyValueStore,
        registry: &mut Registry,
    ) -> Result<LoadReport, DbError> {
        let mut report = LoadReport::default();
        for kind in PersonKind::ALL {
            let collection = collection_key(kind);
            let raw = read_collection(store, collection)?;
            let loaded = load_records::<PersonRecord, _>(collection, raw, registry, |r, record| {
                r.add_person(kind, &record.to_slots())
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            });
            tracing::info!(collection, loaded = loaded.loaded, skipped = loaded.skipped.len(), "Loaded people");
            report.merge(loaded);
        }
        Ok(report)
    }

    /// Save each kind's direct instances under its own key.
    pub fn save_all(store: &mut dyn KeyValueStore, registry: &Registry) -> Result<usize, DbError> {
        let mut saved = 0;
        for kind in PersonKind::ALL {
            let records: BTreeMap<String, PersonRecord> = registry
                .people_of_kind(kind)
                .map(|p| (p.person_id().to_string(), PersonRecord::from(p)))
                .collect();
            saved += records.len();
            write_collection(store, collection_key(kind), &records)?;
        }
        tracing::info!(saved, "People saved");
        Ok(saved)
    }

    /// Destroy a person and persist the people collections, plus the movie
    /// collection when the removal deleted or changed movies.
    pub fn destroy(
        store: &mut dyn KeyValueStore,
        registry: &mut Registry,
        id: PersonId,
    ) -> Result<DestroyOutcome, DbError> {
        let outcome = registry.destroy_person(id)?;
        Self::save_all(store, registry)?;
        if !outcome.deleted_movies.is_empty() || !outcome.detached_movies.is_empty() {
            MovieRepo::save_all(store, registry)?;
        }
        Ok(outcome)
    }

    /// Remove every person collection from the store.
    pub fn clear(store: &mut dyn KeyValueStore) -> Result<(), DbError> {
        for kind in PersonKind::ALL {
            store.remove(collection_key(kind))?;
        }
        Ok(())
    }
}
