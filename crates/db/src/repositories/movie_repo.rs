//! Persistence for the `movies` collection.

use std::collections::BTreeMap;

use reelbase_core::movie::Movie;
use reelbase_core::registry::Registry;

use super::{load_records, read_collection, write_collection};
use crate::models::movie::MovieRecord;
use crate::store::KeyValueStore;
use crate::{DbError, LoadReport, MOVIES_KEY};

pub struct MovieRepo;

impl MovieRepo {
    /// Load stored movies into `registry`. People must be loaded first so
    /// director and actor references resolve.
    pub fn retrieve_all(
        store: &dyn KeyValueStore,
        registry: &mut Registry,
    ) -> Result<LoadReport, DbError> {
        let raw = read_collection(store, MOVIES_KEY)?;
        let report = load_records::<MovieRecord, _>(MOVIES_KEY, raw, registry, |r, record| {
            r.add_movie(&record.to_slots())
                .map(|_| ())
                .map_err(|e| e.to_string())
        });
        registry.rebuild_index();
        tracing::info!(loaded = report.loaded, skipped = report.skipped.len(), "Loaded movies");
        Ok(report)
    }

    pub fn save_all(store: &mut dyn KeyValueStore, registry: &Registry) -> Result<usize, DbError> {
        let records: BTreeMap<String, MovieRecord> = registry
            .movies()
            .iter()
            .map(|(id, m)| (id.clone(), MovieRecord::from(m)))
            .collect();
        write_collection(store, MOVIES_KEY, &records)?;
        tracing::info!(saved = records.len(), "Movies saved");
        Ok(records.len())
    }

    /// Destroy a movie and persist the movie collection.
    pub fn destroy(
        store: &mut dyn KeyValueStore,
        registry: &mut Registry,
        id: &str,
    ) -> Result<Movie, DbError> {
        let movie = registry.destroy_movie(id)?;
        Self::save_all(store, registry)?;
        Ok(movie)
    }

    pub fn clear(store: &mut dyn KeyValueStore) -> Result<(), DbError> {
        store.remove(MOVIES_KEY)?;
        Ok(())
    }
}
