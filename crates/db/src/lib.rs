//! Persistence adapter for the reelbase registry.
//!
//! Each entity collection is stored as one JSON object (string ID → record)
//! under a fixed key of a [`KeyValueStore`]. Object references are flattened
//! to person IDs on save and resolved again through the validating
//! constructors on load.

pub mod models;
pub mod repositories;
pub mod store;

use reelbase_core::error::CoreError;
use reelbase_core::person::PersonKind;
use reelbase_core::registry::Registry;
use serde::Serialize;

pub use repositories::{MovieRepo, PersonRepo};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};

pub const PEOPLE_KEY: &str = "people";
pub const DIRECTORS_KEY: &str = "directors";
pub const ACTORS_KEY: &str = "actors";
pub const MOVIES_KEY: &str = "movies";

/// Store key holding the direct instances of `kind`.
pub fn collection_key(kind: PersonKind) -> &'static str {
    match kind {
        PersonKind::Person => PEOPLE_KEY,
        PersonKind::Director => DIRECTORS_KEY,
        PersonKind::Actor => ACTORS_KEY,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Collection '{collection}' could not be (de)serialized")]
    Serialization {
        collection: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// A stored record that could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    pub collection: &'static str,
    pub id: String,
    pub reason: String,
}

/// Result of loading one or more collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: Vec<SkippedRecord>,
}

impl LoadReport {
    pub fn merge(&mut self, other: LoadReport) {
        self.loaded += other.loaded;
        self.skipped.extend(other.skipped);
    }
}

/// Replace the registry contents with everything in the store.
///
/// People are loaded before movies so references resolve. The load runs
/// into a fresh registry; on error `registry` is left as it was.
pub fn retrieve_all(store: &dyn KeyValueStore, registry: &mut Registry) -> Result<LoadReport, DbError> {
    let mut loaded = Registry::new();
    let mut report = PersonRepo::retrieve_all(store, &mut loaded)?;
    report.merge(MovieRepo::retrieve_all(store, &mut loaded)?);
    *registry = loaded;
    Ok(report)
}

/// Save every collection.
pub fn save_all(store: &mut dyn KeyValueStore, registry: &Registry) -> Result<(), DbError> {
    PersonRepo::save_all(store, registry)?;
    MovieRepo::save_all(store, registry)?;
    Ok(())
}

/// Remove every collection from the store and empty the registry.
pub fn clear_data(store: &mut dyn KeyValueStore, registry: &mut Registry) -> Result<(), DbError> {
    MovieRepo::clear(store)?;
    PersonRepo::clear(store)?;
    registry.clear();
    tracing::info!("All stored data cleared");
    Ok(())
}
