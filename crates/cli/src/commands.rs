//! Command handlers.
//!
//! Each handler works on an already loaded [`Registry`] and returns the JSON
//! document to print. Mutating handlers save the affected collections
//! afterwards; a failed save is reported as an error while the in-memory
//! result of the command stands.

use anyhow::Context;
use reelbase_core::enumeration::MovieCategory;
use reelbase_core::person::{Person, PersonKind};
use reelbase_core::registry::Registry;
use reelbase_core::slots::{MovieSlots, PersonSlots};
use reelbase_core::types::{MovieId, PersonId};
use reelbase_db::models::movie::MovieRecord;
use reelbase_db::{KeyValueStore, MovieRepo, PersonRepo};
use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::{Command, MovieCommand, PersonCommand};

/// Person as listed, with its derived back-references.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonView {
    pub person_id: PersonId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<PersonId>,
    pub kind: PersonKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directed_movies: Option<Vec<MovieId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acted_in_movies: Option<Vec<MovieId>>,
}

impl PersonView {
    pub fn new(person: &Person, registry: &Registry) -> Self {
        let id = person.person_id();
        Self {
            person_id: id,
            name: person.name().to_string(),
            agent: person.agent(),
            kind: person.kind(),
            directed_movies: (person.kind() == PersonKind::Director)
                .then(|| registry.directed_movies(id).cloned().collect()),
            acted_in_movies: (person.kind() == PersonKind::Actor)
                .then(|| registry.acted_in_movies(id).cloned().collect()),
        }
    }
}

/// Movie as listed, with the category label next to its code.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieView {
    #[serde(flatten)]
    pub record: MovieRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_label: Option<&'static str>,
}

impl MovieView {
    pub fn new(record: MovieRecord) -> Self {
        let category_label = record
            .category
            .and_then(MovieCategory::from_code)
            .map(MovieCategory::label);
        Self {
            record,
            category_label,
        }
    }
}

pub fn execute(
    command: Command,
    store: &mut dyn KeyValueStore,
    registry: &mut Registry,
) -> anyhow::Result<Value> {
    match command {
        Command::Person { command } => person(command, store, registry),
        Command::Movie { command } => movie(command, store, registry),
        Command::Clear => {
            reelbase_db::clear_data(store, registry).context("failed to clear the store")?;
            Ok(json!({ "cleared": true }))
        }
    }
}

fn person(
    command: PersonCommand,
    store: &mut dyn KeyValueStore,
    registry: &mut Registry,
) -> anyhow::Result<Value> {
    match command {
        PersonCommand::Add { kind, slots } => {
            let slots: PersonSlots = parse_slots(&slots)?;
            let id = registry.add_person(kind.into(), &slots)?.person_id();
            PersonRepo::save_all(store, registry).context("person added but not saved")?;
            let view = registry.person(id).map(|p| PersonView::new(p, registry));
            Ok(serde_json::to_value(view)?)
        }
        PersonCommand::Update { slots } => {
            let slots: PersonSlots = parse_slots(&slots)?;
            let outcome = registry.update_person(&slots)?;
            if !outcome.is_noop() {
                PersonRepo::save_all(store, registry).context("person updated but not saved")?;
            }
            Ok(serde_json::to_value(outcome)?)
        }
        PersonCommand::Destroy { id } => {
            let outcome = PersonRepo::destroy(store, registry, id)?;
            Ok(serde_json::to_value(outcome)?)
        }
        PersonCommand::List { kind } => {
            let views: Vec<PersonView> = match kind {
                Some(kind) => registry
                    .people_of_kind(kind.into())
                    .map(|p| PersonView::new(p, registry))
                    .collect(),
                None => registry
                    .people()
                    .values()
                    .map(|p| PersonView::new(p, registry))
                    .collect(),
            };
            Ok(serde_json::to_value(views)?)
        }
    }
}

fn movie(
    command: MovieCommand,
    store: &mut dyn KeyValueStore,
    registry: &mut Registry,
) -> anyhow::Result<Value> {
    match command {
        MovieCommand::Add { slots } => {
            let slots: MovieSlots = parse_slots(&slots)?;
            let record = MovieRecord::from(registry.add_movie(&slots)?);
            MovieRepo::save_all(store, registry).context("movie added but not saved")?;
            Ok(serde_json::to_value(MovieView::new(record))?)
        }
        MovieCommand::Update { slots } => {
            let slots: MovieSlots = parse_slots(&slots)?;
            let outcome = registry.update_movie(&slots)?;
            if !outcome.is_noop() {
                MovieRepo::save_all(store, registry).context("movie updated but not saved")?;
            }
            Ok(serde_json::to_value(outcome)?)
        }
        MovieCommand::Destroy { id } => {
            let movie = MovieRepo::destroy(store, registry, &id)?;
            Ok(json!({ "destroyed": movie.movie_id() }))
        }
        MovieCommand::List => {
            let views: Vec<MovieView> = registry
                .movies()
                .values()
                .map(|m| MovieView::new(MovieRecord::from(m)))
                .collect();
            Ok(serde_json::to_value(views)?)
        }
    }
}

fn parse_slots<T: serde::de::DeserializeOwned>(raw: &str) -> anyhow::Result<T> {
    serde_json::from_str(raw).context("slots must be a JSON object with the record's field names")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::KindArg;
    use reelbase_db::MemoryStore;

    fn run(command: Command, store: &mut MemoryStore, registry: &mut Registry) -> Value {
        execute(command, store, registry).unwrap()
    }

    fn add_person(kind: KindArg, slots: Value) -> Command {
        Command::Person {
            command: PersonCommand::Add {
                kind,
                slots: slots.to_string(),
            },
        }
    }

    fn seeded(store: &mut MemoryStore) -> Registry {
        let mut registry = Registry::new();
        run(
            add_person(KindArg::Director, json!({"personId": 2, "name": "D"})),
            store,
            &mut registry,
        );
        run(
            add_person(KindArg::Actor, json!({"personId": 3, "name": "A"})),
            store,
            &mut registry,
        );
        run(
            Command::Movie {
                command: MovieCommand::Add {
                    slots: json!({
                        "movieId": "10", "title": "T", "releaseDate": "1999-01-01",
                        "director": [2], "actor": [3], "category": 2, "about": "Someone"
                    })
                    .to_string(),
                },
            },
            store,
            &mut registry,
        );
        registry
    }

    #[test]
    fn add_commands_save_to_store() {
        let mut store = MemoryStore::new();
        let _registry = seeded(&mut store);
        assert!(store.get("directors").unwrap().is_some());
        assert!(store.get("actors").unwrap().is_some());
        assert!(store.get("movies").unwrap().unwrap().contains("\"10\""));
    }

    #[test]
    fn person_list_includes_back_references() {
        let mut store = MemoryStore::new();
        let mut registry = seeded(&mut store);
        let out = run(
            Command::Person {
                command: PersonCommand::List { kind: None },
            },
            &mut store,
            &mut registry,
        );
        assert_eq!(out[0]["directedMovies"], json!(["10"]));
        assert!(out[0].get("actedInMovies").is_none());
        assert_eq!(out[1]["actedInMovies"], json!(["10"]));
    }

    #[test]
    fn movie_list_shows_category_label() {
        let mut store = MemoryStore::new();
        let mut registry = seeded(&mut store);
        let out = run(
            Command::Movie {
                command: MovieCommand::List,
            },
            &mut store,
            &mut registry,
        );
        assert_eq!(out[0]["category"], json!(2));
        assert_eq!(out[0]["categoryLabel"], json!("Biography"));
    }

    #[test]
    fn rejected_add_is_an_error() {
        let mut store = MemoryStore::new();
        let mut registry = seeded(&mut store);
        let result = execute(
            add_person(KindArg::Actor, json!({"personId": 3, "name": "Dup"})),
            &mut store,
            &mut registry,
        );
        assert!(result.is_err());
        let result = execute(
            Command::Movie {
                command: MovieCommand::Add {
                    slots: "not json".into(),
                },
            },
            &mut store,
            &mut registry,
        );
        assert!(result.is_err());
    }

    #[test]
    fn destroy_director_reports_cascade() {
        let mut store = MemoryStore::new();
        let mut registry = seeded(&mut store);
        let out = run(
            Command::Person {
                command: PersonCommand::Destroy { id: 2 },
            },
            &mut store,
            &mut registry,
        );
        assert_eq!(out["deletedMovies"], json!(["10"]));
        assert_eq!(store.get("movies").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn clear_empties_store() {
        let mut store = MemoryStore::new();
        let mut registry = seeded(&mut store);
        run(Command::Clear, &mut store, &mut registry);
        assert!(store.is_empty());
        assert!(registry.is_empty());
    }
}
