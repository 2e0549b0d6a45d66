//! In-memory registry of people and movies.
//!
//! The registry is the single owner of every collection. All mutation goes
//! through `add_*`, `update_*` and `destroy_*`, which validate through the
//! entity check/set functions and keep the [`AssociationIndex`] in sync.
//!
//! Updates are applied to a copy of the stored entity and committed only when
//! every field passes, so a failed update leaves the entity and the
//! back-references exactly as they were.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::associations::AssociationIndex;
use crate::error::CoreError;
use crate::movie::{check_movie_id, Movie, Movies};
use crate::person::{check_person_id, People, Person, PersonKind};
use crate::slots::{self, MovieSlots, PersonSlots};
use crate::types::{MovieId, PersonId};
use crate::violation::ConstraintViolation;

/// Fields changed by a successful update, in the order they were applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateOutcome {
    pub changed: Vec<&'static str>,
}

impl UpdateOutcome {
    pub fn is_noop(&self) -> bool {
        self.changed.is_empty()
    }
}

/// Side effects of destroying a person.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DestroyOutcome {
    /// Movies deleted because the person directed them.
    pub deleted_movies: Vec<MovieId>,
    /// Movies the person was removed from as an actor.
    pub detached_movies: Vec<MovieId>,
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    people: People,
    movies: Movies,
    index: AssociationIndex,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every person, movie and back-reference.
    pub fn clear(&mut self) {
        self.people.clear();
        self.movies.clear();
        self.index.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty() && self.movies.is_empty()
    }

    pub fn people(&self) -> &People {
        &self.people
    }

    pub fn person(&self, id: PersonId) -> Option<&Person> {
        self.people.get(&id)
    }

    /// People whose concrete subtype is `kind`.
    pub fn people_of_kind(&self, kind: PersonKind) -> impl Iterator<Item = &Person> {
        self.people.values().filter(move |p| p.kind() == kind)
    }

    pub fn movies(&self) -> &Movies {
        &self.movies
    }

    pub fn movie(&self, id: &str) -> Option<&Movie> {
        self.movies.get(id)
    }

    /// IDs of the movies directed by `person_id`.
    pub fn directed_movies(&self, person_id: PersonId) -> impl Iterator<Item = &MovieId> {
        self.index.directed_movies(person_id).into_iter().flatten()
    }

    /// IDs of the movies `person_id` acts in.
    pub fn acted_in_movies(&self, person_id: PersonId) -> impl Iterator<Item = &MovieId> {
        self.index.acted_in_movies(person_id).into_iter().flatten()
    }

    /// Recompute the back-reference index from the movies.
    pub fn rebuild_index(&mut self) {
        self.index = AssociationIndex::rebuild(self.movies.values());
    }

    // -----------------------------------------------------------------------
    // People
    // -----------------------------------------------------------------------

    /// Create a person of `kind`. On any violation the registry is unchanged.
    pub fn add_person(&mut self, kind: PersonKind, slots: &PersonSlots) -> Result<&Person, CoreError> {
        let person = match Person::new(kind, slots, &self.people) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(kind = %kind, violation = ?e.kind(), error = e.message(), "Rejected new person");
                return Err(e.into());
            }
        };
        let id = person.person_id();
        tracing::info!(person_id = id, kind = %kind, "Person added");
        Ok(self.people.entry(id).or_insert(person))
    }

    /// Apply the present, changed fields of `slots` to an existing person.
    pub fn update_person(&mut self, slots: &PersonSlots) -> Result<UpdateOutcome, CoreError> {
        let result = self.try_update_person(slots);
        match &result {
            Ok(outcome) if outcome.is_noop() => tracing::info!("Person update had no changes"),
            Ok(outcome) => tracing::info!(changed = ?outcome.changed, "Person updated"),
            Err(e) => tracing::warn!(
                violation = ?e.violation().map(ConstraintViolation::kind),
                error = %e,
                "Person update rejected"
            ),
        }
        result
    }

    fn try_update_person(&mut self, slots: &PersonSlots) -> Result<UpdateOutcome, CoreError> {
        let id = slots::integer("person ID", slots.person_id.as_ref())?;
        check_person_id(id)?;
        let id = id.unwrap_or_default();
        let mut candidate = self
            .people
            .get(&id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound {
                entity: "person",
                id: id.to_string(),
            })?;

        let mut changed = Vec::new();
        if let Some(name) = slots.name.as_deref() {
            if slots::text(Some(name)) != Some(candidate.name()) {
                candidate.set_name(name)?;
                changed.push("name");
            }
        }
        if slots.agent.is_some() {
            let agent = slots::integer("agent", slots.agent.as_ref())?;
            if agent != candidate.agent() {
                candidate.set_agent(agent)?;
                changed.push("agent");
            }
        }

        if !changed.is_empty() {
            self.people.insert(id, candidate);
        }
        Ok(UpdateOutcome { changed })
    }

    /// Remove a person from the registry and from every subtype view.
    ///
    /// Movies directed by the person are deleted; movies the person acts in
    /// lose that actor.
    pub fn destroy_person(&mut self, id: PersonId) -> Result<DestroyOutcome, CoreError> {
        let Some(kind) = self.people.get(&id).map(Person::kind) else {
            tracing::warn!(person_id = id, "Cannot destroy unknown person");
            return Err(CoreError::NotFound {
                entity: "person",
                id: id.to_string(),
            });
        };

        let mut outcome = DestroyOutcome::default();

        let directed: Vec<MovieId> = self.directed_movies(id).cloned().collect();
        for movie_id in directed {
            self.remove_movie(&movie_id);
            tracing::info!(movie_id = %movie_id, director_id = id, "Movie deleted with its director");
            outcome.deleted_movies.push(movie_id);
        }

        let acted: Vec<MovieId> = self.acted_in_movies(id).cloned().collect();
        for movie_id in acted {
            if let Some(mut movie) = self.movies.get(&movie_id).cloned() {
                movie.remove_actor(id);
                self.commit_movie(movie);
                outcome.detached_movies.push(movie_id);
            }
        }

        self.people.remove(&id);
        tracing::info!(
            person_id = id,
            kind = %kind,
            deleted_movies = outcome.deleted_movies.len(),
            detached_movies = outcome.detached_movies.len(),
            "Person destroyed"
        );
        Ok(outcome)
    }

    // -----------------------------------------------------------------------
    // Movies
    // -----------------------------------------------------------------------

    /// Create a movie. On any violation the registry is unchanged.
    pub fn add_movie(&mut self, slots: &MovieSlots) -> Result<&Movie, CoreError> {
        let movie = match Movie::new(slots, &self.people, &self.movies) {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!(violation = ?e.kind(), error = e.message(), "Rejected new movie");
                return Err(e.into());
            }
        };
        let id = movie.movie_id().to_string();
        tracing::info!(movie_id = %id, "Movie added");
        self.commit_movie(movie);
        self.movies.get(&id).ok_or_else(|| CoreError::NotFound {
            entity: "movie",
            id,
        })
    }

    /// Apply the present, changed fields of `slots` to an existing movie.
    ///
    /// The category is applied before `episodeNo` and `about`, and the pair
    /// is re-checked on the final candidate.
    pub fn update_movie(&mut self, slots: &MovieSlots) -> Result<UpdateOutcome, CoreError> {
        let result = self.try_update_movie(slots);
        match &result {
            Ok(outcome) if outcome.is_noop() => tracing::info!("Movie update had no changes"),
            Ok(outcome) => tracing::info!(changed = ?outcome.changed, "Movie updated"),
            Err(e) => tracing::warn!(
                violation = ?e.violation().map(ConstraintViolation::kind),
                error = %e,
                "Movie update rejected"
            ),
        }
        result
    }

    fn try_update_movie(&mut self, slots: &MovieSlots) -> Result<UpdateOutcome, CoreError> {
        let movie_id = slots::movie_id(slots.movie_id.as_ref())?;
        check_movie_id(movie_id.as_deref())?;
        let movie_id = movie_id.unwrap_or_default();
        let mut candidate = self
            .movies
            .get(&movie_id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound {
                entity: "movie",
                id: movie_id.clone(),
            })?;
        let people = &self.people;
        let mut changed = Vec::new();

        if let Some(title) = slots.title.as_deref() {
            if slots::text(Some(title)) != Some(candidate.title()) {
                candidate.set_title(title)?;
                changed.push("title");
            }
        }
        if slots.release_date.is_some() {
            let date = slots::date("release date", slots.release_date.as_ref())?;
            if date != Some(candidate.release_date()) {
                candidate.set_release_date(date)?;
                changed.push("releaseDate");
            }
        }
        if slots.category.is_some() {
            let code = slots::integer("category", slots.category.as_ref())?;
            if code != candidate.category().map(|c| i64::from(c.code())) {
                candidate.set_category(code)?;
                changed.push("category");
            }
        }
        if slots.episode_no.is_some() {
            let episode_no = slots::integer("episode number", slots.episode_no.as_ref())?;
            if episode_no != candidate.episode_no() {
                candidate.set_episode_no(episode_no)?;
                changed.push("episodeNo");
            }
        }
        if let Some(about) = slots.about.as_deref() {
            let about = slots::text(Some(about));
            if about != candidate.about() {
                candidate.set_about(about)?;
                changed.push("about");
            }
        }
        if slots.director.is_some() {
            let director = slots::single_id_ref("director", slots.director.as_ref())?;
            if director != Some(candidate.director()) {
                candidate.set_director(director, people)?;
                changed.push("director");
            }
        }

        let actors_before = candidate.actors().clone();
        if slots.actor.is_some() {
            let ids = slots::id_refs("actor", slots.actor.as_ref())?;
            if ids.iter().copied().collect::<BTreeSet<_>>() != actors_before {
                candidate.set_actors(&ids, people)?;
            }
        }
        for id in slots::id_refs("actor", slots.actor_id_refs_to_add.as_ref())? {
            candidate.add_actor(id, people)?;
        }
        for id in slots::id_refs("actor", slots.actor_id_refs_to_remove.as_ref())? {
            candidate.remove_actor(id);
        }
        if candidate.actors() != &actors_before {
            changed.push("actor");
        }

        candidate.check_category_fields()?;

        if !changed.is_empty() {
            self.commit_movie(candidate);
        }
        Ok(UpdateOutcome { changed })
    }

    /// Delete a movie and its back-references.
    pub fn destroy_movie(&mut self, id: &str) -> Result<Movie, CoreError> {
        match self.remove_movie(id) {
            Some(movie) => {
                tracing::info!(movie_id = %id, "Movie destroyed");
                Ok(movie)
            }
            None => {
                tracing::warn!(movie_id = %id, "Cannot destroy unknown movie");
                Err(CoreError::NotFound {
                    entity: "movie",
                    id: id.to_string(),
                })
            }
        }
    }

    /// Insert or replace a movie, moving its back-references.
    fn commit_movie(&mut self, movie: Movie) {
        let id = movie.movie_id().to_string();
        let before = self.movies.remove(&id);
        self.index.sync(before.as_ref(), Some(&movie));
        self.movies.insert(id, movie);
    }

    fn remove_movie(&mut self, id: &str) -> Option<Movie> {
        let removed = self.movies.remove(id);
        self.index.sync(removed.as_ref(), None);
        removed
    }
}
