//! Derived movie/person back-references.
//!
//! Movies own their director and actor foreign keys. This index holds the
//! reverse direction (`directedMovies`, `actedInMovies`) and is only ever
//! changed through [`AssociationIndex::sync`], which every mutating registry
//! path calls with the movie's state before and after the change.

use std::collections::{BTreeMap, BTreeSet};

use crate::movie::Movie;
use crate::types::{MovieId, PersonId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssociationIndex {
    directed: BTreeMap<PersonId, BTreeSet<MovieId>>,
    acted: BTreeMap<PersonId, BTreeSet<MovieId>>,
}

impl AssociationIndex {
    /// Recompute the whole index from the movies' foreign keys.
    pub fn rebuild<'a>(movies: impl IntoIterator<Item = &'a Movie>) -> Self {
        let mut index = Self::default();
        for movie in movies {
            index.link(movie);
        }
        index
    }

    /// Move the back-references of one movie from `before` to `after`.
    ///
    /// `None` on either side means the movie did not exist (insert) or no
    /// longer exists (delete).
    pub fn sync(&mut self, before: Option<&Movie>, after: Option<&Movie>) {
        if let Some(old) = before {
            self.unlink(old);
        }
        if let Some(new) = after {
            self.link(new);
        }
    }

    pub fn directed_movies(&self, person_id: PersonId) -> Option<&BTreeSet<MovieId>> {
        self.directed.get(&person_id)
    }

    pub fn acted_in_movies(&self, person_id: PersonId) -> Option<&BTreeSet<MovieId>> {
        self.acted.get(&person_id)
    }

    pub fn clear(&mut self) {
        self.directed.clear();
        self.acted.clear();
    }

    fn link(&mut self, movie: &Movie) {
        let id = movie.movie_id().to_string();
        self.directed
            .entry(movie.director())
            .or_default()
            .insert(id.clone());
        for actor in movie.actors() {
            self.acted.entry(*actor).or_default().insert(id.clone());
        }
    }

    fn unlink(&mut self, movie: &Movie) {
        remove_entry(&mut self.directed, movie.director(), movie.movie_id());
        for actor in movie.actors() {
            remove_entry(&mut self.acted, *actor, movie.movie_id());
        }
    }
}

/// Drop `movie_id` from a person's set, and the set itself once empty.
fn remove_entry(map: &mut BTreeMap<PersonId, BTreeSet<MovieId>>, person: PersonId, movie_id: &str) {
    if let Some(set) = map.get_mut(&person) {
        set.remove(movie_id);
        if set.is_empty() {
            map.remove(&person);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movie::Movies;
    use crate::person::{People, Person, PersonKind};
    use crate::slots::{MovieSlots, PersonSlots};
    use serde_json::json;

    fn fixture() -> (People, Movie) {
        let mut people = People::new();
        for (id, kind) in [
            (2, PersonKind::Director),
            (3, PersonKind::Actor),
            (4, PersonKind::Actor),
            (6, PersonKind::Director),
        ] {
            let slots: PersonSlots =
                serde_json::from_value(json!({"personId": id, "name": "N"})).unwrap();
            let p = Person::new(kind, &slots, &people).unwrap();
            people.insert(id, p);
        }
        let slots: MovieSlots = serde_json::from_value(json!({
            "movieId": "10", "title": "T", "releaseDate": "1999-01-01",
            "director": 2, "actor": [3, 4]
        }))
        .unwrap();
        let movie = Movie::new(&slots, &people, &Movies::new()).unwrap();
        (people, movie)
    }

    #[test]
    fn insert_links_director_and_actors() {
        let (_, movie) = fixture();
        let mut index = AssociationIndex::default();
        index.sync(None, Some(&movie));
        assert!(index.directed_movies(2).unwrap().contains("10"));
        assert!(index.acted_in_movies(3).unwrap().contains("10"));
        assert!(index.acted_in_movies(4).unwrap().contains("10"));
    }

    #[test]
    fn reassigning_director_moves_back_reference() {
        let (people, movie) = fixture();
        let mut index = AssociationIndex::rebuild([&movie]);
        let mut updated = movie.clone();
        updated.set_director(Some(6), &people).unwrap();
        updated.remove_actor(4);
        index.sync(Some(&movie), Some(&updated));

        assert!(index.directed_movies(2).is_none());
        assert!(index.directed_movies(6).unwrap().contains("10"));
        assert!(index.acted_in_movies(4).is_none());
        assert!(index.acted_in_movies(3).unwrap().contains("10"));
    }

    #[test]
    fn delete_unlinks_everything() {
        let (_, movie) = fixture();
        let mut index = AssociationIndex::rebuild([&movie]);
        index.sync(Some(&movie), None);
        assert_eq!(index, AssociationIndex::default());
    }
}
