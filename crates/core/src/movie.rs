//! Movie entity.
//!
//! A movie owns its foreign keys: exactly one director and a set of actors,
//! both stored as person IDs and resolved against the registry's people when
//! assigned. The category is write-once and decides which of `episode_no` /
//! `about` must or must not be present.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::NaiveDate;

use crate::enumeration::MovieCategory;
use crate::person::{check_person_id_as_id_ref, People, PersonKind};
use crate::slots::{self, MovieSlots};
use crate::types::{MovieId, PersonId};
use crate::violation::{CheckResult, ConstraintViolation};

/// Maximum length of a movie title, in characters.
pub const MAX_TITLE_LENGTH: usize = 120;

/// Date of the first public film screening; no movie can be older.
pub const MIN_RELEASE_DATE: NaiveDate = match NaiveDate::from_ymd_opt(1895, 12, 28) {
    Some(d) => d,
    None => panic!("invalid minimum release date"),
};

/// All movies, keyed by ID.
pub type Movies = BTreeMap<MovieId, Movie>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movie {
    movie_id: MovieId,
    title: String,
    release_date: NaiveDate,
    director: PersonId,
    actors: BTreeSet<PersonId>,
    category: Option<MovieCategory>,
    episode_no: Option<i64>,
    about: Option<String>,
}

impl Movie {
    /// Build a movie from slots, checking every field.
    ///
    /// The category is assigned first so that `episodeNo` and `about` are
    /// checked against the category carried in the same slots.
    pub fn new(slots: &MovieSlots, people: &People, movies: &Movies) -> Result<Self, ConstraintViolation> {
        let movie_id = slots::movie_id(slots.movie_id.as_ref())?;
        check_movie_id_as_id(movie_id.as_deref(), movies)?;

        let title = slots::text(slots.title.as_deref());
        check_title(title)?;

        let release_date = slots::date("release date", slots.release_date.as_ref())?;
        check_release_date(release_date)?;

        let director = slots::single_id_ref("director", slots.director.as_ref())?;
        check_director(director, people)?;

        let actor_ids = slots::id_refs("actor", slots.actor.as_ref())?;
        for id in &actor_ids {
            check_actor(Some(*id), people)?;
        }

        let category_code = slots::integer("category", slots.category.as_ref())?;
        check_category(category_code, None)?;
        let category = category_code.and_then(category_from_code);

        let episode_no = slots::integer("episode number", slots.episode_no.as_ref())?;
        check_episode_no(episode_no, category)?;

        let about = slots::text(slots.about.as_deref());
        check_about(about, category)?;

        let (Some(movie_id), Some(title), Some(release_date), Some(director)) =
            (movie_id, title, release_date, director)
        else {
            return Err(ConstraintViolation::mandatory(
                "A movie ID, title, release date and director are required!",
            ));
        };
        Ok(Self {
            movie_id,
            title: title.to_string(),
            release_date,
            director,
            actors: actor_ids.into_iter().collect(),
            category,
            episode_no,
            about: about.map(str::to_string),
        })
    }

    pub fn movie_id(&self) -> &str {
        &self.movie_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn release_date(&self) -> NaiveDate {
        self.release_date
    }

    pub fn director(&self) -> PersonId {
        self.director
    }

    pub fn actors(&self) -> &BTreeSet<PersonId> {
        &self.actors
    }

    pub fn category(&self) -> Option<MovieCategory> {
        self.category
    }

    pub fn episode_no(&self) -> Option<i64> {
        self.episode_no
    }

    pub fn about(&self) -> Option<&str> {
        self.about.as_deref()
    }

    pub fn set_title(&mut self, title: &str) -> CheckResult {
        let title = slots::text(Some(title));
        check_title(title)?;
        if let Some(title) = title {
            self.title = title.to_string();
        }
        Ok(())
    }

    pub fn set_release_date(&mut self, date: Option<NaiveDate>) -> CheckResult {
        check_release_date(date)?;
        if let Some(date) = date {
            self.release_date = date;
        }
        Ok(())
    }

    /// Point the movie at another director. A movie always has exactly one,
    /// so clearing it is a mandatory-value violation.
    pub fn set_director(&mut self, director: Option<PersonId>, people: &People) -> CheckResult {
        check_director(director, people)?;
        if let Some(id) = director {
            self.director = id;
        }
        Ok(())
    }

    /// Replace the actor set. Every ID is checked before anything changes.
    pub fn set_actors(&mut self, actor_ids: &[PersonId], people: &People) -> CheckResult {
        for id in actor_ids {
            check_actor(Some(*id), people)?;
        }
        self.actors = actor_ids.iter().copied().collect();
        Ok(())
    }

    pub fn add_actor(&mut self, actor_id: PersonId, people: &People) -> CheckResult {
        check_actor(Some(actor_id), people)?;
        self.actors.insert(actor_id);
        Ok(())
    }

    /// Returns `true` if the actor was in the set.
    pub fn remove_actor(&mut self, actor_id: PersonId) -> bool {
        self.actors.remove(&actor_id)
    }

    /// Assign the category. Succeeds once; any later assignment is frozen.
    pub fn set_category(&mut self, code: Option<i64>) -> CheckResult {
        check_category(code, self.category)?;
        self.category = code.and_then(category_from_code);
        Ok(())
    }

    pub fn set_episode_no(&mut self, episode_no: Option<i64>) -> CheckResult {
        check_episode_no(episode_no, self.category)?;
        self.episode_no = episode_no;
        Ok(())
    }

    pub fn set_about(&mut self, about: Option<&str>) -> CheckResult {
        let about = slots::text(about);
        check_about(about, self.category)?;
        self.about = about.map(str::to_string);
        Ok(())
    }

    /// Re-check the category-dependent fields against the current category.
    pub fn check_category_fields(&self) -> CheckResult {
        check_episode_no(self.episode_no, self.category)?;
        check_about(self.about.as_deref(), self.category)
    }
}

impl fmt::Display for Movie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Movie{{ movieId: {}, title: {}, releaseDate: {}, director: {}, actors: {:?}",
            self.movie_id, self.title, self.release_date, self.director, self.actors
        )?;
        match self.category {
            Some(MovieCategory::TvSeriesEpisode) => {
                if let Some(ep) = self.episode_no {
                    write!(f, ", TV series episode no. {ep}")?;
                }
            }
            Some(MovieCategory::Biography) => {
                if let Some(about) = &self.about {
                    write!(f, ", biography about {about}")?;
                }
            }
            None => {}
        }
        f.write_str(" }")
    }
}

fn category_from_code(code: i64) -> Option<MovieCategory> {
    u8::try_from(code).ok().and_then(MovieCategory::from_code)
}

pub fn check_movie_id(id: Option<&str>) -> CheckResult {
    match id {
        Some(id) if !id.trim().is_empty() => Ok(()),
        _ => Err(ConstraintViolation::mandatory(
            "A value for the movie ID must be provided!",
        )),
    }
}

pub fn check_movie_id_as_id(id: Option<&str>, movies: &Movies) -> CheckResult {
    check_movie_id(id)?;
    match id {
        Some(id) if movies.contains_key(id) => Err(ConstraintViolation::uniqueness(format!(
            "There is already a movie record with movie ID {id}!"
        ))),
        _ => Ok(()),
    }
}

pub fn check_title(title: Option<&str>) -> CheckResult {
    match title {
        Some(t) if t.trim().is_empty() => Err(ConstraintViolation::mandatory(
            "A title must be provided!",
        )),
        None => Err(ConstraintViolation::mandatory("A title must be provided!")),
        Some(t) if t.chars().count() > MAX_TITLE_LENGTH => Err(ConstraintViolation::range(
            format!("The title must not be longer than {MAX_TITLE_LENGTH} characters!"),
        )),
        Some(_) => Ok(()),
    }
}

pub fn check_release_date(date: Option<NaiveDate>) -> CheckResult {
    match date {
        None => Err(ConstraintViolation::mandatory(
            "A release date must be provided!",
        )),
        Some(d) if d < MIN_RELEASE_DATE => Err(ConstraintViolation::interval(format!(
            "The release date must not be before {MIN_RELEASE_DATE}!"
        ))),
        Some(_) => Ok(()),
    }
}

pub fn check_director(director: Option<PersonId>, people: &People) -> CheckResult {
    if director.is_none() {
        return Err(ConstraintViolation::mandatory(
            "A director must be provided!",
        ));
    }
    check_person_id_as_id_ref(director, Some(PersonKind::Director), people)
}

pub fn check_actor(actor: Option<PersonId>, people: &People) -> CheckResult {
    check_person_id_as_id_ref(actor, Some(PersonKind::Actor), people)
}

/// `current` is the category already committed on the movie, if any.
pub fn check_category(code: Option<i64>, current: Option<MovieCategory>) -> CheckResult {
    if let Some(current) = current {
        return Err(ConstraintViolation::frozen(format!(
            "The category is already set to '{current}' and cannot be changed!"
        )));
    }
    match code {
        Some(c) if category_from_code(c).is_none() => {
            let codes: Vec<_> = MovieCategory::all().map(MovieCategory::code).collect();
            Err(ConstraintViolation::range(format!(
                "The category must be an integer between 1 and {} ({})!",
                MovieCategory::MAX,
                MovieCategory::labels_for_codes(&codes)
            )))
        }
        _ => Ok(()),
    }
}

/// `category` is the target category the value is assigned under.
pub fn check_episode_no(episode_no: Option<i64>, category: Option<MovieCategory>) -> CheckResult {
    match (category, episode_no) {
        (Some(MovieCategory::TvSeriesEpisode), None) => Err(ConstraintViolation::mandatory(
            "A TV series episode must have an episode number!",
        )),
        (Some(MovieCategory::TvSeriesEpisode), Some(n)) if n <= 0 => Err(
            ConstraintViolation::range("The episode number must be a positive integer!"),
        ),
        (Some(MovieCategory::TvSeriesEpisode), Some(_)) | (_, None) => Ok(()),
        (_, Some(_)) => Err(ConstraintViolation::range(
            "An episode number must not be provided if the movie is not a TV series episode!",
        )),
    }
}

/// `category` is the target category the value is assigned under.
pub fn check_about(about: Option<&str>, category: Option<MovieCategory>) -> CheckResult {
    let about = about.filter(|a| !a.trim().is_empty());
    match (category, about) {
        (Some(MovieCategory::Biography), None) => Err(ConstraintViolation::mandatory(
            "A biography must say whom it is about!",
        )),
        (Some(MovieCategory::Biography), Some(_)) | (_, None) => Ok(()),
        (_, Some(_)) => Err(ConstraintViolation::range(
            "An 'about' value must not be provided if the movie is not a biography!",
        )),
    }
}
