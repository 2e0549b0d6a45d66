//! Movie record for the `movies` collection.

use chrono::NaiveDate;
use reelbase_core::enumeration::EnumCode;
use reelbase_core::movie::Movie;
use reelbase_core::slots::MovieSlots;
use reelbase_core::types::{MovieId, PersonId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One stored movie, with director and actors flattened to person IDs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieRecord {
    #[serde(alias = "movieID")]
    pub movie_id: MovieId,
    pub title: String,
    /// Serialized as `YYYY-MM-DD`.
    pub release_date: NaiveDate,
    pub director: PersonId,
    #[serde(default, alias = "actors")]
    pub actor: Vec<PersonId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<EnumCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_no: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
}

impl From<&Movie> for MovieRecord {
    fn from(movie: &Movie) -> Self {
        Self {
            movie_id: movie.movie_id().to_string(),
            title: movie.title().to_string(),
            release_date: movie.release_date(),
            director: movie.director(),
            actor: movie.actors().iter().copied().collect(),
            category: movie.category().map(|c| c.code()),
            episode_no: movie.episode_no(),
            about: movie.about().map(str::to_string),
        }
    }
}

impl MovieRecord {
    pub fn to_slots(&self) -> MovieSlots {
        MovieSlots {
            movie_id: Some(Value::from(self.movie_id.clone())),
            title: Some(self.title.clone()),
            release_date: Some(Value::from(self.release_date.format("%Y-%m-%d").to_string())),
            director: Some(Value::from(self.director)),
            actor: Some(Value::from(self.actor.clone())),
            actor_id_refs_to_add: None,
            actor_id_refs_to_remove: None,
            category: self.category.map(Value::from),
            episode_no: self.episode_no.map(Value::from),
            about: self.about.clone(),
        }
    }
}
