//! Slot records and coercion of loosely-typed slot values.
//!
//! Slot records arrive the way forms submit them: every field optional,
//! numbers possibly as strings, references possibly as lists or ID-keyed
//! maps. The coercion helpers turn one raw value into a typed candidate or a
//! [`ConstraintViolation`]; they never decide whether a value is mandatory.
//! An absent field, JSON `null` and an empty string all coerce to `None`.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::types::{MovieId, PersonId};
use crate::violation::ConstraintViolation;

/// Candidate fields for creating or updating a person of any kind.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonSlots {
    #[serde(default)]
    pub person_id: Option<Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub agent: Option<Value>,
}

/// Candidate fields for creating or updating a movie.
///
/// `actor` replaces the whole actor set; `actor_id_refs_to_add` and
/// `actor_id_refs_to_remove` edit it incrementally on update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieSlots {
    #[serde(default, alias = "movieID")]
    pub movie_id: Option<Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub release_date: Option<Value>,
    #[serde(default)]
    pub director: Option<Value>,
    #[serde(default, alias = "actors")]
    pub actor: Option<Value>,
    #[serde(default)]
    pub actor_id_refs_to_add: Option<Value>,
    #[serde(default)]
    pub actor_id_refs_to_remove: Option<Value>,
    #[serde(default)]
    pub category: Option<Value>,
    #[serde(default)]
    pub episode_no: Option<Value>,
    #[serde(default)]
    pub about: Option<String>,
}

static INTEGER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d+$").expect("valid regex"));

/// `YYYY-MM-DD`, checked before calendar parsing so malformed input is a
/// pattern violation rather than a range one.
static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Trimmed text, or `None` when absent or blank.
pub fn text(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// An integer given as a JSON integer or an integer string.
pub fn integer(field: &str, value: Option<&Value>) -> Result<Option<i64>, ConstraintViolation> {
    let value = match value {
        Some(v) if !is_blank(v) => v,
        _ => return Ok(None),
    };
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| ConstraintViolation::range(format!("The {field} must be an integer!"))),
        Value::String(s) if INTEGER_RE.is_match(s.trim()) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| ConstraintViolation::range(format!("The {field} is out of range!"))),
        _ => Err(ConstraintViolation::range(format!(
            "The {field} must be an integer!"
        ))),
    }
}

/// A movie ID given as a string or a JSON integer.
pub fn movie_id(value: Option<&Value>) -> Result<Option<MovieId>, ConstraintViolation> {
    match value {
        None => Ok(None),
        Some(v) if is_blank(v) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Err(ConstraintViolation::range(
            "The movie ID must be a string!",
        )),
    }
}

/// A calendar date in `YYYY-MM-DD` form.
pub fn date(field: &str, value: Option<&Value>) -> Result<Option<NaiveDate>, ConstraintViolation> {
    let raw = match value {
        None => return Ok(None),
        Some(v) if is_blank(v) => return Ok(None),
        Some(Value::String(s)) => s.trim(),
        Some(_) => {
            return Err(ConstraintViolation::pattern(format!(
                "The {field} must be a date string of the form YYYY-MM-DD!"
            )))
        }
    };
    if !DATE_RE.is_match(raw) {
        return Err(ConstraintViolation::pattern(format!(
            "The {field} must be a date string of the form YYYY-MM-DD!"
        )));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ConstraintViolation::range(format!("The {field} '{raw}' is not a valid date!")))
}

/// A single person ID reference: a bare ID, an array of one ID, or an
/// ID-keyed object with one entry.
pub fn single_id_ref(
    field: &str,
    value: Option<&Value>,
) -> Result<Option<PersonId>, ConstraintViolation> {
    let refs = id_refs(field, value)?;
    match refs.as_slice() {
        [] => Ok(None),
        [id] => Ok(Some(*id)),
        _ => Err(ConstraintViolation::range(format!(
            "The {field} must reference exactly one person!"
        ))),
    }
}

/// A list of person ID references: an array of IDs, an ID-keyed object, or a
/// single ID. Order is preserved; duplicates are kept for the caller to fold.
pub fn id_refs(field: &str, value: Option<&Value>) -> Result<Vec<PersonId>, ConstraintViolation> {
    let value = match value {
        Some(v) if !is_blank(v) => v,
        _ => return Ok(Vec::new()),
    };
    match value {
        Value::Array(items) => items
            .iter()
            .filter(|v| !is_blank(v))
            .map(|v| integer(field, Some(v)).map(Option::unwrap_or_default))
            .collect(),
        Value::Object(map) => map
            .keys()
            .map(|k| {
                integer(field, Some(&Value::String(k.clone()))).and_then(|id| {
                    id.ok_or_else(|| {
                        ConstraintViolation::range(format!("The {field} key must be an integer!"))
                    })
                })
            })
            .collect(),
        scalar => Ok(integer(field, Some(scalar))?.into_iter().collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn integer_accepts_numbers_and_numeric_strings() {
        assert_eq!(integer("person ID", Some(&json!(7))).unwrap(), Some(7));
        assert_eq!(integer("person ID", Some(&json!(" 12 "))).unwrap(), Some(12));
        assert_eq!(integer("person ID", Some(&json!(-3))).unwrap(), Some(-3));
    }

    #[test]
    fn integer_treats_blank_as_absent() {
        assert_eq!(integer("agent", None).unwrap(), None);
        assert_eq!(integer("agent", Some(&json!(null))).unwrap(), None);
        assert_eq!(integer("agent", Some(&json!(""))).unwrap(), None);
    }

    #[test]
    fn integer_rejects_fractions_and_words() {
        assert_matches!(
            integer("person ID", Some(&json!(1.5))),
            Err(ConstraintViolation::Range(_))
        );
        assert_matches!(
            integer("person ID", Some(&json!("abc"))),
            Err(ConstraintViolation::Range(_))
        );
        assert_matches!(
            integer("person ID", Some(&json!(true))),
            Err(ConstraintViolation::Range(_))
        );
    }

    #[test]
    fn movie_id_accepts_numbers() {
        assert_eq!(movie_id(Some(&json!(10))).unwrap().as_deref(), Some("10"));
        assert_eq!(movie_id(Some(&json!("m1"))).unwrap().as_deref(), Some("m1"));
        assert_eq!(movie_id(Some(&json!(" "))).unwrap(), None);
    }

    #[test]
    fn date_requires_pattern_then_valid_calendar_day() {
        assert_eq!(
            date("release date", Some(&json!("1999-01-01"))).unwrap(),
            NaiveDate::from_ymd_opt(1999, 1, 1)
        );
        assert_matches!(
            date("release date", Some(&json!("01/01/1999"))),
            Err(ConstraintViolation::Pattern(_))
        );
        assert_matches!(
            date("release date", Some(&json!(1999))),
            Err(ConstraintViolation::Pattern(_))
        );
        assert_matches!(
            date("release date", Some(&json!("2021-02-30"))),
            Err(ConstraintViolation::Range(_))
        );
    }

    #[test]
    fn single_id_ref_accepts_all_reference_shapes() {
        assert_eq!(single_id_ref("director", Some(&json!(2))).unwrap(), Some(2));
        assert_eq!(single_id_ref("director", Some(&json!([2]))).unwrap(), Some(2));
        assert_eq!(single_id_ref("director", Some(&json!(["2"]))).unwrap(), Some(2));
        assert_eq!(
            single_id_ref("director", Some(&json!({"2": {"name": "x"}}))).unwrap(),
            Some(2)
        );
        assert_eq!(single_id_ref("director", Some(&json!([]))).unwrap(), None);
    }

    #[test]
    fn single_id_ref_rejects_multiple() {
        assert_matches!(
            single_id_ref("director", Some(&json!([2, 3]))),
            Err(ConstraintViolation::Range(_))
        );
    }

    #[test]
    fn id_refs_from_array_object_and_scalar() {
        assert_eq!(id_refs("actor", Some(&json!([3, "4"]))).unwrap(), vec![3, 4]);
        assert_eq!(
            id_refs("actor", Some(&json!({"3": {}, "4": {}}))).unwrap(),
            vec![3, 4]
        );
        assert_eq!(id_refs("actor", Some(&json!(5))).unwrap(), vec![5]);
        assert!(id_refs("actor", None).unwrap().is_empty());
    }

    #[test]
    fn id_refs_rejects_bad_keys() {
        assert_matches!(
            id_refs("actor", Some(&json!({"x": {}}))),
            Err(ConstraintViolation::Range(_))
        );
    }

    #[test]
    fn slots_deserialize_from_camel_case() {
        let slots: MovieSlots = serde_json::from_value(json!({
            "movieID": "10",
            "title": "T",
            "releaseDate": "1999-01-01",
            "director": [2],
            "actors": [3, 4],
            "episodeNo": "3"
        }))
        .unwrap();
        assert_eq!(slots.movie_id, Some(json!("10")));
        assert_eq!(slots.actor, Some(json!([3, 4])));
        assert_eq!(slots.episode_no, Some(json!("3")));

        let person: PersonSlots =
            serde_json::from_value(json!({"personId": 1, "name": "Ann"})).unwrap();
        assert_eq!(person.person_id, Some(json!(1)));
        assert_eq!(person.agent, None);
    }
}
