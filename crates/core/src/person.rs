//! Person entity and its Director / Actor subtypes.
//!
//! All three kinds live in one registry keyed by person ID; the concrete
//! subtype is carried as a [`PersonKind`] tag. Director and Actor have no
//! stored payload of their own: their `directedMovies` / `actedInMovies`
//! back-references are derived by [`AssociationIndex`].
//!
//! [`AssociationIndex`]: crate::associations::AssociationIndex

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::slots::{self, PersonSlots};
use crate::types::PersonId;
use crate::violation::{CheckResult, ConstraintViolation};

/// Maximum length of a person's name, in characters.
pub const MAX_NAME_LENGTH: usize = 120;

/// All people, keyed by ID.
pub type People = BTreeMap<PersonId, Person>;

/// Concrete subtype of a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonKind {
    Person,
    Director,
    Actor,
}

impl PersonKind {
    pub const ALL: [PersonKind; 3] = [PersonKind::Person, PersonKind::Director, PersonKind::Actor];

    pub fn as_str(self) -> &'static str {
        match self {
            PersonKind::Person => "person",
            PersonKind::Director => "director",
            PersonKind::Actor => "actor",
        }
    }
}

impl fmt::Display for PersonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    person_id: PersonId,
    name: String,
    agent: Option<PersonId>,
    kind: PersonKind,
}

impl Person {
    /// Build a person of `kind` from slots, checking every field.
    ///
    /// The ID must be fresh in `people`.
    pub fn new(
        kind: PersonKind,
        slots: &PersonSlots,
        people: &People,
    ) -> Result<Self, ConstraintViolation> {
        let person_id = slots::integer("person ID", slots.person_id.as_ref())?;
        check_person_id_as_id(person_id, kind, people)?;
        let name = slots::text(slots.name.as_deref());
        check_name(name)?;
        let agent = slots::integer("agent", slots.agent.as_ref())?;
        check_agent(agent)?;

        // Checked above; both are present.
        let (Some(person_id), Some(name)) = (person_id, name) else {
            return Err(ConstraintViolation::mandatory("A person ID and name are required!"));
        };
        Ok(Self {
            person_id,
            name: name.to_string(),
            agent,
            kind,
        })
    }

    pub fn person_id(&self) -> PersonId {
        self.person_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn agent(&self) -> Option<PersonId> {
        self.agent
    }

    pub fn kind(&self) -> PersonKind {
        self.kind
    }

    pub fn set_name(&mut self, name: &str) -> CheckResult {
        let name = slots::text(Some(name));
        check_name(name)?;
        if let Some(name) = name {
            self.name = name.to_string();
        }
        Ok(())
    }

    /// Set or clear the informational agent reference.
    pub fn set_agent(&mut self, agent: Option<PersonId>) -> CheckResult {
        check_agent(agent)?;
        self.agent = agent;
        Ok(())
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{ personId: {}, name: {}", self.kind, self.person_id, self.name)?;
        if let Some(agent) = self.agent {
            write!(f, ", agent: {agent}")?;
        }
        f.write_str(" }")
    }
}

pub fn check_person_id(id: Option<PersonId>) -> CheckResult {
    match id {
        None => Err(ConstraintViolation::mandatory(
            "A value for the person ID must be provided!",
        )),
        Some(id) if id <= 0 => Err(ConstraintViolation::range(
            "The person ID must be a positive integer!",
        )),
        Some(_) => Ok(()),
    }
}

/// Check a person ID for use as the identifier of a new `kind` instance.
///
/// IDs are unique across the whole registry, so an ID held by a person of
/// another kind is rejected too.
pub fn check_person_id_as_id(id: Option<PersonId>, kind: PersonKind, people: &People) -> CheckResult {
    check_person_id(id)?;
    if let Some(existing) = id.and_then(|id| people.get(&id)) {
        return Err(ConstraintViolation::uniqueness(format!(
            "There is already a {} record with person ID {} (cannot add {kind})!",
            existing.kind, existing.person_id
        )));
    }
    Ok(())
}

/// Check that `id` references an existing person, of `kind` when given.
pub fn check_person_id_as_id_ref(
    id: Option<PersonId>,
    kind: Option<PersonKind>,
    people: &People,
) -> CheckResult {
    check_person_id(id)?;
    let Some(id) = id else {
        return Ok(());
    };
    match (people.get(&id), kind) {
        (None, _) => Err(ConstraintViolation::referential_integrity(format!(
            "There is no person record with person ID {id}!"
        ))),
        (Some(p), Some(kind)) if p.kind != kind => {
            Err(ConstraintViolation::referential_integrity(format!(
                "Person {id} is a {}, not a {kind}!",
                p.kind
            )))
        }
        _ => Ok(()),
    }
}

pub fn check_name(name: Option<&str>) -> CheckResult {
    match name {
        None => Err(ConstraintViolation::mandatory("A name must be provided!")),
        Some(n) if n.trim().is_empty() => {
            Err(ConstraintViolation::mandatory("A name must be provided!"))
        }
        Some(n) if n.chars().count() > MAX_NAME_LENGTH => Err(ConstraintViolation::range(
            format!("The name must not be longer than {MAX_NAME_LENGTH} characters!"),
        )),
        Some(_) => Ok(()),
    }
}

/// The agent is optional and not checked for existence.
pub fn check_agent(agent: Option<PersonId>) -> CheckResult {
    match agent {
        Some(id) if id <= 0 => Err(ConstraintViolation::range(
            "The agent must be referenced by a positive person ID!",
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn slots(value: serde_json::Value) -> PersonSlots {
        serde_json::from_value(value).unwrap()
    }

    fn people_with(kind: PersonKind, id: PersonId) -> People {
        let mut people = People::new();
        let p = Person::new(kind, &slots(json!({"personId": id, "name": "Existing"})), &people)
            .unwrap();
        people.insert(id, p);
        people
    }

    #[test]
    fn new_person_from_string_id() {
        let p = Person::new(
            PersonKind::Director,
            &slots(json!({"personId": "5", "name": "Stephen Frears", "agent": 9})),
            &People::new(),
        )
        .unwrap();
        assert_eq!(p.person_id(), 5);
        assert_eq!(p.name(), "Stephen Frears");
        assert_eq!(p.agent(), Some(9));
        assert_eq!(p.kind(), PersonKind::Director);
    }

    #[test]
    fn id_as_id_rejects_non_positive_and_missing() {
        let people = People::new();
        assert_matches!(
            check_person_id_as_id(Some(0), PersonKind::Person, &people),
            Err(ConstraintViolation::Range(_))
        );
        assert_matches!(
            check_person_id_as_id(Some(-4), PersonKind::Actor, &people),
            Err(ConstraintViolation::Range(_))
        );
        assert_matches!(
            check_person_id_as_id(None, PersonKind::Actor, &people),
            Err(ConstraintViolation::MandatoryValue(_))
        );
    }

    #[test]
    fn id_as_id_rejects_non_integer_slot() {
        let result = Person::new(
            PersonKind::Actor,
            &slots(json!({"personId": "x1", "name": "A"})),
            &People::new(),
        );
        assert_matches!(result, Err(ConstraintViolation::Range(_)));
    }

    #[test]
    fn id_as_id_rejects_used_id_and_accepts_fresh() {
        let people = people_with(PersonKind::Actor, 3);
        assert_matches!(
            check_person_id_as_id(Some(3), PersonKind::Actor, &people),
            Err(ConstraintViolation::Uniqueness(_))
        );
        assert_matches!(
            check_person_id_as_id(Some(3), PersonKind::Director, &people),
            Err(ConstraintViolation::Uniqueness(_))
        );
        assert!(check_person_id_as_id(Some(4), PersonKind::Actor, &people).is_ok());
    }

    #[test]
    fn id_ref_requires_existing_person_of_kind() {
        let people = people_with(PersonKind::Director, 2);
        assert!(check_person_id_as_id_ref(Some(2), Some(PersonKind::Director), &people).is_ok());
        assert!(check_person_id_as_id_ref(Some(2), None, &people).is_ok());
        assert_matches!(
            check_person_id_as_id_ref(Some(2), Some(PersonKind::Actor), &people),
            Err(ConstraintViolation::ReferentialIntegrity(_))
        );
        assert_matches!(
            check_person_id_as_id_ref(Some(8), None, &people),
            Err(ConstraintViolation::ReferentialIntegrity(_))
        );
    }

    #[test]
    fn name_is_mandatory_and_bounded() {
        assert_matches!(check_name(None), Err(ConstraintViolation::MandatoryValue(_)));
        assert_matches!(check_name(Some("  ")), Err(ConstraintViolation::MandatoryValue(_)));
        let long = "x".repeat(MAX_NAME_LENGTH + 1);
        assert_matches!(check_name(Some(&long)), Err(ConstraintViolation::Range(_)));
        assert!(check_name(Some(&"x".repeat(MAX_NAME_LENGTH))).is_ok());
    }

    #[test]
    fn failed_setter_leaves_value_unchanged() {
        let mut p = Person::new(
            PersonKind::Person,
            &slots(json!({"personId": 1, "name": "Ann"})),
            &People::new(),
        )
        .unwrap();
        assert!(p.set_name("").is_err());
        assert_eq!(p.name(), "Ann");
        assert!(p.set_agent(Some(-1)).is_err());
        assert_eq!(p.agent(), None);
        p.set_agent(Some(7)).unwrap();
        p.set_name("Anne").unwrap();
        assert_eq!((p.name(), p.agent()), ("Anne", Some(7)));
    }
}
