//! Person record, shared by the `people`, `directors` and `actors`
//! collections.

use reelbase_core::person::Person;
use reelbase_core::slots::PersonSlots;
use reelbase_core::types::PersonId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One stored person. Back-references are derived and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRecord {
    pub person_id: PersonId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<PersonId>,
}

impl From<&Person> for PersonRecord {
    fn from(person: &Person) -> Self {
        Self {
            person_id: person.person_id(),
            name: person.name().to_string(),
            agent: person.agent(),
        }
    }
}

impl PersonRecord {
    pub fn to_slots(&self) -> PersonSlots {
        PersonSlots {
            person_id: Some(Value::from(self.person_id)),
            name: Some(self.name.clone()),
            agent: self.agent.map(Value::from),
        }
    }
}
