//! Persisted record structs.
//!
//! Each submodule contains a `Serialize` + `Deserialize` record matching one
//! entry of a stored collection, a `From<&Entity>` conversion for saving, and
//! a `to_slots` conversion that feeds the record back through the validating
//! constructor on load.

pub mod movie;
pub mod person;
