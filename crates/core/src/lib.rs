//! Domain model for the reelbase movie catalog.
//!
//! Pure logic only: entity types, their check/set validation gate, the
//! derived movie/person association index, and the in-memory [`Registry`]
//! that owns every collection. Persistence lives in `reelbase-db`.
//!
//! [`Registry`]: registry::Registry

pub mod associations;
pub mod enumeration;
pub mod error;
pub mod movie;
pub mod person;
pub mod registry;
pub mod slots;
pub mod types;
pub mod violation;
