/// Person identifiers are positive integers.
pub type PersonId = i64;

/// Movie identifiers are free-form, non-empty strings.
pub type MovieId = String;
