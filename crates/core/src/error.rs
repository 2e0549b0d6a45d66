use crate::violation::ConstraintViolation;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error(transparent)]
    Violation(#[from] ConstraintViolation),
}

impl CoreError {
    /// The constraint violation behind this error, if it is one.
    pub fn violation(&self) -> Option<&ConstraintViolation> {
        match self {
            CoreError::Violation(v) => Some(v),
            CoreError::NotFound { .. } => None,
        }
    }
}
