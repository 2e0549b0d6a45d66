//! Constraint-violation taxonomy.
//!
//! Every check function returns a [`CheckResult`]: `Ok(())` means no
//! violation, `Err` carries exactly one [`ConstraintViolation`] variant with a
//! human-readable message.

use serde::Serialize;

/// Outcome of a single property check.
pub type CheckResult = Result<(), ConstraintViolation>;

/// A rejected property value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstraintViolation {
    #[error("Mandatory value violation: {0}")]
    MandatoryValue(String),

    #[error("Range violation: {0}")]
    Range(String),

    #[error("Pattern violation: {0}")]
    Pattern(String),

    #[error("Uniqueness violation: {0}")]
    Uniqueness(String),

    #[error("Referential integrity violation: {0}")]
    ReferentialIntegrity(String),

    #[error("Frozen value violation: {0}")]
    FrozenValue(String),

    #[error("Interval violation: {0}")]
    Interval(String),
}

/// Variant tag of a [`ConstraintViolation`], used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    MandatoryValue,
    Range,
    Pattern,
    Uniqueness,
    ReferentialIntegrity,
    FrozenValue,
    Interval,
}

impl ConstraintViolation {
    pub fn mandatory(msg: impl Into<String>) -> Self {
        Self::MandatoryValue(msg.into())
    }

    pub fn range(msg: impl Into<String>) -> Self {
        Self::Range(msg.into())
    }

    pub fn pattern(msg: impl Into<String>) -> Self {
        Self::Pattern(msg.into())
    }

    pub fn uniqueness(msg: impl Into<String>) -> Self {
        Self::Uniqueness(msg.into())
    }

    pub fn referential_integrity(msg: impl Into<String>) -> Self {
        Self::ReferentialIntegrity(msg.into())
    }

    pub fn frozen(msg: impl Into<String>) -> Self {
        Self::FrozenValue(msg.into())
    }

    pub fn interval(msg: impl Into<String>) -> Self {
        Self::Interval(msg.into())
    }

    pub fn kind(&self) -> ViolationKind {
        match self {
            Self::MandatoryValue(_) => ViolationKind::MandatoryValue,
            Self::Range(_) => ViolationKind::Range,
            Self::Pattern(_) => ViolationKind::Pattern,
            Self::Uniqueness(_) => ViolationKind::Uniqueness,
            Self::ReferentialIntegrity(_) => ViolationKind::ReferentialIntegrity,
            Self::FrozenValue(_) => ViolationKind::FrozenValue,
            Self::Interval(_) => ViolationKind::Interval,
        }
    }

    /// The message without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::MandatoryValue(m)
            | Self::Range(m)
            | Self::Pattern(m)
            | Self::Uniqueness(m)
            | Self::ReferentialIntegrity(m)
            | Self::FrozenValue(m)
            | Self::Interval(m) => m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_message() {
        let v = ConstraintViolation::frozen("The category must not be changed");
        assert_eq!(
            v.to_string(),
            "Frozen value violation: The category must not be changed"
        );
    }

    #[test]
    fn kind_and_message_accessors() {
        let v = ConstraintViolation::interval("too early");
        assert_eq!(v.kind(), ViolationKind::Interval);
        assert_eq!(v.message(), "too early");
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&ViolationKind::ReferentialIntegrity).unwrap();
        assert_eq!(json, "\"referential_integrity\"");
    }
}
