//! Custom error types for the VDF ledger
//!
//! This module defines the error hierarchy for the crate using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for VDF ledger operations
#[derive(Error, Debug)]
pub enum VdfError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors (family configs, deposit categories)
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// A contribution row already exists for this family and month
    #[error("Contribution already recorded for family {family} in {month}")]
    DuplicateContribution { family: String, month: String },

    /// An exemption already exists for this family and month
    #[error("Exemption already granted for family {family} in {month}")]
    DuplicateExemption { family: String, month: String },

    /// The family's contribution flag is off
    #[error("Contributions are not enabled for family: {0}")]
    ContributionsDisabled(String),

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl VdfError {
    /// Create a "not found" error for family configs
    pub fn family_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Family",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for members
    pub fn member_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Member",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for exemptions
    pub fn exemption_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Exemption",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for deposit categories
    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Deposit category",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for contributions
    pub fn contribution_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Contribution",
            identifier: identifier.into(),
        }
    }

    /// Create a duplicate-contribution error
    pub fn duplicate_contribution(family: impl Into<String>, month: impl Into<String>) -> Self {
        Self::DuplicateContribution {
            family: family.into(),
            month: month.into(),
        }
    }

    /// Create a duplicate-exemption error
    pub fn duplicate_exemption(family: impl Into<String>, month: impl Into<String>) -> Self {
        Self::DuplicateExemption {
            family: family.into(),
            month: month.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is one of the duplicate-row errors
    pub fn is_duplicate(&self) -> bool {
        matches!(
            self,
            Self::Duplicate { .. } | Self::DuplicateContribution { .. } | Self::DuplicateExemption { .. }
        )
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for VdfError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for VdfError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for VDF ledger operations
pub type VdfResult<T> = Result<T, VdfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VdfError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = VdfError::family_not_found("fam-1a2b3c4d");
        assert_eq!(err.to_string(), "Family not found: fam-1a2b3c4d");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_duplicate_contribution_error() {
        let err = VdfError::duplicate_contribution("Rahim Uddin", "2024-05");
        assert_eq!(
            err.to_string(),
            "Contribution already recorded for family Rahim Uddin in 2024-05"
        );
        assert!(err.is_duplicate());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_contributions_disabled_error() {
        let err = VdfError::ContributionsDisabled("Rahim Uddin".into());
        assert_eq!(
            err.to_string(),
            "Contributions are not enabled for family: Rahim Uddin"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let vdf_err: VdfError = io_err.into();
        assert!(matches!(vdf_err, VdfError::Io(_)));
    }
}
