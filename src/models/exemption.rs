//! Exemption model
//!
//! An administrative waiver removing one family's obligation for one month.
//! Exempted months vanish from the dues denominator entirely; they are not
//! counted as zero-due.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{FamilyId, MemberId};
use super::month::MonthYear;

/// A waiver for one (family, month) pair
///
/// At most one exemption may exist per pair; the pair is also how deletions
/// address it, so the record carries no surrogate id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exemption {
    /// The exempted family
    pub family_id: FamilyId,

    /// The exempted month
    pub month: MonthYear,

    /// Why the waiver was granted
    pub reason: String,

    /// Who granted it, when recorded
    pub granted_by: Option<MemberId>,

    /// When the waiver was recorded
    pub created_at: DateTime<Utc>,
}

impl Exemption {
    /// Create a new exemption
    pub fn new(family_id: FamilyId, month: MonthYear, reason: impl Into<String>) -> Self {
        Self {
            family_id,
            month,
            reason: reason.into(),
            granted_by: None,
            created_at: Utc::now(),
        }
    }

    /// Create a new exemption recording who granted it
    pub fn with_granter(
        family_id: FamilyId,
        month: MonthYear,
        reason: impl Into<String>,
        granted_by: MemberId,
    ) -> Self {
        let mut exemption = Self::new(family_id, month, reason);
        exemption.granted_by = Some(granted_by);
        exemption
    }

    /// The uniqueness key
    pub fn key(&self) -> (FamilyId, MonthYear) {
        (self.family_id, self.month)
    }

    /// Validate the exemption
    pub fn validate(&self) -> Result<(), ExemptionValidationError> {
        if self.reason.trim().is_empty() {
            return Err(ExemptionValidationError::EmptyReason);
        }
        Ok(())
    }
}

impl fmt::Display for Exemption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} exempt for {}", self.family_id, self.month)
    }
}

/// Validation errors for exemptions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExemptionValidationError {
    EmptyReason,
}

impl fmt::Display for ExemptionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyReason => write!(f, "Exemption reason cannot be empty"),
        }
    }
}

impl std::error::Error for ExemptionValidationError {}
