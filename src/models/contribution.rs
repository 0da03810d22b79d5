//! Contribution model
//!
//! One recorded monthly payment by a family. The ledger allows at most one
//! row per (family, month); outside the bulk-reconciliation path a second
//! posting for the same month must fail, never overwrite.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{ContributionId, FamilyId};
use super::money::Money;
use super::month::MonthYear;

/// A single month's recorded payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contribution {
    /// Unique identifier
    pub id: ContributionId,

    /// The paying family
    pub family_id: FamilyId,

    /// The month this payment covers
    pub month: MonthYear,

    /// Amount paid
    pub amount: Money,

    /// The date the money was handed over
    pub payment_date: NaiveDate,

    /// Notes about this payment
    #[serde(default)]
    pub notes: String,

    /// When the row was recorded
    pub created_at: DateTime<Utc>,
}

impl Contribution {
    /// Create a new contribution row
    pub fn new(
        family_id: FamilyId,
        month: MonthYear,
        amount: Money,
        payment_date: NaiveDate,
    ) -> Self {
        Self {
            id: ContributionId::new(),
            family_id,
            month,
            amount,
            payment_date,
            notes: String::new(),
            created_at: Utc::now(),
        }
    }

    /// Create a new contribution row with notes
    pub fn with_notes(
        family_id: FamilyId,
        month: MonthYear,
        amount: Money,
        payment_date: NaiveDate,
        notes: impl Into<String>,
    ) -> Self {
        let mut contribution = Self::new(family_id, month, amount, payment_date);
        contribution.notes = notes.into();
        contribution
    }

    /// The uniqueness key
    pub fn key(&self) -> (FamilyId, MonthYear) {
        (self.family_id, self.month)
    }

    /// Calendar year this payment covers
    pub fn year(&self) -> i32 {
        self.month.year()
    }

    /// Validate the contribution
    pub fn validate(&self) -> Result<(), ContributionValidationError> {
        if !self.amount.is_positive() {
            return Err(ContributionValidationError::NonPositiveAmount);
        }
        Ok(())
    }
}

impl fmt::Display for Contribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} for {}", self.amount, self.month)
    }
}

/// Validation errors for contributions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContributionValidationError {
    NonPositiveAmount,
}

impl fmt::Display for ContributionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount => write!(f, "Contribution amount must be positive"),
        }
    }
}

impl std::error::Error for ContributionValidationError {}
