//! Monthly requirement override model
//!
//! A fund-wide required amount for one calendar month. When present and
//! active it overrides every family's standing monthly amount for that month.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;
use super::month::MonthYear;

/// A per-month required-amount override, keyed by its month token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyConfig {
    /// The calendar month this override applies to (unique)
    pub month: MonthYear,

    /// Required contribution amount for every family that month
    pub required_amount: Money,

    /// Why the override exists (festival levy, repair fund, ...)
    #[serde(default)]
    pub description: String,

    /// Inactive overrides are ignored by the requirement resolver
    pub active: bool,

    /// When the override was created
    pub created_at: DateTime<Utc>,

    /// When the override was last modified
    pub updated_at: DateTime<Utc>,
}

impl MonthlyConfig {
    /// Create a new active override
    pub fn new(month: MonthYear, required_amount: Money) -> Self {
        let now = Utc::now();
        Self {
            month,
            required_amount,
            description: String::new(),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Deactivate without deleting
    pub fn deactivate(&mut self) {
        self.active = false;
        self.updated_at = Utc::now();
    }

    /// Reactivate a previously deactivated override
    pub fn activate(&mut self) {
        self.active = true;
        self.updated_at = Utc::now();
    }

    /// Validate the override
    pub fn validate(&self) -> Result<(), MonthlyConfigValidationError> {
        if self.required_amount.is_negative() {
            return Err(MonthlyConfigValidationError::NegativeRequiredAmount);
        }
        Ok(())
    }
}

impl fmt::Display for MonthlyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.month, self.required_amount)
    }
}

/// Validation errors for monthly overrides
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonthlyConfigValidationError {
    NegativeRequiredAmount,
}

impl fmt::Display for MonthlyConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeRequiredAmount => write!(f, "Required amount cannot be negative"),
        }
    }
}

impl std::error::Error for MonthlyConfigValidationError {}
