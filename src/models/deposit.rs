//! Deposit ledger models
//!
//! The general deposit ledger holds all money entering the fund: donations,
//! grants, and the mirrored rows the contribution ledger posts. Categories
//! live in a small directory so the mirror can reference one by stable id.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{DepositCategoryId, DepositId, MemberId};
use super::money::Money;

/// A category in the deposit directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositCategory {
    /// Unique identifier
    pub id: DepositCategoryId,

    /// Category name (e.g., "Donation")
    pub name: String,

    /// Description for the admin screens
    #[serde(default)]
    pub description: String,

    /// Inactive categories are hidden from pickers but keep their history
    pub active: bool,

    /// When the category was created
    pub created_at: DateTime<Utc>,
}

impl DepositCategory {
    /// Create a new active category
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: DepositCategoryId::new(),
            name: name.into(),
            description: String::new(),
            active: true,
            created_at: Utc::now(),
        }
    }

    /// Hide the category from pickers, keeping its history
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), DepositValidationError> {
        if self.name.trim().is_empty() {
            return Err(DepositValidationError::EmptyCategoryName);
        }
        Ok(())
    }
}

impl fmt::Display for DepositCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Deposit categories seeded on first run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultDepositCategory {
    Contribution,
    Donation,
    Grant,
    Other,
}

impl DefaultDepositCategory {
    /// Get all default categories in order
    pub fn all() -> &'static [Self] {
        &[Self::Contribution, Self::Donation, Self::Grant, Self::Other]
    }

    /// Get the display name for this default category
    pub fn name(&self) -> &'static str {
        match self {
            Self::Contribution => "Monthly Contribution",
            Self::Donation => "Donation",
            Self::Grant => "Grant",
            Self::Other => "Other",
        }
    }

    /// Create a DepositCategory from this default
    pub fn to_category(&self) -> DepositCategory {
        DepositCategory::new(self.name())
    }
}

/// A general-ledger deposit entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deposit {
    /// Unique identifier
    pub id: DepositId,

    /// The date the money entered the fund
    pub date: NaiveDate,

    /// Amount received
    pub amount: Money,

    /// Which category the deposit belongs to
    pub category_id: DepositCategoryId,

    /// The member the deposit is linked to, when there is one
    pub member_id: Option<MemberId>,

    /// Notes about this deposit
    #[serde(default)]
    pub notes: String,

    /// When the row was recorded
    pub created_at: DateTime<Utc>,
}

impl Deposit {
    /// Create a new deposit row
    pub fn new(date: NaiveDate, amount: Money, category_id: DepositCategoryId) -> Self {
        Self {
            id: DepositId::new(),
            date,
            amount,
            category_id,
            member_id: None,
            notes: String::new(),
            created_at: Utc::now(),
        }
    }

    /// Calendar year, derived from the deposit date
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Validate the deposit
    pub fn validate(&self) -> Result<(), DepositValidationError> {
        if !self.amount.is_positive() {
            return Err(DepositValidationError::NonPositiveAmount);
        }
        Ok(())
    }
}

impl fmt::Display for Deposit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}", self.amount, self.date)
    }
}

/// Validation errors for deposits and their categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepositValidationError {
    NonPositiveAmount,
    EmptyCategoryName,
}

impl fmt::Display for DepositValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount => write!(f, "Deposit amount must be positive"),
            Self::EmptyCategoryName => write!(f, "Deposit category name cannot be empty"),
        }
    }
}

impl std::error::Error for DepositValidationError {}
