//! Expense model
//!
//! Money leaving the fund: road repairs, tube-well maintenance, festival
//! costs. Categories are free text here; only deposits need a directory
//! because the contribution mirror references one by id.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::ExpenseId;
use super::money::Money;

/// A fund expense entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier
    pub id: ExpenseId,

    /// The date the money was spent
    pub date: NaiveDate,

    /// Amount spent
    pub amount: Money,

    /// Free-text category (e.g., "Road repair")
    pub category: String,

    /// What the money was spent on
    #[serde(default)]
    pub description: String,

    /// Notes about this expense
    #[serde(default)]
    pub notes: String,

    /// When the row was recorded
    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Create a new expense row
    pub fn new(
        date: NaiveDate,
        amount: Money,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: ExpenseId::new(),
            date,
            amount,
            category: category.into(),
            description: description.into(),
            notes: String::new(),
            created_at: Utc::now(),
        }
    }

    /// Calendar year, derived from the expense date
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Validate the expense
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if !self.amount.is_positive() {
            return Err(ExpenseValidationError::NonPositiveAmount);
        }
        if self.category.trim().is_empty() {
            return Err(ExpenseValidationError::EmptyCategory);
        }
        Ok(())
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} for {}", self.amount, self.category)
    }
}

/// Validation errors for expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    NonPositiveAmount,
    EmptyCategory,
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount => write!(f, "Expense amount must be positive"),
            Self::EmptyCategory => write!(f, "Expense category cannot be empty"),
        }
    }
}

impl std::error::Error for ExpenseValidationError {}
