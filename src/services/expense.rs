//! Expense service
//!
//! Records money leaving the fund. Expenses carry a free-text category;
//! the committee's spending heads vary too much year to year for a fixed
//! directory to be worth maintaining.

use chrono::NaiveDate;

use crate::error::{VdfError, VdfResult};
use crate::models::{Expense, ExpenseId, Money};
use crate::storage::Storage;

/// Service for expense ledger management
pub struct ExpenseService<'a> {
    storage: &'a Storage,
}

/// Input for recording an expense
#[derive(Debug, Clone)]
pub struct RecordExpenseInput {
    pub date: NaiveDate,
    pub amount: Money,
    pub category: String,
    pub description: String,
    pub notes: Option<String>,
}

impl<'a> ExpenseService<'a> {
    /// Create a new expense service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record an expense
    pub fn record(&self, input: RecordExpenseInput) -> VdfResult<Expense> {
        let mut expense = Expense::new(
            input.date,
            input.amount,
            input.category.trim(),
            input.description.trim(),
        );
        if let Some(notes) = input.notes {
            expense.notes = notes;
        }

        expense
            .validate()
            .map_err(|e| VdfError::Validation(e.to_string()))?;

        self.storage.expenses.upsert(expense.clone())?;
        self.storage.expenses.save()?;

        Ok(expense)
    }

    /// Delete an expense
    pub fn delete(&self, id: ExpenseId) -> VdfResult<()> {
        if !self.storage.expenses.delete(id)? {
            return Err(VdfError::NotFound {
                entity_type: "Expense",
                identifier: id.to_string(),
            });
        }
        self.storage.expenses.save()?;
        Ok(())
    }

    /// List all expenses, newest first
    pub fn list(&self) -> VdfResult<Vec<Expense>> {
        self.storage.expenses.get_all()
    }

    /// List expenses for one calendar year, newest first
    pub fn list_for_year(&self, year: i32) -> VdfResult<Vec<Expense>> {
        self.storage.expenses.get_by_year(year)
    }

    /// Sum expenses, optionally restricted to one year
    pub fn sum_expenses(&self, year: Option<i32>) -> VdfResult<Money> {
        match year {
            Some(year) => self.storage.expenses.total_for_year(year),
            None => self.storage.expenses.total_all(),
        }
    }
}
