//! Expense repository for JSON storage
//!
//! Manages loading and saving fund expenses to expenses.json.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::VdfError;
use crate::models::{Expense, ExpenseId, Money};

use super::file_io::{read_json, write_json_atomic};

/// Serializable expense data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ExpenseData {
    expenses: Vec<Expense>,
}

/// Repository for expense persistence
pub struct ExpenseRepository {
    path: PathBuf,
    data: RwLock<HashMap<ExpenseId, Expense>>,
}

impl ExpenseRepository {
    /// Create a new expense repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load expenses from disk
    pub fn load(&self) -> Result<(), VdfError> {
        let file_data: ExpenseData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for expense in file_data.expenses {
            data.insert(expense.id, expense);
        }

        Ok(())
    }

    /// Save expenses to disk
    pub fn save(&self) -> Result<(), VdfError> {
        let data = self
            .data
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut expenses: Vec<_> = data.values().cloned().collect();
        expenses.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });

        let file_data = ExpenseData { expenses };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get an expense by ID
    pub fn get(&self, id: ExpenseId) -> Result<Option<Expense>, VdfError> {
        let data = self
            .data
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all expenses, newest first
    pub fn get_all(&self) -> Result<Vec<Expense>, VdfError> {
        let data = self
            .data
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut expenses: Vec<_> = data.values().cloned().collect();
        expenses.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(expenses)
    }

    /// Get expenses dated within one calendar year, newest first
    pub fn get_by_year(&self, year: i32) -> Result<Vec<Expense>, VdfError> {
        let mut expenses = self.get_all()?;
        expenses.retain(|x| x.year() == year);
        Ok(expenses)
    }

    /// Insert or update an expense
    pub fn upsert(&self, expense: Expense) -> Result<(), VdfError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(expense.id, expense);
        Ok(())
    }

    /// Delete an expense
    pub fn delete(&self, id: ExpenseId) -> Result<bool, VdfError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(data.remove(&id).is_some())
    }

    /// Sum of all expenses
    pub fn total_all(&self) -> Result<Money, VdfError> {
        let data = self
            .data
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.values().map(|x| x.amount).sum())
    }

    /// Sum of expenses dated within one calendar year
    pub fn total_for_year(&self, year: i32) -> Result<Money, VdfError> {
        let data = self
            .data
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .values()
            .filter(|x| x.year() == year)
            .map(|x| x.amount)
            .sum())
    }

    /// Count expenses
    pub fn count(&self) -> Result<usize, VdfError> {
        let data = self
            .data
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, ExpenseRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("expenses.json");
        let repo = ExpenseRepository::new(path);
        (temp_dir, repo)
    }

    #[test]
    fn test_upsert_and_totals() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        repo.upsert(Expense::new(
            NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
            Money::from_taka(300),
            "repairs",
            "tube well repair",
        ))
        .unwrap();
        repo.upsert(Expense::new(
            NaiveDate::from_ymd_opt(2023, 11, 5).unwrap(),
            Money::from_taka(150),
            "roads",
            "road gravel",
        ))
        .unwrap();

        assert_eq!(repo.total_all().unwrap(), Money::from_taka(450));
        assert_eq!(repo.total_for_year(2024).unwrap(), Money::from_taka(300));
        assert_eq!(repo.get_by_year(2023).unwrap().len(), 1);
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let expense = Expense::new(
            NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
            Money::from_taka(300),
            "repairs",
            "tube well repair",
        );
        let id = expense.id;
        repo.upsert(expense).unwrap();

        assert!(repo.delete(id).unwrap());
        assert!(!repo.delete(id).unwrap());
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let expense = Expense::new(
            NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
            Money::from_taka(300),
            "repairs",
            "tube well repair",
        );
        let id = expense.id;
        repo.upsert(expense).unwrap();
        repo.save().unwrap();

        let repo2 = ExpenseRepository::new(temp_dir.path().join("expenses.json"));
        repo2.load().unwrap();
        assert_eq!(repo2.get(id).unwrap().unwrap().category, "repairs");
    }
}
