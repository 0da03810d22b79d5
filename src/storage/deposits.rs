//! Deposit repository for JSON storage
//!
//! Manages loading and saving the deposit ledger to deposits.json. The file
//! holds both the deposit rows and the category directory they are tagged
//! with, since neither is meaningful without the other.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::VdfError;
use crate::models::{Deposit, DepositCategory, DepositCategoryId, DepositId, Money};

use super::file_io::{read_json, write_json_atomic};

/// Serializable deposit data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct DepositData {
    categories: Vec<DepositCategory>,
    deposits: Vec<Deposit>,
}

/// Repository for deposit and deposit-category persistence
pub struct DepositRepository {
    path: PathBuf,
    deposits: RwLock<HashMap<DepositId, Deposit>>,
    categories: RwLock<HashMap<DepositCategoryId, DepositCategory>>,
}

impl DepositRepository {
    /// Create a new deposit repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            deposits: RwLock::new(HashMap::new()),
            categories: RwLock::new(HashMap::new()),
        }
    }

    /// Load deposits and categories from disk
    pub fn load(&self) -> Result<(), VdfError> {
        let file_data: DepositData = read_json(&self.path)?;

        let mut deposits = self
            .deposits
            .write()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut categories = self
            .categories
            .write()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        deposits.clear();
        categories.clear();

        for category in file_data.categories {
            categories.insert(category.id, category);
        }
        for deposit in file_data.deposits {
            deposits.insert(deposit.id, deposit);
        }

        Ok(())
    }

    /// Save deposits and categories to disk
    pub fn save(&self) -> Result<(), VdfError> {
        let deposits = self
            .deposits
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let categories = self
            .categories
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut category_list: Vec<_> = categories.values().cloned().collect();
        category_list.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

        let mut deposit_list: Vec<_> = deposits.values().cloned().collect();
        deposit_list.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });

        let file_data = DepositData {
            categories: category_list,
            deposits: deposit_list,
        };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get a deposit by ID
    pub fn get(&self, id: DepositId) -> Result<Option<Deposit>, VdfError> {
        let deposits = self
            .deposits
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(deposits.get(&id).cloned())
    }

    /// Get all deposits, newest first
    pub fn get_all(&self) -> Result<Vec<Deposit>, VdfError> {
        let deposits = self
            .deposits
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = deposits.values().cloned().collect();
        list.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(list)
    }

    /// Get deposits dated within one calendar year, newest first
    pub fn get_by_year(&self, year: i32) -> Result<Vec<Deposit>, VdfError> {
        let mut list = self.get_all()?;
        list.retain(|d| d.year() == year);
        Ok(list)
    }

    /// Insert or update a deposit
    pub fn upsert(&self, deposit: Deposit) -> Result<(), VdfError> {
        let mut deposits = self
            .deposits
            .write()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        deposits.insert(deposit.id, deposit);
        Ok(())
    }

    /// Delete a deposit
    pub fn delete(&self, id: DepositId) -> Result<bool, VdfError> {
        let mut deposits = self
            .deposits
            .write()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(deposits.remove(&id).is_some())
    }

    /// Sum of all deposits
    pub fn total_all(&self) -> Result<Money, VdfError> {
        let deposits = self
            .deposits
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(deposits.values().map(|d| d.amount).sum())
    }

    /// Sum of deposits dated within one calendar year
    pub fn total_for_year(&self, year: i32) -> Result<Money, VdfError> {
        let deposits = self
            .deposits
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(deposits
            .values()
            .filter(|d| d.year() == year)
            .map(|d| d.amount)
            .sum())
    }

    /// Count deposits
    pub fn count(&self) -> Result<usize, VdfError> {
        let deposits = self
            .deposits
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(deposits.len())
    }

    /// Get a category by ID
    pub fn get_category(&self, id: DepositCategoryId) -> Result<Option<DepositCategory>, VdfError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(categories.get(&id).cloned())
    }

    /// Find a category by name, ignoring case and surrounding whitespace
    pub fn find_category_by_name(&self, name: &str) -> Result<Option<DepositCategory>, VdfError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let wanted = name.trim().to_lowercase();
        Ok(categories
            .values()
            .find(|c| c.name.trim().to_lowercase() == wanted)
            .cloned())
    }

    /// Get all categories, sorted by name
    pub fn get_categories(&self) -> Result<Vec<DepositCategory>, VdfError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = categories.values().cloned().collect();
        list.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(list)
    }

    /// Get active categories only, sorted by name
    pub fn get_active_categories(&self) -> Result<Vec<DepositCategory>, VdfError> {
        let mut list = self.get_categories()?;
        list.retain(|c| c.active);
        Ok(list)
    }

    /// Insert or update a category
    pub fn upsert_category(&self, category: DepositCategory) -> Result<(), VdfError> {
        let mut categories = self
            .categories
            .write()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        categories.insert(category.id, category);
        Ok(())
    }

    /// Count categories
    pub fn count_categories(&self) -> Result<usize, VdfError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(categories.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, DepositRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("deposits.json");
        let repo = DepositRepository::new(path);
        (temp_dir, repo)
    }

    fn seed_category(repo: &DepositRepository, name: &str) -> DepositCategoryId {
        let category = DepositCategory::new(name);
        let id = category.id;
        repo.upsert_category(category).unwrap();
        id
    }

    #[test]
    fn test_upsert_and_get_deposit() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let category_id = seed_category(&repo, "Monthly Contribution");
        let deposit = Deposit::new(
            NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
            Money::from_taka(60),
            category_id,
        );
        let id = deposit.id;
        repo.upsert(deposit).unwrap();

        let retrieved = repo.get(id).unwrap().unwrap();
        assert_eq!(retrieved.amount, Money::from_taka(60));
        assert_eq!(retrieved.category_id, category_id);
    }

    #[test]
    fn test_get_all_newest_first() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let category_id = seed_category(&repo, "Donation");
        for (month, day) in [(3, 5), (7, 20), (1, 15)] {
            repo.upsert(Deposit::new(
                NaiveDate::from_ymd_opt(2024, month, day).unwrap(),
                Money::from_taka(10),
                category_id,
            ))
            .unwrap();
        }

        let all = repo.get_all().unwrap();
        assert_eq!(all[0].date.format("%m-%d").to_string(), "07-20");
        assert_eq!(all[2].date.format("%m-%d").to_string(), "01-15");
    }

    #[test]
    fn test_year_totals() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let category_id = seed_category(&repo, "Donation");
        repo.upsert(Deposit::new(
            NaiveDate::from_ymd_opt(2023, 12, 30).unwrap(),
            Money::from_taka(100),
            category_id,
        ))
        .unwrap();
        repo.upsert(Deposit::new(
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            Money::from_taka(40),
            category_id,
        ))
        .unwrap();

        assert_eq!(repo.total_for_year(2024).unwrap(), Money::from_taka(40));
        assert_eq!(repo.total_all().unwrap(), Money::from_taka(140));
        assert_eq!(repo.get_by_year(2023).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_deposit() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let category_id = seed_category(&repo, "Donation");
        let deposit = Deposit::new(
            NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
            Money::from_taka(60),
            category_id,
        );
        let id = deposit.id;
        repo.upsert(deposit).unwrap();

        assert!(repo.delete(id).unwrap());
        assert!(!repo.delete(id).unwrap());
    }

    #[test]
    fn test_find_category_by_name_case_insensitive() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let id = seed_category(&repo, "Monthly Contribution");
        let found = repo
            .find_category_by_name("  monthly contribution ")
            .unwrap()
            .unwrap();
        assert_eq!(found.id, id);
        assert!(repo.find_category_by_name("Zakat").unwrap().is_none());
    }

    #[test]
    fn test_save_and_reload_both_sections() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let category_id = seed_category(&repo, "Monthly Contribution");
        repo.upsert(Deposit::new(
            NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
            Money::from_taka(60),
            category_id,
        ))
        .unwrap();
        repo.save().unwrap();

        let repo2 = DepositRepository::new(temp_dir.path().join("deposits.json"));
        repo2.load().unwrap();
        assert_eq!(repo2.count().unwrap(), 1);
        assert_eq!(repo2.count_categories().unwrap(), 1);
        assert!(repo2.get_category(category_id).unwrap().is_some());
    }
}
