//! Contribution repository for JSON storage
//!
//! Manages loading and saving contribution rows to contributions.json.
//! Rows are keyed by their natural (family, month) key, which is how the
//! one-row-per-family-per-month constraint is enforced: `insert_new` is a
//! check-and-insert under a single write lock, so two racing posts for the
//! same month resolve to one success and one duplicate error.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::VdfError;
use crate::models::{Contribution, FamilyId, Money, MonthYear};

use super::file_io::{read_json, write_json_atomic};

/// Serializable contribution data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ContributionData {
    contributions: Vec<Contribution>,
}

/// Repository for contribution persistence with indexing
pub struct ContributionRepository {
    path: PathBuf,
    data: RwLock<HashMap<(FamilyId, MonthYear), Contribution>>,
    /// Index: family_id -> months with a row
    by_family: RwLock<HashMap<FamilyId, Vec<MonthYear>>>,
}

impl ContributionRepository {
    /// Create a new contribution repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_family: RwLock::new(HashMap::new()),
        }
    }

    /// Load contributions from disk and build indexes
    pub fn load(&self) -> Result<(), VdfError> {
        let file_data: ContributionData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_family = self
            .by_family
            .write()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        by_family.clear();

        for contribution in file_data.contributions {
            let key = contribution.key();
            by_family.entry(key.0).or_default().push(key.1);
            data.insert(key, contribution);
        }

        Ok(())
    }

    /// Save contributions to disk
    pub fn save(&self) -> Result<(), VdfError> {
        let data = self
            .data
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut contributions: Vec<_> = data.values().cloned().collect();
        contributions.sort_by_key(|c| c.key());

        let file_data = ContributionData { contributions };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get one family's row for a month
    pub fn get(&self, family_id: FamilyId, month: MonthYear) -> Result<Option<Contribution>, VdfError> {
        let data = self
            .data
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&(family_id, month)).cloned())
    }

    /// Check whether a row exists for (family, month)
    pub fn exists(&self, family_id: FamilyId, month: MonthYear) -> Result<bool, VdfError> {
        let data = self
            .data
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.contains_key(&(family_id, month)))
    }

    /// Insert a row, failing if one already exists for its (family, month)
    ///
    /// This is the uniqueness constraint. The check and the insert happen
    /// under one write lock; callers must not pre-check and then insert.
    pub fn insert_new(&self, contribution: Contribution) -> Result<(), VdfError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_family = self
            .by_family
            .write()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let key = contribution.key();
        if data.contains_key(&key) {
            return Err(VdfError::duplicate_contribution(
                key.0.to_string(),
                key.1.token(),
            ));
        }

        by_family.entry(key.0).or_default().push(key.1);
        data.insert(key, contribution);
        Ok(())
    }

    /// Insert or replace a row
    ///
    /// Only the bulk-reconciliation path may overwrite; everything else goes
    /// through `insert_new`.
    pub fn upsert(&self, contribution: Contribution) -> Result<(), VdfError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_family = self
            .by_family
            .write()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let key = contribution.key();
        if data.insert(key, contribution).is_none() {
            by_family.entry(key.0).or_default().push(key.1);
        }
        Ok(())
    }

    /// Delete a row by its (family, month) key
    pub fn delete(&self, family_id: FamilyId, month: MonthYear) -> Result<bool, VdfError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_family = self
            .by_family
            .write()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if data.remove(&(family_id, month)).is_some() {
            if let Some(months) = by_family.get_mut(&family_id) {
                months.retain(|&m| m != month);
            }
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Get all of a family's rows, oldest month first
    pub fn get_by_family(&self, family_id: FamilyId) -> Result<Vec<Contribution>, VdfError> {
        let data = self
            .data
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let by_family = self
            .by_family
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let months = by_family
            .get(&family_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[]);
        let mut contributions: Vec<_> = months
            .iter()
            .filter_map(|&m| data.get(&(family_id, m)).cloned())
            .collect();
        contributions.sort_by_key(|c| c.month);
        Ok(contributions)
    }

    /// Get a family's rows for one calendar year, January first
    pub fn get_by_family_year(
        &self,
        family_id: FamilyId,
        year: i32,
    ) -> Result<Vec<Contribution>, VdfError> {
        let mut contributions = self.get_by_family(family_id)?;
        contributions.retain(|c| c.year() == year);
        Ok(contributions)
    }

    /// Get every family's row for one month
    pub fn get_by_month(&self, month: MonthYear) -> Result<Vec<Contribution>, VdfError> {
        let data = self
            .data
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut contributions: Vec<_> = data
            .values()
            .filter(|c| c.month == month)
            .cloned()
            .collect();
        contributions.sort_by_key(|c| c.family_id);
        Ok(contributions)
    }

    /// Get all rows, ordered by (family, month)
    pub fn get_all(&self) -> Result<Vec<Contribution>, VdfError> {
        let data = self
            .data
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut contributions: Vec<_> = data.values().cloned().collect();
        contributions.sort_by_key(|c| c.key());
        Ok(contributions)
    }

    /// Sum of everything a family has ever paid
    pub fn total_by_family(&self, family_id: FamilyId) -> Result<Money, VdfError> {
        Ok(self.get_by_family(family_id)?.iter().map(|c| c.amount).sum())
    }

    /// Sum of a family's payments within one calendar year
    pub fn total_by_family_year(&self, family_id: FamilyId, year: i32) -> Result<Money, VdfError> {
        Ok(self
            .get_by_family_year(family_id, year)?
            .iter()
            .map(|c| c.amount)
            .sum())
    }

    /// Sum of all payments recorded for one month
    pub fn total_for_month(&self, month: MonthYear) -> Result<Money, VdfError> {
        Ok(self.get_by_month(month)?.iter().map(|c| c.amount).sum())
    }

    /// Sum of all payments recorded in one calendar year
    pub fn total_for_year(&self, year: i32) -> Result<Money, VdfError> {
        let data = self
            .data
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .values()
            .filter(|c| c.year() == year)
            .map(|c| c.amount)
            .sum())
    }

    /// Sum of every payment ever recorded
    pub fn total_all(&self) -> Result<Money, VdfError> {
        let data = self
            .data
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.values().map(|c| c.amount).sum())
    }

    /// Count rows
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

    fn create_test_repo() -> (TempDir, ContributionRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("contributions.json");
        let repo = ContributionRepository::new(path);
        (temp_dir, repo)
    }

    fn row(family_id: FamilyId, year: i32, month: u32, taka: i64) -> Contribution {
        Contribution::new(
            family_id,
            MonthYear::new(year, month).unwrap(),
            Money::from_taka(taka),
            NaiveDate::from_ymd_opt(year, month, 10).unwrap(),
        )
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_insert_new_and_get() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let family_id = FamilyId::new();
        repo.insert_new(row(family_id, 2024, 5, 20)).unwrap();

        let retrieved = repo
            .get(family_id, MonthYear::new(2024, 5).unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(retrieved.amount, Money::from_taka(20));
    }

    #[test]
    fn test_insert_new_rejects_duplicate() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let family_id = FamilyId::new();
        repo.insert_new(row(family_id, 2024, 5, 20)).unwrap();

        let err = repo.insert_new(row(family_id, 2024, 5, 30)).unwrap_err();
        assert!(matches!(err, VdfError::DuplicateContribution { .. }));

        // First row is unchanged
        let kept = repo
            .get(family_id, MonthYear::new(2024, 5).unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(kept.amount, Money::from_taka(20));
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_same_month_different_families() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let family1 = FamilyId::new();
        let family2 = FamilyId::new();
        repo.insert_new(row(family1, 2024, 5, 20)).unwrap();
        repo.insert_new(row(family2, 2024, 5, 20)).unwrap();
        assert_eq!(repo.count().unwrap(), 2);
    }

    #[test]
    fn test_upsert_replaces() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let family_id = FamilyId::new();
        repo.upsert(row(family_id, 2024, 5, 20)).unwrap();
        repo.upsert(row(family_id, 2024, 5, 35)).unwrap();

        assert_eq!(repo.count().unwrap(), 1);
        let kept = repo
            .get(family_id, MonthYear::new(2024, 5).unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(kept.amount, Money::from_taka(35));

        // Index stays consistent after replacement
        assert_eq!(repo.get_by_family(family_id).unwrap().len(), 1);
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let family_id = FamilyId::new();
        let month = MonthYear::new(2024, 5).unwrap();
        repo.insert_new(row(family_id, 2024, 5, 20)).unwrap();

        assert!(repo.delete(family_id, month).unwrap());
        assert!(!repo.delete(family_id, month).unwrap());
        assert_eq!(repo.count().unwrap(), 0);
        assert!(repo.get_by_family(family_id).unwrap().is_empty());
    }

    #[test]
    fn test_get_by_family_year_sorted() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let family_id = FamilyId::new();
        repo.insert_new(row(family_id, 2024, 7, 20)).unwrap();
        repo.insert_new(row(family_id, 2024, 3, 20)).unwrap();
        repo.insert_new(row(family_id, 2023, 12, 20)).unwrap();

        let year_rows = repo.get_by_family_year(family_id, 2024).unwrap();
        assert_eq!(year_rows.len(), 2);
        assert_eq!(year_rows[0].month.month(), 3);
        assert_eq!(year_rows[1].month.month(), 7);
    }

    #[test]
    fn test_totals() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let family1 = FamilyId::new();
        let family2 = FamilyId::new();
        repo.insert_new(row(family1, 2024, 3, 20)).unwrap();
        repo.insert_new(row(family1, 2024, 5, 20)).unwrap();
        repo.insert_new(row(family1, 2023, 12, 15)).unwrap();
        repo.insert_new(row(family2, 2024, 5, 40)).unwrap();

        assert_eq!(repo.total_by_family(family1).unwrap(), Money::from_taka(55));
        assert_eq!(
            repo.total_by_family_year(family1, 2024).unwrap(),
            Money::from_taka(40)
        );
        assert_eq!(
            repo.total_for_month(MonthYear::new(2024, 5).unwrap()).unwrap(),
            Money::from_taka(60)
        );
        assert_eq!(repo.total_for_year(2024).unwrap(), Money::from_taka(80));
        assert_eq!(repo.total_all().unwrap(), Money::from_taka(95));
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let family_id = FamilyId::new();
        repo.insert_new(row(family_id, 2024, 5, 20)).unwrap();
        repo.save().unwrap();

        // Create new repo and load
        let path = temp_dir.path().join("contributions.json");
        let repo2 = ContributionRepository::new(path);
        repo2.load().unwrap();

        assert_eq!(repo2.count().unwrap(), 1);
        let retrieved = repo2
            .get(family_id, MonthYear::new(2024, 5).unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(retrieved.amount, Money::from_taka(20));
    }
}
