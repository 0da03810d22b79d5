//! Exemption repository for JSON storage
//!
//! Manages loading and saving exemption grants to exemptions.json. Like
//! contributions, exemptions are keyed by (family, month), and `insert_new`
//! rejects a second grant for the same pair under the write lock.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::VdfError;
use crate::models::{Exemption, FamilyId, MonthYear};

use super::file_io::{read_json, write_json_atomic};

/// Serializable exemption data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ExemptionData {
    exemptions: Vec<Exemption>,
}

/// Repository for exemption persistence
pub struct ExemptionRepository {
    path: PathBuf,
    data: RwLock<HashMap<(FamilyId, MonthYear), Exemption>>,
    /// Index: family_id -> exempt months
    by_family: RwLock<HashMap<FamilyId, Vec<MonthYear>>>,
}

impl ExemptionRepository {
    /// Create a new exemption repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_family: RwLock::new(HashMap::new()),
        }
    }

    /// Load exemptions from disk and build the family index
    pub fn load(&self) -> Result<(), VdfError> {
        let file_data: ExemptionData = read_json(&self.path)?;

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

        for exemption in file_data.exemptions {
            let key = exemption.key();
            by_family.entry(key.0).or_default().push(key.1);
            data.insert(key, exemption);
        }

        Ok(())
    }

    /// Save exemptions to disk
    pub fn save(&self) -> Result<(), VdfError> {
        let data = self
            .data
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut exemptions: Vec<_> = data.values().cloned().collect();
        exemptions.sort_by_key(|x| x.key());

        let file_data = ExemptionData { exemptions };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get the exemption for (family, month), if granted
    pub fn get(&self, family_id: FamilyId, month: MonthYear) -> Result<Option<Exemption>, VdfError> {
        let data = self
            .data
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&(family_id, month)).cloned())
    }

    /// Check whether (family, month) is exempt
    pub fn exists(&self, family_id: FamilyId, month: MonthYear) -> Result<bool, VdfError> {
        let data = self
            .data
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.contains_key(&(family_id, month)))
    }

    /// Insert a grant, failing if one already exists for its (family, month)
    pub fn insert_new(&self, exemption: Exemption) -> Result<(), VdfError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_family = self
            .by_family
            .write()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let key = exemption.key();
        if data.contains_key(&key) {
            return Err(VdfError::duplicate_exemption(
                key.0.to_string(),
                key.1.token(),
            ));
        }

        by_family.entry(key.0).or_default().push(key.1);
        data.insert(key, exemption);
        Ok(())
    }

    /// Delete a grant by its (family, month) key
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

    /// Get all of a family's grants, oldest month first
    pub fn get_by_family(&self, family_id: FamilyId) -> Result<Vec<Exemption>, VdfError> {
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
        let mut exemptions: Vec<_> = months
            .iter()
            .filter_map(|&m| data.get(&(family_id, m)).cloned())
            .collect();
        exemptions.sort_by_key(|x| x.month);
        Ok(exemptions)
    }

    /// Get all grants, ordered by (family, month)
    pub fn get_all(&self) -> Result<Vec<Exemption>, VdfError> {
        let data = self
            .data
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut exemptions: Vec<_> = data.values().cloned().collect();
        exemptions.sort_by_key(|x| x.key());
        Ok(exemptions)
    }

    /// Count grants
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
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, ExemptionRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("exemptions.json");
        let repo = ExemptionRepository::new(path);
        (temp_dir, repo)
    }

    #[test]
    fn test_insert_new_and_exists() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let family_id = FamilyId::new();
        let month = MonthYear::new(2024, 4).unwrap();
        repo.insert_new(Exemption::new(family_id, month, "flood relief"))
            .unwrap();

        assert!(repo.exists(family_id, month).unwrap());
        assert!(!repo
            .exists(family_id, MonthYear::new(2024, 5).unwrap())
            .unwrap());
    }

    #[test]
    fn test_insert_new_rejects_duplicate() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let family_id = FamilyId::new();
        let month = MonthYear::new(2024, 4).unwrap();
        repo.insert_new(Exemption::new(family_id, month, "flood relief"))
            .unwrap();

        let err = repo
            .insert_new(Exemption::new(family_id, month, "again"))
            .unwrap_err();
        assert!(matches!(err, VdfError::DuplicateExemption { .. }));
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let family_id = FamilyId::new();
        let month = MonthYear::new(2024, 4).unwrap();
        repo.insert_new(Exemption::new(family_id, month, "flood relief"))
            .unwrap();

        assert!(repo.delete(family_id, month).unwrap());
        assert!(!repo.delete(family_id, month).unwrap());
        assert!(!repo.exists(family_id, month).unwrap());
    }

    #[test]
    fn test_get_by_family_sorted() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let family_id = FamilyId::new();
        let other_family = FamilyId::new();
        for month in [7, 2, 11] {
            repo.insert_new(Exemption::new(
                family_id,
                MonthYear::new(2024, month).unwrap(),
                "hardship",
            ))
            .unwrap();
        }
        repo.insert_new(Exemption::new(
            other_family,
            MonthYear::new(2024, 2).unwrap(),
            "hardship",
        ))
        .unwrap();

        let grants = repo.get_by_family(family_id).unwrap();
        assert_eq!(grants.len(), 3);
        assert_eq!(grants[0].month.month(), 2);
        assert_eq!(grants[1].month.month(), 7);
        assert_eq!(grants[2].month.month(), 11);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let family_id = FamilyId::new();
        let month = MonthYear::new(2024, 4).unwrap();
        repo.insert_new(Exemption::new(family_id, month, "flood relief"))
            .unwrap();
        repo.save().unwrap();

        let repo2 = ExemptionRepository::new(temp_dir.path().join("exemptions.json"));
        repo2.load().unwrap();

        let reloaded = repo2.get(family_id, month).unwrap().unwrap();
        assert_eq!(reloaded.reason, "flood relief");
    }
}
