//! Monthly requirement override repository for JSON storage
//!
//! Manages loading and saving per-month amount overrides to
//! monthly_configs.json. At most one override exists per calendar month.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::VdfError;
use crate::models::{MonthYear, MonthlyConfig};

use super::file_io::{read_json, write_json_atomic};

/// Serializable monthly config data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct MonthlyConfigData {
    monthly_configs: Vec<MonthlyConfig>,
}

/// Repository for monthly override persistence
pub struct MonthlyConfigRepository {
    path: PathBuf,
    data: RwLock<HashMap<MonthYear, MonthlyConfig>>,
}

impl MonthlyConfigRepository {
    /// Create a new monthly config repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load overrides from disk
    pub fn load(&self) -> Result<(), VdfError> {
        let file_data: MonthlyConfigData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for config in file_data.monthly_configs {
            data.insert(config.month, config);
        }

        Ok(())
    }

    /// Save overrides to disk
    pub fn save(&self) -> Result<(), VdfError> {
        let data = self
            .data
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut monthly_configs: Vec<_> = data.values().cloned().collect();
        monthly_configs.sort_by_key(|c| c.month);

        let file_data = MonthlyConfigData { monthly_configs };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get the override for a month, active or not
    pub fn get(&self, month: MonthYear) -> Result<Option<MonthlyConfig>, VdfError> {
        let data = self
            .data
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&month).cloned())
    }

    /// Get the override for a month only if it is active
    pub fn get_active(&self, month: MonthYear) -> Result<Option<MonthlyConfig>, VdfError> {
        let data = self
            .data
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&month).filter(|c| c.active).cloned())
    }

    /// Get all overrides, newest month first
    pub fn get_all(&self) -> Result<Vec<MonthlyConfig>, VdfError> {
        let data = self
            .data
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut monthly_configs: Vec<_> = data.values().cloned().collect();
        monthly_configs.sort_by_key(|c| std::cmp::Reverse(c.month));
        Ok(monthly_configs)
    }

    /// Insert or update a month's override
    pub fn upsert(&self, config: MonthlyConfig) -> Result<(), VdfError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(config.month, config);
        Ok(())
    }

    /// Delete a month's override
    pub fn delete(&self, month: MonthYear) -> Result<bool, VdfError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(data.remove(&month).is_some())
    }

    /// Count overrides
    pub fn count(&self) -> Result<usize, VdfError> {
        let data = self
            .data
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}
