//! Family configuration repository for JSON storage
//!
//! Manages loading and saving family dues configurations to families.json.
//! Families are never deleted, only disabled, so there is no delete here.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::VdfError;
use crate::models::{FamilyConfig, FamilyId, MemberId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable family data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct FamilyData {
    families: Vec<FamilyConfig>,
}

/// Repository for family configuration persistence
pub struct FamilyRepository {
    path: PathBuf,
    data: RwLock<HashMap<FamilyId, FamilyConfig>>,
    /// Index: member_id -> family registered against that member
    by_member: RwLock<HashMap<MemberId, FamilyId>>,
}

impl FamilyRepository {
    /// Create a new family repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_member: RwLock::new(HashMap::new()),
        }
    }

    /// Load families from disk and build the member index
    pub fn load(&self) -> Result<(), VdfError> {
        let file_data: FamilyData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_member = self
            .by_member
            .write()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        by_member.clear();

        for family in file_data.families {
            by_member.insert(family.member_id, family.id);
            data.insert(family.id, family);
        }

        Ok(())
    }

    /// Save families to disk
    pub fn save(&self) -> Result<(), VdfError> {
        let data = self
            .data
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut families: Vec<_> = data.values().cloned().collect();
        families.sort_by(|a, b| {
            a.family_head_name
                .to_lowercase()
                .cmp(&b.family_head_name.to_lowercase())
                .then(a.id.cmp(&b.id))
        });

        let file_data = FamilyData { families };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get a family by ID
    pub fn get(&self, id: FamilyId) -> Result<Option<FamilyConfig>, VdfError> {
        let data = self
            .data
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all families, sorted by head name then ID
    pub fn get_all(&self) -> Result<Vec<FamilyConfig>, VdfError> {
        let data = self
            .data
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut families: Vec<_> = data.values().cloned().collect();
        families.sort_by(|a, b| {
            a.family_head_name
                .to_lowercase()
                .cmp(&b.family_head_name.to_lowercase())
                .then(a.id.cmp(&b.id))
        });
        Ok(families)
    }

    /// Get families with contributions enabled, sorted by head name then ID
    pub fn get_enabled(&self) -> Result<Vec<FamilyConfig>, VdfError> {
        let mut families = self.get_all()?;
        families.retain(|f| f.contribution_enabled);
        Ok(families)
    }

    /// Find the family registered against a member, if any
    pub fn find_by_member(&self, member_id: MemberId) -> Result<Option<FamilyConfig>, VdfError> {
        let by_member = self
            .by_member
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let data = self
            .data
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(by_member.get(&member_id).and_then(|id| data.get(id)).cloned())
    }

    /// Insert or update a family, maintaining the member index
    pub fn upsert(&self, family: FamilyConfig) -> Result<(), VdfError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_member = self
            .by_member
            .write()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        // A rebind to a different member must drop the stale index entry
        if let Some(old) = data.get(&family.id) {
            if old.member_id != family.member_id {
                by_member.remove(&old.member_id);
            }
        }
        by_member.insert(family.member_id, family.id);
        data.insert(family.id, family);

        Ok(())
    }

    /// Count families
    pub fn count(&self) -> Result<usize, VdfError> {
        let data = self
            .data
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}
