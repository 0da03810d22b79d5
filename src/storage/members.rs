//! Member repository for JSON storage
//!
//! Manages loading and saving the member directory to members.json.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::VdfError;
use crate::models::{Member, MemberId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable member data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct MemberData {
    members: Vec<Member>,
}

/// Repository for member persistence
pub struct MemberRepository {
    path: PathBuf,
    data: RwLock<HashMap<MemberId, Member>>,
}

impl MemberRepository {
    /// Create a new member repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load members from disk
    pub fn load(&self) -> Result<(), VdfError> {
        let file_data: MemberData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for member in file_data.members {
            data.insert(member.id, member);
        }

        Ok(())
    }

    /// Save members to disk
    pub fn save(&self) -> Result<(), VdfError> {
        let data = self
            .data
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut members: Vec<_> = data.values().cloned().collect();
        members.sort_by(|a, b| {
            a.display_name()
                .to_lowercase()
                .cmp(&b.display_name().to_lowercase())
        });

        let file_data = MemberData { members };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get a member by ID
    pub fn get(&self, id: MemberId) -> Result<Option<Member>, VdfError> {
        let data = self
            .data
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all members, sorted by display name
    pub fn get_all(&self) -> Result<Vec<Member>, VdfError> {
        let data = self
            .data
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut members: Vec<_> = data.values().cloned().collect();
        members.sort_by(|a, b| {
            a.display_name()
                .to_lowercase()
                .cmp(&b.display_name().to_lowercase())
        });
        Ok(members)
    }

    /// Insert or update a member
    pub fn upsert(&self, member: Member) -> Result<(), VdfError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(member.id, member);
        Ok(())
    }

    /// Count members
    pub fn count(&self) -> Result<usize, VdfError> {
        let data = self
            .data
            .read()
            .map_err(|e| VdfError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}
