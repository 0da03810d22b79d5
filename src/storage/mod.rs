//! Storage layer for the VDF ledger
//!
//! Provides JSON file storage with atomic writes and automatic directory
//! creation. Each record type gets its own repository and file.

pub mod contributions;
pub mod deposits;
pub mod exemptions;
pub mod expenses;
pub mod families;
pub mod file_io;
pub mod init;
pub mod members;
pub mod monthly_configs;

pub use contributions::ContributionRepository;
pub use deposits::DepositRepository;
pub use exemptions::ExemptionRepository;
pub use expenses::ExpenseRepository;
pub use families::FamilyRepository;
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use members::MemberRepository;
pub use monthly_configs::MonthlyConfigRepository;

use crate::config::paths::VdfPaths;
use crate::error::VdfError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: VdfPaths,
    pub members: MemberRepository,
    pub families: FamilyRepository,
    pub contributions: ContributionRepository,
    pub exemptions: ExemptionRepository,
    pub monthly_configs: MonthlyConfigRepository,
    pub deposits: DepositRepository,
    pub expenses: ExpenseRepository,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: VdfPaths) -> Result<Self, VdfError> {
        // Ensure directories exist
        paths.ensure_directories()?;

        Ok(Self {
            members: MemberRepository::new(paths.members_file()),
            families: FamilyRepository::new(paths.families_file()),
            contributions: ContributionRepository::new(paths.contributions_file()),
            exemptions: ExemptionRepository::new(paths.exemptions_file()),
            monthly_configs: MonthlyConfigRepository::new(paths.monthly_configs_file()),
            deposits: DepositRepository::new(paths.deposits_file()),
            expenses: ExpenseRepository::new(paths.expenses_file()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &VdfPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), VdfError> {
        self.members.load()?;
        self.families.load()?;
        self.contributions.load()?;
        self.exemptions.load()?;
        self.monthly_configs.load()?;
        self.deposits.load()?;
        self.expenses.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), VdfError> {
        self.members.save()?;
        self.families.save()?;
        self.contributions.save()?;
        self.exemptions.save()?;
        self.monthly_configs.save()?;
        self.deposits.save()?;
        self.expenses.save()?;
        Ok(())
    }

    /// Check if storage has been initialized (has any data)
    pub fn is_initialized(&self) -> bool {
        self.paths.settings_file().exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = VdfPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
    }

    #[test]
    fn test_load_all_on_empty_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = VdfPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();

        storage.load_all().unwrap();
        assert_eq!(storage.families.count().unwrap(), 0);
        assert_eq!(storage.contributions.count().unwrap(), 0);
    }

    #[test]
    fn test_save_all_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let paths = VdfPaths::with_base_dir(temp_dir.path().to_path_buf());

        {
            let mut storage = Storage::new(paths.clone()).unwrap();
            storage.load_all().unwrap();
            let member = crate::models::Member::new("Rahim", "Uddin");
            let family = crate::models::FamilyConfig::new(
                member.id,
                "Rahim Uddin",
                crate::models::Money::from_taka(20),
            );
            storage.members.upsert(member).unwrap();
            storage.families.upsert(family).unwrap();
            storage.save_all().unwrap();
        }

        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        assert_eq!(storage.members.count().unwrap(), 1);
        assert_eq!(storage.families.count().unwrap(), 1);
    }
}
