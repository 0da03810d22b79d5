//! Storage initialization
//!
//! Handles first-run setup: seeds the default deposit categories and records
//! the contribution category's id in settings so the mirror never has to
//! chase the category by display name.

use crate::config::paths::VdfPaths;
use crate::config::settings::Settings;
use crate::error::VdfError;
use crate::models::{DefaultDepositCategory, DepositCategoryId};

use super::deposits::DepositRepository;

/// Initialize storage for a fresh installation
///
/// Seeds the deposit category directory on first run. Data directories
/// written before the contribution category id was recorded in settings get
/// it back-filled here by a one-time name lookup.
pub fn initialize_storage(paths: &VdfPaths, settings: &mut Settings) -> Result<(), VdfError> {
    paths.ensure_directories()?;

    if !paths.deposits_file().exists() {
        let contribution_id = create_default_categories(paths)?;
        settings.contribution_category_id = Some(contribution_id);
        settings.save(paths)?;
    } else if settings.contribution_category_id.is_none() {
        if let Some(id) =
            lookup_contribution_category(paths, &settings.contribution_category_name)?
        {
            settings.contribution_category_id = Some(id);
            settings.save(paths)?;
        }
    }

    Ok(())
}

/// Seed the default deposit categories, returning the contribution category id
fn create_default_categories(paths: &VdfPaths) -> Result<DepositCategoryId, VdfError> {
    let repo = DepositRepository::new(paths.deposits_file());
    repo.load()?;

    let contribution = DefaultDepositCategory::Contribution.to_category();
    let contribution_id = contribution.id;
    repo.upsert_category(contribution)?;

    for default in DefaultDepositCategory::all() {
        if *default == DefaultDepositCategory::Contribution {
            continue;
        }
        repo.upsert_category(default.to_category())?;
    }

    repo.save()?;
    Ok(contribution_id)
}

/// Find the contribution category in an existing directory by name
fn lookup_contribution_category(
    paths: &VdfPaths,
    name: &str,
) -> Result<Option<DepositCategoryId>, VdfError> {
    let repo = DepositRepository::new(paths.deposits_file());
    repo.load()?;
    Ok(repo.find_category_by_name(name)?.map(|c| c.id))
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &VdfPaths) -> bool {
    !paths.deposits_file().exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DepositCategory;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_storage() {
        let temp_dir = TempDir::new().unwrap();
        let paths = VdfPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut settings = Settings::default();

        assert!(needs_initialization(&paths));

        initialize_storage(&paths, &mut settings).unwrap();

        assert!(!needs_initialization(&paths));
        assert!(paths.deposits_file().exists());
        assert!(paths.data_dir().exists());
        assert!(settings.contribution_category_id.is_some());
    }

    #[test]
    fn test_default_categories_created() {
        let temp_dir = TempDir::new().unwrap();
        let paths = VdfPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut settings = Settings::default();

        initialize_storage(&paths, &mut settings).unwrap();

        let repo = DepositRepository::new(paths.deposits_file());
        repo.load().unwrap();

        let names: Vec<_> = repo
            .get_categories()
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names.len(), 4);
        assert!(names.contains(&"Monthly Contribution".to_string()));
        assert!(names.contains(&"Donation".to_string()));
        assert!(names.contains(&"Grant".to_string()));
        assert!(names.contains(&"Other".to_string()));

        // The recorded id points at the contribution category
        let recorded = settings.contribution_category_id.unwrap();
        let category = repo.get_category(recorded).unwrap().unwrap();
        assert_eq!(category.name, "Monthly Contribution");
    }

    #[test]
    fn test_doesnt_overwrite_existing() {
        let temp_dir = TempDir::new().unwrap();
        let paths = VdfPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut settings = Settings::default();

        initialize_storage(&paths, &mut settings).unwrap();
        let first_id = settings.contribution_category_id;

        // Second initialization keeps the seeded directory and recorded id
        initialize_storage(&paths, &mut settings).unwrap();

        let repo = DepositRepository::new(paths.deposits_file());
        repo.load().unwrap();
        assert_eq!(repo.count_categories().unwrap(), 4);
        assert_eq!(settings.contribution_category_id, first_id);
    }

    #[test]
    fn test_backfills_missing_category_id() {
        let temp_dir = TempDir::new().unwrap();
        let paths = VdfPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();

        // An existing directory with a contribution category but no recorded id
        let repo = DepositRepository::new(paths.deposits_file());
        repo.load().unwrap();
        let category = DepositCategory::new("Monthly Contribution");
        let category_id = category.id;
        repo.upsert_category(category).unwrap();
        repo.save().unwrap();

        let mut settings = Settings::default();
        assert!(settings.contribution_category_id.is_none());

        initialize_storage(&paths, &mut settings).unwrap();
        assert_eq!(settings.contribution_category_id, Some(category_id));
    }
}
