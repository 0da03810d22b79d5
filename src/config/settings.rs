//! Fund settings
//!
//! Manages fund-wide preferences: the historical floor for dues windows,
//! currency display, and the mirroring category reference.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::paths::VdfPaths;
use crate::error::VdfError;
use crate::models::DepositCategoryId;

/// Fund-wide settings for the VDF ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Display name of the fund
    #[serde(default = "default_fund_name")]
    pub fund_name: String,

    /// Historical floor for dues windows
    ///
    /// Families registered without an explicit effective date start owing
    /// from this month.
    #[serde(default = "default_fund_epoch")]
    pub fund_epoch: NaiveDate,

    /// Default currency symbol
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Display name of the deposit category contributions are mirrored into
    #[serde(default = "default_contribution_category")]
    pub contribution_category_name: String,

    /// Stable id of the mirroring category, recorded when storage is seeded
    ///
    /// Mirroring resolves this id first and only falls back to a name lookup
    /// for data directories written before the id was recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contribution_category_id: Option<DepositCategoryId>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_fund_name() -> String {
    "Village Development Fund".to_string()
}

fn default_fund_epoch() -> NaiveDate {
    // The fund's first collection month
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default()
}

fn default_currency() -> String {
    "৳".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_contribution_category() -> String {
    "Monthly Contribution".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            fund_name: default_fund_name(),
            fund_epoch: default_fund_epoch(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            contribution_category_name: default_contribution_category(),
            contribution_category_id: None,
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &VdfPaths) -> Result<Self, VdfError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| VdfError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents)
                .map_err(|e| VdfError::Config(format!("Failed to parse settings file: {}", e)))?;

            Ok(settings)
        } else {
            // Create default settings
            let settings = Settings::default();
            // Don't save yet - let caller decide when to persist
            Ok(settings)
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &VdfPaths) -> Result<(), VdfError> {
        // Ensure the config directory exists
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| VdfError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(&settings_path, contents)
            .map_err(|e| VdfError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.fund_name, "Village Development Fund");
        assert_eq!(settings.currency_symbol, "৳");
        assert_eq!(settings.contribution_category_name, "Monthly Contribution");
        assert!(settings.contribution_category_id.is_none());
        assert_eq!(
            settings.fund_epoch,
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = VdfPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.fund_name = "Dhuri Para VDF".to_string();
        settings.fund_epoch = NaiveDate::from_ymd_opt(2022, 4, 1).unwrap();

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.fund_name, "Dhuri Para VDF");
        assert_eq!(
            loaded.fund_epoch,
            NaiveDate::from_ymd_opt(2022, 4, 1).unwrap()
        );
    }

    #[test]
    fn test_serde_round_trip() {
        let settings = Settings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let deserialized: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings.fund_epoch, deserialized.fund_epoch);
        assert_eq!(
            settings.contribution_category_name,
            deserialized.contribution_category_name
        );
    }
}
