//! Path management for the VDF ledger
//!
//! Provides XDG-compliant path resolution for configuration and data files.
//!
//! ## Path Resolution Order
//!
//! 1. `VDF_LEDGER_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/vdf-ledger` or `~/.config/vdf-ledger`
//! 3. Windows: `%APPDATA%\vdf-ledger`

use std::path::PathBuf;

use crate::error::VdfError;

/// Manages all paths used by the ledger
#[derive(Debug, Clone)]
pub struct VdfPaths {
    /// Base directory for all ledger data
    base_dir: PathBuf,
}

impl VdfPaths {
    /// Create a new VdfPaths instance
    ///
    /// Path resolution:
    /// 1. `VDF_LEDGER_DATA_DIR` env var (explicit override)
    /// 2. Unix: `$XDG_CONFIG_HOME/vdf-ledger` or `~/.config/vdf-ledger`
    /// 3. Windows: `%APPDATA%\vdf-ledger`
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, VdfError> {
        let base_dir = if let Ok(custom) = std::env::var("VDF_LEDGER_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create VdfPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/vdf-ledger/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (~/.config/vdf-ledger/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to members.json
    pub fn members_file(&self) -> PathBuf {
        self.data_dir().join("members.json")
    }

    /// Get the path to families.json
    pub fn families_file(&self) -> PathBuf {
        self.data_dir().join("families.json")
    }

    /// Get the path to contributions.json
    pub fn contributions_file(&self) -> PathBuf {
        self.data_dir().join("contributions.json")
    }

    /// Get the path to exemptions.json
    pub fn exemptions_file(&self) -> PathBuf {
        self.data_dir().join("exemptions.json")
    }

    /// Get the path to monthly_configs.json (requirement overrides)
    pub fn monthly_configs_file(&self) -> PathBuf {
        self.data_dir().join("monthly_configs.json")
    }

    /// Get the path to deposits.json (deposit rows and categories)
    pub fn deposits_file(&self) -> PathBuf {
        self.data_dir().join("deposits.json")
    }

    /// Get the path to expenses.json
    pub fn expenses_file(&self) -> PathBuf {
        self.data_dir().join("expenses.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), VdfError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| VdfError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| VdfError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if the ledger has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, VdfError> {
    // Unix (Linux/macOS): Use XDG_CONFIG_HOME if set, otherwise ~/.config
    let config_base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
    Ok(config_base.join("vdf-ledger"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, VdfError> {
    // Windows: Use APPDATA
    let appdata = std::env::var("APPDATA")
        .map_err(|_| VdfError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("vdf-ledger"))
}
