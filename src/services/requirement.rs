//! Monthly requirement service
//!
//! Resolves the amount a family owes for a given month and manages the
//! per-month overrides committee decisions create.

use crate::error::{VdfError, VdfResult};
use crate::models::{FamilyConfig, Money, MonthYear, MonthlyConfig};
use crate::storage::Storage;

/// Service for resolving and administering monthly requirements
pub struct RequirementService<'a> {
    storage: &'a Storage,
}

impl<'a> RequirementService<'a> {
    /// Create a new requirement service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Resolve the required amount for a family in one month
    ///
    /// An active override for the month wins; otherwise the family's own
    /// monthly amount applies. There is no month without an answer.
    pub fn required_amount(&self, family: &FamilyConfig, month: MonthYear) -> VdfResult<Money> {
        match self.storage.monthly_configs.get_active(month)? {
            Some(config) => Ok(config.required_amount),
            None => Ok(family.monthly_amount),
        }
    }

    /// Set or replace the override for a month
    pub fn set_override(
        &self,
        month: MonthYear,
        required_amount: Money,
        description: &str,
    ) -> VdfResult<MonthlyConfig> {
        let config = match self.storage.monthly_configs.get(month)? {
            Some(mut existing) => {
                existing.required_amount = required_amount;
                existing.description = description.trim().to_string();
                existing.active = true;
                existing.updated_at = chrono::Utc::now();
                existing
            }
            None => {
                let mut config = MonthlyConfig::new(month, required_amount);
                config.description = description.trim().to_string();
                config
            }
        };

        config
            .validate()
            .map_err(|e| VdfError::Validation(e.to_string()))?;

        self.storage.monthly_configs.upsert(config.clone())?;
        self.storage.monthly_configs.save()?;

        Ok(config)
    }

    /// Deactivate the override for a month without removing it
    pub fn deactivate_override(&self, month: MonthYear) -> VdfResult<MonthlyConfig> {
        let mut config = self.storage.monthly_configs.get(month)?.ok_or_else(|| {
            VdfError::NotFound {
                entity_type: "Monthly override",
                identifier: month.token(),
            }
        })?;

        config.deactivate();
        self.storage.monthly_configs.upsert(config.clone())?;
        self.storage.monthly_configs.save()?;

        Ok(config)
    }

    /// Remove the override for a month entirely
    pub fn clear_override(&self, month: MonthYear) -> VdfResult<()> {
        if !self.storage.monthly_configs.delete(month)? {
            return Err(VdfError::NotFound {
                entity_type: "Monthly override",
                identifier: month.token(),
            });
        }
        self.storage.monthly_configs.save()?;
        Ok(())
    }

    /// List all overrides, newest month first
    pub fn list_overrides(&self) -> VdfResult<Vec<MonthlyConfig>> {
        self.storage.monthly_configs.get_all()
    }
}
