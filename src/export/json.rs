//! JSON Export functionality
//!
//! Exports the complete fund database to JSON format with schema versioning.

use crate::error::VdfResult;
use crate::models::{
    Contribution, Deposit, DepositCategory, Exemption, Expense, FamilyConfig, Member,
    MonthlyConfig,
};
use crate::storage::Storage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full database export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    /// All members
    pub members: Vec<Member>,

    /// All family configurations
    pub families: Vec<FamilyConfig>,

    /// All monthly requirement overrides
    pub monthly_configs: Vec<MonthlyConfig>,

    /// All exemptions
    pub exemptions: Vec<Exemption>,

    /// All contributions
    pub contributions: Vec<Contribution>,

    /// All deposit categories
    pub deposit_categories: Vec<DepositCategory>,

    /// All deposits, mirrored contributions included
    pub deposits: Vec<Deposit>,

    /// All expenses
    pub expenses: Vec<Expense>,

    /// Export metadata
    pub metadata: ExportMetadata,
}

/// Export metadata for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    /// Total number of families
    pub family_count: usize,

    /// Total number of contributions
    pub contribution_count: usize,

    /// Total number of exemptions
    pub exemption_count: usize,

    /// Total number of deposits
    pub deposit_count: usize,

    /// Total number of expenses
    pub expense_count: usize,

    /// Earliest contributed month
    pub earliest_contribution: Option<String>,

    /// Latest contributed month
    pub latest_contribution: Option<String>,
}

impl FullExport {
    /// Create a new full export from storage
    pub fn from_storage(storage: &Storage) -> VdfResult<Self> {
        let members = storage.members.get_all()?;
        let families = storage.families.get_all()?;
        let monthly_configs = storage.monthly_configs.get_all()?;
        let exemptions = storage.exemptions.get_all()?;
        let contributions = storage.contributions.get_all()?;
        let deposit_categories = storage.deposits.get_categories()?;
        let deposits = storage.deposits.get_all()?;
        let expenses = storage.expenses.get_all()?;

        let earliest_contribution = contributions
            .iter()
            .map(|c| c.month)
            .min()
            .map(|m| m.token());

        let latest_contribution = contributions
            .iter()
            .map(|c| c.month)
            .max()
            .map(|m| m.token());

        let metadata = ExportMetadata {
            family_count: families.len(),
            contribution_count: contributions.len(),
            exemption_count: exemptions.len(),
            deposit_count: deposits.len(),
            expense_count: expenses.len(),
            earliest_contribution,
            latest_contribution,
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            members,
            families,
            monthly_configs,
            exemptions,
            contributions,
            deposit_categories,
            deposits,
            expenses,
            metadata,
        })
    }

    /// Validate the export structure
    pub fn validate(&self) -> Result<(), String> {
        // Check schema version
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        // Check referential integrity
        let member_ids: std::collections::HashSet<_> =
            self.members.iter().map(|m| m.id).collect();
        let family_ids: std::collections::HashSet<_> =
            self.families.iter().map(|f| f.id).collect();
        let category_ids: std::collections::HashSet<_> =
            self.deposit_categories.iter().map(|c| c.id).collect();

        // Validate families reference valid members
        for family in &self.families {
            if !member_ids.contains(&family.member_id) {
                return Err(format!(
                    "Family {} references unknown member {}",
                    family.id, family.member_id
                ));
            }
        }

        // Validate contributions reference valid families
        for contribution in &self.contributions {
            if !family_ids.contains(&contribution.family_id) {
                return Err(format!(
                    "Contribution {} references unknown family {}",
                    contribution.id, contribution.family_id
                ));
            }
        }

        // Validate exemptions reference valid families
        for exemption in &self.exemptions {
            if !family_ids.contains(&exemption.family_id) {
                return Err(format!(
                    "Exemption for {} references unknown family {}",
                    exemption.month.token(),
                    exemption.family_id
                ));
            }
        }

        // Validate deposits reference valid categories and members
        for deposit in &self.deposits {
            if !category_ids.contains(&deposit.category_id) {
                return Err(format!(
                    "Deposit {} references unknown category {}",
                    deposit.id, deposit.category_id
                ));
            }
            if let Some(member_id) = deposit.member_id {
                if !member_ids.contains(&member_id) {
                    return Err(format!(
                        "Deposit {} references unknown member {}",
                        deposit.id, member_id
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Export the full database to JSON
pub fn export_full_json<W: Write>(
    storage: &Storage,
    writer: &mut W,
    pretty: bool,
) -> VdfResult<()> {
    let export = FullExport::from_storage(storage)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| crate::error::VdfError::Export(e.to_string()))?;

    Ok(())
}

/// Import from a JSON export (for verification/restore)
pub fn import_from_json(json_str: &str) -> VdfResult<FullExport> {
    let export: FullExport = serde_json::from_str(json_str)
        .map_err(|e| crate::error::VdfError::Import(e.to_string()))?;

    // Validate the import
    export.validate().map_err(crate::error::VdfError::Import)?;

    Ok(export)
}
