//! Export module for the VDF ledger
//!
//! Provides complete data export functionality in multiple formats:
//! - CSV: For the contribution register, deposits, and families
//! - JSON: For machine-readable full database export
//! - YAML: For human-readable full database export

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::{export_contributions_csv, export_deposits_csv, export_families_csv};
pub use json::{export_full_json, FullExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_full_yaml;
