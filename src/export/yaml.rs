//! YAML Export functionality
//!
//! Exports the complete fund database to YAML format for human-readable
//! backup.

use crate::error::VdfResult;
use crate::export::json::FullExport;
use crate::storage::Storage;
use std::io::Write;

/// Export the full database to YAML format
pub fn export_full_yaml<W: Write>(storage: &Storage, writer: &mut W) -> VdfResult<()> {
    let export = FullExport::from_storage(storage)?;

    // Add a header comment
    writeln!(writer, "# VDF Ledger Full Database Export")
        .map_err(|e| crate::error::VdfError::Export(e.to_string()))?;
    writeln!(writer, "# Generated: {}", export.exported_at)
        .map_err(|e| crate::error::VdfError::Export(e.to_string()))?;
    writeln!(writer, "# App Version: {}", export.app_version)
        .map_err(|e| crate::error::VdfError::Export(e.to_string()))?;
    writeln!(writer, "#").map_err(|e| crate::error::VdfError::Export(e.to_string()))?;
    writeln!(
        writer,
        "# This file can be used to restore the fund's records."
    )
    .map_err(|e| crate::error::VdfError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| crate::error::VdfError::Export(e.to_string()))?;

    // Serialize to YAML
    serde_yaml::to_writer(writer, &export)
        .map_err(|e| crate::error::VdfError::Export(e.to_string()))?;

    Ok(())
}

/// Import from a YAML export
pub fn import_from_yaml(yaml_str: &str) -> VdfResult<FullExport> {
    let export: FullExport = serde_yaml::from_str(yaml_str)
        .map_err(|e| crate::error::VdfError::Import(e.to_string()))?;

    // Validate the import
    export.validate().map_err(crate::error::VdfError::Import)?;

    Ok(export)
}
