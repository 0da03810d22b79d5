//! CSV Export functionality
//!
//! Exports the contribution register, the deposit ledger, and the family
//! directory to CSV format.

use crate::error::VdfResult;
use crate::storage::Storage;
use std::io::Write;

/// Export the contribution register to CSV
pub fn export_contributions_csv<W: Write>(storage: &Storage, writer: &mut W) -> VdfResult<()> {
    // Build family name lookup
    let families = storage.families.get_all()?;
    let family_names: std::collections::HashMap<_, _> = families
        .iter()
        .map(|f| (f.id, f.family_head_name.clone()))
        .collect();

    // Write header
    writeln!(writer, "Family,Month,Amount,Payment Date,Notes")
        .map_err(|e| crate::error::VdfError::Export(e.to_string()))?;

    let contributions = storage.contributions.get_all()?;

    for contribution in contributions {
        let family_name = family_names
            .get(&contribution.family_id)
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string());

        writeln!(
            writer,
            "{},{},{:.2},{},{}",
            escape_csv(&family_name),
            contribution.month.token(),
            contribution.amount.paisa() as f64 / 100.0,
            contribution.payment_date,
            escape_csv(&contribution.notes)
        )
        .map_err(|e| crate::error::VdfError::Export(e.to_string()))?;
    }

    Ok(())
}

/// Export the deposit ledger to CSV
pub fn export_deposits_csv<W: Write>(storage: &Storage, writer: &mut W) -> VdfResult<()> {
    // Build lookups
    let categories = storage.deposits.get_categories()?;
    let category_names: std::collections::HashMap<_, _> = categories
        .iter()
        .map(|c| (c.id, c.name.clone()))
        .collect();

    let members = storage.members.get_all()?;
    let member_names: std::collections::HashMap<_, _> = members
        .iter()
        .map(|m| (m.id, m.display_name()))
        .collect();

    // Write header
    writeln!(writer, "ID,Date,Category,Member,Amount,Notes")
        .map_err(|e| crate::error::VdfError::Export(e.to_string()))?;

    let deposits = storage.deposits.get_all()?;

    for deposit in deposits {
        let category_name = category_names
            .get(&deposit.category_id)
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string());

        let member_name = deposit
            .member_id
            .and_then(|id| member_names.get(&id).cloned())
            .unwrap_or_default();

        writeln!(
            writer,
            "{},{},{},{},{:.2},{}",
            deposit.id,
            deposit.date,
            escape_csv(&category_name),
            escape_csv(&member_name),
            deposit.amount.paisa() as f64 / 100.0,
            escape_csv(&deposit.notes)
        )
        .map_err(|e| crate::error::VdfError::Export(e.to_string()))?;
    }

    Ok(())
}

/// Export the family directory to CSV
pub fn export_families_csv<W: Write>(storage: &Storage, writer: &mut W) -> VdfResult<()> {
    let members = storage.members.get_all()?;
    let member_names: std::collections::HashMap<_, _> = members
        .iter()
        .map(|m| (m.id, m.display_name()))
        .collect();

    // Write header
    writeln!(
        writer,
        "ID,Head Name,Member,Monthly Amount,Enabled,Effective From,Notes"
    )
    .map_err(|e| crate::error::VdfError::Export(e.to_string()))?;

    let families = storage.families.get_all()?;

    for family in families {
        let member_name = member_names
            .get(&family.member_id)
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string());

        let effective_from = family
            .effective_from
            .map(|d| d.to_string())
            .unwrap_or_default();

        writeln!(
            writer,
            "{},{},{},{:.2},{},{},{}",
            family.id,
            escape_csv(&family.family_head_name),
            escape_csv(&member_name),
            family.monthly_amount.paisa() as f64 / 100.0,
            family.contribution_enabled,
            effective_from,
            escape_csv(&family.notes)
        )
        .map_err(|e| crate::error::VdfError::Export(e.to_string()))?;
    }

    Ok(())
}

/// Escape a string for CSV format
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
