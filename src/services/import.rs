//! Legacy ledger import service
//!
//! Imports the hand-kept collection registers the fund ran on before this
//! system. Each CSV row is one month's entry for one family: head name,
//! year, month number, amount, the date it was paid (optional), and notes
//! (optional). Rows are parsed, matched against the registered families,
//! grouped per family-year, and applied through the bulk reconciliation
//! path, so each family-year lands with a single consolidated deposit and
//! re-imports of a corrected register stay idempotent.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use csv::{Reader, StringRecord};

use crate::config::settings::Settings;
use crate::error::VdfResult;
use crate::models::{FamilyId, Money, MonthYear};
use crate::services::contribution::{BulkPostInput, ContributionService};
use crate::storage::Storage;

/// A parsed row from the legacy register
#[derive(Debug, Clone)]
pub struct ParsedContributionRow {
    /// Family head name as written in the register
    pub family_head_name: String,
    pub year: i32,
    /// Month number, 1 through 12
    pub month: u32,
    pub amount: Money,
    /// Date the payment was handed over, when the register recorded one
    pub paid_on: Option<NaiveDate>,
    pub notes: Option<String>,
    /// Original row number in the CSV (0-indexed, excluding header)
    pub row_number: usize,
}

/// Status of a row for import preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowStatus {
    /// Row matched a registered family and will be imported
    Ready(FamilyId),
    /// No registered family carries this head name
    UnknownFamily,
    /// Row could not be parsed
    Error(String),
}

/// Preview entry for import review
#[derive(Debug, Clone)]
pub struct ImportPreviewEntry {
    pub row: ParsedContributionRow,
    pub status: RowStatus,
}

/// Result of a completed import
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    /// Family-year batches applied
    pub batches_posted: usize,
    /// Contribution rows created or updated across all batches
    pub months_posted: usize,
    /// Existing rows cleared by zero amounts in the register
    pub months_cleared: usize,
    /// Rows skipped because the family name matched nothing
    pub unmatched: usize,
    /// Rows that failed to parse or apply
    pub errors: usize,
    /// Total amount posted
    pub total_posted: Money,
    /// Head names that matched no registered family
    pub unmatched_names: Vec<String>,
    /// Error messages by row
    pub error_messages: HashMap<usize, String>,
}

/// Rows for one family-year, staged for a single bulk application
#[derive(Debug, Default)]
struct ImportBatch {
    amounts: BTreeMap<u32, Money>,
    paid_on: Option<NaiveDate>,
    notes: Option<String>,
    row_numbers: Vec<usize>,
}

/// Service for importing legacy registers
pub struct LedgerImportService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
}

impl<'a> LedgerImportService<'a> {
    /// Create a new import service
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self { storage, settings }
    }

    /// Parse a legacy register CSV into contribution rows
    ///
    /// Expected columns: family, year, month, amount, paid_on, notes.
    /// The paid_on and notes columns may be empty or absent.
    pub fn parse_csv_from_reader<R: std::io::Read>(
        &self,
        reader: &mut Reader<R>,
    ) -> VdfResult<Vec<Result<ParsedContributionRow, String>>> {
        let mut results = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    results.push(Err(format!("Error reading CSV record: {}", e)));
                    continue;
                }
            };
            results.push(parse_record(&record, idx));
        }
        Ok(results)
    }

    /// Match parsed rows against the registered families
    pub fn generate_preview(
        &self,
        parsed: &[Result<ParsedContributionRow, String>],
    ) -> VdfResult<Vec<ImportPreviewEntry>> {
        // Head names in the registers are inconsistent about case and spacing
        let families_by_name: HashMap<String, FamilyId> = self
            .storage
            .families
            .get_all()?
            .into_iter()
            .map(|f| (f.family_head_name.trim().to_lowercase(), f.id))
            .collect();

        let mut preview = Vec::with_capacity(parsed.len());
        for (idx, result) in parsed.iter().enumerate() {
            match result {
                Ok(row) => {
                    let key = row.family_head_name.trim().to_lowercase();
                    let status = match families_by_name.get(&key) {
                        Some(&family_id) => RowStatus::Ready(family_id),
                        None => RowStatus::UnknownFamily,
                    };
                    preview.push(ImportPreviewEntry {
                        row: row.clone(),
                        status,
                    });
                }
                Err(e) => {
                    preview.push(ImportPreviewEntry {
                        row: placeholder_row(idx),
                        status: RowStatus::Error(e.clone()),
                    });
                }
            }
        }

        Ok(preview)
    }

    /// Apply a previewed import, one bulk posting per family-year
    pub fn import_from_preview(&self, preview: &[ImportPreviewEntry]) -> VdfResult<ImportResult> {
        let contributions = ContributionService::new(self.storage, self.settings);

        let mut result = ImportResult::default();
        let mut batches: BTreeMap<(FamilyId, i32), ImportBatch> = BTreeMap::new();

        for entry in preview {
            match &entry.status {
                RowStatus::Ready(family_id) => {
                    let row = &entry.row;
                    let batch = batches.entry((*family_id, row.year)).or_default();
                    // A repeated month in the register is a correction; the
                    // later row wins
                    batch.amounts.insert(row.month, row.amount);
                    batch.paid_on = match (batch.paid_on, row.paid_on) {
                        (Some(a), Some(b)) => Some(a.max(b)),
                        (a, b) => b.or(a),
                    };
                    if batch.notes.is_none() {
                        batch.notes = row.notes.clone().filter(|n| !n.trim().is_empty());
                    }
                    batch.row_numbers.push(row.row_number);
                }
                RowStatus::UnknownFamily => {
                    result.unmatched += 1;
                    let name = entry.row.family_head_name.clone();
                    if !result.unmatched_names.contains(&name) {
                        result.unmatched_names.push(name);
                    }
                }
                RowStatus::Error(e) => {
                    result.errors += 1;
                    result
                        .error_messages
                        .insert(entry.row.row_number, e.clone());
                }
            }
        }

        for ((family_id, year), batch) in batches {
            let input = BulkPostInput {
                family_id,
                year,
                amounts: batch.amounts,
                // The latest paid date in the batch stands in for the whole
                // year's rows; undated registers fall back to the year's end
                payment_date: batch
                    .paid_on
                    .unwrap_or_else(|| MonthYear::end_of_year(year).last_day()),
                notes: Some(
                    batch
                        .notes
                        .unwrap_or_else(|| "Imported from legacy register".to_string()),
                ),
            };

            match contributions.record_bulk(input) {
                Ok(bulk) => {
                    result.batches_posted += 1;
                    result.months_posted += bulk.posted.len();
                    result.months_cleared += bulk.removed.len();
                    result.total_posted += bulk.total_posted;
                }
                Err(e) => {
                    log::warn!(
                        "Legacy import batch for family {} year {} failed: {}",
                        family_id,
                        year,
                        e
                    );
                    result.errors += batch.row_numbers.len();
                    let message = e.to_string();
                    for row_number in batch.row_numbers {
                        result.error_messages.insert(row_number, message.clone());
                    }
                }
            }
        }

        log::info!(
            "Legacy import applied {} batches, {} months posted, {} unmatched, {} errors",
            result.batches_posted,
            result.months_posted,
            result.unmatched,
            result.errors
        );

        Ok(result)
    }
}

/// Parse one register row: family, year, month, amount, paid_on, notes
fn parse_record(
    record: &StringRecord,
    row_number: usize,
) -> Result<ParsedContributionRow, String> {
    let family_head_name = record
        .get(0)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "Missing family name".to_string())?
        .to_string();

    let year_str = record
        .get(1)
        .map(|s| s.trim())
        .ok_or_else(|| "Missing year column".to_string())?;
    let year: i32 = year_str
        .parse()
        .map_err(|_| format!("Could not parse year: '{}'", year_str))?;

    let month_str = record
        .get(2)
        .map(|s| s.trim())
        .ok_or_else(|| "Missing month column".to_string())?;
    let month: u32 = month_str
        .parse()
        .map_err(|_| format!("Could not parse month: '{}'", month_str))?;
    if !(1..=12).contains(&month) {
        return Err(format!("Month out of range: {}", month));
    }

    let amount_str = record
        .get(3)
        .map(|s| s.trim())
        .ok_or_else(|| "Missing amount column".to_string())?;
    let amount = Money::parse(amount_str)
        .map_err(|e| format!("Could not parse amount '{}': {}", amount_str, e))?;

    let paid_on = match record.get(4).map(|s| s.trim()).filter(|s| !s.is_empty()) {
        Some(s) => Some(
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|_| format!("Could not parse paid date: '{}'", s))?,
        ),
        None => None,
    };

    let notes = record
        .get(5)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string());

    Ok(ParsedContributionRow {
        family_head_name,
        year,
        month,
        amount,
        paid_on,
        notes,
        row_number,
    })
}

fn placeholder_row(row_number: usize) -> ParsedContributionRow {
    ParsedContributionRow {
        family_head_name: String::new(),
        year: 0,
        month: 1,
        amount: Money::zero(),
        paid_on: None,
        notes: None,
        row_number,
    }
}
