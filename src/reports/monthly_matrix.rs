//! Monthly Collection Matrix
//!
//! The month-by-month collection grid the committee reads out at meetings:
//! one row per contribution-enabled family, twelve cells for the target
//! year, with the year's and all-time dues figures alongside.

use crate::error::{VdfError, VdfResult};
use crate::models::{FamilyId, Money, MonthYear};
use crate::services::DuesService;
use crate::storage::Storage;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::io::Write;

/// State of one family-month cell in the matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthCell {
    /// Month lies outside the family's applicable window
    NotDue,
    /// Month waived by exemption
    Exempt,
    /// Contribution recorded, with its amount
    Paid(Money),
    /// Applicable month with nothing recorded yet
    Pending,
}

impl MonthCell {
    /// Single-character marker for the terminal grid
    fn marker(&self) -> &'static str {
        match self {
            MonthCell::NotDue => "-",
            MonthCell::Exempt => "E",
            MonthCell::Paid(_) => "P",
            MonthCell::Pending => ".",
        }
    }
}

/// One family's row in the matrix
#[derive(Debug, Clone)]
pub struct FamilyMatrixRow {
    /// Family ID
    pub family_id: FamilyId,
    /// Family head name
    pub family_head_name: String,
    /// January through December
    pub cells: [MonthCell; 12],
    /// Months owed this year after exemptions
    pub applicable_months: u32,
    /// Applicable months with a contribution recorded
    pub paid_months: u32,
    /// Applicable months still unpaid
    pub pending_months: u32,
    /// Amount collected this year
    pub paid_this_year: Money,
    /// Outstanding balance for this year
    pub due_this_year: Money,
    /// Amount collected since the family's window opened
    pub paid_all_time: Money,
    /// Outstanding balance over the whole window
    pub due_all_time: Money,
}

/// Monthly Collection Matrix report
#[derive(Debug, Clone)]
pub struct MonthlyMatrixReport {
    /// Target year
    pub year: i32,
    /// Evaluation date
    pub as_of: NaiveDate,
    /// One row per enabled family, sorted by head name
    pub rows: Vec<FamilyMatrixRow>,
    /// Collected this year across all rows
    pub total_paid_this_year: Money,
    /// Outstanding this year across all rows
    pub total_due_this_year: Money,
}

impl MonthlyMatrixReport {
    /// Build the matrix for a target year
    pub fn generate(storage: &Storage, year: i32, as_of: NaiveDate) -> VdfResult<Self> {
        let dues = DuesService::new(storage);
        // Already sorted by head name for stable output
        let families = storage.families.get_enabled()?;
        let as_of_month = MonthYear::from_date(as_of);

        let mut rows = Vec::with_capacity(families.len());
        let mut total_paid_this_year = Money::zero();
        let mut total_due_this_year = Money::zero();

        for family in &families {
            let summary = dues.calculate(family.id, as_of)?;

            let paid_by_month: HashMap<MonthYear, Money> = storage
                .contributions
                .get_by_family_year(family.id, year)?
                .into_iter()
                .map(|c| (c.month, c.amount))
                .collect();

            let from = family.dues_start_month().max(MonthYear::start_of_year(year));
            let to = as_of_month.min(MonthYear::end_of_year(year));

            let mut cells = [MonthCell::NotDue; 12];
            let mut applicable_months = 0u32;
            let mut paid_months = 0u32;

            for (slot, month) in MonthYear::start_of_year(year)
                .months_through(MonthYear::end_of_year(year))
                .enumerate()
            {
                let paid = paid_by_month.get(&month).copied();
                let exempt = storage.exemptions.exists(family.id, month)?;
                let in_window = from <= month && month <= to;

                cells[slot] = match (paid, exempt, in_window) {
                    // Collected money shows regardless of the window
                    (Some(amount), _, _) => MonthCell::Paid(amount),
                    (None, _, false) => MonthCell::NotDue,
                    (None, true, true) => MonthCell::Exempt,
                    (None, false, true) => MonthCell::Pending,
                };

                if in_window && !exempt {
                    applicable_months += 1;
                    if paid.is_some() {
                        paid_months += 1;
                    }
                }
            }

            total_paid_this_year += summary.paid_this_year;
            total_due_this_year += summary.due_this_year;

            rows.push(FamilyMatrixRow {
                family_id: family.id,
                family_head_name: family.family_head_name.clone(),
                cells,
                applicable_months,
                paid_months,
                pending_months: applicable_months - paid_months,
                paid_this_year: summary.paid_this_year,
                due_this_year: summary.due_this_year,
                paid_all_time: summary.paid_all_time,
                due_all_time: summary.due_all_time,
            });
        }

        Ok(Self {
            year,
            as_of,
            rows,
            total_paid_this_year,
            total_due_this_year,
        })
    }

    /// Rows whose applicable months are all paid
    pub fn fully_paid(&self) -> Vec<&FamilyMatrixRow> {
        self.rows
            .iter()
            .filter(|r| r.applicable_months > 0 && r.pending_months == 0)
            .collect()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Monthly Collection Matrix {} (as of {})\n",
            self.year, self.as_of
        ));
        output.push_str(&"=".repeat(80));
        output.push('\n');

        output.push_str(&format!(
            "{:<24} {}  {:>10} {:>10}\n",
            "Family", "J  F  M  A  M  J  J  A  S  O  N  D", "Paid", "Due"
        ));
        output.push_str(&"-".repeat(80));
        output.push('\n');

        for row in &self.rows {
            let grid: Vec<&str> = row.cells.iter().map(|c| c.marker()).collect();
            output.push_str(&format!(
                "{:<24} {}  {:>10} {:>10}\n",
                truncate_name(&row.family_head_name, 24),
                grid.join("  "),
                row.paid_this_year.to_string(),
                row.due_this_year.to_string()
            ));
        }

        output.push_str(&"-".repeat(80));
        output.push('\n');
        output.push_str(&format!(
            "{:<24} {:>37} {:>10} {:>10}\n",
            format!("{} families", self.rows.len()),
            "Total",
            self.total_paid_this_year.to_string(),
            self.total_due_this_year.to_string()
        ));
        output.push_str("Markers: P paid, E exempt, . pending, - not due\n");

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> VdfResult<()> {
        writeln!(
            writer,
            "Family,Jan,Feb,Mar,Apr,May,Jun,Jul,Aug,Sep,Oct,Nov,Dec,\
             Applicable Months,Paid Months,Pending Months,\
             Paid This Year,Due This Year,Paid All Time,Due All Time"
        )
        .map_err(|e| VdfError::Export(e.to_string()))?;

        for row in &self.rows {
            let cells: Vec<String> = row
                .cells
                .iter()
                .map(|c| match c {
                    MonthCell::Paid(amount) => format!("{:.2}", amount.paisa() as f64 / 100.0),
                    MonthCell::Exempt => "exempt".to_string(),
                    MonthCell::Pending => "due".to_string(),
                    MonthCell::NotDue => String::new(),
                })
                .collect();

            writeln!(
                writer,
                "{},{},{},{},{},{:.2},{:.2},{:.2},{:.2}",
                row.family_head_name,
                cells.join(","),
                row.applicable_months,
                row.paid_months,
                row.pending_months,
                row.paid_this_year.paisa() as f64 / 100.0,
                row.due_this_year.paisa() as f64 / 100.0,
                row.paid_all_time.paisa() as f64 / 100.0,
                row.due_all_time.paisa() as f64 / 100.0
            )
            .map_err(|e| VdfError::Export(e.to_string()))?;
        }

        Ok(())
    }
}

/// Clip a name to the grid's name column
fn truncate_name(name: &str, max_len: usize) -> String {
    if name.chars().count() <= max_len {
        name.to_string()
    } else {
        let clipped: String = name.chars().take(max_len - 3).collect();
        format!("{}...", clipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::VdfPaths;
    use crate::models::{Contribution, Exemption, FamilyConfig, MemberId};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = VdfPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn setup_family(storage: &Storage, name: &str, effective: NaiveDate) -> FamilyId {
        let family =
            FamilyConfig::with_effective_from(MemberId::new(), name, Money::from_taka(20), effective);
        let id = family.id;
        storage.families.upsert(family).unwrap();
        id
    }

    fn pay(storage: &Storage, family_id: FamilyId, year: i32, month: u32, taka: i64) {
        let my = MonthYear::new(year, month).unwrap();
        let contribution = Contribution::new(
            family_id,
            my,
            Money::from_taka(taka),
            my.first_day(),
        );
        storage.contributions.insert_new(contribution).unwrap();
    }

    #[test]
    fn test_matrix_cells_follow_window_exemption_and_payment() {
        let (_temp_dir, storage) = create_test_storage();
        let family_id = setup_family(
            &storage,
            "Rahim Uddin",
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        );
        pay(&storage, family_id, 2024, 5, 20);
        storage
            .exemptions
            .insert_new(Exemption::new(
                family_id,
                MonthYear::new(2024, 4).unwrap(),
                "flood relief",
            ))
            .unwrap();

        let report = MonthlyMatrixReport::generate(
            &storage,
            2024,
            NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
        )
        .unwrap();

        assert_eq!(report.rows.len(), 1);
        let row = &report.rows[0];

        assert_eq!(row.cells[0], MonthCell::NotDue); // January, before window
        assert_eq!(row.cells[2], MonthCell::Pending); // March
        assert_eq!(row.cells[3], MonthCell::Exempt); // April
        assert_eq!(row.cells[4], MonthCell::Paid(Money::from_taka(20))); // May
        assert_eq!(row.cells[6], MonthCell::Pending); // July, as-of month
        assert_eq!(row.cells[7], MonthCell::NotDue); // August, beyond as-of

        // Applicable = {3, 5, 6, 7}; April is waived
        assert_eq!(row.applicable_months, 4);
        assert_eq!(row.paid_months, 1);
        assert_eq!(row.pending_months, 3);
        assert_eq!(row.paid_this_year, Money::from_taka(20));
        assert_eq!(row.due_this_year, Money::from_taka(60));
        assert_eq!(row.due_all_time, Money::from_taka(60));
    }

    #[test]
    fn test_matrix_skips_disabled_families() {
        let (_temp_dir, storage) = create_test_storage();
        setup_family(
            &storage,
            "Rahim Uddin",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        let disabled_id = setup_family(
            &storage,
            "Karim Mia",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        let mut disabled = storage.families.get(disabled_id).unwrap().unwrap();
        disabled.disable();
        storage.families.upsert(disabled).unwrap();

        let report = MonthlyMatrixReport::generate(
            &storage,
            2024,
            NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
        )
        .unwrap();

        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].family_head_name, "Rahim Uddin");
    }

    #[test]
    fn test_matrix_rows_sorted_by_head_name() {
        let (_temp_dir, storage) = create_test_storage();
        let jan = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        setup_family(&storage, "Karim Mia", jan);
        setup_family(&storage, "Abdul Karim", jan);
        setup_family(&storage, "rahim Uddin", jan);

        let report = MonthlyMatrixReport::generate(
            &storage,
            2024,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        )
        .unwrap();

        let names: Vec<&str> = report
            .rows
            .iter()
            .map(|r| r.family_head_name.as_str())
            .collect();
        assert_eq!(names, vec!["Abdul Karim", "Karim Mia", "rahim Uddin"]);
    }

    #[test]
    fn test_matrix_totals_and_fully_paid() {
        let (_temp_dir, storage) = create_test_storage();
        let jan = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let paid_up = setup_family(&storage, "Abdul Karim", jan);
        setup_family(&storage, "Karim Mia", jan);

        // Abdul pays January through March in full
        for month in 1..=3 {
            pay(&storage, paid_up, 2024, month, 20);
        }

        let report = MonthlyMatrixReport::generate(
            &storage,
            2024,
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        )
        .unwrap();

        assert_eq!(report.total_paid_this_year, Money::from_taka(60));
        assert_eq!(report.total_due_this_year, Money::from_taka(60));

        let fully_paid = report.fully_paid();
        assert_eq!(fully_paid.len(), 1);
        assert_eq!(fully_paid[0].family_head_name, "Abdul Karim");
    }

    #[test]
    fn test_matrix_terminal_and_csv_output() {
        let (_temp_dir, storage) = create_test_storage();
        let family_id = setup_family(
            &storage,
            "Rahim Uddin",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        pay(&storage, family_id, 2024, 1, 20);

        let report = MonthlyMatrixReport::generate(
            &storage,
            2024,
            NaiveDate::from_ymd_opt(2024, 2, 15).unwrap(),
        )
        .unwrap();

        let terminal = report.format_terminal();
        assert!(terminal.contains("Monthly Collection Matrix 2024"));
        assert!(terminal.contains("Rahim Uddin"));
        assert!(terminal.contains("1 families"));

        let mut csv = Vec::new();
        report.export_csv(&mut csv).unwrap();
        let csv = String::from_utf8(csv).unwrap();
        assert!(csv.starts_with("Family,Jan"));
        assert!(csv.contains("Rahim Uddin,20.00,due"));
    }
}
