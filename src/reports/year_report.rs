//! Year Report
//!
//! Month-by-month view of one year: contributions collected, expenses
//! paid out, and how many families have paid versus still owe each month.

use crate::error::{VdfError, VdfResult};
use crate::models::{FamilyId, Money, MonthYear};
use crate::storage::Storage;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use std::io::Write;

/// One calendar month's figures
#[derive(Debug, Clone)]
pub struct MonthRow {
    /// The month
    pub month: MonthYear,
    /// Contributions recorded against this month
    pub contributions: Money,
    /// Expenses dated in this month
    pub expenses: Money,
    /// Families with a contribution row for this month
    pub families_paid: usize,
    /// Enabled families that owe this month and have not paid
    pub families_pending: usize,
}

/// Year Report
#[derive(Debug, Clone)]
pub struct YearReport {
    /// Target year
    pub year: i32,
    /// Evaluation date
    pub as_of: NaiveDate,
    /// Twelve rows, January first
    pub months: Vec<MonthRow>,
    /// Contributions recorded against this year's months
    pub total_contributions: Money,
    /// Expenses dated in this year
    pub total_expenses: Money,
}

impl YearReport {
    /// Build the report for a target year
    pub fn generate(storage: &Storage, year: i32, as_of: NaiveDate) -> VdfResult<Self> {
        let as_of_month = MonthYear::from_date(as_of);
        let families = storage.families.get_enabled()?;
        let starts: Vec<(FamilyId, MonthYear)> = families
            .iter()
            .map(|f| (f.id, f.dues_start_month()))
            .collect();

        let mut expenses_by_month: HashMap<MonthYear, Money> = HashMap::new();
        for expense in storage.expenses.get_by_year(year)? {
            *expenses_by_month
                .entry(MonthYear::from_date(expense.date))
                .or_insert(Money::zero()) += expense.amount;
        }

        let mut months = Vec::with_capacity(12);
        let mut total_contributions = Money::zero();

        for month in
            MonthYear::start_of_year(year).months_through(MonthYear::end_of_year(year))
        {
            let rows = storage.contributions.get_by_month(month)?;
            let contributions: Money = rows.iter().map(|c| c.amount).sum();
            let paid_ids: HashSet<FamilyId> = rows.iter().map(|c| c.family_id).collect();

            // Months that have not come due yet owe nothing
            let mut families_pending = 0;
            if month <= as_of_month {
                for (family_id, start) in &starts {
                    if *start <= month
                        && !paid_ids.contains(family_id)
                        && !storage.exemptions.exists(*family_id, month)?
                    {
                        families_pending += 1;
                    }
                }
            }

            total_contributions += contributions;
            months.push(MonthRow {
                month,
                contributions,
                expenses: expenses_by_month
                    .get(&month)
                    .copied()
                    .unwrap_or_else(Money::zero),
                families_paid: paid_ids.len(),
                families_pending,
            });
        }

        Ok(Self {
            year,
            as_of,
            months,
            total_contributions,
            total_expenses: storage.expenses.total_for_year(year)?,
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Year Report {} (as of {})\n", self.year, self.as_of));
        output.push_str(&"=".repeat(64));
        output.push('\n');

        output.push_str(&format!(
            "{:<10} {:>14} {:>14} {:>10} {:>10}\n",
            "Month", "Contributions", "Expenses", "Paid", "Pending"
        ));
        output.push_str(&"-".repeat(64));
        output.push('\n');

        for row in &self.months {
            output.push_str(&format!(
                "{:<10} {:>14} {:>14} {:>10} {:>10}\n",
                row.month.token(),
                row.contributions.to_string(),
                row.expenses.to_string(),
                row.families_paid,
                row.families_pending
            ));
        }

        output.push_str(&"-".repeat(64));
        output.push('\n');
        output.push_str(&format!(
            "{:<10} {:>14} {:>14}\n",
            "Total",
            self.total_contributions.to_string(),
            self.total_expenses.to_string()
        ));

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> VdfResult<()> {
        writeln!(
            writer,
            "Month,Contributions,Expenses,Families Paid,Families Pending"
        )
        .map_err(|e| VdfError::Export(e.to_string()))?;

        for row in &self.months {
            writeln!(
                writer,
                "{},{:.2},{:.2},{},{}",
                row.month.token(),
                row.contributions.paisa() as f64 / 100.0,
                row.expenses.paisa() as f64 / 100.0,
                row.families_paid,
                row.families_pending
            )
            .map_err(|e| VdfError::Export(e.to_string()))?;
        }

        writeln!(
            writer,
            "TOTAL,{:.2},{:.2},,",
            self.total_contributions.paisa() as f64 / 100.0,
            self.total_expenses.paisa() as f64 / 100.0
        )
        .map_err(|e| VdfError::Export(e.to_string()))?;

        Ok(())
    }
}
