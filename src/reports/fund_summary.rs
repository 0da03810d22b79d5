//! Fund Summary
//!
//! The headline position of the fund: family counts, everything collected
//! through the deposit ledger (mirrored contributions included), everything
//! spent, and the balance, for the current year and all time.

use crate::error::{VdfError, VdfResult};
use crate::models::Money;
use crate::storage::Storage;
use chrono::{Datelike, NaiveDate};
use std::io::Write;

/// Fund Summary report
#[derive(Debug, Clone)]
pub struct FundSummaryReport {
    /// Evaluation date
    pub as_of: NaiveDate,
    /// Registered families
    pub total_families: usize,
    /// Families with contributions enabled
    pub enabled_families: usize,
    /// All deposits ever, mirrored contributions included
    pub total_collected: Money,
    /// All expenses ever
    pub total_expenses: Money,
    /// Collected minus spent
    pub balance: Money,
    /// Contribution ledger total, a subset of the collected figure
    pub total_contributions: Money,
    /// Deposits in the as-of year
    pub collected_this_year: Money,
    /// Expenses in the as-of year
    pub expenses_this_year: Money,
    /// This year's collected minus spent
    pub net_this_year: Money,
    /// Contribution ledger total for the as-of year
    pub contributions_this_year: Money,
}

impl FundSummaryReport {
    /// Build the summary as of a date
    pub fn generate(storage: &Storage, as_of: NaiveDate) -> VdfResult<Self> {
        let year = as_of.year();

        let families = storage.families.get_all()?;
        let enabled_families = families.iter().filter(|f| f.contribution_enabled).count();

        let total_collected = storage.deposits.total_all()?;
        let total_expenses = storage.expenses.total_all()?;
        let collected_this_year = storage.deposits.total_for_year(year)?;
        let expenses_this_year = storage.expenses.total_for_year(year)?;

        Ok(Self {
            as_of,
            total_families: families.len(),
            enabled_families,
            total_collected,
            total_expenses,
            balance: total_collected - total_expenses,
            total_contributions: storage.contributions.total_all()?,
            collected_this_year,
            expenses_this_year,
            net_this_year: collected_this_year - expenses_this_year,
            contributions_this_year: storage.contributions.total_for_year(year)?,
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Fund Summary (as of {})\n", self.as_of));
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "Families: {} registered, {} contributing\n\n",
            self.total_families, self.enabled_families
        ));

        output.push_str(&format!(
            "{:<28} {:>14} {:>14}\n",
            "",
            format!("{}", self.as_of.year()),
            "All Time"
        ));
        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "{:<28} {:>14} {:>14}\n",
            "Collected",
            self.collected_this_year.to_string(),
            self.total_collected.to_string()
        ));
        output.push_str(&format!(
            "{:<28} {:>14} {:>14}\n",
            "  of which contributions",
            self.contributions_this_year.to_string(),
            self.total_contributions.to_string()
        ));
        output.push_str(&format!(
            "{:<28} {:>14} {:>14}\n",
            "Spent",
            self.expenses_this_year.to_string(),
            self.total_expenses.to_string()
        ));
        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "{:<28} {:>14} {:>14}\n",
            "Balance",
            self.net_this_year.to_string(),
            self.balance.to_string()
        ));

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> VdfResult<()> {
        writeln!(writer, "Measure,{},All Time", self.as_of.year())
            .map_err(|e| VdfError::Export(e.to_string()))?;
        writeln!(
            writer,
            "Collected,{:.2},{:.2}",
            self.collected_this_year.paisa() as f64 / 100.0,
            self.total_collected.paisa() as f64 / 100.0
        )
        .map_err(|e| VdfError::Export(e.to_string()))?;
        writeln!(
            writer,
            "Contributions,{:.2},{:.2}",
            self.contributions_this_year.paisa() as f64 / 100.0,
            self.total_contributions.paisa() as f64 / 100.0
        )
        .map_err(|e| VdfError::Export(e.to_string()))?;
        writeln!(
            writer,
            "Expenses,{:.2},{:.2}",
            self.expenses_this_year.paisa() as f64 / 100.0,
            self.total_expenses.paisa() as f64 / 100.0
        )
        .map_err(|e| VdfError::Export(e.to_string()))?;
        writeln!(
            writer,
            "Balance,{:.2},{:.2}",
            self.net_this_year.paisa() as f64 / 100.0,
            self.balance.paisa() as f64 / 100.0
        )
        .map_err(|e| VdfError::Export(e.to_string()))?;

        Ok(())
    }
}
