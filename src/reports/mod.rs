//! Reports module for the VDF ledger
//!
//! Provides the fund's standing reports: the monthly collection matrix,
//! the fund summary, and the month-by-month year report.

pub mod fund_summary;
pub mod monthly_matrix;
pub mod year_report;

pub use fund_summary::FundSummaryReport;
pub use monthly_matrix::{FamilyMatrixRow, MonthCell, MonthlyMatrixReport};
pub use year_report::{MonthRow, YearReport};
