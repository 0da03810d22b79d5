//! Core data models for the VDF ledger
//!
//! This module contains all the data structures of the contribution domain:
//! families, contributions, exemptions, requirement overrides, and the two
//! general ledgers (deposits and expenses).

pub mod contribution;
pub mod deposit;
pub mod exemption;
pub mod expense;
pub mod family;
pub mod ids;
pub mod member;
pub mod money;
pub mod month;
pub mod monthly_config;

pub use contribution::Contribution;
pub use deposit::{DefaultDepositCategory, Deposit, DepositCategory};
pub use exemption::Exemption;
pub use expense::Expense;
pub use family::FamilyConfig;
pub use ids::{ContributionId, DepositCategoryId, DepositId, ExpenseId, FamilyId, MemberId};
pub use member::Member;
pub use money::Money;
pub use month::{MonthParseError, MonthYear};
pub use monthly_config::MonthlyConfig;
