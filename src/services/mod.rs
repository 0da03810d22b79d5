//! Service layer for the VDF ledger
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, computed fields, and cross-entity operations.

pub mod contribution;
pub mod deposit;
pub mod dues;
pub mod exemption;
pub mod expense;
pub mod family;
pub mod import;
pub mod requirement;

pub use contribution::ContributionService;
pub use deposit::DepositService;
pub use dues::DuesService;
pub use exemption::ExemptionService;
pub use expense::ExpenseService;
pub use family::FamilyService;
pub use import::LedgerImportService;
pub use requirement::RequirementService;
