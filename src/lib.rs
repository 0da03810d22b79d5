//! VDF Ledger - Village Development Fund record keeping
//!
//! This library implements the record-keeping core of a Village Development
//! Fund: a registry of contributing families, a monthly contribution ledger
//! with per-month uniqueness, administrative exemptions, fund-wide monthly
//! requirement overrides, dues calculation, and the general deposit and
//! expense ledgers the fund's totals are drawn from.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (families, contributions, deposits, etc.)
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer
//! - `reports`: Collection matrix, fund summary, and year reports
//! - `export`: CSV, JSON, and YAML exports
//!
//! # Example
//!
//! ```rust,ignore
//! use vdf_ledger::config::{paths::VdfPaths, settings::Settings};
//!
//! let paths = VdfPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::VdfError;
