//! Configuration module for the VDF ledger
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - Fund settings persistence

pub mod paths;
pub mod settings;

pub use paths::VdfPaths;
pub use settings::Settings;
