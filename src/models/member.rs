//! Member model
//!
//! The member directory itself is maintained elsewhere; the ledger only
//! resolves ids to display names, so this record stays minimal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::MemberId;

/// A registered member of the samity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    /// Unique identifier
    pub id: MemberId,

    /// Given name
    pub first_name: String,

    /// Family name
    #[serde(default)]
    pub last_name: String,

    /// Contact phone number
    #[serde(default)]
    pub phone: String,

    /// Whether the member is active in the directory
    pub active: bool,

    /// When the member record was created
    pub created_at: DateTime<Utc>,
}

impl Member {
    /// Create a new member record
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: MemberId::new(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone: String::new(),
            active: true,
            created_at: Utc::now(),
        }
    }

    /// Full display name, skipping empty parts
    pub fn display_name(&self) -> String {
        let first = self.first_name.trim();
        let last = self.last_name.trim();
        match (first.is_empty(), last.is_empty()) {
            (false, false) => format!("{} {}", first, last),
            (false, true) => first.to_string(),
            (true, false) => last.to_string(),
            (true, true) => self.id.to_string(),
        }
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
