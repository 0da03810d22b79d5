//! Family configuration model
//!
//! A FamilyConfig is the unit of contribution obligation: one household,
//! linked to a member, carrying a standing monthly amount and the date its
//! dues obligation begins. Families are never hard-deleted; turning
//! contributions off uses the enabled flag.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{FamilyId, MemberId};
use super::money::Money;
use super::month::MonthYear;

/// A contributing household
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyConfig {
    /// Unique identifier
    pub id: FamilyId,

    /// The member this family is registered under
    pub member_id: MemberId,

    /// Name of the family head, used on reports and deposit notes
    pub family_head_name: String,

    /// Whether monthly contributions apply to this family
    pub contribution_enabled: bool,

    /// First date the family owes dues
    ///
    /// Set at registration (defaulting to the fund epoch when the caller
    /// gives none); `None` only occurs in hand-edited data files, in which
    /// case the creation date stands in.
    pub effective_from: Option<NaiveDate>,

    /// Standing monthly contribution amount
    pub monthly_amount: Money,

    /// Notes about this family
    #[serde(default)]
    pub notes: String,

    /// When the config was created
    pub created_at: DateTime<Utc>,

    /// When the config was last modified
    pub updated_at: DateTime<Utc>,
}

impl FamilyConfig {
    /// Create a new family config with default values
    pub fn new(
        member_id: MemberId,
        family_head_name: impl Into<String>,
        monthly_amount: Money,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: FamilyId::new(),
            member_id,
            family_head_name: family_head_name.into(),
            contribution_enabled: true,
            effective_from: None,
            monthly_amount,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a new family config with an explicit dues start date
    pub fn with_effective_from(
        member_id: MemberId,
        family_head_name: impl Into<String>,
        monthly_amount: Money,
        effective_from: NaiveDate,
    ) -> Self {
        let mut family = Self::new(member_id, family_head_name, monthly_amount);
        family.effective_from = Some(effective_from);
        family
    }

    /// Turn contributions on
    pub fn enable(&mut self) {
        self.contribution_enabled = true;
        self.updated_at = Utc::now();
    }

    /// Turn contributions off (the soft-delete for families)
    pub fn disable(&mut self) {
        self.contribution_enabled = false;
        self.updated_at = Utc::now();
    }

    /// First date of the dues window
    ///
    /// The explicit `effective_from` wins; otherwise the config's creation
    /// date stands in.
    pub fn dues_window_start(&self) -> NaiveDate {
        self.effective_from
            .unwrap_or_else(|| self.created_at.date_naive())
    }

    /// First month of the dues window
    pub fn dues_start_month(&self) -> MonthYear {
        MonthYear::from_date(self.dues_window_start())
    }

    /// Validate the family config
    pub fn validate(&self) -> Result<(), FamilyValidationError> {
        if self.family_head_name.trim().is_empty() {
            return Err(FamilyValidationError::EmptyHeadName);
        }

        if self.family_head_name.len() > 100 {
            return Err(FamilyValidationError::NameTooLong(
                self.family_head_name.len(),
            ));
        }

        if self.monthly_amount.is_negative() {
            return Err(FamilyValidationError::NegativeMonthlyAmount);
        }

        Ok(())
    }
}

impl fmt::Display for FamilyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.family_head_name)
    }
}

/// Validation errors for family configs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FamilyValidationError {
    EmptyHeadName,
    NameTooLong(usize),
    NegativeMonthlyAmount,
}

impl fmt::Display for FamilyValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyHeadName => write!(f, "Family head name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Family head name too long ({} chars, max 100)", len)
            }
            Self::NegativeMonthlyAmount => write!(f, "Monthly amount cannot be negative"),
        }
    }
}

impl std::error::Error for FamilyValidationError {}
