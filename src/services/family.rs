//! Family service
//!
//! Registers families into the contribution scheme and manages the member
//! directory they are registered against. Each member carries at most one
//! family configuration.

use chrono::NaiveDate;

use crate::config::settings::Settings;
use crate::error::{VdfError, VdfResult};
use crate::models::{FamilyConfig, FamilyId, Member, MemberId, Money};
use crate::storage::Storage;

/// Service for family and member management
pub struct FamilyService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
}

/// Input for registering a family
#[derive(Debug, Clone)]
pub struct RegisterFamilyInput {
    pub member_id: MemberId,
    pub family_head_name: String,
    pub monthly_amount: Money,
    /// Dues start date; the fund epoch applies when omitted
    pub effective_from: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Input for updating a family
#[derive(Debug, Clone, Default)]
pub struct UpdateFamilyInput {
    pub family_head_name: Option<String>,
    pub monthly_amount: Option<Money>,
    pub effective_from: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl<'a> FamilyService<'a> {
    /// Create a new family service
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self { storage, settings }
    }

    /// Add a member to the directory
    pub fn add_member(&self, first_name: &str, last_name: &str, phone: &str) -> VdfResult<Member> {
        let first_name = first_name.trim();
        let last_name = last_name.trim();
        if first_name.is_empty() && last_name.is_empty() {
            return Err(VdfError::Validation("Member name cannot be empty".into()));
        }

        let mut member = Member::new(first_name, last_name);
        member.phone = phone.trim().to_string();

        self.storage.members.upsert(member.clone())?;
        self.storage.members.save()?;

        Ok(member)
    }

    /// Get a member by ID
    pub fn get_member(&self, id: MemberId) -> VdfResult<Option<Member>> {
        self.storage.members.get(id)
    }

    /// List all members, sorted by display name
    pub fn list_members(&self) -> VdfResult<Vec<Member>> {
        self.storage.members.get_all()
    }

    /// Register a family into the contribution scheme
    pub fn register(&self, input: RegisterFamilyInput) -> VdfResult<FamilyConfig> {
        let member = self
            .storage
            .members
            .get(input.member_id)?
            .ok_or_else(|| VdfError::member_not_found(input.member_id.to_string()))?;

        if let Some(existing) = self.storage.families.find_by_member(input.member_id)? {
            return Err(VdfError::Duplicate {
                entity_type: "Family",
                identifier: format!(
                    "{} (already registered as {})",
                    member.display_name(),
                    existing.family_head_name
                ),
            });
        }

        // An unstated start date means dues run from the fund's first month
        let effective_from = input.effective_from.unwrap_or(self.settings.fund_epoch);

        let mut family = FamilyConfig::with_effective_from(
            input.member_id,
            input.family_head_name,
            input.monthly_amount,
            effective_from,
        );
        if let Some(notes) = input.notes {
            family.notes = notes;
        }

        family
            .validate()
            .map_err(|e| VdfError::Validation(e.to_string()))?;

        self.storage.families.upsert(family.clone())?;
        self.storage.families.save()?;

        Ok(family)
    }

    /// Update a family's configuration
    pub fn update(&self, id: FamilyId, input: UpdateFamilyInput) -> VdfResult<FamilyConfig> {
        let mut family = self
            .storage
            .families
            .get(id)?
            .ok_or_else(|| VdfError::family_not_found(id.to_string()))?;

        if let Some(name) = input.family_head_name {
            family.family_head_name = name;
        }
        if let Some(amount) = input.monthly_amount {
            family.monthly_amount = amount;
        }
        if let Some(effective_from) = input.effective_from {
            family.effective_from = Some(effective_from);
        }
        if let Some(notes) = input.notes {
            family.notes = notes;
        }
        family.updated_at = chrono::Utc::now();

        family
            .validate()
            .map_err(|e| VdfError::Validation(e.to_string()))?;

        self.storage.families.upsert(family.clone())?;
        self.storage.families.save()?;

        Ok(family)
    }

    /// Turn a family's contributions on
    pub fn enable(&self, id: FamilyId) -> VdfResult<FamilyConfig> {
        let mut family = self
            .storage
            .families
            .get(id)?
            .ok_or_else(|| VdfError::family_not_found(id.to_string()))?;

        if family.contribution_enabled {
            return Err(VdfError::Validation(
                "Family contributions are already enabled".into(),
            ));
        }

        family.enable();
        self.storage.families.upsert(family.clone())?;
        self.storage.families.save()?;

        Ok(family)
    }

    /// Turn a family's contributions off
    ///
    /// The family and its history stay; new postings are refused and dues
    /// calculations report zero while disabled.
    pub fn disable(&self, id: FamilyId) -> VdfResult<FamilyConfig> {
        let mut family = self
            .storage
            .families
            .get(id)?
            .ok_or_else(|| VdfError::family_not_found(id.to_string()))?;

        if !family.contribution_enabled {
            return Err(VdfError::Validation(
                "Family contributions are already disabled".into(),
            ));
        }

        family.disable();
        self.storage.families.upsert(family.clone())?;
        self.storage.families.save()?;

        Ok(family)
    }

    /// Get a family by ID
    pub fn get(&self, id: FamilyId) -> VdfResult<Option<FamilyConfig>> {
        self.storage.families.get(id)
    }

    /// List families, sorted by head name
    pub fn list(&self, include_disabled: bool) -> VdfResult<Vec<FamilyConfig>> {
        if include_disabled {
            self.storage.families.get_all()
        } else {
            self.storage.families.get_enabled()
        }
    }
}
