//! Exemption service
//!
//! Grants and revokes per-month dues waivers. An exempt month never counts
//! toward what a family owes.

use crate::error::{VdfError, VdfResult};
use crate::models::{Exemption, FamilyId, MemberId, MonthYear};
use crate::storage::Storage;

/// Service for exemption management
pub struct ExemptionService<'a> {
    storage: &'a Storage,
}

impl<'a> ExemptionService<'a> {
    /// Create a new exemption service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Grant an exemption for one family and month
    pub fn grant(
        &self,
        family_id: FamilyId,
        month: MonthYear,
        reason: &str,
        granted_by: Option<MemberId>,
    ) -> VdfResult<Exemption> {
        let family = self
            .storage
            .families
            .get(family_id)?
            .ok_or_else(|| VdfError::family_not_found(family_id.to_string()))?;

        let exemption = match granted_by {
            Some(granter) => Exemption::with_granter(family_id, month, reason.trim(), granter),
            None => Exemption::new(family_id, month, reason.trim()),
        };

        exemption
            .validate()
            .map_err(|e| VdfError::Validation(e.to_string()))?;

        self.storage
            .exemptions
            .insert_new(exemption.clone())
            .map_err(|e| match e {
                // Replace the id in the storage-level error with the head name
                VdfError::DuplicateExemption { month, .. } => {
                    VdfError::duplicate_exemption(family.family_head_name.clone(), month)
                }
                other => other,
            })?;
        self.storage.exemptions.save()?;

        Ok(exemption)
    }

    /// Revoke the exemption for one family and month
    pub fn revoke(&self, family_id: FamilyId, month: MonthYear) -> VdfResult<()> {
        if !self.storage.exemptions.delete(family_id, month)? {
            return Err(VdfError::exemption_not_found(format!(
                "{} {}",
                family_id,
                month.token()
            )));
        }
        self.storage.exemptions.save()?;
        Ok(())
    }

    /// Check whether a family is exempt for a month
    pub fn is_exempt(&self, family_id: FamilyId, month: MonthYear) -> VdfResult<bool> {
        self.storage.exemptions.exists(family_id, month)
    }

    /// List a family's exemptions, oldest month first
    pub fn list_for_family(&self, family_id: FamilyId) -> VdfResult<Vec<Exemption>> {
        self.storage.exemptions.get_by_family(family_id)
    }
}
