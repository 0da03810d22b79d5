//! Contribution service
//!
//! Posts monthly contributions into the ledger and mirrors them into the
//! general deposit ledger. Single posts and yearly bulk reconciliation both
//! run through the same mirroring helper so the two paths cannot drift.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::config::settings::Settings;
use crate::error::{VdfError, VdfResult};
use crate::models::{
    Contribution, Deposit, DepositCategory, FamilyConfig, FamilyId, Money, MonthYear,
};
use crate::storage::Storage;

/// Service for contribution posting and queries
pub struct ContributionService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
}

/// Input for recording a single contribution
#[derive(Debug, Clone)]
pub struct RecordContributionInput {
    pub family_id: FamilyId,
    pub month: MonthYear,
    pub amount: Money,
    pub payment_date: NaiveDate,
    pub notes: Option<String>,
}

/// Input for reconciling a year of amounts in one batch
#[derive(Debug, Clone)]
pub struct BulkPostInput {
    pub family_id: FamilyId,
    pub year: i32,
    /// Month number (1-12) to amount; zero or negative clears the month
    pub amounts: BTreeMap<u32, Money>,
    pub payment_date: NaiveDate,
    pub notes: Option<String>,
}

/// Result of a bulk reconciliation
#[derive(Debug, Clone)]
pub struct BulkPostResult {
    /// Rows inserted or updated, January first
    pub posted: Vec<Contribution>,
    /// Months whose rows were cleared
    pub removed: Vec<MonthYear>,
    /// Sum of the posted amounts
    pub total_posted: Money,
    /// The consolidated mirrored deposit, when one was created
    pub deposit: Option<Deposit>,
}

impl<'a> ContributionService<'a> {
    /// Create a new contribution service
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self { storage, settings }
    }

    /// Record one family's contribution for one month
    pub fn record(&self, input: RecordContributionInput) -> VdfResult<Contribution> {
        let family = self
            .storage
            .families
            .get(input.family_id)?
            .ok_or_else(|| VdfError::family_not_found(input.family_id.to_string()))?;

        if !family.contribution_enabled {
            return Err(VdfError::ContributionsDisabled(
                family.family_head_name.clone(),
            ));
        }

        let contribution = match input.notes {
            Some(notes) => Contribution::with_notes(
                input.family_id,
                input.month,
                input.amount,
                input.payment_date,
                notes,
            ),
            None => Contribution::new(
                input.family_id,
                input.month,
                input.amount,
                input.payment_date,
            ),
        };

        contribution
            .validate()
            .map_err(|e| VdfError::Validation(e.to_string()))?;

        self.storage
            .contributions
            .insert_new(contribution.clone())
            .map_err(|e| match e {
                // Replace the id in the storage-level error with the head name
                VdfError::DuplicateContribution { month, .. } => {
                    VdfError::duplicate_contribution(family.family_head_name.clone(), month)
                }
                other => other,
            })?;
        self.storage.contributions.save()?;

        // The contribution row is the source of truth. A failed mirror is
        // logged, never unwound into the ledger write that already succeeded.
        if let Err(e) = self.mirror_deposit(
            &family,
            &[contribution.month],
            contribution.amount,
            contribution.payment_date,
        ) {
            log::warn!(
                "Deposit mirror failed for {}: {}",
                family.family_head_name,
                e
            );
        }

        Ok(contribution)
    }

    /// Reconcile a year of per-month amounts for one family
    ///
    /// A positive amount inserts or updates that month's row; zero or
    /// negative clears it. The batch is staged and validated in full before
    /// anything is written, and the positive total is mirrored as a single
    /// consolidated deposit instead of one row per month.
    pub fn record_bulk(&self, input: BulkPostInput) -> VdfResult<BulkPostResult> {
        let family = self
            .storage
            .families
            .get(input.family_id)?
            .ok_or_else(|| VdfError::family_not_found(input.family_id.to_string()))?;

        if !family.contribution_enabled {
            return Err(VdfError::ContributionsDisabled(
                family.family_head_name.clone(),
            ));
        }

        let mut upserts = Vec::new();
        let mut deletes = Vec::new();

        for (&month_number, &amount) in &input.amounts {
            let month = MonthYear::new(input.year, month_number)
                .map_err(|e| VdfError::Validation(e.to_string()))?;
            let existing = self.storage.contributions.get(family.id, month)?;

            if amount.is_positive() {
                let row = match existing {
                    Some(mut row) => {
                        row.amount = amount;
                        row.payment_date = input.payment_date;
                        if let Some(notes) = &input.notes {
                            row.notes = notes.clone();
                        }
                        row
                    }
                    None => {
                        let mut row =
                            Contribution::new(family.id, month, amount, input.payment_date);
                        if let Some(notes) = &input.notes {
                            row.notes = notes.clone();
                        }
                        row
                    }
                };
                row.validate()
                    .map_err(|e| VdfError::Validation(e.to_string()))?;
                upserts.push(row);
            } else if existing.is_some() {
                deletes.push(month);
            }
        }

        for row in &upserts {
            self.storage.contributions.upsert(row.clone())?;
        }
        for &month in &deletes {
            self.storage.contributions.delete(family.id, month)?;
        }
        self.storage.contributions.save()?;

        let total_posted: Money = upserts.iter().map(|c| c.amount).sum();
        let posted_months: Vec<MonthYear> = upserts.iter().map(|c| c.month).collect();

        let deposit = if total_posted.is_positive() {
            match self.mirror_deposit(&family, &posted_months, total_posted, input.payment_date) {
                Ok(deposit) => deposit,
                Err(e) => {
                    log::warn!(
                        "Deposit mirror failed for {}: {}",
                        family.family_head_name,
                        e
                    );
                    None
                }
            }
        } else {
            None
        };

        Ok(BulkPostResult {
            posted: upserts,
            removed: deletes,
            total_posted,
            deposit,
        })
    }

    /// Get a family's contributions for one year, January first
    pub fn get_family_contributions(
        &self,
        family_id: FamilyId,
        year: i32,
    ) -> VdfResult<Vec<Contribution>> {
        if self.storage.families.get(family_id)?.is_none() {
            return Err(VdfError::family_not_found(family_id.to_string()));
        }
        self.storage.contributions.get_by_family_year(family_id, year)
    }

    /// Get everything a family has ever paid, oldest month first
    pub fn get_all_family_contributions(
        &self,
        family_id: FamilyId,
    ) -> VdfResult<Vec<Contribution>> {
        if self.storage.families.get(family_id)?.is_none() {
            return Err(VdfError::family_not_found(family_id.to_string()));
        }
        self.storage.contributions.get_by_family(family_id)
    }

    /// Post the deposit-ledger projection of a contribution posting
    ///
    /// Both entry points come through here. A missing contribution category
    /// skips the mirror with a warning rather than failing the posting.
    fn mirror_deposit(
        &self,
        family: &FamilyConfig,
        months: &[MonthYear],
        total: Money,
        date: NaiveDate,
    ) -> VdfResult<Option<Deposit>> {
        if !total.is_positive() {
            return Ok(None);
        }

        let category = match self.resolve_contribution_category()? {
            Some(category) => category,
            None => {
                log::warn!(
                    "Deposit category '{}' not found; contribution from {} was not mirrored",
                    self.settings.contribution_category_name,
                    family.family_head_name
                );
                return Ok(None);
            }
        };

        let mut deposit = Deposit::new(date, total, category.id);
        deposit.member_id = Some(family.member_id);
        deposit.notes = mirror_note(family, months);

        self.storage.deposits.upsert(deposit.clone())?;
        self.storage.deposits.save()?;

        Ok(Some(deposit))
    }

    /// Resolve the category contribution mirrors are tagged with
    ///
    /// The id recorded in settings wins; older data directories without a
    /// recorded id fall back to a name lookup.
    fn resolve_contribution_category(&self) -> VdfResult<Option<DepositCategory>> {
        if let Some(id) = self.settings.contribution_category_id {
            if let Some(category) = self.storage.deposits.get_category(id)? {
                return Ok(Some(category));
            }
        }
        self.storage
            .deposits
            .find_category_by_name(&self.settings.contribution_category_name)
    }
}

/// Human-readable annotation for a mirrored deposit
fn mirror_note(family: &FamilyConfig, months: &[MonthYear]) -> String {
    if months.len() == 1 {
        format!(
            "Contribution from {} for {}",
            family.family_head_name,
            months[0].token()
        )
    } else {
        let list: Vec<String> = months.iter().map(|m| m.month().to_string()).collect();
        format!(
            "Contributions from {} for {} months {}",
            family.family_head_name,
            months[0].year(),
            list.join(", ")
        )
    }
}
