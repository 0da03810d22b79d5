//! Dues calculation service
//!
//! Walks a family's applicable months (month granularity, inclusive) to work
//! out what was owed, nets off what was paid, and floors the balance at zero.
//! Every figure is computed fresh from the ledgers; nothing is cached.

use chrono::{Datelike, NaiveDate};

use crate::error::{VdfError, VdfResult};
use crate::models::{FamilyConfig, FamilyId, Money, MonthYear};
use crate::services::RequirementService;
use crate::storage::Storage;

/// Service for dues calculation
pub struct DuesService<'a> {
    storage: &'a Storage,
}

/// A family's dues position as of a date
#[derive(Debug, Clone)]
pub struct DuesSummary {
    pub family_id: FamilyId,
    pub as_of: NaiveDate,
    /// Sum of requirements over the applicable window, exempt months excluded
    pub required_all_time: Money,
    /// Everything the family has ever paid
    pub paid_all_time: Money,
    /// Outstanding balance, floored at zero
    pub due_all_time: Money,
    pub required_this_year: Money,
    pub paid_this_year: Money,
    pub due_this_year: Money,
    /// Months that counted toward the requirement
    pub months_charged: u32,
    /// Months waived by exemption
    pub months_exempt: u32,
}

impl DuesSummary {
    /// The all-zero summary reported for disabled families
    fn zeroed(family_id: FamilyId, as_of: NaiveDate) -> Self {
        Self {
            family_id,
            as_of,
            required_all_time: Money::zero(),
            paid_all_time: Money::zero(),
            due_all_time: Money::zero(),
            required_this_year: Money::zero(),
            paid_this_year: Money::zero(),
            due_this_year: Money::zero(),
            months_charged: 0,
            months_exempt: 0,
        }
    }
}

/// One year's slice of a family's dues position
#[derive(Debug, Clone, Default)]
pub struct YearDues {
    pub required: Money,
    pub paid: Money,
    pub due: Money,
    pub months_charged: u32,
    pub months_exempt: u32,
}

impl<'a> DuesService<'a> {
    /// Create a new dues service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Calculate a family's dues position as of a date
    pub fn calculate(&self, family_id: FamilyId, as_of: NaiveDate) -> VdfResult<DuesSummary> {
        let family = self
            .storage
            .families
            .get(family_id)?
            .ok_or_else(|| VdfError::family_not_found(family_id.to_string()))?;

        // Disabled families owe nothing and report nothing
        if !family.contribution_enabled {
            return Ok(DuesSummary::zeroed(family_id, as_of));
        }

        let start_month = family.dues_start_month();
        let as_of_month = MonthYear::from_date(as_of);

        let walk = self.walk_window(&family, start_month, as_of_month)?;
        let paid_all_time = self.storage.contributions.total_by_family(family.id)?;
        let due_all_time = (walk.required - paid_all_time).floor_zero();

        let this_year = self.year_slice(&family, as_of.year(), as_of_month)?;

        Ok(DuesSummary {
            family_id,
            as_of,
            required_all_time: walk.required,
            paid_all_time,
            due_all_time,
            required_this_year: this_year.required,
            paid_this_year: this_year.paid,
            due_this_year: this_year.due,
            months_charged: walk.charged,
            months_exempt: walk.exempt,
        })
    }

    /// Calculate one year's slice of a family's dues, as of a date
    pub fn calculate_for_year(
        &self,
        family_id: FamilyId,
        year: i32,
        as_of: NaiveDate,
    ) -> VdfResult<YearDues> {
        let family = self
            .storage
            .families
            .get(family_id)?
            .ok_or_else(|| VdfError::family_not_found(family_id.to_string()))?;

        if !family.contribution_enabled {
            return Ok(YearDues::default());
        }

        self.year_slice(&family, year, MonthYear::from_date(as_of))
    }

    /// One year's figures, with the walk clipped to the applicable window
    fn year_slice(
        &self,
        family: &FamilyConfig,
        year: i32,
        as_of_month: MonthYear,
    ) -> VdfResult<YearDues> {
        let from = family.dues_start_month().max(MonthYear::start_of_year(year));
        let to = as_of_month.min(MonthYear::end_of_year(year));

        // from > to covers both a window that has not reached this year
        // and a family that starts after it
        let walk = self.walk_window(family, from, to)?;
        let paid = self
            .storage
            .contributions
            .total_by_family_year(family.id, year)?;

        Ok(YearDues {
            required: walk.required,
            paid,
            due: (walk.required - paid).floor_zero(),
            months_charged: walk.charged,
            months_exempt: walk.exempt,
        })
    }

    /// Walk months from `from` through `to` inclusive, accumulating the
    /// requirement and skipping exempt months
    fn walk_window(
        &self,
        family: &FamilyConfig,
        from: MonthYear,
        to: MonthYear,
    ) -> VdfResult<WindowTotals> {
        let requirements = RequirementService::new(self.storage);

        let mut totals = WindowTotals::default();
        for month in from.months_through(to) {
            if self.storage.exemptions.exists(family.id, month)? {
                totals.exempt += 1;
                continue;
            }
            totals.required += requirements.required_amount(family, month)?;
            totals.charged += 1;
        }
        Ok(totals)
    }
}

#[derive(Debug, Default)]
struct WindowTotals {
    required: Money,
    charged: u32,
    exempt: u32,
}
