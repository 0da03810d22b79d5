//! Deposit service
//!
//! Manages the general deposit ledger: donations, grants, and whatever else
//! enters the fund outside the contribution scheme. Mirrored contribution
//! deposits land in the same ledger but are posted by the contribution
//! service, not here.

use chrono::NaiveDate;

use crate::error::{VdfError, VdfResult};
use crate::models::{Deposit, DepositCategory, DepositCategoryId, DepositId, MemberId, Money};
use crate::storage::Storage;

/// Service for deposit ledger management
pub struct DepositService<'a> {
    storage: &'a Storage,
}

/// Input for posting a deposit
#[derive(Debug, Clone)]
pub struct PostDepositInput {
    pub date: NaiveDate,
    pub amount: Money,
    pub category_id: DepositCategoryId,
    pub member_id: Option<MemberId>,
    pub notes: Option<String>,
}

impl<'a> DepositService<'a> {
    /// Create a new deposit service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Post a deposit into the ledger
    pub fn post(&self, input: PostDepositInput) -> VdfResult<Deposit> {
        if self.storage.deposits.get_category(input.category_id)?.is_none() {
            return Err(VdfError::category_not_found(input.category_id.to_string()));
        }

        if let Some(member_id) = input.member_id {
            if self.storage.members.get(member_id)?.is_none() {
                return Err(VdfError::member_not_found(member_id.to_string()));
            }
        }

        let mut deposit = Deposit::new(input.date, input.amount, input.category_id);
        deposit.member_id = input.member_id;
        if let Some(notes) = input.notes {
            deposit.notes = notes;
        }

        deposit
            .validate()
            .map_err(|e| VdfError::Validation(e.to_string()))?;

        self.storage.deposits.upsert(deposit.clone())?;
        self.storage.deposits.save()?;

        Ok(deposit)
    }

    /// Delete a deposit
    pub fn delete(&self, id: DepositId) -> VdfResult<()> {
        if !self.storage.deposits.delete(id)? {
            return Err(VdfError::NotFound {
                entity_type: "Deposit",
                identifier: id.to_string(),
            });
        }
        self.storage.deposits.save()?;
        Ok(())
    }

    /// List all deposits, newest first
    pub fn list(&self) -> VdfResult<Vec<Deposit>> {
        self.storage.deposits.get_all()
    }

    /// List deposits for one calendar year, newest first
    pub fn list_for_year(&self, year: i32) -> VdfResult<Vec<Deposit>> {
        self.storage.deposits.get_by_year(year)
    }

    /// Sum deposits, optionally restricted to one year
    pub fn sum_deposits(&self, year: Option<i32>) -> VdfResult<Money> {
        match year {
            Some(year) => self.storage.deposits.total_for_year(year),
            None => self.storage.deposits.total_all(),
        }
    }

    /// Create a deposit category
    pub fn create_category(&self, name: &str, description: &str) -> VdfResult<DepositCategory> {
        let name = name.trim();
        if let Some(existing) = self.storage.deposits.find_category_by_name(name)? {
            return Err(VdfError::Duplicate {
                entity_type: "Deposit category",
                identifier: existing.name,
            });
        }

        let mut category = DepositCategory::new(name);
        category.description = description.trim().to_string();

        category
            .validate()
            .map_err(|e| VdfError::Validation(e.to_string()))?;

        self.storage.deposits.upsert_category(category.clone())?;
        self.storage.deposits.save()?;

        Ok(category)
    }

    /// List all categories, sorted by name
    pub fn list_categories(&self) -> VdfResult<Vec<DepositCategory>> {
        self.storage.deposits.get_categories()
    }

    /// List categories still offered for new deposits, sorted by name
    pub fn list_active_categories(&self) -> VdfResult<Vec<DepositCategory>> {
        self.storage.deposits.get_active_categories()
    }

    /// Retire a category from the pickers, keeping its deposits intact
    pub fn deactivate_category(&self, id: DepositCategoryId) -> VdfResult<DepositCategory> {
        let mut category = self
            .storage
            .deposits
            .get_category(id)?
            .ok_or_else(|| VdfError::category_not_found(id.to_string()))?;

        category.deactivate();
        self.storage.deposits.upsert_category(category.clone())?;
        self.storage.deposits.save()?;

        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::VdfPaths;
    use crate::config::settings::Settings;
    use crate::models::Member;
    use crate::storage::initialize_storage;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = VdfPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut settings = Settings::default();
        initialize_storage(&paths, &mut settings).unwrap();
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn donation_category(storage: &Storage) -> DepositCategoryId {
        storage
            .deposits
            .find_category_by_name("Donation")
            .unwrap()
            .unwrap()
            .id
    }

    #[test]
    fn test_post_deposit() {
        let (_temp_dir, storage) = create_test_storage();
        let service = DepositService::new(&storage);

        let deposit = service
            .post(PostDepositInput {
                date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
                amount: Money::from_taka(500),
                category_id: donation_category(&storage),
                member_id: None,
                notes: Some("Eid donation".to_string()),
            })
            .unwrap();

        assert_eq!(deposit.amount, Money::from_taka(500));
        assert_eq!(service.list().unwrap().len(), 1);
    }

    #[test]
    fn test_post_unknown_category() {
        let (_temp_dir, storage) = create_test_storage();
        let service = DepositService::new(&storage);

        let err = service
            .post(PostDepositInput {
                date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
                amount: Money::from_taka(500),
                category_id: DepositCategoryId::new(),
                member_id: None,
                notes: None,
            })
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_post_unknown_member() {
        let (_temp_dir, storage) = create_test_storage();
        let service = DepositService::new(&storage);

        let err = service
            .post(PostDepositInput {
                date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
                amount: Money::from_taka(500),
                category_id: donation_category(&storage),
                member_id: Some(MemberId::new()),
                notes: None,
            })
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_post_with_linked_member() {
        let (_temp_dir, storage) = create_test_storage();
        let service = DepositService::new(&storage);

        let member = Member::new("Rahim", "Uddin");
        let member_id = member.id;
        storage.members.upsert(member).unwrap();

        let deposit = service
            .post(PostDepositInput {
                date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
                amount: Money::from_taka(500),
                category_id: donation_category(&storage),
                member_id: Some(member_id),
                notes: None,
            })
            .unwrap();
        assert_eq!(deposit.member_id, Some(member_id));
    }

    #[test]
    fn test_post_nonpositive_amount() {
        let (_temp_dir, storage) = create_test_storage();
        let service = DepositService::new(&storage);

        let err = service
            .post(PostDepositInput {
                date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
                amount: Money::zero(),
                category_id: donation_category(&storage),
                member_id: None,
                notes: None,
            })
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_sum_deposits() {
        let (_temp_dir, storage) = create_test_storage();
        let service = DepositService::new(&storage);
        let category_id = donation_category(&storage);

        for (year, taka) in [(2023, 100), (2024, 40), (2024, 60)] {
            service
                .post(PostDepositInput {
                    date: NaiveDate::from_ymd_opt(year, 6, 1).unwrap(),
                    amount: Money::from_taka(taka),
                    category_id,
                    member_id: None,
                    notes: None,
                })
                .unwrap();
        }

        assert_eq!(service.sum_deposits(None).unwrap(), Money::from_taka(200));
        assert_eq!(
            service.sum_deposits(Some(2024)).unwrap(),
            Money::from_taka(100)
        );
        assert_eq!(service.list_for_year(2023).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_deposit() {
        let (_temp_dir, storage) = create_test_storage();
        let service = DepositService::new(&storage);

        let deposit = service
            .post(PostDepositInput {
                date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
                amount: Money::from_taka(500),
                category_id: donation_category(&storage),
                member_id: None,
                notes: None,
            })
            .unwrap();

        service.delete(deposit.id).unwrap();
        assert!(service.delete(deposit.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_deactivated_category_leaves_pickers_not_history() {
        let (_temp_dir, storage) = create_test_storage();
        let service = DepositService::new(&storage);
        let category_id = donation_category(&storage);

        let deposit = service
            .post(PostDepositInput {
                date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
                amount: Money::from_taka(500),
                category_id,
                member_id: None,
                notes: None,
            })
            .unwrap();

        service.deactivate_category(category_id).unwrap();

        let active = service.list_active_categories().unwrap();
        assert!(active.iter().all(|c| c.id != category_id));
        // The directory and the ledger keep the history
        assert_eq!(service.list_categories().unwrap().len(), 4);
        assert_eq!(service.list().unwrap()[0].id, deposit.id);

        let err = service
            .deactivate_category(DepositCategoryId::new())
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_create_category_rejects_duplicate_name() {
        let (_temp_dir, storage) = create_test_storage();
        let service = DepositService::new(&storage);

        service.create_category("Zakat", "annual zakat").unwrap();
        let err = service.create_category("zakat", "").unwrap_err();
        assert!(err.is_duplicate());

        // Seeded categories plus the new one
        assert_eq!(service.list_categories().unwrap().len(), 5);
    }
}
