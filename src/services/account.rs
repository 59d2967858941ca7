//! Account service
//!
//! Create, find, edit and delete accounts. Transactions point at an account
//! by id; deleting an account detaches them rather than dropping them.

use crate::error::{PlannerError, PlannerResult};
use crate::models::{Account, AccountId, AccountType, Money};
use crate::storage::Storage;

/// Service for account management
pub struct AccountService<'a> {
    storage: &'a Storage,
}

/// Optional changes for `AccountService::update`
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    pub name: Option<String>,
    pub account_type: Option<AccountType>,
    pub balance: Option<Money>,
    pub currency: Option<String>,
}

/// Result of deleting an account
#[derive(Debug, Clone)]
pub struct DeletedAccount {
    pub account: Account,
    /// Transactions whose account reference was cleared
    pub detached_transactions: usize,
}

impl<'a> AccountService<'a> {
    /// Create a new account service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new account
    pub fn create(
        &self,
        name: &str,
        account_type: AccountType,
        balance: Money,
        currency: Option<&str>,
    ) -> PlannerResult<Account> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PlannerError::Validation(
                "Account name cannot be empty".into(),
            ));
        }

        if self.storage.accounts.name_exists(name, None)? {
            return Err(PlannerError::Duplicate {
                entity_type: "Account",
                identifier: name.to_string(),
            });
        }

        let mut account = Account::new(name, account_type).with_balance(balance);
        if let Some(currency) = currency {
            account.currency = currency.trim().to_uppercase();
        }

        account
            .validate()
            .map_err(|e| PlannerError::Validation(e.to_string()))?;

        self.storage.accounts.upsert(account.clone())?;
        self.storage.accounts.save()?;

        tracing::debug!(id = %account.id, name = %account.name, "created account");
        Ok(account)
    }

    /// Get an account by ID
    pub fn get(&self, id: AccountId) -> PlannerResult<Option<Account>> {
        self.storage.accounts.get(id)
    }

    /// Find an account by name, full ID or the short `acc-xxxxxxxx` form
    pub fn find(&self, identifier: &str) -> PlannerResult<Option<Account>> {
        if let Some(account) = self.storage.accounts.get_by_name(identifier)? {
            return Ok(Some(account));
        }

        if let Ok(id) = identifier.trim().parse::<AccountId>() {
            return self.storage.accounts.get(id);
        }

        let mut matches = self.storage.accounts.find_by_prefix(identifier.trim())?;
        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            n => Err(PlannerError::Validation(format!(
                "'{}' matches {} accounts; use the name or more of the id",
                identifier, n
            ))),
        }
    }

    /// Find an account or fail with NotFound
    pub fn require(&self, identifier: &str) -> PlannerResult<Account> {
        self.find(identifier)?
            .ok_or_else(|| PlannerError::account_not_found(identifier))
    }

    /// All accounts, newest first
    pub fn list(&self) -> PlannerResult<Vec<Account>> {
        self.storage.accounts.get_all()
    }

    /// Apply the given changes and stamp `updated_at`
    pub fn update(&self, identifier: &str, input: UpdateAccountInput) -> PlannerResult<Account> {
        let mut account = self.require(identifier)?;

        if let Some(name) = input.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(PlannerError::Validation(
                    "Account name cannot be empty".into(),
                ));
            }
            if self.storage.accounts.name_exists(name, Some(account.id))? {
                return Err(PlannerError::Duplicate {
                    entity_type: "Account",
                    identifier: name.to_string(),
                });
            }
            account.name = name.to_string();
        }
        if let Some(account_type) = input.account_type {
            account.account_type = account_type;
        }
        if let Some(balance) = input.balance {
            account.balance = balance;
        }
        if let Some(currency) = input.currency {
            account.currency = currency.trim().to_uppercase();
        }

        account
            .validate()
            .map_err(|e| PlannerError::Validation(e.to_string()))?;
        account.updated_at = chrono::Utc::now();

        self.storage.accounts.upsert(account.clone())?;
        self.storage.accounts.save()?;

        tracing::debug!(id = %account.id, name = %account.name, "updated account");
        Ok(account)
    }

    /// Delete an account and clear the reference on its transactions
    pub fn delete(&self, identifier: &str) -> PlannerResult<DeletedAccount> {
        let account = self.require(identifier)?;

        let transactions = self.storage.transactions.get_by_account(account.id)?;
        let detached_transactions = transactions.len();
        for mut txn in transactions {
            txn.account_id = None;
            txn.updated_at = chrono::Utc::now();
            self.storage.transactions.upsert(txn)?;
        }
        if detached_transactions > 0 {
            self.storage.transactions.save()?;
        }

        self.storage.accounts.delete(account.id)?;
        self.storage.accounts.save()?;

        tracing::debug!(
            id = %account.id,
            detached = detached_transactions,
            "deleted account"
        );
        Ok(DeletedAccount {
            account,
            detached_transactions,
        })
    }

    /// Number of transactions recorded against an account
    pub fn transaction_count(&self, id: AccountId) -> PlannerResult<usize> {
        Ok(self.storage.transactions.get_by_account(id)?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::PlannerPaths;
    use crate::models::{Transaction, TransactionType};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = PlannerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_create_account() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AccountService::new(&storage);

        let account = service
            .create("  Checking ", AccountType::Checking, Money::from_units(1000), Some("eur"))
            .unwrap();
        assert_eq!(account.name, "Checking");
        assert_eq!(account.currency, "EUR");
        assert_eq!(service.list().unwrap().len(), 1);
    }

    #[test]
    fn test_create_rejects_duplicates_and_bad_input() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AccountService::new(&storage);
        service
            .create("Checking", AccountType::Checking, Money::zero(), None)
            .unwrap();

        assert!(matches!(
            service.create("CHECKING", AccountType::Savings, Money::zero(), None),
            Err(PlannerError::Duplicate { .. })
        ));
        assert!(service
            .create("  ", AccountType::Cash, Money::zero(), None)
            .unwrap_err()
            .is_validation());
        assert!(service
            .create("Wallet", AccountType::Cash, Money::zero(), Some("dollars"))
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_find_by_name_and_short_id() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AccountService::new(&storage);
        let account = service
            .create("Savings", AccountType::Savings, Money::zero(), None)
            .unwrap();

        assert_eq!(service.find("savings").unwrap().unwrap().id, account.id);
        assert_eq!(service.find(&account.id.to_string()).unwrap().unwrap().id, account.id);
        assert!(service.find("Brokerage").unwrap().is_none());
        assert!(service.require("Brokerage").unwrap_err().is_not_found());
    }

    #[test]
    fn test_update_account() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AccountService::new(&storage);
        let account = service
            .create("Card", AccountType::Credit, Money::from_units(-250), None)
            .unwrap();
        service
            .create("Wallet", AccountType::Cash, Money::zero(), None)
            .unwrap();

        let updated = service
            .update(
                "Card",
                UpdateAccountInput {
                    name: Some("Visa".into()),
                    balance: Some(Money::from_units(-400)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.id, account.id);
        assert_eq!(updated.name, "Visa");
        assert_eq!(updated.balance, Money::from_units(-400));
        assert_eq!(updated.account_type, AccountType::Credit);
        assert!(updated.updated_at >= account.updated_at);

        let clash = service.update(
            "Visa",
            UpdateAccountInput {
                name: Some("wallet".into()),
                ..Default::default()
            },
        );
        assert!(matches!(clash, Err(PlannerError::Duplicate { .. })));
    }

    #[test]
    fn test_delete_detaches_transactions() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AccountService::new(&storage);
        let account = service
            .create("Checking", AccountType::Checking, Money::zero(), None)
            .unwrap();

        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let txn = Transaction::new(TransactionType::Expense, Money::from_units(-20), date)
            .with_account(account.id);
        storage.transactions.upsert(txn.clone()).unwrap();
        assert_eq!(service.transaction_count(account.id).unwrap(), 1);

        let deleted = service.delete("Checking").unwrap();
        assert_eq!(deleted.detached_transactions, 1);
        assert!(service.list().unwrap().is_empty());

        let kept = storage.transactions.get(txn.id).unwrap().unwrap();
        assert!(kept.account_id.is_none());
    }
}
