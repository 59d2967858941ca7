//! Storage layer for the savings planner
//!
//! JSON file storage with atomic writes and automatic directory creation.
//! Repositories hold their data behind `RwLock`, so a `Storage` can be shared
//! with the plan-saving thread through an `Arc`.

pub mod accounts;
pub mod categories;
pub mod file_io;
pub mod goals;
pub mod init;
pub mod plans;
pub mod transactions;

pub use accounts::AccountRepository;
pub use categories::CategoryRepository;
pub use file_io::{json_file_valid, read_json, write_json_atomic};
pub use goals::GoalRepository;
pub use init::initialize_storage;
pub use plans::PlanRepository;
pub use transactions::TransactionRepository;

use crate::config::paths::PlannerPaths;
use crate::error::PlannerError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: PlannerPaths,
    pub accounts: AccountRepository,
    pub transactions: TransactionRepository,
    pub categories: CategoryRepository,
    pub goals: GoalRepository,
    pub plans: PlanRepository,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: PlannerPaths) -> Result<Self, PlannerError> {
        paths.ensure_directories()?;

        Ok(Self {
            accounts: AccountRepository::new(paths.accounts_file()),
            transactions: TransactionRepository::new(paths.transactions_file()),
            categories: CategoryRepository::new(paths.categories_file()),
            goals: GoalRepository::new(paths.goals_file()),
            plans: PlanRepository::new(paths.plans_file()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &PlannerPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), PlannerError> {
        self.accounts.load()?;
        self.transactions.load()?;
        self.categories.load()?;
        self.goals.load()?;
        self.plans.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), PlannerError> {
        self.accounts.save()?;
        self.transactions.save()?;
        self.categories.save()?;
        self.goals.save()?;
        self.plans.save()?;
        Ok(())
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, AccountType, BudgetPlan, YearlySavingsGoal};
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PlannerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
    }

    #[test]
    fn test_save_all_and_load_all() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PlannerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths.clone()).unwrap();

        storage.goals.upsert(YearlySavingsGoal::new(2024, 30.0)).unwrap();
        storage.plans.upsert(BudgetPlan::new(2024)).unwrap();
        storage.accounts.upsert(Account::new("Checking", AccountType::Checking)).unwrap();
        storage.save_all().unwrap();

        let reloaded = Storage::new(paths).unwrap();
        reloaded.load_all().unwrap();
        assert!(reloaded.goals.get(2024).unwrap().is_some());
        assert!(reloaded.plans.get(2024).unwrap().is_some());
        assert_eq!(reloaded.accounts.count().unwrap(), 1);
        assert_eq!(reloaded.transactions.count().unwrap(), 0);
    }
}
