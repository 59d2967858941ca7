//! Budget plan repository for JSON storage
//!
//! One plan per calendar year, stored in plans.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::PlannerError;
use crate::models::BudgetPlan;

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct PlanData {
    #[serde(default)]
    plans: Vec<BudgetPlan>,
}

/// Repository for budget plan persistence
pub struct PlanRepository {
    path: PathBuf,
    plans: RwLock<HashMap<i32, BudgetPlan>>,
}

impl PlanRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            plans: RwLock::new(HashMap::new()),
        }
    }

    /// Load plans from disk
    pub fn load(&self) -> Result<(), PlannerError> {
        let file_data: PlanData = read_json(&self.path)?;

        let mut plans = self
            .plans
            .write()
            .map_err(|e| PlannerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        plans.clear();
        for plan in file_data.plans {
            plans.insert(plan.year, plan);
        }

        Ok(())
    }

    /// Save plans to disk, oldest year first
    pub fn save(&self) -> Result<(), PlannerError> {
        let plans = self
            .plans
            .read()
            .map_err(|e| PlannerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = plans.values().cloned().collect();
        list.sort_by_key(|p| p.year);

        write_json_atomic(&self.path, &PlanData { plans: list })
    }

    /// Get the plan for a year
    pub fn get(&self, year: i32) -> Result<Option<BudgetPlan>, PlannerError> {
        let plans = self
            .plans
            .read()
            .map_err(|e| PlannerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(plans.get(&year).cloned())
    }

    /// Years that have a stored plan, oldest first
    pub fn years(&self) -> Result<Vec<i32>, PlannerError> {
        let plans = self
            .plans
            .read()
            .map_err(|e| PlannerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut years: Vec<i32> = plans.keys().copied().collect();
        years.sort_unstable();
        Ok(years)
    }

    /// Insert or update the plan for its year
    pub fn upsert(&self, plan: BudgetPlan) -> Result<(), PlannerError> {
        let mut plans = self
            .plans
            .write()
            .map_err(|e| PlannerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        plans.insert(plan.year, plan);
        Ok(())
    }

    /// Remove the plan for a year, returning it
    pub fn remove(&self, year: i32) -> Result<Option<BudgetPlan>, PlannerError> {
        let mut plans = self
            .plans
            .write()
            .map_err(|e| PlannerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(plans.remove(&year))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    #[test]
    fn test_plan_round_trips_through_disk() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("plans.json");
        let repo = PlanRepository::new(path.clone());

        let mut plan = BudgetPlan::new(2024);
        plan.set_custom_cut("food", 15.0);
        plan.lock("rent");
        plan.set_category_budget("food", Some(Money::from_units(400)));
        plan.set_base_monthly_savings_goal(Money::from_units(500));
        repo.upsert(plan.clone()).unwrap();
        repo.save().unwrap();

        let repo2 = PlanRepository::new(path);
        repo2.load().unwrap();
        assert_eq!(repo2.get(2024).unwrap(), Some(plan));
        assert_eq!(repo2.years().unwrap(), vec![2024]);
    }

    #[test]
    fn test_upsert_is_keyed_by_year() {
        let temp_dir = TempDir::new().unwrap();
        let repo = PlanRepository::new(temp_dir.path().join("plans.json"));

        repo.upsert(BudgetPlan::new(2024)).unwrap();
        let mut updated = BudgetPlan::new(2024);
        updated.lock("food");
        repo.upsert(updated).unwrap();

        assert_eq!(repo.years().unwrap(), vec![2024]);
        assert!(repo.get(2024).unwrap().unwrap().is_locked("food"));

        assert!(repo.remove(2024).unwrap().is_some());
        assert!(repo.years().unwrap().is_empty());
    }
}
