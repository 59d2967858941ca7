//! Budget plan service
//!
//! Read and upsert the per-year budget plan. Partial updates replace only
//! the fields they carry; everything else on the stored plan is kept.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{PlannerError, PlannerResult};
use crate::models::{BudgetPlan, CustomCut, Money, SavingsAllocation};
use crate::storage::Storage;

/// Service for budget plans
pub struct PlanService<'a> {
    storage: &'a Storage,
}

/// Fields to replace on a stored plan
#[derive(Debug, Clone, Default)]
pub struct PlanUpdate {
    pub custom_cuts: Option<Vec<CustomCut>>,
    pub locked_categories: Option<BTreeSet<String>>,
    pub category_budgets: Option<BTreeMap<String, Money>>,
    pub savings_allocations: Option<Vec<SavingsAllocation>>,
    pub custom_savings_accounts: Option<Vec<String>>,
    pub base_monthly_savings_goal: Option<Money>,
}

impl PlanUpdate {
    /// Apply onto a plan, clamping cuts and the monthly goal
    pub fn apply_to(self, plan: &mut BudgetPlan) {
        if let Some(cuts) = self.custom_cuts {
            plan.custom_cuts = cuts
                .into_iter()
                .map(|c| CustomCut::new(c.category, c.cut_pct))
                .collect();
        }
        if let Some(locked) = self.locked_categories {
            plan.locked_categories = locked;
        }
        if let Some(budgets) = self.category_budgets {
            plan.category_budgets = budgets.into_iter().map(|(k, v)| (k, v.abs())).collect();
        }
        if let Some(allocations) = self.savings_allocations {
            plan.savings_allocations = allocations;
        }
        if let Some(accounts) = self.custom_savings_accounts {
            plan.custom_savings_accounts = accounts;
        }
        if let Some(goal) = self.base_monthly_savings_goal {
            plan.set_base_monthly_savings_goal(goal);
        }
        plan.touch();
    }
}

impl<'a> PlanService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Stored plan for a year, if any
    pub fn get(&self, year: i32) -> PlannerResult<Option<BudgetPlan>> {
        self.storage.plans.get(year)
    }

    /// Stored plan, or a fresh unsaved one
    pub fn get_or_new(&self, year: i32) -> PlannerResult<BudgetPlan> {
        Ok(self.get(year)?.unwrap_or_else(|| BudgetPlan::new(year)))
    }

    /// Insert or replace the plan for its year and write it to disk
    pub fn upsert(&self, plan: BudgetPlan) -> PlannerResult<()> {
        let year = plan.year;
        let previous = self.storage.plans.get(year)?;
        self.storage.plans.upsert(plan)?;
        if let Err(e) = self.storage.plans.save() {
            // Keep memory in step with what is on disk
            match previous {
                Some(previous) => self.storage.plans.upsert(previous)?,
                None => {
                    self.storage.plans.remove(year)?;
                }
            }
            tracing::warn!(year, error = %e, "failed to save budget plan");
            return Err(PlannerError::Persistence {
                entity_type: "budget plan",
                message: e.to_string(),
            });
        }

        tracing::info!(year, "saved budget plan");
        Ok(())
    }

    /// Apply a partial update, creating the plan on first use
    pub fn update(&self, year: i32, update: PlanUpdate) -> PlannerResult<BudgetPlan> {
        let mut plan = self.get_or_new(year)?;
        update.apply_to(&mut plan);
        self.upsert(plan.clone())?;
        Ok(plan)
    }

    /// Years that have a stored plan
    pub fn years(&self) -> PlannerResult<Vec<i32>> {
        self.storage.plans.years()
    }
}
