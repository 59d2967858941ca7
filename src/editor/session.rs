//! Plan editing session
//!
//! Owns the budget plan for one year while it is being edited. Every edit
//! arrives as a [`PlanEdit`] message, is applied to the in-memory plan and
//! queued for a debounced save.

use std::sync::Arc;
use std::time::Duration;

use crate::error::{PlannerError, PlannerResult};
use crate::models::{BudgetPlan, Money};
use crate::services::PlanService;
use crate::storage::Storage;

use super::debounce::Debouncer;

/// A single change to a budget plan
#[derive(Debug, Clone, PartialEq)]
pub enum PlanEdit {
    SetCut { category: String, cut_pct: f64 },
    ClearCut { category: String },
    Lock { category: String },
    Unlock { category: String },
    ToggleLock { category: String },
    SetCategoryBudget { category: String, amount: Option<Money> },
    SetBaseMonthlyGoal(Money),
    ResetCuts,
}

impl PlanEdit {
    /// Apply to a plan; every variant stamps `updated_at`
    pub fn apply(&self, plan: &mut BudgetPlan) {
        match self {
            Self::SetCut { category, cut_pct } => plan.set_custom_cut(category, *cut_pct),
            Self::ClearCut { category } => {
                plan.clear_custom_cut(category);
                plan.touch();
            }
            Self::Lock { category } => plan.lock(category),
            Self::Unlock { category } => plan.unlock(category),
            Self::ToggleLock { category } => {
                plan.toggle_lock(category);
            }
            Self::SetCategoryBudget { category, amount } => {
                plan.set_category_budget(category, *amount)
            }
            Self::SetBaseMonthlyGoal(amount) => plan.set_base_monthly_savings_goal(*amount),
            Self::ResetCuts => plan.reset_cuts(),
        }
    }
}

/// Debounced editor for one year's plan
pub struct PlanSession {
    plan: BudgetPlan,
    debouncer: Debouncer<BudgetPlan>,
}

impl PlanSession {
    /// Open the stored plan for `year`, or a new one
    ///
    /// Saves go through the plan service once `window` passes without edits.
    pub fn open(storage: Arc<Storage>, year: i32, window: Duration) -> PlannerResult<Self> {
        let plan = PlanService::new(&storage).get_or_new(year)?;
        let debouncer = Debouncer::new(window, move |plan: BudgetPlan| {
            PlanService::new(&storage).upsert(plan)
        });

        tracing::debug!(year, window_ms = window.as_millis() as u64, "opened plan session");
        Ok(Self { plan, debouncer })
    }

    /// Apply an edit and queue the updated plan for saving
    pub fn apply(&mut self, edit: PlanEdit) -> &BudgetPlan {
        tracing::trace!(?edit, year = self.plan.year, "applying plan edit");
        edit.apply(&mut self.plan);
        self.debouncer.submit(self.plan.clone());
        &self.plan
    }

    /// Apply several edits; only the final state is saved
    pub fn apply_all(&mut self, edits: impl IntoIterator<Item = PlanEdit>) -> &BudgetPlan {
        for edit in edits {
            self.apply(edit);
        }
        &self.plan
    }

    /// Current in-memory plan
    pub fn plan(&self) -> &BudgetPlan {
        &self.plan
    }

    /// Write any pending edit now
    pub fn flush(&self) -> PlannerResult<()> {
        self.debouncer.flush()
    }

    /// Drop any pending edit without saving it
    pub fn discard(&self) {
        self.debouncer.cancel();
    }

    /// Error from the most recent background save, if any
    pub fn take_save_error(&self) -> Option<PlannerError> {
        self.debouncer.take_last_error()
    }
}
