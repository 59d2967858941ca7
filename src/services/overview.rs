//! Year overview service
//!
//! Pulls categories, transactions, the savings goal and the budget plan out
//! of storage and runs the allocation engine over them.

use chrono::{Datelike, Utc};

use crate::error::PlannerResult;
use crate::models::Money;
use crate::planning::{available_years, OverviewRequest, YearOverview};
use crate::storage::Storage;

use super::goal::GoalService;

/// Service producing year overviews
pub struct OverviewService<'a> {
    storage: &'a Storage,
    default_percentage: Option<f64>,
}

impl<'a> OverviewService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            default_percentage: None,
        }
    }

    /// Fallback target for years without a stored goal
    pub fn with_default_percentage(mut self, pct: f64) -> Self {
        self.default_percentage = Some(pct);
        self
    }

    /// Compute the overview for a year
    ///
    /// `income_basis` replaces the year's total income as the figure the
    /// target percentage is taken from.
    pub fn year_overview(&self, year: i32, income_basis: Option<Money>) -> PlannerResult<YearOverview> {
        let categories = self.storage.categories.get_all()?;
        let transactions = self.storage.transactions.get_by_year(year)?;
        let plan = self.storage.plans.get(year)?;

        let mut goals = GoalService::new(self.storage);
        if let Some(pct) = self.default_percentage {
            goals = goals.with_default_percentage(pct);
        }
        let target_savings_percentage = goals.target_percentage(year)?;

        Ok(YearOverview::compute(OverviewRequest {
            categories: &categories,
            transactions: &transactions,
            year,
            target_savings_percentage,
            plan: plan.as_ref(),
            income_basis,
        }))
    }

    /// Years with data, plus the current one, newest first
    pub fn available_years(&self) -> PlannerResult<Vec<i32>> {
        let transactions = self.storage.transactions.get_all()?;
        Ok(available_years(&transactions, current_year()))
    }
}

/// The current calendar year in UTC
pub fn current_year() -> i32 {
    Utc::now().year()
}
