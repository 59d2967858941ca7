//! Savings goal service
//!
//! Reads the target savings percentage for a year and upserts it. Years
//! without a stored goal fall back to the configured default.

use crate::error::{PlannerError, PlannerResult};
use crate::models::{YearlySavingsGoal, DEFAULT_SAVINGS_PERCENTAGE};
use crate::storage::Storage;

/// Service for yearly savings goals
pub struct GoalService<'a> {
    storage: &'a Storage,
    default_percentage: f64,
}

impl<'a> GoalService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            default_percentage: DEFAULT_SAVINGS_PERCENTAGE,
        }
    }

    /// Use a different fallback for years without a stored goal
    pub fn with_default_percentage(mut self, pct: f64) -> Self {
        self.default_percentage = pct;
        self
    }

    /// Stored goal for a year, if any
    pub fn get(&self, year: i32) -> PlannerResult<Option<YearlySavingsGoal>> {
        self.storage.goals.get(year)
    }

    /// Stored goal, or an unsaved default one
    pub fn get_or_default(&self, year: i32) -> PlannerResult<YearlySavingsGoal> {
        Ok(self
            .get(year)?
            .unwrap_or_else(|| YearlySavingsGoal::new(year, self.default_percentage)))
    }

    /// Target percentage for a year
    pub fn target_percentage(&self, year: i32) -> PlannerResult<f64> {
        Ok(self.get_or_default(year)?.savings_percentage)
    }

    /// Set the target for a year, clamping into [0, 100]
    pub fn set(&self, year: i32, savings_percentage: f64) -> PlannerResult<YearlySavingsGoal> {
        if savings_percentage.is_nan() {
            return Err(PlannerError::Validation(
                "Savings percentage must be a number".into(),
            ));
        }

        let goal = match self.get(year)? {
            Some(mut goal) => {
                goal.set_percentage(savings_percentage);
                goal
            }
            None => YearlySavingsGoal::new(year, savings_percentage),
        };

        let previous = self.storage.goals.get(year)?;
        self.storage.goals.upsert(goal.clone())?;
        if let Err(e) = self.storage.goals.save() {
            // Keep memory in step with what is on disk
            match previous {
                Some(previous) => self.storage.goals.upsert(previous)?,
                None => {
                    self.storage.goals.remove(year)?;
                }
            }
            tracing::warn!(year, error = %e, "failed to save savings goal");
            return Err(PlannerError::Persistence {
                entity_type: "savings goal",
                message: e.to_string(),
            });
        }

        tracing::info!(year, percentage = goal.savings_percentage, "saved savings goal");
        Ok(goal)
    }

    /// All stored goals, oldest year first
    pub fn list(&self) -> PlannerResult<Vec<YearlySavingsGoal>> {
        self.storage.goals.get_all()
    }
}
