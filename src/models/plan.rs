//! Budget plan model
//!
//! A budget plan records the user's adjustments to the computed reduction
//! plan for one year: custom cut percentages, locked categories, optional
//! per-category budgets and a monthly savings goal. The reduction numbers
//! themselves are never stored; they are recomputed from transactions.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::goal::clamp_percentage;
use super::money::Money;

/// A user-chosen cut for one expense category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomCut {
    /// Category value
    pub category: String,
    /// Percentage of the category's spend to cut, within [0, 100]
    pub cut_pct: f64,
}

impl CustomCut {
    pub fn new(category: impl Into<String>, cut_pct: f64) -> Self {
        Self {
            category: category.into(),
            cut_pct: clamp_percentage(cut_pct),
        }
    }
}

/// Share of planned savings routed to a savings category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsAllocation {
    pub category: String,
    pub percentage: f64,
}

/// Per-year budget plan, upserted by year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetPlan {
    pub year: i32,

    #[serde(default)]
    pub custom_cuts: Vec<CustomCut>,

    /// Categories whose effective cut is forced to zero
    #[serde(default)]
    pub locked_categories: BTreeSet<String>,

    /// Optional spending budget per category value
    #[serde(default)]
    pub category_budgets: BTreeMap<String, Money>,

    #[serde(default)]
    pub savings_allocations: Vec<SavingsAllocation>,

    /// Extra category values the user treats as savings accounts
    #[serde(default)]
    pub custom_savings_accounts: Vec<String>,

    #[serde(default)]
    pub base_monthly_savings_goal: Money,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BudgetPlan {
    /// Create an empty plan for a year
    pub fn new(year: i32) -> Self {
        let now = Utc::now();
        Self {
            year,
            custom_cuts: Vec::new(),
            locked_categories: BTreeSet::new(),
            category_budgets: BTreeMap::new(),
            savings_allocations: Vec::new(),
            custom_savings_accounts: Vec::new(),
            base_monthly_savings_goal: Money::zero(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Stored custom cut for a category, if any
    pub fn custom_cut(&self, category: &str) -> Option<f64> {
        self.custom_cuts
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.cut_pct)
    }

    /// Set (or replace) the custom cut for a category; the value is clamped
    pub fn set_custom_cut(&mut self, category: &str, cut_pct: f64) {
        let cut = CustomCut::new(category, cut_pct);
        match self.custom_cuts.iter_mut().find(|c| c.category == category) {
            Some(existing) => *existing = cut,
            None => self.custom_cuts.push(cut),
        }
        self.touch();
    }

    /// Drop the custom cut for a category; returns whether one existed
    pub fn clear_custom_cut(&mut self, category: &str) -> bool {
        let before = self.custom_cuts.len();
        self.custom_cuts.retain(|c| c.category != category);
        let removed = self.custom_cuts.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    /// Forget every custom cut, falling back to computed defaults
    pub fn reset_cuts(&mut self) {
        self.custom_cuts.clear();
        self.touch();
    }

    pub fn is_locked(&self, category: &str) -> bool {
        self.locked_categories.contains(category)
    }

    pub fn lock(&mut self, category: &str) {
        self.locked_categories.insert(category.to_string());
        self.touch();
    }

    pub fn unlock(&mut self, category: &str) {
        self.locked_categories.remove(category);
        self.touch();
    }

    /// Flip the lock on a category; returns the new locked state
    pub fn toggle_lock(&mut self, category: &str) -> bool {
        if self.is_locked(category) {
            self.unlock(category);
            false
        } else {
            self.lock(category);
            true
        }
    }

    /// Cut actually applied to a category
    ///
    /// Locked categories always get 0. Otherwise the custom cut wins over the
    /// computed default. The result is clamped to [0, 100].
    pub fn effective_cut(&self, category: &str, default_cut_pct: f64) -> f64 {
        if self.is_locked(category) {
            return 0.0;
        }
        clamp_percentage(self.custom_cut(category).unwrap_or(default_cut_pct))
    }

    /// Set or clear the spending budget for a category
    pub fn set_category_budget(&mut self, category: &str, amount: Option<Money>) {
        match amount {
            Some(amount) => {
                self.category_budgets
                    .insert(category.to_string(), amount.abs());
            }
            None => {
                self.category_budgets.remove(category);
            }
        }
        self.touch();
    }

    /// Set the monthly savings goal; negative input is treated as zero
    pub fn set_base_monthly_savings_goal(&mut self, amount: Money) {
        self.base_monthly_savings_goal = amount.max(Money::zero());
        self.touch();
    }

    /// Yearly equivalent of the monthly savings goal
    pub fn yearly_savings_goal(&self) -> Money {
        Money::from_cents(self.base_monthly_savings_goal.cents() * 12)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
