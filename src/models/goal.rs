//! Yearly savings goal
//!
//! The target share of income a user wants to save in a calendar year.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Savings target used when a year has no stored goal
pub const DEFAULT_SAVINGS_PERCENTAGE: f64 = 20.0;

/// Clamp a percentage into [0, 100]; NaN becomes 0
pub fn clamp_percentage(pct: f64) -> f64 {
    if pct.is_nan() {
        0.0
    } else {
        pct.clamp(0.0, 100.0)
    }
}

/// Target savings rate for one calendar year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlySavingsGoal {
    pub year: i32,

    /// Percentage of income to save, always within [0, 100]
    pub savings_percentage: f64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl YearlySavingsGoal {
    /// Create a goal, clamping the percentage
    pub fn new(year: i32, savings_percentage: f64) -> Self {
        let now = Utc::now();
        Self {
            year,
            savings_percentage: clamp_percentage(savings_percentage),
            created_at: now,
            updated_at: now,
        }
    }

    /// The goal assumed for a year nobody has configured yet
    pub fn default_for_year(year: i32) -> Self {
        Self::new(year, DEFAULT_SAVINGS_PERCENTAGE)
    }

    /// Change the percentage, clamping it
    pub fn set_percentage(&mut self, savings_percentage: f64) {
        self.savings_percentage = clamp_percentage(savings_percentage);
        self.updated_at = Utc::now();
    }
}
