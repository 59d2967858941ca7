//! Savings gap and expense reduction planning
//!
//! Compares actual savings against the yearly target, then spreads the
//! shortfall over expense categories in proportion to their spend. The
//! user's plan (custom cuts and locks) is layered on top afterwards.

use serde::{Deserialize, Serialize};

use super::aggregate::CategoryTotal;
use super::ratio;
use crate::models::{clamp_percentage, BudgetPlan, Money};

/// How far savings are from the target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavingsGap {
    /// Income the target is measured against
    pub income_basis: Money,
    /// Target percentage, clamped to [0, 100]
    pub target_savings_percentage: f64,
    pub target_savings_amount: Money,
    pub savings_total: Money,
    /// Savings minus target; negative when behind
    pub savings_difference: Money,
    pub is_behind_target: bool,
    /// Never negative
    pub expense_reduction_needed: Money,
    pub expense_reduction_pct_of_income: f64,
}

impl SavingsGap {
    pub fn compute(income_basis: Money, savings_total: Money, target_pct: f64) -> Self {
        let target_savings_percentage = clamp_percentage(target_pct);
        let target_savings_amount = income_basis.percent(target_savings_percentage);
        let savings_difference = savings_total - target_savings_amount;
        let is_behind_target = savings_difference.is_negative();
        let expense_reduction_needed = (-savings_difference).max(Money::zero());

        Self {
            income_basis,
            target_savings_percentage,
            target_savings_amount,
            savings_total,
            savings_difference,
            is_behind_target,
            expense_reduction_needed,
            expense_reduction_pct_of_income: ratio(
                expense_reduction_needed.as_f64(),
                income_basis.as_f64(),
            ) * 100.0,
        }
    }
}

/// Suggested reduction for one expense category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReductionRow {
    pub value: String,
    pub label: String,
    pub current_amount: Money,
    /// Fraction of total expenses, in [0, 1]
    pub share_of_expenses: f64,
    pub reduction_amount: Money,
    /// Clamped to [0, 100]
    pub reduction_pct_of_category: f64,
    pub savings_pct_of_income: f64,
}

/// Proportional reduction plan
///
/// Empty unless the gap is behind target, there is something to cut and
/// there were expenses at all. Only categories that spent something get a
/// row. Rows are ordered by spend, largest first; ties keep input order.
pub fn reduction_plan(
    gap: &SavingsGap,
    expense_by_category: &[CategoryTotal],
    total_expenses: Money,
) -> Vec<ReductionRow> {
    if !gap.is_behind_target
        || !total_expenses.is_positive()
        || !gap.expense_reduction_needed.is_positive()
    {
        return Vec::new();
    }

    let mut rows: Vec<ReductionRow> = expense_by_category
        .iter()
        .filter(|c| c.total.is_positive())
        .map(|c| {
            let share = ratio(c.total.as_f64(), total_expenses.as_f64());
            let reduction_amount = gap.expense_reduction_needed.scale(share);
            ReductionRow {
                value: c.value.clone(),
                label: c.label.clone(),
                current_amount: c.total,
                share_of_expenses: share,
                reduction_amount,
                reduction_pct_of_category: clamp_percentage(
                    ratio(reduction_amount.as_f64(), c.total.as_f64()) * 100.0,
                ),
                savings_pct_of_income: gap.expense_reduction_pct_of_income * share,
            }
        })
        .collect();

    rows.sort_by(|a, b| b.current_amount.cmp(&a.current_amount));
    rows
}

/// A reduction row after the user's plan was applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedCut {
    pub value: String,
    pub label: String,
    pub current_amount: Money,
    /// Cut the proportional plan suggested
    pub default_cut_pct: f64,
    /// Cut actually applied
    pub cut_pct: f64,
    pub locked: bool,
    pub custom: bool,
    pub reduction_amount: Money,
    pub savings_pct_of_income: f64,
}

/// Reduction plan with custom cuts and locks applied
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPlan {
    pub cuts: Vec<PlannedCut>,
    pub total_reduction: Money,
    pub total_savings_pct_of_income: f64,
    /// Current savings plus the planned reductions
    pub projected_savings: Money,
    pub meets_target: bool,
}

/// Apply the user's custom cuts and locks to the computed rows
///
/// A locked category contributes nothing and its share is not moved onto
/// other categories.
pub fn apply_user_plan(
    rows: &[ReductionRow],
    plan: Option<&BudgetPlan>,
    gap: &SavingsGap,
) -> UserPlan {
    let basis = gap.income_basis.as_f64();

    let cuts: Vec<PlannedCut> = rows
        .iter()
        .map(|row| {
            let default_cut_pct = row.reduction_pct_of_category;
            let (cut_pct, locked, custom) = match plan {
                Some(plan) => (
                    plan.effective_cut(&row.value, default_cut_pct),
                    plan.is_locked(&row.value),
                    plan.custom_cut(&row.value).is_some(),
                ),
                None => (clamp_percentage(default_cut_pct), false, false),
            };
            let reduction_amount = row.current_amount.percent(cut_pct);

            PlannedCut {
                value: row.value.clone(),
                label: row.label.clone(),
                current_amount: row.current_amount,
                default_cut_pct,
                cut_pct,
                locked,
                custom,
                reduction_amount,
                savings_pct_of_income: ratio(reduction_amount.as_f64(), basis) * 100.0,
            }
        })
        .collect();

    let total_reduction: Money = cuts.iter().map(|c| c.reduction_amount).sum();
    let projected_savings = gap.savings_total + total_reduction;

    UserPlan {
        total_savings_pct_of_income: ratio(total_reduction.as_f64(), basis) * 100.0,
        meets_target: projected_savings >= gap.target_savings_amount,
        cuts,
        total_reduction,
        projected_savings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(value: &str, units: i64) -> CategoryTotal {
        CategoryTotal {
            value: value.to_string(),
            label: value.to_string(),
            total: Money::from_units(units),
            monthly: [Money::zero(); 12],
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_income_only_gap() {
        let gap = SavingsGap::compute(Money::from_units(5000), Money::zero(), 20.0);

        assert_eq!(gap.target_savings_amount, Money::from_units(1000));
        assert_eq!(gap.savings_difference, Money::from_units(-1000));
        assert!(gap.is_behind_target);
        assert_eq!(gap.expense_reduction_needed, Money::from_units(1000));
        assert!(close(gap.expense_reduction_pct_of_income, 20.0));

        // No expenses means nothing to cut
        assert!(reduction_plan(&gap, &[], Money::zero()).is_empty());
    }

    #[test]
    fn test_zero_target_is_never_behind() {
        for savings in [0, 10, 5000] {
            let gap = SavingsGap::compute(Money::from_units(5000), Money::from_units(savings), 0.0);
            assert!(!gap.is_behind_target);
            assert_eq!(gap.expense_reduction_needed, Money::zero());
        }
    }

    #[test]
    fn test_ahead_of_target() {
        let gap = SavingsGap::compute(Money::from_units(1000), Money::from_units(300), 20.0);
        assert!(!gap.is_behind_target);
        assert_eq!(gap.savings_difference, Money::from_units(100));
        assert_eq!(gap.expense_reduction_needed, Money::zero());
        assert!(reduction_plan(&gap, &[total("rent", 500)], Money::from_units(500)).is_empty());
    }

    #[test]
    fn test_zero_income_basis() {
        let gap = SavingsGap::compute(Money::zero(), Money::zero(), 20.0);
        assert!(!gap.is_behind_target);
        assert_eq!(gap.expense_reduction_pct_of_income, 0.0);
    }

    #[test]
    fn test_target_percentage_is_clamped() {
        let gap = SavingsGap::compute(Money::from_units(100), Money::zero(), 250.0);
        assert_eq!(gap.target_savings_percentage, 100.0);
        assert_eq!(gap.target_savings_amount, Money::from_units(100));
    }

    fn rent_food_gap() -> SavingsGap {
        // 20% of 1000 is 200; 160 saved leaves 40 to find
        SavingsGap::compute(Money::from_units(1000), Money::from_units(160), 20.0)
    }

    #[test]
    fn test_proportional_split() {
        let gap = rent_food_gap();
        assert_eq!(gap.expense_reduction_needed, Money::from_units(40));

        let expenses = vec![total("food", 100), total("rent", 300)];
        let rows = reduction_plan(&gap, &expenses, Money::from_units(400));

        let order: Vec<&str> = rows.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(order, vec!["rent", "food"]);

        assert!(close(rows[0].share_of_expenses, 0.75));
        assert!(close(rows[1].share_of_expenses, 0.25));
        assert_eq!(rows[0].reduction_amount, Money::from_units(30));
        assert_eq!(rows[1].reduction_amount, Money::from_units(10));
        assert!(close(rows[0].reduction_pct_of_category, 10.0));
        assert!(close(rows[1].reduction_pct_of_category, 10.0));
        assert!(close(rows[0].savings_pct_of_income, 3.0));
        assert!(close(rows[1].savings_pct_of_income, 1.0));
    }

    #[test]
    fn test_zero_spend_categories_get_no_row() {
        let gap = rent_food_gap();
        let expenses = vec![total("rent", 300), total("gym", 0), total("food", 100)];
        let rows = reduction_plan(&gap, &expenses, Money::from_units(400));
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.value != "gym"));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let gap = rent_food_gap();
        let expenses = vec![total("b", 100), total("a", 100), total("c", 200)];
        let rows = reduction_plan(&gap, &expenses, Money::from_units(400));
        let order: Vec<&str> = rows.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(order, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_reduction_pct_is_clamped() {
        // Shortfall larger than all spending
        let gap = SavingsGap::compute(Money::from_units(10_000), Money::zero(), 50.0);
        let rows = reduction_plan(&gap, &[total("food", 100)], Money::from_units(100));
        assert_eq!(rows[0].reduction_pct_of_category, 100.0);
    }

    #[test]
    fn test_user_plan_without_stored_plan_uses_defaults() {
        let gap = rent_food_gap();
        let rows = reduction_plan(
            &gap,
            &[total("rent", 300), total("food", 100)],
            Money::from_units(400),
        );
        let user = apply_user_plan(&rows, None, &gap);

        assert_eq!(user.total_reduction, Money::from_units(40));
        assert!(close(user.total_savings_pct_of_income, 4.0));
        assert_eq!(user.projected_savings, Money::from_units(200));
        assert!(user.meets_target);
    }

    #[test]
    fn test_lock_zeroes_cut_without_redistribution() {
        let gap = rent_food_gap();
        let rows = reduction_plan(
            &gap,
            &[total("rent", 300), total("food", 100)],
            Money::from_units(400),
        );
        let mut plan = BudgetPlan::new(2024);
        plan.lock("food");

        let user = apply_user_plan(&rows, Some(&plan), &gap);
        let food = user.cuts.iter().find(|c| c.value == "food").unwrap();
        let rent = user.cuts.iter().find(|c| c.value == "rent").unwrap();

        assert!(food.locked);
        assert_eq!(food.cut_pct, 0.0);
        assert_eq!(food.reduction_amount, Money::zero());
        assert_eq!(rent.reduction_amount, Money::from_units(30));
        assert_eq!(user.total_reduction, Money::from_units(30));
        assert!(!user.meets_target);
    }

    #[test]
    fn test_custom_cut_overrides_default() {
        let gap = rent_food_gap();
        let rows = reduction_plan(
            &gap,
            &[total("rent", 300), total("food", 100)],
            Money::from_units(400),
        );
        let mut plan = BudgetPlan::new(2024);
        plan.set_custom_cut("food", 50.0);

        let user = apply_user_plan(&rows, Some(&plan), &gap);
        let food = user.cuts.iter().find(|c| c.value == "food").unwrap();

        assert!(food.custom);
        assert!(close(food.default_cut_pct, 10.0));
        assert_eq!(food.reduction_amount, Money::from_units(50));
        assert!(close(food.savings_pct_of_income, 5.0));
        assert_eq!(user.total_reduction, Money::from_units(80));
    }
}
