//! Budget allocation engine
//!
//! Pure functions over categories, transactions and a budget plan:
//!
//! 1. [`classifier`] splits categories into income, savings and expense
//! 2. [`aggregate`] sums a year of transactions per category and month
//! 3. [`reduction`] measures the savings gap and spreads the needed cuts
//!
//! [`YearOverview`] runs all three in order and is what callers normally use.
//! Nothing here fails: unknown categories are skipped, zero denominators give
//! zero and out-of-range percentages are clamped.

pub mod aggregate;
pub mod classifier;
pub mod reduction;

pub use aggregate::{available_years, CategoryTotal, MonthTotals, PeriodAggregate};
pub use classifier::{classify_category, CategoryClassification, CategoryRole};
pub use reduction::{apply_user_plan, reduction_plan, PlannedCut, ReductionRow, SavingsGap, UserPlan};

use serde::Serialize;

use crate::models::{BudgetPlan, Category, Money, Transaction};

/// `numerator / denominator`, or 0 when the result would not be finite
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 && denominator.is_finite() {
        let r = numerator / denominator;
        if r.is_finite() {
            return r;
        }
    }
    0.0
}

/// Inputs for a year overview
#[derive(Debug, Clone, Copy)]
pub struct OverviewRequest<'a> {
    pub categories: &'a [Category],
    pub transactions: &'a [Transaction],
    pub year: i32,
    pub target_savings_percentage: f64,
    pub plan: Option<&'a BudgetPlan>,
    /// Baseline income to measure the target against instead of the year's total
    pub income_basis: Option<Money>,
}

/// Everything the budget screens show for one year
#[derive(Debug, Clone, Serialize)]
pub struct YearOverview {
    pub year: i32,
    pub classification: CategoryClassification,
    pub aggregate: PeriodAggregate,
    pub net_savings: Money,
    pub net_savings_rate: f64,
    pub gap: SavingsGap,
    pub reduction_plan: Vec<ReductionRow>,
    pub user_plan: UserPlan,
}

impl YearOverview {
    /// Classify, aggregate, measure the gap and build both plans
    pub fn compute(request: OverviewRequest<'_>) -> Self {
        let classification = CategoryClassification::classify(request.categories);
        let aggregate =
            PeriodAggregate::aggregate(request.transactions, &classification, request.year);

        let income_basis = request.income_basis.unwrap_or(aggregate.total_income);
        let gap = SavingsGap::compute(
            income_basis,
            aggregate.savings_total,
            request.target_savings_percentage,
        );
        let rows = reduction_plan(&gap, &aggregate.expense_by_category, aggregate.total_expenses);
        let user_plan = apply_user_plan(&rows, request.plan, &gap);

        tracing::debug!(
            year = request.year,
            income = %aggregate.total_income,
            expenses = %aggregate.total_expenses,
            savings = %aggregate.savings_total,
            behind = gap.is_behind_target,
            rows = rows.len(),
            "computed year overview"
        );

        Self {
            year: request.year,
            net_savings: aggregate.net_savings(),
            net_savings_rate: aggregate.net_savings_rate(),
            classification,
            aggregate,
            gap,
            reduction_plan: rows,
            user_plan,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionType;
    use chrono::NaiveDate;

    #[test]
    fn test_ratio_guards() {
        assert_eq!(ratio(1.0, 0.0), 0.0);
        assert_eq!(ratio(1.0, -5.0), 0.0);
        assert_eq!(ratio(f64::NAN, 2.0), 0.0);
        assert_eq!(ratio(1.0, f64::INFINITY), 0.0);
        assert_eq!(ratio(3.0, 4.0), 0.75);
    }

    fn txn(kind: TransactionType, units: i64, category: Option<&str>) -> Transaction {
        let t = Transaction::new(
            kind,
            Money::from_units(units),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        );
        match category {
            Some(c) => t.with_category(c),
            None => t,
        }
    }

    fn categories() -> Vec<Category> {
        vec![
            Category::with_value("Salary", "salary"),
            Category::with_value("Rent", "rent"),
            Category::with_value("Food", "food"),
            Category::with_value("Savings", "savings"),
        ]
    }

    #[test]
    fn test_overview_end_to_end() {
        let transactions = vec![
            txn(TransactionType::Income, 1000, Some("salary")),
            txn(TransactionType::Expense, 300, Some("rent")),
            txn(TransactionType::Expense, 100, Some("food")),
            txn(TransactionType::Savings, 160, Some("savings")),
        ];
        let categories = categories();
        let overview = YearOverview::compute(OverviewRequest {
            categories: &categories,
            transactions: &transactions,
            year: 2024,
            target_savings_percentage: 20.0,
            plan: None,
            income_basis: None,
        });

        assert_eq!(overview.aggregate.total_income, Money::from_units(1000));
        assert_eq!(overview.net_savings, Money::from_units(600));
        assert_eq!(overview.gap.expense_reduction_needed, Money::from_units(40));
        assert_eq!(overview.reduction_plan.len(), 2);
        assert_eq!(overview.reduction_plan[0].value, "rent");
        assert_eq!(overview.user_plan.total_reduction, Money::from_units(40));
    }

    #[test]
    fn test_overview_with_income_basis() {
        let transactions = vec![txn(TransactionType::Expense, 100, Some("food"))];
        let categories = categories();
        let overview = YearOverview::compute(OverviewRequest {
            categories: &categories,
            transactions: &transactions,
            year: 2024,
            target_savings_percentage: 10.0,
            plan: None,
            income_basis: Some(Money::from_units(500)),
        });

        assert_eq!(overview.gap.target_savings_amount, Money::from_units(50));
        assert_eq!(overview.reduction_plan[0].reduction_amount, Money::from_units(50));
    }

    #[test]
    fn test_overview_serializes() {
        let categories = categories();
        let overview = YearOverview::compute(OverviewRequest {
            categories: &categories,
            transactions: &[],
            year: 2024,
            target_savings_percentage: 20.0,
            plan: None,
            income_basis: None,
        });
        let json = serde_json::to_value(&overview).unwrap();
        assert_eq!(json["year"], 2024);
        assert!(json["reduction_plan"].as_array().unwrap().is_empty());
    }
}
