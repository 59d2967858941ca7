//! Budget overview formatting
//!
//! Terminal views of the year overview: income/expense totals, the savings
//! gap, the reduction plan with the user's cuts applied, and the monthly
//! breakdown.

use crate::models::{BudgetPlan, Money, YearlySavingsGoal};
use crate::planning::{CategoryTotal, PeriodAggregate, YearOverview};

use super::report::{double_separator, format_bar, format_percentage, money, separator, truncate};

const WIDTH: usize = 72;

/// Full overview for one year
pub fn format_year_overview(overview: &YearOverview, currency: &str) -> String {
    let agg = &overview.aggregate;
    let gap = &overview.gap;
    let mut output = String::new();

    output.push_str(&format!("Budget overview {}\n", overview.year));
    output.push_str(&double_separator(WIDTH));
    output.push('\n');

    output.push_str(&format!("  Income:        {:>14}\n", money(agg.total_income, currency)));
    output.push_str(&format!("  Expenses:      {:>14}\n", money(agg.total_expenses, currency)));
    output.push_str(&format!(
        "  Net:           {:>14}  ({} of income)\n",
        money(overview.net_savings, currency),
        format_percentage(overview.net_savings_rate.max(0.0))
    ));
    output.push_str(&format!("  Saved:         {:>14}\n", money(agg.savings_total, currency)));
    output.push_str(&format!(
        "  Target:        {:>14}  ({} of {})\n",
        money(gap.target_savings_amount, currency),
        format_percentage(gap.target_savings_percentage),
        money(gap.income_basis, currency)
    ));

    if gap.is_behind_target {
        output.push_str(&format!(
            "  Behind target by {} ({} of income to cut)\n",
            money(gap.expense_reduction_needed, currency),
            format_percentage(gap.expense_reduction_pct_of_income)
        ));
    } else {
        output.push_str(&format!(
            "  On target, {} ahead\n",
            money(gap.savings_difference, currency)
        ));
    }

    if agg.unmatched_transactions > 0 {
        output.push_str(&format!(
            "  Note: {} transaction(s) reference a missing or mismatched category and are not counted\n",
            agg.unmatched_transactions
        ));
    }

    output.push('\n');
    output.push_str(&format_category_totals("Expenses by category", &agg.expense_by_category, agg.uncategorized_expense, currency));
    output.push('\n');
    output.push_str(&format_category_totals("Income by category", &agg.income_by_category, agg.uncategorized_income, currency));

    if !overview.user_plan.cuts.is_empty() {
        output.push('\n');
        output.push_str(&format_reduction_plan(overview, currency));
    }

    output
}

fn format_category_totals(
    title: &str,
    totals: &[CategoryTotal],
    uncategorized: Money,
    currency: &str,
) -> String {
    let mut output = format!("{}\n{}\n", title, separator(WIDTH));

    let max = totals
        .iter()
        .map(|c| c.total)
        .chain(std::iter::once(uncategorized))
        .max()
        .unwrap_or_default()
        .as_f64();

    let mut rows: Vec<&CategoryTotal> = totals.iter().filter(|c| !c.total.is_zero()).collect();
    rows.sort_by(|a, b| b.total.cmp(&a.total));

    if rows.is_empty() && uncategorized.is_zero() {
        output.push_str("  (nothing recorded)\n");
        return output;
    }

    for row in rows {
        output.push_str(&format!(
            "  {:<22} {:>14}  {}\n",
            truncate(&row.label, 22),
            money(row.total, currency),
            format_bar(row.total.as_f64(), max, 20)
        ));
    }
    if !uncategorized.is_zero() {
        output.push_str(&format!(
            "  {:<22} {:>14}  {}\n",
            "(uncategorized)",
            money(uncategorized, currency),
            format_bar(uncategorized.as_f64(), max, 20)
        ));
    }

    output
}

/// Reduction plan with the user's cuts applied
pub fn format_reduction_plan(overview: &YearOverview, currency: &str) -> String {
    let plan = &overview.user_plan;
    let mut output = String::new();

    output.push_str("Reduction plan\n");
    output.push_str(&separator(WIDTH));
    output.push('\n');

    if plan.cuts.is_empty() {
        output.push_str("  No reductions needed.\n");
        return output;
    }

    output.push_str(&format!(
        "  {:<20} {:>12} {:>8} {:>8} {:>12} {:>7}\n",
        "Category", "Spent", "Default", "Cut", "Reduction", "Income"
    ));
    for cut in &plan.cuts {
        let marker = if cut.locked {
            " (locked)"
        } else if cut.custom {
            " *"
        } else {
            ""
        };
        output.push_str(&format!(
            "  {:<20} {:>12} {:>8} {:>8} {:>12} {:>7}{}\n",
            truncate(&cut.label, 20),
            money(cut.current_amount, currency),
            format_percentage(cut.default_cut_pct),
            format_percentage(cut.cut_pct),
            money(cut.reduction_amount, currency),
            format_percentage(cut.savings_pct_of_income),
            marker
        ));
    }

    output.push_str(&format!(
        "  Total reduction {} ({} of income); projected savings {}{}\n",
        money(plan.total_reduction, currency),
        format_percentage(plan.total_savings_pct_of_income),
        money(plan.projected_savings, currency),
        if plan.meets_target { ", meets target" } else { ", still short" }
    ));

    output
}

/// Month by month income, expense and net
pub fn format_monthly(aggregate: &PeriodAggregate, currency: &str) -> String {
    const MONTH_NAMES: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];

    let mut output = format!("Monthly breakdown {}\n", aggregate.year);
    output.push_str(&format!(
        "  {:<5} {:>14} {:>14} {:>14}\n",
        "Month", "Income", "Expenses", "Net"
    ));
    output.push_str(&separator(52));
    output.push('\n');

    for month in aggregate.month_totals() {
        output.push_str(&format!(
            "  {:<5} {:>14} {:>14} {:>14}\n",
            MONTH_NAMES[(month.month - 1) as usize],
            money(month.income, currency),
            money(month.expense, currency),
            money(month.net, currency)
        ));
    }

    output.push_str(&separator(52));
    output.push('\n');
    output.push_str(&format!(
        "  {:<5} {:>14} {:>14} {:>14}\n",
        "Total",
        money(aggregate.total_income, currency),
        money(aggregate.total_expenses, currency),
        money(aggregate.net_savings(), currency)
    ));

    output
}

/// Savings goal line
pub fn format_goal(goal: &YearlySavingsGoal, stored: bool) -> String {
    format!(
        "Savings goal {}: {}{}\n",
        goal.year,
        format_percentage(goal.savings_percentage),
        if stored { "" } else { " (default)" }
    )
}

/// Stored plan settings
pub fn format_plan(plan: &BudgetPlan, currency: &str) -> String {
    let mut output = format!("Budget plan {}\n", plan.year);

    output.push_str(&format!(
        "  Monthly savings goal: {} ({} per year)\n",
        money(plan.base_monthly_savings_goal, currency),
        money(plan.yearly_savings_goal(), currency)
    ));

    if plan.custom_cuts.is_empty() {
        output.push_str("  Custom cuts: none\n");
    } else {
        output.push_str("  Custom cuts:\n");
        for cut in &plan.custom_cuts {
            output.push_str(&format!("    {:<20} {}\n", cut.category, format_percentage(cut.cut_pct)));
        }
    }

    if plan.locked_categories.is_empty() {
        output.push_str("  Locked: none\n");
    } else {
        let locked: Vec<&str> = plan.locked_categories.iter().map(String::as_str).collect();
        output.push_str(&format!("  Locked: {}\n", locked.join(", ")));
    }

    if !plan.category_budgets.is_empty() {
        output.push_str("  Budgets:\n");
        for (category, amount) in &plan.category_budgets {
            output.push_str(&format!("    {:<20} {}\n", category, money(*amount, currency)));
        }
    }

    output
}

/// Years with data, newest first
pub fn format_years(years: &[i32], current: i32) -> String {
    let mut output = String::from("Available years:\n");
    for year in years {
        let marker = if *year == current { " (current)" } else { "" };
        output.push_str(&format!("  {}{}\n", year, marker));
    }
    output
}
