//! Period aggregation
//!
//! Sums a year's transactions into per-category yearly and monthly totals.
//! Only magnitudes are summed. Totals are built as uncategorized plus the
//! per-category sums, so the additivity invariant holds exactly in cents.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::classifier::{CategoryClassification, CategoryRole};
use super::ratio;
use crate::models::{Category, Money, Transaction, TransactionType};

/// Months in a year
pub const MONTHS: usize = 12;

/// One amount per month, January first
pub type MonthlyAmounts = [Money; MONTHS];

/// Yearly and monthly total for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub value: String,
    pub label: String,
    pub total: Money,
    pub monthly: MonthlyAmounts,
}

impl CategoryTotal {
    fn empty(category: &Category) -> Self {
        Self {
            value: category.value.clone(),
            label: category.label.clone(),
            total: Money::zero(),
            monthly: [Money::zero(); MONTHS],
        }
    }

    fn add(&mut self, month: usize, amount: Money) {
        self.total += amount;
        self.monthly[month] += amount;
    }
}

/// Income, expense and net for one month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthTotals {
    /// 1-based month number
    pub month: u32,
    pub income: Money,
    pub expense: Money,
    pub net: Money,
}

/// Everything derived from one year of transactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodAggregate {
    pub year: i32,

    /// Every income category, in classification order, even if zero
    pub income_by_category: Vec<CategoryTotal>,

    /// Every expense category, in classification order, even if zero
    pub expense_by_category: Vec<CategoryTotal>,

    pub uncategorized_income: Money,
    pub uncategorized_expense: Money,
    pub uncategorized_income_by_month: MonthlyAmounts,
    pub uncategorized_expense_by_month: MonthlyAmounts,

    pub total_income: Money,
    pub total_expenses: Money,

    /// Sum of `savings`-type transactions, regardless of category
    pub savings_total: Money,

    /// Income/expense transactions whose category is not in the matching role set
    pub unmatched_transactions: usize,
}

impl PeriodAggregate {
    /// Aggregate `transactions` falling in `year`
    ///
    /// A transaction contributes to a category bucket only when its type is
    /// income (or expense) and its category is in the income (or expense)
    /// set. Savings categories are skipped. A reference to an unknown category,
    /// or to a category of the other role, is dropped from both the categorized
    /// and uncategorized sums.
    pub fn aggregate(
        transactions: &[Transaction],
        classification: &CategoryClassification,
        year: i32,
    ) -> Self {
        let mut income_by_category: Vec<CategoryTotal> =
            classification.income.iter().map(CategoryTotal::empty).collect();
        let mut expense_by_category: Vec<CategoryTotal> =
            classification.expense.iter().map(CategoryTotal::empty).collect();

        let mut uncategorized_income_by_month = [Money::zero(); MONTHS];
        let mut uncategorized_expense_by_month = [Money::zero(); MONTHS];
        let mut savings_total = Money::zero();
        let mut unmatched_transactions = 0;

        for txn in transactions.iter().filter(|t| t.year() == year) {
            let amount = txn.magnitude();
            let month = txn.month_index();

            let (buckets, uncategorized, role) = match txn.kind {
                TransactionType::Savings => {
                    savings_total += amount;
                    continue;
                }
                TransactionType::Transfer => continue,
                TransactionType::Income => (
                    &mut income_by_category,
                    &mut uncategorized_income_by_month,
                    CategoryRole::Income,
                ),
                TransactionType::Expense => (
                    &mut expense_by_category,
                    &mut uncategorized_expense_by_month,
                    CategoryRole::Expense,
                ),
            };

            match txn.category_value() {
                None => uncategorized[month] += amount,
                Some(value) if classification.is_savings(value) => {}
                Some(value) => {
                    match buckets.iter_mut().find(|b| b.value == value) {
                        Some(bucket) => bucket.add(month, amount),
                        None => {
                            unmatched_transactions += 1;
                            tracing::trace!(
                                transaction = %txn.id,
                                category = value,
                                expected_role = %role,
                                "category not in role set; amount excluded"
                            );
                        }
                    }
                }
            }
        }

        let uncategorized_income: Money = uncategorized_income_by_month.iter().sum();
        let uncategorized_expense: Money = uncategorized_expense_by_month.iter().sum();
        let total_income =
            uncategorized_income + income_by_category.iter().map(|c| c.total).sum::<Money>();
        let total_expenses =
            uncategorized_expense + expense_by_category.iter().map(|c| c.total).sum::<Money>();

        Self {
            year,
            income_by_category,
            expense_by_category,
            uncategorized_income,
            uncategorized_expense,
            uncategorized_income_by_month,
            uncategorized_expense_by_month,
            total_income,
            total_expenses,
            savings_total,
            unmatched_transactions,
        }
    }

    /// Yearly income for a category value (zero if unknown)
    pub fn income_for(&self, value: &str) -> Money {
        self.income_by_category
            .iter()
            .find(|c| c.value == value)
            .map(|c| c.total)
            .unwrap_or_default()
    }

    /// Yearly expense for a category value (zero if unknown)
    pub fn expense_for(&self, value: &str) -> Money {
        self.expense_by_category
            .iter()
            .find(|c| c.value == value)
            .map(|c| c.total)
            .unwrap_or_default()
    }

    /// Per-month income, expense and net across all categories
    pub fn month_totals(&self) -> Vec<MonthTotals> {
        (0..MONTHS)
            .map(|m| {
                let income = self.uncategorized_income_by_month[m]
                    + self.income_by_category.iter().map(|c| c.monthly[m]).sum::<Money>();
                let expense = self.uncategorized_expense_by_month[m]
                    + self.expense_by_category.iter().map(|c| c.monthly[m]).sum::<Money>();
                MonthTotals {
                    month: m as u32 + 1,
                    income,
                    expense,
                    net: income - expense,
                }
            })
            .collect()
    }

    /// Income minus expenses
    pub fn net_savings(&self) -> Money {
        self.total_income - self.total_expenses
    }

    /// Net savings as a percentage of income (0 when there is no income)
    pub fn net_savings_rate(&self) -> f64 {
        ratio(self.net_savings().as_f64(), self.total_income.as_f64()) * 100.0
    }
}

/// Years that have any transaction, plus the current year, newest first
pub fn available_years(transactions: &[Transaction], current_year: i32) -> Vec<i32> {
    let mut years: BTreeSet<i32> = transactions.iter().map(Transaction::year).collect();
    years.insert(current_year);
    years.into_iter().rev().collect()
}
