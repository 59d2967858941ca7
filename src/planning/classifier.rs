//! Category classification
//!
//! Splits the user's categories into income, savings and expense roles by
//! looking only at each category's label and value. Savings takes precedence
//! over income when a category matches both tests, so the three sets never
//! overlap.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::models::Category;

const INCOME_VALUES: &[&str] = &[
    "salary",
    "investment",
    "gift-received",
    "gift_received",
    "interest-earned",
    "interest_earned",
    "refund",
    "refunds",
];

const INCOME_LABEL_PATTERNS: &[&str] = &["gift", "interest", "refund"];

const SAVINGS_VALUES: &[&str] = &["savings", "saving", "savings-account", "savings_account"];

const SAVINGS_PATTERN: &str = "saving";

/// Role a category plays in aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryRole {
    Income,
    Savings,
    Expense,
}

impl fmt::Display for CategoryRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Income => "income",
            Self::Savings => "savings",
            Self::Expense => "expense",
        };
        f.pad(s)
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Income test: explicit value, or a gift/interest/refund label
pub fn is_income_category(category: &Category) -> bool {
    INCOME_VALUES.contains(&category.value.as_str())
        || INCOME_LABEL_PATTERNS
            .iter()
            .any(|pattern| contains_ignore_case(&category.label, pattern))
}

/// Savings test: explicit value, or "saving" anywhere in label or value
pub fn is_savings_category(category: &Category) -> bool {
    SAVINGS_VALUES.contains(&category.value.as_str())
        || contains_ignore_case(&category.label, SAVINGS_PATTERN)
        || contains_ignore_case(&category.value, SAVINGS_PATTERN)
}

/// Role of a single category; savings wins over income
pub fn classify_category(category: &Category) -> CategoryRole {
    if is_savings_category(category) {
        CategoryRole::Savings
    } else if is_income_category(category) {
        CategoryRole::Income
    } else {
        CategoryRole::Expense
    }
}

/// Disjoint partition of a category list into roles
///
/// Each list keeps the order the categories were given in. If two categories
/// share a value, the first one wins.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryClassification {
    pub income: Vec<Category>,
    pub savings: Vec<Category>,
    pub expense: Vec<Category>,
    #[serde(skip)]
    roles: HashMap<String, CategoryRole>,
}

impl CategoryClassification {
    /// Classify a list of categories
    pub fn classify(categories: &[Category]) -> Self {
        let mut classification = Self::default();

        for category in categories {
            if classification.roles.contains_key(&category.value) {
                continue;
            }

            let role = classify_category(category);
            classification.roles.insert(category.value.clone(), role);

            let bucket = match role {
                CategoryRole::Income => &mut classification.income,
                CategoryRole::Savings => &mut classification.savings,
                CategoryRole::Expense => &mut classification.expense,
            };
            bucket.push(category.clone());
        }

        classification
    }

    /// Role of a category value, or `None` if no such category exists
    pub fn role_of(&self, value: &str) -> Option<CategoryRole> {
        self.roles.get(value).copied()
    }

    pub fn is_savings(&self, value: &str) -> bool {
        self.role_of(value) == Some(CategoryRole::Savings)
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}
