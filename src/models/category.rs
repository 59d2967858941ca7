//! Category model
//!
//! A category is user-defined and identified by its `value` (a slug such as
//! `groceries`). Transactions reference categories by that value, so a
//! deleted category leaves dangling references behind rather than cascading.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Icon shown when a category has none
pub const DEFAULT_ICON: &str = "Circle";

const MAX_LABEL_LEN: usize = 50;

/// A user-defined transaction category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Display label (e.g. "Gifts Received")
    pub label: String,

    /// Unique key referenced by transactions (e.g. "gift-received")
    pub value: String,

    /// Icon reference, kept opaque
    #[serde(default = "default_icon")]
    pub icon: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

impl Category {
    /// Create a category whose value is derived from the label
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        let value = slugify(&label);
        Self::with_value(label, value)
    }

    /// Create a category with an explicit value
    pub fn with_value(label: impl Into<String>, value: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            label: label.into(),
            value: value.into(),
            icon: default_icon(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the icon reference
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        let label = self.label.trim();
        if label.is_empty() {
            return Err(CategoryValidationError::EmptyLabel);
        }

        if label.chars().count() > MAX_LABEL_LEN {
            return Err(CategoryValidationError::LabelTooLong(label.chars().count()));
        }

        if self.value.trim().is_empty() {
            return Err(CategoryValidationError::EmptyValue);
        }

        Ok(())
    }

    /// Categories seeded on first run
    pub fn defaults() -> Vec<Category> {
        [
            ("Food", "food", "Utensils"),
            ("Transportation", "transportation", "Car"),
            ("Shopping", "shopping", "ShoppingBag"),
            ("Bills", "bills", "Receipt"),
            ("Entertainment", "entertainment", "Film"),
            ("Healthcare", "healthcare", "Heart"),
            ("Education", "education", "GraduationCap"),
            ("Salary", "salary", "DollarSign"),
            ("Investment", "investment", "TrendingUp"),
            ("Other", "other", "Circle"),
        ]
        .into_iter()
        .map(|(label, value, icon)| Category::with_value(label, value).with_icon(icon))
        .collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Derive a category value from a label
///
/// Lowercases and collapses every run of non-alphanumeric characters into a
/// single `-`: "Gifts & Presents" becomes "gifts-presents".
pub fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    let mut pending_dash = false;

    for c in label.trim().chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyLabel,
    LabelTooLong(usize),
    EmptyValue,
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLabel => write!(f, "Category label cannot be empty"),
            Self::LabelTooLong(len) => write!(
                f,
                "Category label too long ({} characters, max {})",
                len, MAX_LABEL_LEN
            ),
            Self::EmptyValue => write!(f, "Category value cannot be empty"),
        }
    }
}

impl std::error::Error for CategoryValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_derives_value() {
        let category = Category::new("Dining Out");
        assert_eq!(category.label, "Dining Out");
        assert_eq!(category.value, "dining-out");
        assert_eq!(category.icon, DEFAULT_ICON);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Gifts & Presents"), "gifts-presents");
        assert_eq!(slugify("  Savings Account  "), "savings-account");
        assert_eq!(slugify("--Rent--"), "rent");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_validation() {
        assert!(Category::new("Groceries").validate().is_ok());

        let empty = Category::with_value("  ", "x");
        assert_eq!(empty.validate(), Err(CategoryValidationError::EmptyLabel));

        let long = Category::new("x".repeat(51));
        assert_eq!(long.validate(), Err(CategoryValidationError::LabelTooLong(51)));

        let no_value = Category::new("!!!");
        assert_eq!(no_value.validate(), Err(CategoryValidationError::EmptyValue));
    }

    #[test]
    fn test_defaults_have_unique_values() {
        let defaults = Category::defaults();
        let mut values: Vec<_> = defaults.iter().map(|c| c.value.clone()).collect();
        values.sort();
        values.dedup();
        assert_eq!(values.len(), defaults.len());
        assert!(defaults.iter().any(|c| c.value == "salary"));
    }

    #[test]
    fn test_missing_icon_deserializes_to_default() {
        let json = r#"{"label":"Rent","value":"rent","created_at":"2024-01-01T00:00:00Z","updated_at":"2024-01-01T00:00:00Z"}"#;
        let category: Category = serde_json::from_str(json).unwrap();
        assert_eq!(category.icon, DEFAULT_ICON);
    }
}
