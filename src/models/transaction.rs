//! Transaction model
//!
//! The amount is signed, but the sign only encodes direction; reporting
//! always works with magnitudes. The `kind` decides which aggregate a
//! transaction feeds.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{AccountId, TransactionId};
use super::money::Money;

/// What a transaction represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
    Transfer,
    Savings,
}

impl TransactionType {
    pub fn all() -> &'static [TransactionType] {
        &[Self::Income, Self::Expense, Self::Transfer, Self::Savings]
    }

    /// Infer a type from the sign of an amount (imports without a type column)
    ///
    /// Zero moves no money in or out, so it is a transfer.
    pub fn from_sign(amount: Money) -> Self {
        if amount.is_negative() {
            Self::Expense
        } else if amount.is_positive() {
            Self::Income
        } else {
            Self::Transfer
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Transfer => "transfer",
            Self::Savings => "savings",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" | "expenses" => Ok(Self::Expense),
            "transfer" => Ok(Self::Transfer),
            "savings" | "saving" => Ok(Self::Savings),
            other => Err(format!(
                "Unknown transaction type '{}' (expected income, expense, transfer or savings)",
                other
            )),
        }
    }
}

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,

    #[serde(default)]
    pub description: String,

    /// Signed amount; positive for inflow, negative for outflow
    pub amount: Money,

    #[serde(rename = "type")]
    pub kind: TransactionType,

    /// Category value this transaction is filed under, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Account the money moved through, if recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<AccountId>,

    pub date: NaiveDate,

    /// Fingerprint set by CSV import for duplicate detection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_id: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new uncategorized transaction
    pub fn new(kind: TransactionType, amount: Money, date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            description: String::new(),
            amount,
            kind,
            category: None,
            account_id: None,
            date,
            import_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// File the transaction under a category value
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into()).filter(|c: &String| !c.trim().is_empty());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_account(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    /// The category value, treating blank strings as uncategorized
    pub fn category_value(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    /// Calendar year of the transaction date
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Zero-based month index (0 = January)
    pub fn month_index(&self) -> usize {
        self.date.month0() as usize
    }

    /// Magnitude used by every aggregate
    pub fn magnitude(&self) -> Money {
        self.amount.abs()
    }

    /// Re-file under a category (or clear it)
    pub fn set_category(&mut self, category: Option<String>) {
        self.category = category.filter(|c| !c.trim().is_empty());
        self.updated_at = Utc::now();
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.date, self.kind, self.amount, self.description
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_transaction() {
        let txn = Transaction::new(TransactionType::Expense, Money::from_cents(-5000), date(2024, 3, 9))
            .with_category("food")
            .with_description("Groceries");

        assert_eq!(txn.category_value(), Some("food"));
        assert_eq!(txn.year(), 2024);
        assert_eq!(txn.month_index(), 2);
        assert_eq!(txn.magnitude(), Money::from_cents(5000));
    }

    #[test]
    fn test_blank_category_is_uncategorized() {
        let txn = Transaction::new(TransactionType::Income, Money::from_units(10), date(2024, 1, 1))
            .with_category("   ");
        assert_eq!(txn.category_value(), None);
        assert!(txn.category.is_none());
    }

    #[test]
    fn test_type_parsing() {
        assert_eq!("Income".parse::<TransactionType>().unwrap(), TransactionType::Income);
        assert_eq!("expenses".parse::<TransactionType>().unwrap(), TransactionType::Expense);
        assert_eq!("saving".parse::<TransactionType>().unwrap(), TransactionType::Savings);
        assert!("refund".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_type_from_sign() {
        assert_eq!(TransactionType::from_sign(Money::from_cents(-1)), TransactionType::Expense);
        assert_eq!(TransactionType::from_sign(Money::from_cents(1)), TransactionType::Income);
        assert_eq!(TransactionType::from_sign(Money::zero()), TransactionType::Transfer);
    }

    #[test]
    fn test_serialization_uses_type_key() {
        let txn = Transaction::new(TransactionType::Savings, Money::from_units(100), date(2024, 6, 1));
        let json = serde_json::to_value(&txn).unwrap();
        assert_eq!(json["type"], "savings");
        assert!(json.get("category").is_none());

        let back: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(back, txn);
    }
}
