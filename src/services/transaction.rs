//! Transaction service
//!
//! CRUD for transactions. The engine only reads them; this is how they get
//! into the store in the first place.

use chrono::{NaiveDate, Utc};

use crate::error::{PlannerError, PlannerResult};
use crate::models::{AccountId, Money, Transaction, TransactionId, TransactionType};
use crate::storage::Storage;

use super::account::AccountService;

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub year: Option<i32>,
    pub kind: Option<TransactionType>,
    /// Category value; `Some("")` is not used, see `uncategorized`
    pub category: Option<String>,
    /// Only transactions without a category
    pub uncategorized: bool,
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn kind(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn category(mut self, value: impl Into<String>) -> Self {
        self.category = Some(value.into());
        self
    }

    pub fn uncategorized(mut self) -> Self {
        self.uncategorized = true;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Input for creating a new transaction
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub kind: TransactionType,
    pub amount: Money,
    pub date: NaiveDate,
    pub description: Option<String>,
    /// Category value or label; must name an existing category
    pub category: Option<String>,
    /// Account name or id; must name an existing account
    pub account: Option<String>,
}

/// Optional changes for `TransactionService::update`
///
/// `None` leaves a field alone. Category and account take `Some(None)` to
/// clear the reference.
#[derive(Debug, Clone, Default)]
pub struct UpdateTransactionInput {
    pub kind: Option<TransactionType>,
    pub amount: Option<Money>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub category: Option<Option<String>>,
    pub account: Option<Option<String>>,
}

impl<'a> TransactionService<'a> {
    /// Create a new transaction service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new transaction
    pub fn create(&self, input: CreateTransactionInput) -> PlannerResult<Transaction> {
        if input.amount.is_zero() {
            return Err(PlannerError::Validation(
                "Transaction amount cannot be zero".into(),
            ));
        }

        let mut txn = Transaction::new(input.kind, input.amount, input.date);

        if let Some(category) = input.category {
            txn.category = Some(self.resolve_category(&category)?);
        }
        if let Some(description) = input.description {
            txn.description = description.trim().to_string();
        }
        if let Some(account) = input.account {
            txn.account_id = Some(self.resolve_account(&account)?);
        }

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        tracing::debug!(id = %txn.id, kind = %txn.kind, amount = %txn.amount, "created transaction");
        Ok(txn)
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> PlannerResult<Option<Transaction>> {
        self.storage.transactions.get(id)
    }

    /// Find a transaction by full ID or the short `txn-xxxxxxxx` form
    pub fn find(&self, identifier: &str) -> PlannerResult<Option<Transaction>> {
        if let Ok(id) = identifier.parse::<TransactionId>() {
            return self.storage.transactions.get(id);
        }

        let mut matches = self.storage.transactions.find_by_prefix(identifier)?;
        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            n => Err(PlannerError::Validation(format!(
                "'{}' matches {} transactions; use more of the id",
                identifier, n
            ))),
        }
    }

    /// Find a transaction or fail with NotFound
    pub fn require(&self, identifier: &str) -> PlannerResult<Transaction> {
        self.find(identifier)?
            .ok_or_else(|| PlannerError::transaction_not_found(identifier))
    }

    /// List transactions, newest first
    pub fn list(&self, filter: TransactionFilter) -> PlannerResult<Vec<Transaction>> {
        let mut transactions = match (&filter.category, filter.year) {
            (Some(category), _) => self.storage.transactions.get_by_category(category)?,
            (None, Some(year)) => self.storage.transactions.get_by_year(year)?,
            (None, None) => self.storage.transactions.get_all()?,
        };

        if let Some(year) = filter.year {
            transactions.retain(|t| t.year() == year);
        }
        if let Some(kind) = filter.kind {
            transactions.retain(|t| t.kind == kind);
        }
        if filter.uncategorized {
            transactions.retain(|t| t.category_value().is_none());
        }
        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }

        Ok(transactions)
    }

    /// File a transaction under a category, or clear it with `None`
    pub fn categorize(&self, identifier: &str, category: Option<&str>) -> PlannerResult<Transaction> {
        let mut txn = self.require(identifier)?;

        let value = match category {
            Some(c) => Some(self.resolve_category(c)?),
            None => None,
        };
        txn.set_category(value);

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        tracing::debug!(id = %txn.id, category = ?txn.category, "categorized transaction");
        Ok(txn)
    }

    /// Apply the given changes and stamp `updated_at`
    pub fn update(&self, identifier: &str, input: UpdateTransactionInput) -> PlannerResult<Transaction> {
        let mut txn = self.require(identifier)?;

        if let Some(amount) = input.amount {
            if amount.is_zero() {
                return Err(PlannerError::Validation(
                    "Transaction amount cannot be zero".into(),
                ));
            }
            txn.amount = amount;
        }
        if let Some(kind) = input.kind {
            txn.kind = kind;
        }
        if let Some(date) = input.date {
            txn.date = date;
        }
        if let Some(description) = input.description {
            txn.description = description.trim().to_string();
        }
        if let Some(category) = input.category {
            txn.category = match category {
                Some(c) => Some(self.resolve_category(&c)?),
                None => None,
            };
        }
        if let Some(account) = input.account {
            txn.account_id = match account {
                Some(a) => Some(self.resolve_account(&a)?),
                None => None,
            };
        }
        txn.updated_at = Utc::now();

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        tracing::debug!(id = %txn.id, "updated transaction");
        Ok(txn)
    }

    /// File several transactions under one category in a single save
    ///
    /// Every identifier is resolved before anything changes, so an unknown
    /// id leaves the store untouched.
    pub fn categorize_many(
        &self,
        identifiers: &[String],
        category: Option<&str>,
    ) -> PlannerResult<Vec<Transaction>> {
        let value = match category {
            Some(c) => Some(self.resolve_category(c)?),
            None => None,
        };
        let transactions = identifiers
            .iter()
            .map(|id| self.require(id))
            .collect::<PlannerResult<Vec<_>>>()?;

        let mut updated = Vec::with_capacity(transactions.len());
        for mut txn in transactions {
            txn.set_category(value.clone());
            self.storage.transactions.upsert(txn.clone())?;
            updated.push(txn);
        }
        self.storage.transactions.save()?;

        tracing::debug!(count = updated.len(), category = ?value, "categorized transactions");
        Ok(updated)
    }

    /// Delete a transaction
    pub fn delete(&self, identifier: &str) -> PlannerResult<Transaction> {
        let txn = self.require(identifier)?;

        self.storage.transactions.delete(txn.id)?;
        self.storage.transactions.save()?;

        tracing::debug!(id = %txn.id, "deleted transaction");
        Ok(txn)
    }

    /// Count transactions
    pub fn count(&self) -> PlannerResult<usize> {
        self.storage.transactions.count()
    }

    fn resolve_category(&self, identifier: &str) -> PlannerResult<String> {
        if let Some(category) = self.storage.categories.get(identifier.trim())? {
            return Ok(category.value);
        }
        self.storage
            .categories
            .get_by_label(identifier)?
            .map(|c| c.value)
            .ok_or_else(|| PlannerError::category_not_found(identifier))
    }

    fn resolve_account(&self, identifier: &str) -> PlannerResult<AccountId> {
        AccountService::new(self.storage)
            .require(identifier)
            .map(|a| a.id)
    }
}

/// Today's date in UTC
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
