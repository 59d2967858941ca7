//! Transaction repository for JSON storage
//!
//! Manages loading and saving transactions to transactions.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::PlannerError;
use crate::models::{AccountId, Transaction, TransactionId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable transaction data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    transactions: Vec<Transaction>,
}

/// Repository for transaction persistence with a category index
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<HashMap<TransactionId, Transaction>>,
    /// Index: category value -> transaction ids
    by_category: RwLock<HashMap<String, Vec<TransactionId>>>,
}

impl TransactionRepository {
    /// Create a new transaction repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_category: RwLock::new(HashMap::new()),
        }
    }

    /// Load transactions from disk and build the index
    pub fn load(&self) -> Result<(), PlannerError> {
        let file_data: TransactionData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            PlannerError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let mut by_category = self.by_category.write().map_err(|e| {
            PlannerError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        by_category.clear();

        for txn in file_data.transactions {
            if let Some(value) = txn.category_value() {
                by_category.entry(value.to_string()).or_default().push(txn.id);
            }
            data.insert(txn.id, txn);
        }

        Ok(())
    }

    /// Save transactions to disk, newest first
    pub fn save(&self) -> Result<(), PlannerError> {
        let data = self.data.read().map_err(|e| {
            PlannerError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));

        write_json_atomic(&self.path, &TransactionData { transactions })
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, PlannerError> {
        let data = self.data.read().map_err(|e| {
            PlannerError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    /// Get all transactions, newest first
    pub fn get_all(&self) -> Result<Vec<Transaction>, PlannerError> {
        let data = self.data.read().map_err(|e| {
            PlannerError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(transactions)
    }

    /// Get transactions dated in a calendar year
    pub fn get_by_year(&self, year: i32) -> Result<Vec<Transaction>, PlannerError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|t| t.year() == year)
            .collect())
    }

    /// Get transactions filed under a category value
    pub fn get_by_category(&self, value: &str) -> Result<Vec<Transaction>, PlannerError> {
        let data = self.data.read().map_err(|e| {
            PlannerError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        let by_category = self.by_category.read().map_err(|e| {
            PlannerError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let ids = by_category.get(value).map(|v| v.as_slice()).unwrap_or(&[]);
        let mut transactions: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(transactions)
    }

    /// Get transactions recorded against an account, newest first
    pub fn get_by_account(&self, account_id: AccountId) -> Result<Vec<Transaction>, PlannerError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|t| t.account_id == Some(account_id))
            .collect())
    }

    /// Find a transaction whose id starts with `prefix` (full or short form)
    pub fn find_by_prefix(&self, prefix: &str) -> Result<Vec<Transaction>, PlannerError> {
        let data = self.data.read().map_err(|e| {
            PlannerError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data
            .values()
            .filter(|t| t.id.matches_prefix(prefix))
            .cloned()
            .collect())
    }

    /// Insert or update a transaction
    pub fn upsert(&self, txn: Transaction) -> Result<(), PlannerError> {
        let mut data = self.data.write().map_err(|e| {
            PlannerError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let mut by_category = self.by_category.write().map_err(|e| {
            PlannerError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        if let Some(old) = data.get(&txn.id) {
            if let Some(ids) = old.category_value().and_then(|v| by_category.get_mut(v)) {
                ids.retain(|&id| id != txn.id);
            }
        }

        if let Some(value) = txn.category_value() {
            by_category.entry(value.to_string()).or_default().push(txn.id);
        }

        data.insert(txn.id, txn);
        Ok(())
    }

    /// Delete a transaction
    pub fn delete(&self, id: TransactionId) -> Result<bool, PlannerError> {
        let mut data = self.data.write().map_err(|e| {
            PlannerError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let mut by_category = self.by_category.write().map_err(|e| {
            PlannerError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        match data.remove(&id) {
            Some(txn) => {
                if let Some(ids) = txn.category_value().and_then(|v| by_category.get_mut(v)) {
                    ids.retain(|&tid| tid != id);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Find transaction by import ID
    pub fn find_by_import_id(&self, import_id: &str) -> Result<Option<Transaction>, PlannerError> {
        let data = self.data.read().map_err(|e| {
            PlannerError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data
            .values()
            .find(|t| t.import_id.as_deref() == Some(import_id))
            .cloned())
    }

    /// Count transactions
    pub fn count(&self) -> Result<usize, PlannerError> {
        let data = self.data.read().map_err(|e| {
            PlannerError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.len())
    }
}
