//! Category service
//!
//! CRUD for categories plus role lookup through the classifier.
//! Deleting a category does not touch the transactions filed under it; those
//! references dangle and drop out of every aggregate.

use crate::error::{PlannerError, PlannerResult};
use crate::models::category::slugify;
use crate::models::Category;
use crate::planning::{CategoryClassification, CategoryRole};
use crate::storage::Storage;

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

/// Outcome of deleting a category
#[derive(Debug, Clone)]
pub struct DeletedCategory {
    pub category: Category,
    /// Transactions still referencing the deleted value
    pub orphaned_transactions: usize,
}

impl<'a> CategoryService<'a> {
    /// Create a new category service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a category; the value is derived from the label when not given
    pub fn create(
        &self,
        label: &str,
        value: Option<&str>,
        icon: Option<&str>,
    ) -> PlannerResult<Category> {
        let label = label.trim();
        let value = match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => v.to_string(),
            None => slugify(label),
        };

        let mut category = Category::with_value(label, value);
        if let Some(icon) = icon {
            category = category.with_icon(icon);
        }

        category
            .validate()
            .map_err(|e| PlannerError::Validation(e.to_string()))?;

        if self.storage.categories.get(&category.value)?.is_some() {
            return Err(PlannerError::Duplicate {
                entity_type: "Category",
                identifier: category.value.clone(),
            });
        }

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        tracing::debug!(value = %category.value, label = %category.label, "created category");
        Ok(category)
    }

    /// Get a category by value
    pub fn get(&self, value: &str) -> PlannerResult<Option<Category>> {
        self.storage.categories.get(value)
    }

    /// Find a category by value or label
    pub fn find(&self, identifier: &str) -> PlannerResult<Option<Category>> {
        if let Some(category) = self.storage.categories.get(identifier.trim())? {
            return Ok(Some(category));
        }
        self.storage.categories.get_by_label(identifier)
    }

    /// Find a category or fail with NotFound
    pub fn require(&self, identifier: &str) -> PlannerResult<Category> {
        self.find(identifier)?
            .ok_or_else(|| PlannerError::category_not_found(identifier))
    }

    /// List all categories in insertion order
    pub fn list(&self) -> PlannerResult<Vec<Category>> {
        self.storage.categories.get_all()
    }

    /// Classify the current category list
    pub fn classify(&self) -> PlannerResult<CategoryClassification> {
        Ok(CategoryClassification::classify(&self.list()?))
    }

    /// Role of a single category
    pub fn role_of(&self, identifier: &str) -> PlannerResult<CategoryRole> {
        let category = self.require(identifier)?;
        Ok(crate::planning::classify_category(&category))
    }

    /// Change a category's label and/or icon
    ///
    /// The value is the key transactions reference, so it never changes here.
    pub fn edit(
        &self,
        identifier: &str,
        label: Option<&str>,
        icon: Option<&str>,
    ) -> PlannerResult<Category> {
        let mut category = self.require(identifier)?;

        if let Some(label) = label {
            let label = label.trim();
            if let Some(existing) = self.storage.categories.get_by_label(label)? {
                if existing.value != category.value {
                    return Err(PlannerError::Duplicate {
                        entity_type: "Category",
                        identifier: label.to_string(),
                    });
                }
            }
            category.label = label.to_string();
        }

        if let Some(icon) = icon {
            category.icon = icon.to_string();
        }

        category.updated_at = chrono::Utc::now();
        category
            .validate()
            .map_err(|e| PlannerError::Validation(e.to_string()))?;

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        tracing::debug!(value = %category.value, "updated category");
        Ok(category)
    }

    /// Delete a category, leaving its transactions untouched
    pub fn delete(&self, identifier: &str) -> PlannerResult<DeletedCategory> {
        let category = self.require(identifier)?;
        let orphaned_transactions = self
            .storage
            .transactions
            .get_by_category(&category.value)?
            .len();

        self.storage.categories.delete(&category.value)?;
        self.storage.categories.save()?;

        tracing::debug!(
            value = %category.value,
            orphaned = orphaned_transactions,
            "deleted category"
        );
        Ok(DeletedCategory {
            category,
            orphaned_transactions,
        })
    }

    /// Seed the default categories that are not present yet
    pub fn ensure_defaults(&self) -> PlannerResult<usize> {
        let mut added = 0;
        for category in Category::defaults() {
            if self.storage.categories.get(&category.value)?.is_none() {
                self.storage.categories.upsert(category)?;
                added += 1;
            }
        }
        if added > 0 {
            self.storage.categories.save()?;
        }
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::PlannerPaths;
    use crate::models::{Money, Transaction, TransactionType};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = PlannerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_create_derives_value() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        let category = service.create("Dining Out", None, None).unwrap();
        assert_eq!(category.value, "dining-out");
        assert_eq!(category.icon, "Circle");

        let explicit = service.create("Gifts", Some("gift-received"), Some("Gift")).unwrap();
        assert_eq!(explicit.value, "gift-received");
        assert_eq!(explicit.icon, "Gift");
    }

    #[test]
    fn test_create_rejects_duplicates_and_invalid() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        service.create("Food", None, None).unwrap();
        assert!(matches!(
            service.create("food", None, None),
            Err(PlannerError::Duplicate { .. })
        ));
        assert!(service.create("   ", None, None).unwrap_err().is_validation());
        assert!(service.create(&"x".repeat(51), None, None).unwrap_err().is_validation());
    }

    #[test]
    fn test_find_by_value_or_label() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        service.create("Dining Out", None, None).unwrap();

        assert!(service.find("dining-out").unwrap().is_some());
        assert!(service.find("DINING OUT").unwrap().is_some());
        assert!(service.require("nope").unwrap_err().is_not_found());
    }

    #[test]
    fn test_edit_keeps_value() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        service.create("Food", None, None).unwrap();

        let edited = service.edit("food", Some("Groceries"), Some("Cart")).unwrap();
        assert_eq!(edited.value, "food");
        assert_eq!(edited.label, "Groceries");
        assert_eq!(edited.icon, "Cart");
    }

    #[test]
    fn test_delete_leaves_transactions_dangling() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        service.create("Food", None, None).unwrap();

        let txn = Transaction::new(
            TransactionType::Expense,
            Money::from_units(-40),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        )
        .with_category("food");
        storage.transactions.upsert(txn).unwrap();

        let deleted = service.delete("food").unwrap();
        assert_eq!(deleted.orphaned_transactions, 1);
        assert!(service.get("food").unwrap().is_none());
        assert_eq!(storage.transactions.get_by_category("food").unwrap().len(), 1);
    }

    #[test]
    fn test_roles_and_defaults() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        assert_eq!(service.ensure_defaults().unwrap(), Category::defaults().len());
        assert_eq!(service.ensure_defaults().unwrap(), 0);

        assert_eq!(service.role_of("salary").unwrap(), CategoryRole::Income);
        assert_eq!(service.role_of("food").unwrap(), CategoryRole::Expense);

        let classification = service.classify().unwrap();
        assert_eq!(classification.len(), Category::defaults().len());
    }
}
