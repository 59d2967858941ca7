//! Category repository for JSON storage
//!
//! Manages loading and saving categories to categories.json. Categories are
//! kept in insertion order since classification output follows that order.

use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::PlannerError;
use crate::models::Category;

use super::file_io::{read_json, write_json_atomic};

/// Serializable category data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct CategoryData {
    pub categories: Vec<Category>,
}

/// Repository for category persistence, keyed by category value
pub struct CategoryRepository {
    path: PathBuf,
    categories: RwLock<Vec<Category>>,
}

impl CategoryRepository {
    /// Create a new category repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            categories: RwLock::new(Vec::new()),
        }
    }

    /// Load categories from disk
    pub fn load(&self) -> Result<(), PlannerError> {
        let file_data: CategoryData = read_json(&self.path)?;

        let mut categories = self
            .categories
            .write()
            .map_err(|e| PlannerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        categories.clear();
        for category in file_data.categories {
            // Later duplicates of a value are dropped
            if !categories.iter().any(|c| c.value == category.value) {
                categories.push(category);
            }
        }

        Ok(())
    }

    /// Save categories to disk
    pub fn save(&self) -> Result<(), PlannerError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| PlannerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let file_data = CategoryData {
            categories: categories.clone(),
        };

        write_json_atomic(&self.path, &file_data)
    }

    /// Get a category by value
    pub fn get(&self, value: &str) -> Result<Option<Category>, PlannerError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| PlannerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(categories.iter().find(|c| c.value == value).cloned())
    }

    /// Get all categories in insertion order
    pub fn get_all(&self) -> Result<Vec<Category>, PlannerError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| PlannerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(categories.clone())
    }

    /// Get a category by label (case-insensitive)
    pub fn get_by_label(&self, label: &str) -> Result<Option<Category>, PlannerError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| PlannerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let label_lower = label.trim().to_lowercase();
        Ok(categories
            .iter()
            .find(|c| c.label.to_lowercase() == label_lower)
            .cloned())
    }

    /// Insert or replace a category with the same value
    pub fn upsert(&self, category: Category) -> Result<(), PlannerError> {
        let mut categories = self
            .categories
            .write()
            .map_err(|e| PlannerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        match categories.iter_mut().find(|c| c.value == category.value) {
            Some(existing) => *existing = category,
            None => categories.push(category),
        }
        Ok(())
    }

    /// Delete a category by value
    pub fn delete(&self, value: &str) -> Result<bool, PlannerError> {
        let mut categories = self
            .categories
            .write()
            .map_err(|e| PlannerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let before = categories.len();
        categories.retain(|c| c.value != value);
        Ok(categories.len() != before)
    }

    /// Count categories
    pub fn count(&self) -> Result<usize, PlannerError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| PlannerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(categories.len())
    }
}
