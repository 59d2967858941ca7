//! Yearly savings goal repository
//!
//! One goal per calendar year, stored in goals.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::PlannerError;
use crate::models::YearlySavingsGoal;

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct GoalData {
    #[serde(default)]
    goals: Vec<YearlySavingsGoal>,
}

/// Repository for savings goal persistence
pub struct GoalRepository {
    path: PathBuf,
    goals: RwLock<HashMap<i32, YearlySavingsGoal>>,
}

impl GoalRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            goals: RwLock::new(HashMap::new()),
        }
    }

    /// Load goals from disk
    pub fn load(&self) -> Result<(), PlannerError> {
        let file_data: GoalData = read_json(&self.path)?;

        let mut goals = self
            .goals
            .write()
            .map_err(|e| PlannerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        goals.clear();
        for goal in file_data.goals {
            goals.insert(goal.year, goal);
        }

        Ok(())
    }

    /// Save goals to disk, oldest year first
    pub fn save(&self) -> Result<(), PlannerError> {
        let goals = self
            .goals
            .read()
            .map_err(|e| PlannerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = goals.values().cloned().collect();
        list.sort_by_key(|g| g.year);

        write_json_atomic(&self.path, &GoalData { goals: list })
    }

    /// Get the stored goal for a year
    pub fn get(&self, year: i32) -> Result<Option<YearlySavingsGoal>, PlannerError> {
        let goals = self
            .goals
            .read()
            .map_err(|e| PlannerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(goals.get(&year).cloned())
    }

    /// Get all stored goals, oldest year first
    pub fn get_all(&self) -> Result<Vec<YearlySavingsGoal>, PlannerError> {
        let goals = self
            .goals
            .read()
            .map_err(|e| PlannerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = goals.values().cloned().collect();
        list.sort_by_key(|g| g.year);
        Ok(list)
    }

    /// Insert or update the goal for its year
    pub fn upsert(&self, goal: YearlySavingsGoal) -> Result<(), PlannerError> {
        let mut goals = self
            .goals
            .write()
            .map_err(|e| PlannerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        goals.insert(goal.year, goal);
        Ok(())
    }

    /// Remove the goal for a year, returning it
    pub fn remove(&self, year: i32) -> Result<Option<YearlySavingsGoal>, PlannerError> {
        let mut goals = self
            .goals
            .write()
            .map_err(|e| PlannerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(goals.remove(&year))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_upsert_replaces_same_year() {
        let temp_dir = TempDir::new().unwrap();
        let repo = GoalRepository::new(temp_dir.path().join("goals.json"));

        repo.upsert(YearlySavingsGoal::new(2024, 20.0)).unwrap();
        repo.upsert(YearlySavingsGoal::new(2024, 35.0)).unwrap();
        repo.upsert(YearlySavingsGoal::new(2023, 10.0)).unwrap();

        assert_eq!(repo.get(2024).unwrap().unwrap().savings_percentage, 35.0);
        let years: Vec<i32> = repo.get_all().unwrap().iter().map(|g| g.year).collect();
        assert_eq!(years, vec![2023, 2024]);
        assert!(repo.get(2025).unwrap().is_none());

        assert!(repo.remove(2023).unwrap().is_some());
        assert!(repo.remove(2023).unwrap().is_none());
        assert_eq!(repo.get_all().unwrap().len(), 1);
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("goals.json");
        let repo = GoalRepository::new(path.clone());
        repo.upsert(YearlySavingsGoal::new(2024, 25.0)).unwrap();
        repo.save().unwrap();

        let repo2 = GoalRepository::new(path);
        repo2.load().unwrap();
        assert_eq!(repo2.get(2024).unwrap(), repo.get(2024).unwrap());
    }
}
