//! Storage initialization
//!
//! First-run setup: directories plus the default category list

use crate::config::paths::PlannerPaths;
use crate::error::PlannerError;
use crate::models::Category;

use super::categories::CategoryData;
use super::file_io::write_json_atomic;

/// Initialize storage for a fresh installation
///
/// Seeds the default categories unless categories.json already exists.
pub fn initialize_storage(paths: &PlannerPaths) -> Result<(), PlannerError> {
    paths.ensure_directories()?;

    if needs_initialization(paths) {
        let data = CategoryData {
            categories: Category::defaults(),
        };
        write_json_atomic(paths.categories_file(), &data)?;
        tracing::info!(count = data.categories.len(), "seeded default categories");
    }

    Ok(())
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &PlannerPaths) -> bool {
    !paths.categories_file().exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_storage_seeds_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PlannerPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(needs_initialization(&paths));
        initialize_storage(&paths).unwrap();
        assert!(!needs_initialization(&paths));

        let content = std::fs::read_to_string(paths.categories_file()).unwrap();
        let data: CategoryData = serde_json::from_str(&content).unwrap();
        let values: Vec<_> = data.categories.iter().map(|c| c.value.as_str()).collect();
        assert!(values.contains(&"food"));
        assert!(values.contains(&"salary"));
    }

    #[test]
    fn test_doesnt_overwrite_existing() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PlannerPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths).unwrap();

        let custom = CategoryData {
            categories: vec![Category::new("Custom")],
        };
        write_json_atomic(paths.categories_file(), &custom).unwrap();

        initialize_storage(&paths).unwrap();

        let content = std::fs::read_to_string(paths.categories_file()).unwrap();
        let data: CategoryData = serde_json::from_str(&content).unwrap();
        assert_eq!(data.categories.len(), 1);
        assert_eq!(data.categories[0].value, "custom");
    }
}
