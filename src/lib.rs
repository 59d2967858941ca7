//! Savings planner - yearly savings targets and expense reduction
//!
//! This library records categorized income, expense and savings
//! transactions, measures a year's savings against a target percentage of
//! income, and proposes per-category expense cuts to close the gap.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (categories, transactions, goals, plans)
//! - `planning`: The allocation engine (classification, aggregation, reduction)
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer
//! - `editor`: Debounced plan editing sessions
//! - `display` and `cli`: Terminal output and command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use savings_planner::config::paths::PlannerPaths;
//! use savings_planner::services::OverviewService;
//! use savings_planner::storage::Storage;
//!
//! let storage = Storage::new(PlannerPaths::new()?)?;
//! storage.load_all()?;
//! let overview = OverviewService::new(&storage).year_overview(2024, None)?;
//! println!("behind target: {}", overview.gap.is_behind_target);
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod editor;
pub mod error;
pub mod models;
pub mod planning;
pub mod services;
pub mod storage;

pub use error::{PlannerError, PlannerResult};
