//! Core data models
//!
//! Accounts, categories, transactions, yearly savings goals and budget plans, plus the
//! `Money` and id types they are built from.

pub mod account;
pub mod category;
pub mod goal;
pub mod ids;
pub mod money;
pub mod plan;
pub mod transaction;

pub use account::{Account, AccountType, AccountValidationError, DEFAULT_CURRENCY};
pub use category::{Category, CategoryValidationError};
pub use goal::{clamp_percentage, YearlySavingsGoal, DEFAULT_SAVINGS_PERCENTAGE};
pub use ids::{AccountId, TransactionId};
pub use money::{Money, MoneyParseError};
pub use plan::{BudgetPlan, CustomCut, SavingsAllocation};
pub use transaction::{Transaction, TransactionType};
