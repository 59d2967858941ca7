//! Service layer for the savings planner
//!
//! Business logic on top of the storage layer: validation, lookups by value
//! or label, and write-back of goals and plans.

pub mod account;
pub mod category;
pub mod goal;
pub mod import;
pub mod overview;
pub mod plan;
pub mod transaction;

pub use account::{AccountService, DeletedAccount, UpdateAccountInput};
pub use category::{CategoryService, DeletedCategory};
pub use goal::GoalService;
pub use import::{ColumnMapping, ImportPreviewEntry, ImportResult, ImportService, ImportStatus};
pub use overview::{current_year, OverviewService};
pub use plan::{PlanService, PlanUpdate};
pub use transaction::{
    CreateTransactionInput, TransactionFilter, TransactionService, UpdateTransactionInput,
};
