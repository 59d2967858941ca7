//! Display formatting for terminal output
//!
//! Turns accounts, categories, transactions and computed overviews into plain text
//! tables for the CLI.

pub mod account;
pub mod budget;
pub mod category;
pub mod report;
pub mod transaction;

pub use account::{format_account_details, format_account_list};
pub use budget::{
    format_goal, format_monthly, format_plan, format_reduction_plan, format_year_overview,
    format_years,
};
pub use category::{format_category_details, format_category_list, format_classification};
pub use report::{format_money_colored, format_percentage, money};
pub use transaction::{
    format_import_preview, format_import_result, format_transaction_details,
    format_transaction_register,
};
