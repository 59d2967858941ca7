//! Transaction CLI commands
//!
//! Adding, editing, listing, categorizing and importing transactions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::transaction::{
    format_import_preview, format_import_result, format_transaction_details,
    format_transaction_register,
};
use crate::error::{PlannerError, PlannerResult};
use crate::models::{Account, Money, Transaction, TransactionType};
use crate::services::{
    AccountService, CreateTransactionInput, ImportService, ImportStatus, TransactionFilter,
    TransactionService, UpdateTransactionInput,
};
use crate::storage::Storage;

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a transaction
    Add {
        /// income, expense, savings or transfer
        kind: TransactionType,
        /// Amount (e.g. "42.50"); expenses are stored as outflows
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Category value or label
        #[arg(short, long)]
        category: Option<String>,
        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Free-text description
        #[arg(long)]
        description: Option<String>,
        /// Account name or id
        #[arg(short, long)]
        account: Option<String>,
    },

    /// Change fields of a transaction
    Edit {
        /// Transaction id (full or txn-xxxxxxxx)
        id: String,
        /// New amount; a positive amount on an expense is stored as an outflow
        #[arg(long, allow_hyphen_values = true)]
        amount: Option<String>,
        /// New type
        #[arg(short = 't', long = "type")]
        kind: Option<TransactionType>,
        /// New date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New category value or label
        #[arg(short, long, conflicts_with = "clear_category")]
        category: Option<String>,
        /// Remove the category
        #[arg(long)]
        clear_category: bool,
        /// New account name or id
        #[arg(short, long, conflicts_with = "clear_account")]
        account: Option<String>,
        /// Remove the account
        #[arg(long)]
        clear_account: bool,
    },

    /// List transactions, newest first
    List {
        /// Only this year
        #[arg(short, long)]
        year: Option<i32>,
        /// Only this type
        #[arg(short, long)]
        kind: Option<TransactionType>,
        /// Only this category value
        #[arg(short, long)]
        category: Option<String>,
        /// Only transactions without a category
        #[arg(long)]
        uncategorized: bool,
        /// Number of transactions to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
    },

    /// Show transaction details
    Show {
        /// Transaction id (full or txn-xxxxxxxx)
        id: String,
    },

    /// File one or more transactions under a category
    Categorize {
        /// Transaction ids (full or txn-xxxxxxxx)
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
        /// Category value or label
        #[arg(short, long)]
        category: Option<String>,
        /// Remove the category instead
        #[arg(long, conflicts_with = "category")]
        clear: bool,
    },

    /// Delete a transaction
    Delete {
        /// Transaction id (full or txn-xxxxxxxx)
        id: String,
    },

    /// Import transactions from a CSV file
    Import {
        /// Path to CSV file
        file: PathBuf,
        /// Category for rows without a known one
        #[arg(long)]
        default_category: Option<String>,
        /// Account name or id stamped on every imported row
        #[arg(short, long)]
        account: Option<String>,
        /// Show what would be imported without writing anything
        #[arg(long)]
        dry_run: bool,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    cmd: TransactionCommands,
) -> PlannerResult<()> {
    let service = TransactionService::new(storage);
    let currency = settings.currency_symbol.as_str();

    match cmd {
        TransactionCommands::Add {
            kind,
            amount,
            category,
            date,
            description,
            account,
        } => {
            let amount = signed_amount(kind, &amount)?;
            let date = match date {
                Some(d) => parse_cli_date(&d)?,
                None => crate::services::transaction::today(),
            };

            let txn = service.create(CreateTransactionInput {
                kind,
                amount,
                date,
                description,
                category,
                account,
            })?;

            println!("Recorded {} of {} on {}", txn.kind, txn.amount.abs().format_with_symbol(currency), txn.date);
            println!("  ID: {}", txn.id);
        }

        TransactionCommands::Edit {
            id,
            amount,
            kind,
            date,
            description,
            category,
            clear_category,
            account,
            clear_account,
        } => {
            let current = service.require(&id)?;
            let effective_kind = kind.unwrap_or(current.kind);
            let amount = match amount {
                Some(a) => Some(signed_amount(effective_kind, &a)?),
                None => None,
            };
            let date = match date {
                Some(d) => Some(parse_cli_date(&d)?),
                None => None,
            };

            let txn = service.update(
                &id,
                UpdateTransactionInput {
                    kind,
                    amount,
                    date,
                    description,
                    category: clear_or_set(category, clear_category),
                    account: clear_or_set(account, clear_account),
                },
            )?;

            println!("Updated transaction {}", txn.id);
            print!("{}", format_transaction_details(&txn, account_of(storage, &txn)?.as_ref(), currency));
        }

        TransactionCommands::List {
            year,
            kind,
            category,
            uncategorized,
            limit,
        } => {
            let mut filter = TransactionFilter::new().limit(limit);
            if let Some(year) = year {
                filter = filter.year(year);
            }
            if let Some(kind) = kind {
                filter = filter.kind(kind);
            }
            if let Some(category) = category {
                filter = filter.category(category);
            }
            if uncategorized {
                filter = filter.uncategorized();
            }

            let transactions = service.list(filter)?;
            print!("{}", format_transaction_register(&transactions, currency));
        }

        TransactionCommands::Show { id } => {
            let txn = service.require(&id)?;
            print!("{}", format_transaction_details(&txn, account_of(storage, &txn)?.as_ref(), currency));
        }

        TransactionCommands::Categorize {
            ids,
            category,
            clear,
        } => {
            if category.is_none() && !clear {
                return Err(PlannerError::Validation(
                    "Give a category or --clear".into(),
                ));
            }

            let updated = service.categorize_many(&ids, category.as_deref())?;
            for txn in &updated {
                match txn.category_value() {
                    Some(value) => println!("Filed {} under '{}'", txn.id, value),
                    None => println!("Cleared category on {}", txn.id),
                }
            }
        }

        TransactionCommands::Delete { id } => {
            let txn = service.delete(&id)?;
            println!("Deleted transaction {}", txn.id);
        }

        TransactionCommands::Import {
            file,
            default_category,
            account,
            dry_run,
        } => {
            if !file.exists() {
                return Err(PlannerError::Import(format!(
                    "File not found: {}",
                    file.display()
                )));
            }

            if let Some(account) = &account {
                AccountService::new(storage).require(account)?;
            }

            let import_service = ImportService::new(storage);
            let (_, parsed) = import_service.parse_file(&file, None)?;
            if parsed.is_empty() {
                println!("No transactions found in CSV file.");
                return Ok(());
            }

            let preview = import_service.generate_preview(&parsed)?;
            let new_count = preview
                .iter()
                .filter(|e| e.status == ImportStatus::New)
                .count();

            if dry_run {
                print!("{}", format_import_preview(&preview, currency));
                println!();
                println!("{} new row(s). Dry run, nothing written.", new_count);
                return Ok(());
            }

            let result = import_service.import_from_preview(
                &preview,
                default_category.as_deref(),
                account.as_deref(),
            )?;
            print!("{}", format_import_result(&result));
        }
    }

    Ok(())
}

/// Parse a CLI amount; a positive expense is stored as an outflow
fn signed_amount(kind: TransactionType, amount: &str) -> PlannerResult<Money> {
    let amount = Money::parse(amount)
        .map_err(|e| PlannerError::Validation(format!("Invalid amount: {}", e)))?;
    Ok(if kind == TransactionType::Expense && amount.is_positive() {
        -amount
    } else {
        amount
    })
}

fn clear_or_set(value: Option<String>, clear: bool) -> Option<Option<String>> {
    if clear {
        Some(None)
    } else {
        value.map(Some)
    }
}

fn account_of(storage: &Storage, txn: &Transaction) -> PlannerResult<Option<Account>> {
    match txn.account_id {
        Some(id) => storage.accounts.get(id),
        None => Ok(None),
    }
}

fn parse_cli_date(s: &str) -> PlannerResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| PlannerError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", s)))
}
