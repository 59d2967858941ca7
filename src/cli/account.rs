//! Account CLI commands

use clap::Subcommand;

use crate::display::account::{format_account_details, format_account_list};
use crate::error::{PlannerError, PlannerResult};
use crate::models::{AccountType, Money};
use crate::services::{AccountService, UpdateAccountInput};
use crate::storage::Storage;

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// Create a new account
    Add {
        /// Account name
        name: String,
        /// checking, savings, credit, investment, cash or other
        #[arg(short = 't', long = "type", default_value = "checking")]
        account_type: AccountType,
        /// Current balance (e.g. "1000.00"); credit balances are stored as debt
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        balance: String,
        /// Three-letter currency code
        #[arg(long)]
        currency: Option<String>,
    },

    /// List all accounts
    List,

    /// Show account details
    Show {
        /// Account name or id
        account: String,
    },

    /// Change an account's name, type, balance or currency
    Edit {
        /// Account name or id
        account: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New type
        #[arg(short = 't', long = "type")]
        account_type: Option<AccountType>,
        /// New balance
        #[arg(short, long, allow_hyphen_values = true)]
        balance: Option<String>,
        /// New currency code
        #[arg(long)]
        currency: Option<String>,
    },

    /// Delete an account; its transactions are kept without an account
    Delete {
        /// Account name or id
        account: String,
    },
}

/// Handle an account command
pub fn handle_account_command(storage: &Storage, cmd: AccountCommands) -> PlannerResult<()> {
    let service = AccountService::new(storage);

    match cmd {
        AccountCommands::Add {
            name,
            account_type,
            balance,
            currency,
        } => {
            let balance = parse_balance(account_type, &balance)?;
            let account = service.create(&name, account_type, balance, currency.as_deref())?;

            println!("Created account: {}", account.name);
            println!("  ID:      {}", account.id);
            println!("  Type:    {}", account.account_type);
            println!(
                "  Balance: {} {}",
                account.balance.format_with_symbol(""),
                account.currency
            );
        }

        AccountCommands::List => {
            let accounts = service.list()?;
            print!("{}", format_account_list(&accounts));
        }

        AccountCommands::Show { account } => {
            let account = service.require(&account)?;
            let count = service.transaction_count(account.id)?;
            print!("{}", format_account_details(&account, count));
        }

        AccountCommands::Edit {
            account,
            name,
            account_type,
            balance,
            currency,
        } => {
            if name.is_none() && account_type.is_none() && balance.is_none() && currency.is_none() {
                println!("No changes specified. Use --name, --type, --balance or --currency.");
                return Ok(());
            }

            let current = service.require(&account)?;
            let balance = match balance {
                Some(b) => Some(parse_balance(
                    account_type.unwrap_or(current.account_type),
                    &b,
                )?),
                None => None,
            };

            let updated = service.update(
                &account,
                UpdateAccountInput {
                    name,
                    account_type,
                    balance,
                    currency,
                },
            )?;
            println!("Updated account: {}", updated);
        }

        AccountCommands::Delete { account } => {
            let deleted = service.delete(&account)?;
            println!("Deleted account: {}", deleted.account.name);
            if deleted.detached_transactions > 0 {
                println!(
                    "{} transaction(s) no longer have an account.",
                    deleted.detached_transactions
                );
            }
        }
    }

    Ok(())
}

/// Parse a balance; liabilities store a positive entry as debt
fn parse_balance(account_type: AccountType, balance: &str) -> PlannerResult<Money> {
    let balance = Money::parse(balance).map_err(|e| {
        PlannerError::Validation(format!(
            "Invalid balance '{}': {}. Use a format like '1000.00' or '1000'",
            balance, e
        ))
    })?;

    Ok(if account_type.is_liability() && balance.is_positive() {
        -balance
    } else {
        balance
    })
}
