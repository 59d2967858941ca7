//! Budget plan CLI commands
//!
//! Every change goes through a [`PlanSession`], the same path an interactive
//! editor uses, and is flushed before the command returns.

use std::sync::Arc;

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::budget::{format_plan, format_reduction_plan};
use crate::editor::{PlanEdit, PlanSession};
use crate::error::{PlannerError, PlannerResult};
use crate::models::Money;
use crate::services::{current_year, CategoryService, OverviewService, PlanService};
use crate::storage::Storage;

/// Plan subcommands
#[derive(Subcommand)]
pub enum PlanCommands {
    /// Show the stored plan and the reduction plan it produces
    Show {
        /// Year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Override the default cut for a category
    Cut {
        /// Category value or label
        category: String,
        /// Cut as a percentage of the category's spending (0-100)
        percentage: f64,
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Remove a custom cut, returning to the default
    Uncut {
        /// Category value or label
        category: String,
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Protect a category from any cut
    Lock {
        /// Category value or label
        category: String,
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Allow a locked category to be cut again
    Unlock {
        /// Category value or label
        category: String,
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Clear every custom cut
    Reset {
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Set or clear a per-category budget
    Budget {
        /// Category value or label
        category: String,
        /// Budget amount; omit to clear
        amount: Option<String>,
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Set the base monthly savings goal
    BaseGoal {
        /// Amount saved per month
        amount: String,
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// List years that have a stored plan
    Years,
}

/// Handle a plan command
pub fn handle_plan_command(
    storage: Arc<Storage>,
    settings: &Settings,
    cmd: PlanCommands,
) -> PlannerResult<()> {
    let currency = settings.currency_symbol.as_str();

    let (year, edit) = match cmd {
        PlanCommands::Show { year } => {
            let year = year.unwrap_or_else(current_year);
            let plan = PlanService::new(&storage).get_or_new(year)?;
            let overview = OverviewService::new(&storage)
                .with_default_percentage(settings.default_savings_percentage)
                .year_overview(year, None)?;

            print!("{}", format_plan(&plan, currency));
            println!();
            print!("{}", format_reduction_plan(&overview, currency));
            return Ok(());
        }
        PlanCommands::Years => {
            let years = PlanService::new(&storage).years()?;
            if years.is_empty() {
                println!("No budget plans stored.");
            }
            for year in years {
                println!("  {}", year);
            }
            return Ok(());
        }
        PlanCommands::Cut {
            category,
            percentage,
            year,
        } => {
            if percentage.is_nan() {
                return Err(PlannerError::Validation("Cut must be a number".into()));
            }
            let category = resolve(&storage, &category)?;
            (year, PlanEdit::SetCut { category, cut_pct: percentage })
        }
        PlanCommands::Uncut { category, year } => {
            let category = resolve(&storage, &category)?;
            (year, PlanEdit::ClearCut { category })
        }
        PlanCommands::Lock { category, year } => {
            let category = resolve(&storage, &category)?;
            (year, PlanEdit::Lock { category })
        }
        PlanCommands::Unlock { category, year } => {
            let category = resolve(&storage, &category)?;
            (year, PlanEdit::Unlock { category })
        }
        PlanCommands::Reset { year } => (year, PlanEdit::ResetCuts),
        PlanCommands::Budget {
            category,
            amount,
            year,
        } => {
            let category = resolve(&storage, &category)?;
            let amount = amount.as_deref().map(parse_amount).transpose()?;
            (year, PlanEdit::SetCategoryBudget { category, amount })
        }
        PlanCommands::BaseGoal { amount, year } => {
            (year, PlanEdit::SetBaseMonthlyGoal(parse_amount(&amount)?))
        }
    };

    let year = year.unwrap_or_else(current_year);
    let mut session = PlanSession::open(Arc::clone(&storage), year, settings.plan_save_debounce())?;
    let plan = session.apply(edit).clone();
    session.flush()?;

    print!("{}", format_plan(&plan, currency));
    Ok(())
}

fn resolve(storage: &Storage, identifier: &str) -> PlannerResult<String> {
    Ok(CategoryService::new(storage).require(identifier)?.value)
}

fn parse_amount(s: &str) -> PlannerResult<Money> {
    let amount =
        Money::parse(s).map_err(|e| PlannerError::Validation(format!("Invalid amount: {}", e)))?;
    if amount.is_negative() {
        return Err(PlannerError::Validation("Amount cannot be negative".into()));
    }
    Ok(amount)
}
