//! Savings goal CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::budget::format_goal;
use crate::display::report::format_percentage;
use crate::error::PlannerResult;
use crate::services::{current_year, GoalService};
use crate::storage::Storage;

/// Goal subcommands
#[derive(Subcommand)]
pub enum GoalCommands {
    /// Show the savings goal for a year
    Show {
        /// Year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Set the savings goal for a year
    Set {
        /// Target savings as a percentage of income (0-100)
        percentage: f64,
        /// Year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// List all stored goals
    List,
}

/// Handle a goal command
pub fn handle_goal_command(
    storage: &Storage,
    settings: &Settings,
    cmd: GoalCommands,
) -> PlannerResult<()> {
    let service =
        GoalService::new(storage).with_default_percentage(settings.default_savings_percentage);

    match cmd {
        GoalCommands::Show { year } => {
            let year = year.unwrap_or_else(current_year);
            let stored = service.get(year)?.is_some();
            let goal = service.get_or_default(year)?;
            print!("{}", format_goal(&goal, stored));
        }

        GoalCommands::Set { percentage, year } => {
            let year = year.unwrap_or_else(current_year);
            let goal = service.set(year, percentage)?;
            println!(
                "Savings goal for {} set to {}",
                goal.year,
                format_percentage(goal.savings_percentage)
            );
        }

        GoalCommands::List => {
            let goals = service.list()?;
            if goals.is_empty() {
                println!(
                    "No savings goals stored. Years without one use {}.",
                    format_percentage(settings.default_savings_percentage)
                );
            }
            for goal in goals {
                print!("{}", format_goal(&goal, true));
            }
        }
    }

    Ok(())
}
