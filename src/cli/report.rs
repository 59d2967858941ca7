//! Report CLI commands
//!
//! Year overview, monthly breakdown and the list of years with data.
//! `--json` prints the computed structures instead of tables.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::budget::{format_monthly, format_year_overview, format_years};
use crate::error::{PlannerError, PlannerResult};
use crate::models::Money;
use crate::services::{current_year, OverviewService};
use crate::storage::Storage;

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Totals, savings gap and reduction plan for a year
    Overview {
        /// Year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Take the target from this income instead of the year's total
        #[arg(long)]
        income_basis: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Month by month income and expenses
    Monthly {
        #[arg(short, long)]
        year: Option<i32>,

        #[arg(long)]
        json: bool,
    },

    /// Years that have transactions
    Years {
        #[arg(long)]
        json: bool,
    },
}

/// Handle a report command
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> PlannerResult<()> {
    let service = OverviewService::new(storage)
        .with_default_percentage(settings.default_savings_percentage);
    let currency = settings.currency_symbol.as_str();

    match cmd {
        ReportCommands::Overview {
            year,
            income_basis,
            json,
        } => {
            let year = year.unwrap_or_else(current_year);
            let income_basis = income_basis
                .as_deref()
                .map(|s| {
                    Money::parse(s).map_err(|e| {
                        PlannerError::Validation(format!("Invalid income basis: {}", e))
                    })
                })
                .transpose()?;

            let overview = service.year_overview(year, income_basis)?;
            if json {
                println!("{}", to_json(&overview)?);
            } else {
                print!("{}", format_year_overview(&overview, currency));
            }
        }

        ReportCommands::Monthly { year, json } => {
            let year = year.unwrap_or_else(current_year);
            let overview = service.year_overview(year, None)?;
            if json {
                println!("{}", to_json(&overview.aggregate.month_totals())?);
            } else {
                print!("{}", format_monthly(&overview.aggregate, currency));
            }
        }

        ReportCommands::Years { json } => {
            let years = service.available_years()?;
            if json {
                println!("{}", to_json(&years)?);
            } else {
                print!("{}", format_years(&years, current_year()));
            }
        }
    }

    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> PlannerResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| PlannerError::Json(format!("Failed to serialize report: {}", e)))
}
