use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use savings_planner::cli::{
    handle_account_command, handle_category_command, handle_goal_command, handle_plan_command, handle_report_command,
    handle_transaction_command,
};
use savings_planner::config::{paths::PlannerPaths, settings::Settings};
use savings_planner::storage::{file_io::json_file_valid, init::initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "planner",
    version,
    about = "Track income and spending against a yearly savings target",
    long_about = "Savings planner records categorized transactions, compares what you \
                  saved with a yearly target, and proposes where to cut expenses \
                  to close the gap."
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory with default categories
    Init,

    /// Show current configuration and paths
    Config,

    /// Account management commands
    #[command(subcommand)]
    Account(savings_planner::cli::AccountCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(savings_planner::cli::CategoryCommands),

    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(savings_planner::cli::TransactionCommands),

    /// Yearly savings goal commands
    #[command(subcommand)]
    Goal(savings_planner::cli::GoalCommands),

    /// Budget plan commands (cuts, locks, budgets)
    #[command(subcommand)]
    Plan(savings_planner::cli::PlanCommands),

    /// Overview and monthly reports
    #[command(subcommand)]
    Report(savings_planner::cli::ReportCommands),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (warn)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    let paths = PlannerPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing savings planner at: {}", paths.data_dir().display());
            initialize_storage(&paths)?;
            settings.setup_completed = true;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Default income, savings and expense categories have been created.");
            println!("Run 'planner category list' to see them.");
        }
        Some(Commands::Config) => {
            println!("Savings Planner Configuration");
            println!("=============================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:     {}", settings.currency_symbol);
            println!("  Default savings:     {}%", settings.default_savings_percentage);
            println!("  Plan save debounce:  {} ms", settings.plan_save_debounce_ms);
            println!("  Setup completed:     {}", settings.setup_completed);
            println!();
            println!("Data files:");
            for (name, path) in [
                ("accounts", paths.accounts_file()),
                ("transactions", paths.transactions_file()),
                ("categories", paths.categories_file()),
                ("goals", paths.goals_file()),
                ("plans", paths.plans_file()),
            ] {
                let state = if !path.exists() {
                    "missing"
                } else if json_file_valid(&path) {
                    "ok"
                } else {
                    "INVALID"
                };
                println!("  {:<13} {}", name, state);
            }
        }
        Some(Commands::Account(cmd)) => {
            handle_account_command(&storage, cmd)?;
        }
        Some(Commands::Category(cmd)) => {
            handle_category_command(&storage, cmd)?;
        }
        Some(Commands::Transaction(cmd)) => {
            handle_transaction_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Goal(cmd)) => {
            handle_goal_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Plan(cmd)) => {
            handle_plan_command(Arc::new(storage), &settings, cmd)?;
        }
        Some(Commands::Report(cmd)) => {
            handle_report_command(&storage, &settings, cmd)?;
        }
        None => {
            println!("Savings planner - yearly savings targets and expense reduction");
            println!();
            println!("Run 'planner --help' for usage information.");
            println!("Run 'planner init' to create default categories.");
        }
    }

    Ok(())
}
