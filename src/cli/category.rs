//! Category CLI commands
//!
//! Categories are flat; each one's role (income, savings or expense) is
//! inferred from its label and value.

use clap::Subcommand;

use crate::display::category::{
    format_category_details, format_category_list, format_classification,
};
use crate::error::PlannerResult;
use crate::services::CategoryService;
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List all categories with their role
    List,

    /// Create a new category
    Add {
        /// Display label
        label: String,
        /// Stable value transactions reference (derived from the label if omitted)
        #[arg(long)]
        value: Option<String>,
        /// Icon name
        #[arg(short, long)]
        icon: Option<String>,
    },

    /// Show category details
    Show {
        /// Category value or label
        category: String,
    },

    /// Change a category's label or icon
    Edit {
        /// Category value or label
        category: String,
        /// New label
        #[arg(short, long)]
        label: Option<String>,
        /// New icon
        #[arg(short, long)]
        icon: Option<String>,
    },

    /// Delete a category
    Delete {
        /// Category value or label
        category: String,
    },

    /// Show how categories split into income, savings and expense
    Roles,
}

/// Handle a category command
pub fn handle_category_command(storage: &Storage, cmd: CategoryCommands) -> PlannerResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::List => {
            let categories = service.list()?;
            print!("{}", format_category_list(&categories));
        }

        CategoryCommands::Add { label, value, icon } => {
            let category = service.create(&label, value.as_deref(), icon.as_deref())?;
            println!("Created category: {}", category.label);
            println!("  Value: {}", category.value);
            println!("  Role:  {}", crate::planning::classify_category(&category));
        }

        CategoryCommands::Show { category } => {
            let category = service.require(&category)?;
            print!("{}", format_category_details(&category));
        }

        CategoryCommands::Edit {
            category,
            label,
            icon,
        } => {
            if label.is_none() && icon.is_none() {
                println!("No changes specified. Use --label or --icon.");
                return Ok(());
            }

            let updated = service.edit(&category, label.as_deref(), icon.as_deref())?;
            println!("Updated category: {} [{}]", updated.label, updated.value);
        }

        CategoryCommands::Delete { category } => {
            let deleted = service.delete(&category)?;
            println!("Deleted category: {}", deleted.category.label);
            if deleted.orphaned_transactions > 0 {
                println!(
                    "  {} transaction(s) still reference '{}' and are no longer counted.",
                    deleted.orphaned_transactions, deleted.category.value
                );
            }
        }

        CategoryCommands::Roles => {
            let classification = service.classify()?;
            print!("{}", format_classification(&classification));
        }
    }

    Ok(())
}
