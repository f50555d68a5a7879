//! Budget CLI commands
//!
//! Monthly spending limits per category.

use clap::Subcommand;

use crate::display::format_budget_list;
use crate::error::{FireError, FireResult};
use crate::models::{CategoryTaxonomy, Money};
use crate::services::import::normalize_category;
use crate::storage::Storage;

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Set the monthly limit for a category
    Set {
        /// Category code
        category: String,
        /// Monthly limit (e.g., "600" or "600.00")
        limit: String,
    },
    /// List monthly limits
    List,
    /// Remove the limit for a category
    Remove {
        /// Category code
        category: String,
    },
}

/// Handle a budget command
pub fn handle_budget_command(storage: &Storage, cmd: BudgetCommands) -> FireResult<()> {
    match cmd {
        BudgetCommands::Set { category, limit } => {
            let category = normalize_category(&category);
            let amount = Money::parse(&limit).map_err(|e| {
                FireError::Validation(format!(
                    "Invalid limit: '{}'. Use a format like '600.00'. Error: {}",
                    limit, e
                ))
            })?;

            if !CategoryTaxonomy::standard().contains(&category) {
                tracing::warn!(%category, "Budget set for a category outside the standard list");
            }

            let budget = storage.budgets.set_limit(&category, amount)?;
            storage.budgets.save()?;

            println!(
                "Set monthly budget for {}: {}",
                CategoryTaxonomy::standard().label(&budget.category),
                budget.monthly_limit
            );
        }

        BudgetCommands::List => {
            print!("{}", format_budget_list(&storage.budgets.get_all()?));
        }

        BudgetCommands::Remove { category } => {
            let category = normalize_category(&category);
            if !storage.budgets.remove(&category)? {
                return Err(FireError::budget_not_found(&category));
            }
            storage.budgets.save()?;
            println!("Removed budget for {}", category);
        }
    }

    Ok(())
}
