//! Expense CLI commands
//!
//! Recording, listing, deleting and importing expenses.

use std::path::PathBuf;

use chrono::Local;
use clap::Subcommand;

use crate::display::{format_category_list, format_expense_details, format_expense_list};
use crate::error::{FireError, FireResult};
use crate::models::period::parse_date;
use crate::models::{CategoryTaxonomy, ExpenseRecord, Money, Month};
use crate::services::import::normalize_category;
use crate::services::ImportService;
use crate::storage::Storage;

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record an expense
    Add {
        /// Amount (e.g., "42.50")
        amount: String,
        /// Category code (see `expense categories`)
        category: String,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Free-text description
        #[arg(short = 'm', long)]
        description: Option<String>,
    },
    /// List expenses
    List {
        /// Only this month (YYYY-MM)
        #[arg(long)]
        month: Option<String>,
        /// Only this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show one expense
    Show {
        /// Expense ID (full or short form)
        id: String,
    },
    /// Delete an expense
    Delete {
        /// Expense ID (full or short form)
        id: String,
    },
    /// Import expenses from a CSV file
    Import {
        /// Path to the CSV file
        file: PathBuf,
        /// Date format used in the file (chrono syntax)
        #[arg(long)]
        date_format: Option<String>,
        /// Category for rows without one
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List known categories and their groups
    Categories,
}

/// Handle an expense command
pub fn handle_expense_command(storage: &Storage, cmd: ExpenseCommands) -> FireResult<()> {
    match cmd {
        ExpenseCommands::Add {
            amount,
            category,
            date,
            description,
        } => {
            let amount = Money::parse(&amount).map_err(|e| {
                FireError::Validation(format!(
                    "Invalid amount: '{}'. Use a format like '42.50'. Error: {}",
                    amount, e
                ))
            })?;
            let date = match date {
                Some(d) => parse_date(&d)?,
                None => Local::now().date_naive(),
            };
            let category = normalize_category(&category);

            if !CategoryTaxonomy::standard().contains(&category) {
                tracing::warn!(
                    %category,
                    "Unknown category; it will not count toward FIRE metrics"
                );
            }

            let mut expense = ExpenseRecord::new(amount, category, date);
            if let Some(description) = description {
                expense = expense.with_description(description);
            }

            storage.expenses.upsert(expense.clone())?;
            storage.expenses.save()?;

            println!("Recorded expense:");
            print!("{}", format_expense_details(&expense));
        }

        ExpenseCommands::List { month, category } => {
            let mut expenses = match month {
                Some(m) => storage.expenses.get_in_range(&Month::parse(&m)?.date_range())?,
                None => storage.expenses.get_all()?,
            };
            if let Some(category) = category {
                let category = normalize_category(&category);
                expenses.retain(|e| e.category == category);
            }
            print!("{}", format_expense_list(&expenses));
        }

        ExpenseCommands::Show { id } => {
            let expense = storage
                .expenses
                .find(&id)?
                .ok_or_else(|| FireError::expense_not_found(&id))?;
            print!("{}", format_expense_details(&expense));
        }

        ExpenseCommands::Delete { id } => {
            let expense = storage
                .expenses
                .find(&id)?
                .ok_or_else(|| FireError::expense_not_found(&id))?;

            storage.expenses.delete(expense.id)?;
            storage.expenses.save()?;
            println!("Deleted expense {} ({} {})", expense.id, expense.amount, expense.category);
        }

        ExpenseCommands::Import {
            file,
            date_format,
            category,
        } => {
            let default_category = category.map(|c| normalize_category(&c));
            let result = ImportService::new(storage).import_file(
                &file,
                date_format.as_deref(),
                default_category.as_deref(),
            )?;

            println!("Imported {} expense(s) from {}", result.imported, file.display());
            if result.duplicates_skipped > 0 {
                println!("Skipped {} duplicate(s)", result.duplicates_skipped);
            }
            if result.error_count() > 0 {
                println!("{} row(s) had errors:", result.error_count());
                let mut rows: Vec<_> = result.errors.iter().collect();
                rows.sort_by_key(|(row, _)| **row);
                for (row, message) in rows {
                    println!("  row {}: {}", row, message);
                }
            }
        }

        ExpenseCommands::Categories => {
            print!("{}", format_category_list(CategoryTaxonomy::standard()));
        }
    }

    Ok(())
}
