//! Investment CLI commands

use std::path::PathBuf;

use chrono::Local;
use clap::Subcommand;

use crate::display::format_investment_list;
use crate::error::{FireError, FireResult};
use crate::models::period::parse_date;
use crate::models::{InvestmentRecord, InvestmentType, Money};
use crate::services::{load_quotes, PortfolioService};
use crate::storage::Storage;

/// Investment subcommands
#[derive(Subcommand)]
pub enum InvestmentCommands {
    /// Record a holding
    Add {
        /// Holding type (stocks, bonds, cash, crypto)
        investment_type: String,
        /// Holding name
        name: String,
        /// Current value (e.g., "10000.00")
        amount: String,
        /// Ticker symbol, used when repricing from quotes
        #[arg(short, long)]
        symbol: Option<String>,
        /// Price per unit
        #[arg(short, long)]
        price: Option<f64>,
        /// Units held
        #[arg(short, long)]
        quantity: Option<f64>,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },
    /// List holdings
    List {
        /// Only this type
        #[arg(short = 't', long)]
        investment_type: Option<String>,
    },
    /// Delete a holding
    Delete {
        /// Investment ID (full or short form)
        id: String,
    },
    /// Revalue holdings from a quotes file and save the new amounts
    Reprice {
        /// JSON file with one quote or an array of quotes
        quotes: PathBuf,
    },
}

/// Handle an investment command
pub fn handle_investment_command(storage: &Storage, cmd: InvestmentCommands) -> FireResult<()> {
    match cmd {
        InvestmentCommands::Add {
            investment_type,
            name,
            amount,
            symbol,
            price,
            quantity,
            date,
        } => {
            let investment_type: InvestmentType = investment_type.parse()?;
            let amount = Money::parse(&amount).map_err(|e| {
                FireError::Validation(format!(
                    "Invalid amount: '{}'. Use a format like '10000.00'. Error: {}",
                    amount, e
                ))
            })?;
            let date = match date {
                Some(d) => parse_date(&d)?,
                None => Local::now().date_naive(),
            };

            let mut investment = InvestmentRecord::new(investment_type, name, amount, date);
            investment.symbol = symbol.map(|s| s.trim().to_uppercase());
            investment.price = price;
            investment.quantity = quantity;

            storage.investments.upsert(investment.clone())?;
            storage.investments.save()?;

            println!("Recorded investment: {}", investment.name);
            println!("  Type:   {}", investment.investment_type);
            println!("  Amount: {}", investment.amount);
            if let Some(symbol) = &investment.symbol {
                println!("  Symbol: {}", symbol);
            }
            println!("  ID:     {}", investment.id);
        }

        InvestmentCommands::List { investment_type } => {
            let investments = match investment_type {
                Some(t) => storage.investments.get_by_type(t.parse()?)?,
                None => storage.investments.get_all()?,
            };
            print!("{}", format_investment_list(&investments));
        }

        InvestmentCommands::Delete { id } => {
            let investment = storage
                .investments
                .find(&id)?
                .ok_or_else(|| FireError::investment_not_found(&id))?;

            storage.investments.delete(investment.id)?;
            storage.investments.save()?;
            println!("Deleted investment {} ({})", investment.id, investment.name);
        }

        InvestmentCommands::Reprice { quotes } => {
            let quotes = load_quotes(&quotes)?;
            let revaluation = PortfolioService::new(storage).apply_quotes(&quotes)?;

            println!("Repriced {} holding(s)", revaluation.repriced);
            if !revaluation.missing_symbols.is_empty() {
                println!("No quote for: {}", revaluation.missing_symbols.join(", "));
            }
            print!("{}", format_investment_list(&revaluation.holdings));
        }
    }

    Ok(())
}
