//! CLI commands for reports
//!
//! Each report prints to the terminal, or writes CSV when `--output` is given.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{Datelike, Local, NaiveDate};
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::engine::multiplier_for_withdrawal_rate;
use crate::error::{FireError, FireResult};
use crate::models::period::parse_date;
use crate::models::{DateRange, Money, Month};
use crate::reports::{
    BudgetOverviewReport, FireReport, PortfolioReport, SpendingReport, TrendReport,
};
use crate::services::load_quotes;
use crate::storage::Storage;

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Spending by category and group
    Spending {
        /// Month to report on (YYYY-MM)
        #[arg(long, conflicts_with_all = ["start", "end"])]
        month: Option<String>,
        /// Start date (YYYY-MM-DD)
        #[arg(short, long)]
        start: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(short, long)]
        end: Option<String>,
        /// Show top N categories only
        #[arg(long)]
        top: Option<usize>,
        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Spending against monthly budgets
    #[command(alias = "budget-overview")]
    Budget {
        /// Month to report on (YYYY-MM)
        #[arg(long)]
        month: Option<String>,
        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Portfolio allocation and rebalancing suggestions
    #[command(alias = "portfolio")]
    Allocation {
        /// JSON quotes file used to revalue holdings for this report
        #[arg(short, long)]
        quotes: Option<PathBuf>,
        /// Materiality threshold in percent (defaults to the configured value)
        #[arg(long)]
        threshold: Option<f64>,
        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Savings rate, FIRE number and progress
    Fire {
        /// Month to report on (YYYY-MM)
        #[arg(long)]
        month: Option<String>,
        /// Monthly income (defaults to the configured value)
        #[arg(short, long)]
        income: Option<String>,
        /// Withdrawal multiplier, e.g. 25 for a 4% rule
        #[arg(long, conflicts_with = "withdrawal_rate")]
        multiplier: Option<f64>,
        /// Safe withdrawal rate in percent, converted to a multiplier
        #[arg(long)]
        withdrawal_rate: Option<f64>,
        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Month-by-month savings rate and FIRE number
    Trend {
        /// Number of months ending with the current one (1-600)
        #[arg(
            short = 'n',
            long,
            default_value = "6",
            value_parser = clap::value_parser!(u16).range(1..=600)
        )]
        months: u16,
        /// Last month of the window (YYYY-MM)
        #[arg(long)]
        end: Option<String>,
        /// Monthly income (defaults to the configured value)
        #[arg(short, long)]
        income: Option<String>,
        /// Withdrawal multiplier
        #[arg(long)]
        multiplier: Option<f64>,
        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle report commands
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> FireResult<()> {
    match cmd {
        ReportCommands::Spending {
            month,
            start,
            end,
            top,
            output,
        } => {
            let range = spending_range(month, start, end)?;
            let report = SpendingReport::generate(storage, range)?;
            match output {
                Some(path) => {
                    export_to_file(&path, |w| report.export_csv(w))?;
                    println!("Spending report exported to: {}", path.display());
                }
                None => println!("{}", report.format_terminal(top)),
            }
        }

        ReportCommands::Budget { month, output } => {
            let month = Month::parse_or_current(month.as_deref())?;
            let report = BudgetOverviewReport::generate(storage, month)?;
            match output {
                Some(path) => {
                    export_to_file(&path, |w| report.export_csv(w))?;
                    println!("Budget report exported to: {}", path.display());
                }
                None => println!("{}", report.format_terminal()),
            }
        }

        ReportCommands::Allocation {
            quotes,
            threshold,
            output,
        } => {
            let quotes = quotes.as_deref().map(load_quotes).transpose()?;
            let threshold = threshold.unwrap_or(settings.materiality_percent);
            let report = PortfolioReport::generate(storage, quotes.as_deref(), threshold)?;
            match output {
                Some(path) => {
                    export_to_file(&path, |w| report.export_csv(w))?;
                    println!("Allocation report exported to: {}", path.display());
                }
                None => println!("{}", report.format_terminal()),
            }
        }

        ReportCommands::Fire {
            month,
            income,
            multiplier,
            withdrawal_rate,
            output,
        } => {
            let month = Month::parse_or_current(month.as_deref())?;
            let income = income_or_default(income, settings)?;
            let multiplier = match (multiplier, withdrawal_rate) {
                (Some(m), _) => m,
                (None, Some(rate)) => multiplier_for_withdrawal_rate(rate)?,
                (None, None) => settings.withdrawal_multiplier,
            };

            if income.is_zero() {
                tracing::warn!("Monthly income is zero; set it with --income or in config.json");
            }

            let report = FireReport::generate(storage, month, income, multiplier)?;
            match output {
                Some(path) => {
                    export_to_file(&path, |w| report.export_csv(w))?;
                    println!("FIRE report exported to: {}", path.display());
                }
                None => println!("{}", report.format_terminal()),
            }
        }

        ReportCommands::Trend {
            months,
            end,
            income,
            multiplier,
            output,
        } => {
            let end = Month::parse_or_current(end.as_deref())?;
            let income = income_or_default(income, settings)?;
            let multiplier = multiplier.unwrap_or(settings.withdrawal_multiplier);

            let report =
                TrendReport::generate(storage, end, usize::from(months), income, multiplier)?;
            match output {
                Some(path) => {
                    export_to_file(&path, |w| report.export_csv(w))?;
                    println!("Trend report exported to: {}", path.display());
                }
                None => println!("{}", report.format_terminal()),
            }
        }
    }

    Ok(())
}

/// Month if given, else start/end (defaulting to this month so far)
fn spending_range(
    month: Option<String>,
    start: Option<String>,
    end: Option<String>,
) -> FireResult<DateRange> {
    if let Some(m) = month {
        return Ok(Month::parse(&m)?.date_range());
    }
    if start.is_none() && end.is_none() {
        return Ok(Month::current().date_range());
    }

    let today = Local::now().date_naive();
    let start = match start {
        Some(s) => parse_date(&s)?,
        None => NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today),
    };
    let end = match end {
        Some(e) => parse_date(&e)?,
        None => today,
    };

    DateRange::new(start, end)
}

fn income_or_default(income: Option<String>, settings: &Settings) -> FireResult<Money> {
    match income {
        Some(s) => Money::parse(&s).map_err(|e| {
            FireError::Validation(format!(
                "Invalid income: '{}'. Use a format like '8500.00'. Error: {}",
                s, e
            ))
        }),
        None => Ok(settings.monthly_income),
    }
}

fn export_to_file<F>(path: &Path, export: F) -> FireResult<()>
where
    F: FnOnce(&mut BufWriter<File>) -> FireResult<()>,
{
    let file = File::create(path).map_err(|e| {
        FireError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    let mut writer = BufWriter::new(file);
    export(&mut writer)?;
    writer.flush().map_err(|e| FireError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spending_range_month() {
        let range = spending_range(Some("2025-02".into()), None, None).unwrap();
        assert_eq!(range.start(), NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
        assert_eq!(range.end(), NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
    }

    #[test]
    fn test_spending_range_explicit_dates() {
        let range =
            spending_range(None, Some("2025-01-10".into()), Some("2025-03-05".into())).unwrap();
        assert_eq!(range.start(), NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
        assert_eq!(range.end(), NaiveDate::from_ymd_opt(2025, 3, 5).unwrap());
    }

    #[test]
    fn test_spending_range_rejects_reversed_dates() {
        let reversed = spending_range(None, Some("2025-03-05".into()), Some("2025-01-10".into()));
        assert!(reversed.is_err());
    }

    #[test]
    fn test_income_default() {
        let mut settings = Settings::default();
        settings.monthly_income = Money::from_dollars_cents(5000, 0);
        assert_eq!(income_or_default(None, &settings).unwrap(), settings.monthly_income);
        assert_eq!(
            income_or_default(Some("7000".into()), &settings).unwrap(),
            Money::from_dollars_cents(7000, 0)
        );
        assert!(income_or_default(Some("abc".into()), &settings).is_err());
    }
}
