use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use firetrack::cli::{
    handle_budget_command, handle_expense_command, handle_investment_command,
    handle_report_command, handle_target_command,
};
use firetrack::config::{paths::FirePaths, settings::Settings};
use firetrack::models::Money;
use firetrack::storage::{initialize_storage, Storage};
use firetrack::FireError;

#[derive(Parser)]
#[command(
    name = "firetrack",
    version,
    about = "Terminal FIRE tracker",
    long_about = "firetrack records expenses and investments and reports your \
                  savings rate, FIRE number, budget status and portfolio \
                  rebalancing suggestions from the command line."
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
    /// Create the data directory and default settings
    Init,

    /// Show paths and settings, or update settings
    Config {
        /// Monthly income used by FIRE reports
        #[arg(long)]
        income: Option<String>,
        /// Withdrawal multiplier used for the FIRE number
        #[arg(long)]
        multiplier: Option<f64>,
        /// Rebalancing materiality threshold in percent
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Expense commands
    #[command(subcommand, alias = "exp")]
    Expense(firetrack::cli::ExpenseCommands),

    /// Investment commands
    #[command(subcommand, alias = "inv")]
    Investment(firetrack::cli::InvestmentCommands),

    /// Monthly budget commands
    #[command(subcommand)]
    Budget(firetrack::cli::BudgetCommands),

    /// Target allocation commands
    #[command(subcommand)]
    Target(firetrack::cli::TargetCommands),

    /// Reports
    #[command(subcommand)]
    Report(firetrack::cli::ReportCommands),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    let paths = FirePaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing firetrack at: {}", paths.base_dir().display());
            if initialize_storage(&paths)? {
                println!("Initialization complete!");
            } else {
                println!("Already initialized; existing data left untouched.");
            }
            println!();
            println!("Next steps:");
            println!("  firetrack config --income 8500");
            println!("  firetrack expense add 1200 housing");
            println!("  firetrack target set 60 30 10");
            println!("  firetrack report fire");
        }
        Some(Commands::Config {
            income,
            multiplier,
            threshold,
        }) => {
            let changed = income.is_some() || multiplier.is_some() || threshold.is_some();
            if let Some(income) = income {
                settings.monthly_income = Money::parse(&income).map_err(|e| {
                    FireError::Validation(format!("Invalid income: '{}'. Error: {}", income, e))
                })?;
            }
            if let Some(multiplier) = multiplier {
                settings.withdrawal_multiplier = multiplier;
            }
            if let Some(threshold) = threshold {
                settings.materiality_percent = threshold;
            }
            if changed {
                settings.save(&paths)?;
                println!("Settings saved.");
                println!();
            }

            println!("firetrack Configuration");
            println!("=======================");
            println!("Base directory:  {}", paths.base_dir().display());
            println!("Data directory:  {}", paths.data_dir().display());
            println!("Settings file:   {}", paths.settings_file().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:       {}", settings.currency_symbol);
            println!(
                "  Monthly income:        {}",
                settings.monthly_income.format_with_symbol(&settings.currency_symbol)
            );
            println!("  Withdrawal multiplier: {}", settings.withdrawal_multiplier);
            println!("  Materiality threshold: {}%", settings.materiality_percent);
        }
        Some(Commands::Expense(cmd)) => handle_expense_command(&storage, cmd)?,
        Some(Commands::Investment(cmd)) => handle_investment_command(&storage, cmd)?,
        Some(Commands::Budget(cmd)) => handle_budget_command(&storage, cmd)?,
        Some(Commands::Target(cmd)) => handle_target_command(&storage, cmd)?,
        Some(Commands::Report(cmd)) => handle_report_command(&storage, &settings, cmd)?,
        None => {
            println!("firetrack - terminal FIRE tracker");
            println!();
            println!("Run 'firetrack --help' for usage information.");
            println!("Run 'firetrack init' to get started.");
        }
    }

    Ok(())
}
