//! CLI command handlers
//!
//! Bridges clap argument parsing with storage, services and reports.

pub mod budget;
pub mod expense;
pub mod investment;
pub mod report;
pub mod target;

pub use budget::{handle_budget_command, BudgetCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use investment::{handle_investment_command, InvestmentCommands};
pub use report::{handle_report_command, ReportCommands};
pub use target::{handle_target_command, TargetCommands};
