//! Display formatting for terminal output
//!
//! Tables for stored records plus shared helpers used by the reports.

pub mod expense;
pub mod investment;
pub mod report;

pub use expense::{format_category_list, format_expense_details, format_expense_list};
pub use investment::{format_budget_list, format_investment_list, format_target};
