//! Reports module for firetrack
//!
//! Each report loads what it needs from storage, runs the engine, and
//! renders for the terminal or as CSV.

pub mod budget_overview;
pub mod fire;
pub mod portfolio;
pub mod spending;
pub mod trend;

pub use budget_overview::BudgetOverviewReport;
pub use fire::FireReport;
pub use portfolio::PortfolioReport;
pub use spending::{SpendingByCategory, SpendingByGroup, SpendingReport};
pub use trend::{TrendReport, TrendRow};
