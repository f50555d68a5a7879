//! Service layer for firetrack
//!
//! Operations that combine storage with parsing or external inputs: CSV
//! expense import and revaluing holdings from market quotes.

pub mod import;
pub mod portfolio;

pub use import::{ColumnMapping, ImportResult, ImportService};
pub use portfolio::{load_quotes, revalue, PortfolioService, Revaluation};
