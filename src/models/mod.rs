//! Core data models for firetrack
//!
//! Records the user logs (expenses, investments, budget limits, target
//! allocation) plus the static category taxonomy and supporting value types.

pub mod budget;
pub mod category;
pub mod expense;
pub mod ids;
pub mod investment;
pub mod money;
pub mod period;
pub mod quote;
pub mod target;

pub use budget::BudgetLimit;
pub use category::{CategoryGroup, CategoryInfo, CategoryTaxonomy};
pub use expense::ExpenseRecord;
pub use ids::{ExpenseId, InvestmentId};
pub use investment::{InvestmentRecord, InvestmentType};
pub use money::{Money, MoneyParseError};
pub use period::{DateRange, Month};
pub use quote::MarketQuote;
pub use target::{AssetClass, TargetAllocation, TargetMix};
