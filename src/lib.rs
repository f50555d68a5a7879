//! firetrack - terminal FIRE tracker
//!
//! Records expenses and investment holdings, and turns them into the numbers
//! that matter for financial independence: spending by category, budgets,
//! savings rate, FIRE number, and portfolio rebalancing suggestions.
//!
//! # Architecture
//!
//! - `config`: Paths and settings
//! - `error`: Crate error type
//! - `models`: Expenses, investments, budgets, targets, money and periods
//! - `engine`: Pure calculations (aggregation, allocation, rebalancing, budget, FIRE)
//! - `storage`: JSON file storage
//! - `services`: CSV import and quote revaluation
//! - `reports`: Report generation and CSV export
//! - `display`: Terminal tables
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use firetrack::config::{paths::FirePaths, settings::Settings};
//! use firetrack::storage::Storage;
//!
//! let paths = FirePaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::new(paths)?;
//! storage.load_all()?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{FireError, FireResult};
