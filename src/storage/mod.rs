//! Storage layer for firetrack
//!
//! One JSON file per record kind under the data directory, written
//! atomically. Repositories keep their records in memory between `load_all`
//! and `save_all`.

pub mod budget;
pub mod expenses;
pub mod file_io;
pub mod init;
pub mod investments;
pub mod targets;

pub use budget::BudgetRepository;
pub use expenses::ExpenseRepository;
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use investments::InvestmentRepository;
pub use targets::TargetRepository;

use crate::config::paths::FirePaths;
use crate::error::FireError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: FirePaths,
    pub expenses: ExpenseRepository,
    pub investments: InvestmentRepository,
    pub budgets: BudgetRepository,
    pub targets: TargetRepository,
}

impl Storage {
    pub fn new(paths: FirePaths) -> Result<Self, FireError> {
        paths.ensure_directories()?;

        Ok(Self {
            expenses: ExpenseRepository::new(paths.expenses_file()),
            investments: InvestmentRepository::new(paths.investments_file()),
            budgets: BudgetRepository::new(paths.budgets_file()),
            targets: TargetRepository::new(paths.targets_file()),
            paths,
        })
    }

    pub fn paths(&self) -> &FirePaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), FireError> {
        self.expenses.load()?;
        self.investments.load()?;
        self.budgets.load()?;
        self.targets.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), FireError> {
        self.expenses.save()?;
        self.investments.save()?;
        self.budgets.save()?;
        self.targets.save()?;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}
