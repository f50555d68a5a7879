//! Expense repository for JSON storage
//!
//! Manages loading and saving expenses to expenses.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::FireError;
use crate::models::{DateRange, ExpenseId, ExpenseRecord};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ExpenseData {
    #[serde(default)]
    expenses: Vec<ExpenseRecord>,
}

/// Repository for expense persistence
pub struct ExpenseRepository {
    path: PathBuf,
    data: RwLock<HashMap<ExpenseId, ExpenseRecord>>,
}

impl ExpenseRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load expenses from disk, skipping records that fail validation
    pub fn load(&self) -> Result<(), FireError> {
        let file_data: ExpenseData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| FireError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for expense in file_data.expenses {
            if let Err(e) = expense.validate() {
                tracing::warn!(id = %expense.id, "Skipping stored expense: {}", e);
                continue;
            }
            data.insert(expense.id, expense);
        }

        tracing::debug!("Loaded {} expenses", data.len());
        Ok(())
    }

    /// Save expenses to disk, newest first
    pub fn save(&self) -> Result<(), FireError> {
        let expenses = self.get_all()?;
        write_json_atomic(&self.path, &ExpenseData { expenses })
    }

    pub fn get(&self, id: ExpenseId) -> Result<Option<ExpenseRecord>, FireError> {
        let data = self
            .data
            .read()
            .map_err(|e| FireError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Resolve a full or short id reference
    pub fn find(&self, reference: &str) -> Result<Option<ExpenseRecord>, FireError> {
        let data = self
            .data
            .read()
            .map_err(|e| FireError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut matches = data.values().filter(|e| e.id.matches(reference));
        match (matches.next(), matches.next()) {
            (Some(found), None) => Ok(Some(found.clone())),
            (Some(_), Some(_)) => Err(FireError::AmbiguousId {
                entity_type: "Expense",
                reference: reference.to_string(),
            }),
            _ => Ok(None),
        }
    }

    /// All expenses, newest first
    pub fn get_all(&self) -> Result<Vec<ExpenseRecord>, FireError> {
        let data = self
            .data
            .read()
            .map_err(|e| FireError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut expenses: Vec<_> = data.values().cloned().collect();
        expenses.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(expenses)
    }

    /// Expenses dated within `range`, newest first
    pub fn get_in_range(&self, range: &DateRange) -> Result<Vec<ExpenseRecord>, FireError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|e| range.contains(e.date))
            .collect())
    }

    /// Insert or replace an expense after validating it
    pub fn upsert(&self, expense: ExpenseRecord) -> Result<(), FireError> {
        expense.validate()?;

        let mut data = self
            .data
            .write()
            .map_err(|e| FireError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(expense.id, expense);
        Ok(())
    }

    pub fn delete(&self, id: ExpenseId) -> Result<bool, FireError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| FireError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(data.remove(&id).is_some())
    }

    pub fn count(&self) -> Result<usize, FireError> {
        let data = self
            .data
            .read()
            .map_err(|e| FireError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}
