//! Budget limit repository for JSON storage
//!
//! Limits are keyed by category; setting a limit for a category replaces
//! any existing one.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::FireError;
use crate::models::{BudgetLimit, Money};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct BudgetData {
    #[serde(default)]
    budgets: Vec<BudgetLimit>,
}

/// Repository for monthly budget limits
pub struct BudgetRepository {
    path: PathBuf,
    limits: RwLock<HashMap<String, BudgetLimit>>,
}

impl BudgetRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            limits: RwLock::new(HashMap::new()),
        }
    }

    /// Load limits from disk; a later duplicate for a category wins
    pub fn load(&self) -> Result<(), FireError> {
        let file_data: BudgetData = read_json(&self.path)?;

        let mut limits = self
            .limits
            .write()
            .map_err(|e| FireError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        limits.clear();
        for limit in file_data.budgets {
            if let Err(e) = limit.validate() {
                tracing::warn!("Skipping stored budget: {}", e);
                continue;
            }
            if limits.insert(limit.category.clone(), limit).is_some() {
                tracing::warn!("Duplicate budget in {}, keeping the last", self.path.display());
            }
        }

        Ok(())
    }

    pub fn save(&self) -> Result<(), FireError> {
        let budgets = self.get_all()?;
        write_json_atomic(&self.path, &BudgetData { budgets })
    }

    pub fn get(&self, category: &str) -> Result<Option<BudgetLimit>, FireError> {
        let limits = self
            .limits
            .read()
            .map_err(|e| FireError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(limits.get(category).cloned())
    }

    /// All limits ordered by category
    pub fn get_all(&self) -> Result<Vec<BudgetLimit>, FireError> {
        let limits = self
            .limits
            .read()
            .map_err(|e| FireError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = limits.values().cloned().collect();
        list.sort_by(|a, b| a.category.cmp(&b.category));
        Ok(list)
    }

    /// Set the monthly limit for a category, creating or replacing it
    pub fn set_limit(&self, category: &str, amount: Money) -> Result<BudgetLimit, FireError> {
        let mut limits = self
            .limits
            .write()
            .map_err(|e| FireError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let limit = match limits.get(category) {
            Some(existing) => {
                let mut updated = existing.clone();
                updated.set_limit(amount);
                updated
            }
            None => BudgetLimit::new(category, amount),
        };
        limit.validate()?;

        limits.insert(limit.category.clone(), limit.clone());
        Ok(limit)
    }

    pub fn remove(&self, category: &str) -> Result<bool, FireError> {
        let mut limits = self
            .limits
            .write()
            .map_err(|e| FireError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(limits.remove(category).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, BudgetRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = BudgetRepository::new(temp_dir.path().join("budgets.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_set_limit_upserts() {
        let (_temp_dir, repo) = create_test_repo();
        repo.set_limit("groceries", Money::from_cents(60_000)).unwrap();
        repo.set_limit("groceries", Money::from_cents(55_000)).unwrap();

        let all = repo.get_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].monthly_limit.cents(), 55_000);
    }

    #[test]
    fn test_rejects_non_positive_limit() {
        let (_temp_dir, repo) = create_test_repo();
        assert!(repo.set_limit("travel", Money::zero()).is_err());
        assert!(repo.get("travel").unwrap().is_none());
    }

    #[test]
    fn test_persist_and_remove() {
        let (temp_dir, repo) = create_test_repo();
        repo.set_limit("housing", Money::from_cents(200_000)).unwrap();
        repo.set_limit("dining_out", Money::from_cents(30_000)).unwrap();
        repo.save().unwrap();

        let reloaded = BudgetRepository::new(temp_dir.path().join("budgets.json"));
        reloaded.load().unwrap();
        let categories: Vec<String> = reloaded
            .get_all()
            .unwrap()
            .into_iter()
            .map(|b| b.category)
            .collect();
        assert_eq!(categories, vec!["dining_out", "housing"]);

        assert!(reloaded.remove("housing").unwrap());
        assert!(!reloaded.remove("housing").unwrap());
    }
}
