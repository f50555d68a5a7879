//! Investment repository for JSON storage

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::FireError;
use crate::models::{InvestmentId, InvestmentRecord, InvestmentType};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct InvestmentData {
    #[serde(default)]
    investments: Vec<InvestmentRecord>,
}

pub struct InvestmentRepository {
    path: PathBuf,
    data: RwLock<HashMap<InvestmentId, InvestmentRecord>>,
}

impl InvestmentRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), FireError> {
        let file_data: InvestmentData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| FireError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for investment in file_data.investments {
            if let Err(e) = investment.validate() {
                tracing::warn!(id = %investment.id, "Skipping stored investment: {}", e);
                continue;
            }
            data.insert(investment.id, investment);
        }

        tracing::debug!("Loaded {} investments", data.len());
        Ok(())
    }

    pub fn save(&self) -> Result<(), FireError> {
        let investments = self.get_all()?;
        write_json_atomic(&self.path, &InvestmentData { investments })
    }

    pub fn get(&self, id: InvestmentId) -> Result<Option<InvestmentRecord>, FireError> {
        let data = self
            .data
            .read()
            .map_err(|e| FireError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Resolve a full or short id reference
    pub fn find(&self, reference: &str) -> Result<Option<InvestmentRecord>, FireError> {
        let data = self
            .data
            .read()
            .map_err(|e| FireError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut matches = data.values().filter(|i| i.id.matches(reference));
        match (matches.next(), matches.next()) {
            (Some(found), None) => Ok(Some(found.clone())),
            (Some(_), Some(_)) => Err(FireError::AmbiguousId {
                entity_type: "Investment",
                reference: reference.to_string(),
            }),
            _ => Ok(None),
        }
    }

    /// All holdings ordered by type, then name
    pub fn get_all(&self) -> Result<Vec<InvestmentRecord>, FireError> {
        let data = self
            .data
            .read()
            .map_err(|e| FireError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut investments: Vec<_> = data.values().cloned().collect();
        investments.sort_by(|a, b| {
            a.investment_type
                .cmp(&b.investment_type)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(investments)
    }

    pub fn get_by_type(
        &self,
        investment_type: InvestmentType,
    ) -> Result<Vec<InvestmentRecord>, FireError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|i| i.investment_type == investment_type)
            .collect())
    }

    pub fn upsert(&self, investment: InvestmentRecord) -> Result<(), FireError> {
        investment.validate()?;

        let mut data = self
            .data
            .write()
            .map_err(|e| FireError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(investment.id, investment);
        Ok(())
    }

    pub fn delete(&self, id: InvestmentId) -> Result<bool, FireError> {
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
