//! Target allocation repository for JSON storage
//!
//! Stored as one row per asset class. The mix is validated on every write so
//! the file always holds percentages that sum to 100.

use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::FireError;
use crate::models::{TargetAllocation, TargetMix};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TargetData {
    #[serde(default)]
    targets: Vec<TargetAllocation>,
}

pub struct TargetRepository {
    path: PathBuf,
    mix: RwLock<Option<TargetMix>>,
}

impl TargetRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            mix: RwLock::new(None),
        }
    }

    pub fn load(&self) -> Result<(), FireError> {
        let file_data: TargetData = read_json(&self.path)?;

        let loaded = if file_data.targets.is_empty() {
            None
        } else {
            let mix = TargetMix::from_allocations(&file_data.targets);
            if let Err(e) = mix.validate() {
                tracing::warn!("Ignoring stored target allocation: {}", e);
                None
            } else {
                Some(mix)
            }
        };

        let mut current = self
            .mix
            .write()
            .map_err(|e| FireError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *current = loaded;

        Ok(())
    }

    pub fn save(&self) -> Result<(), FireError> {
        let targets = self.get()?.map(|m| m.allocations()).unwrap_or_default();
        write_json_atomic(&self.path, &TargetData { targets })
    }

    /// The saved target, if one has been set
    pub fn get(&self) -> Result<Option<TargetMix>, FireError> {
        let mix = self
            .mix
            .read()
            .map_err(|e| FireError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(*mix)
    }

    /// Replace the target after checking it sums to 100
    pub fn set(&self, target: TargetMix) -> Result<(), FireError> {
        target.validate()?;

        let mut mix = self
            .mix
            .write()
            .map_err(|e| FireError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *mix = Some(target);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_unset_by_default() {
        let temp_dir = TempDir::new().unwrap();
        let repo = TargetRepository::new(temp_dir.path().join("targets.json"));
        repo.load().unwrap();
        assert!(repo.get().unwrap().is_none());
    }

    #[test]
    fn test_set_persists() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("targets.json");
        let repo = TargetRepository::new(path.clone());
        repo.set(TargetMix::new(70.0, 20.0, 10.0)).unwrap();
        repo.save().unwrap();

        let reloaded = TargetRepository::new(path);
        reloaded.load().unwrap();
        assert_eq!(reloaded.get().unwrap(), Some(TargetMix::new(70.0, 20.0, 10.0)));
    }

    #[test]
    fn test_rejects_bad_sum() {
        let temp_dir = TempDir::new().unwrap();
        let repo = TargetRepository::new(temp_dir.path().join("targets.json"));
        let err = repo.set(TargetMix::new(60.0, 30.0, 5.0)).unwrap_err();
        assert!(err.is_validation());
        assert!(repo.get().unwrap().is_none());
    }
}
