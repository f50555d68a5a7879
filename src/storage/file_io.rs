//! JSON file helpers with atomic writes
//!
//! A write either replaces the whole file or leaves the old one in place.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::FireError;

/// Read JSON from a file, or the default value when the file does not exist
pub fn read_json<T, P>(path: P) -> Result<T, FireError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        tracing::debug!("{} not found, starting empty", path.display());
        return Ok(T::default());
    }

    let file = File::open(path)
        .map_err(|e| FireError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| FireError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write JSON to `path` through a sibling temp file and a rename
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), FireError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            FireError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = path.with_extension("json.tmp");

    let file = File::create(&temp_path)
        .map_err(|e| FireError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| FireError::Storage(format!("Failed to serialize data: {}", e)))?;

    writer
        .flush()
        .map_err(|e| FireError::Storage(format!("Failed to flush data: {}", e)))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| FireError::Storage(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        FireError::Storage(format!("Failed to rename temp file: {}", e))
    })?;

    tracing::debug!("Wrote {}", path.display());
    Ok(())
}
