//! First-run setup

use crate::config::paths::FirePaths;
use crate::config::settings::Settings;
use crate::error::FireError;

/// Create the data directory and default settings.
///
/// Existing settings and data files are left untouched. Returns true when
/// this call created the settings file.
pub fn initialize_storage(paths: &FirePaths) -> Result<bool, FireError> {
    paths.ensure_directories()?;

    if paths.is_initialized() {
        tracing::debug!("Already initialized at {}", paths.base_dir().display());
        return Ok(false);
    }

    Settings::default().save(paths)?;
    tracing::info!("Initialized firetrack at {}", paths.base_dir().display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FirePaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(initialize_storage(&paths).unwrap());
        assert!(paths.settings_file().exists());
        assert!(paths.data_dir().exists());

        let mut settings = Settings::load_or_create(&paths).unwrap();
        settings.currency_symbol = "€".into();
        settings.save(&paths).unwrap();

        assert!(!initialize_storage(&paths).unwrap());
        assert_eq!(Settings::load_or_create(&paths).unwrap().currency_symbol, "€");
    }
}
