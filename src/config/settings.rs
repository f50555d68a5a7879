//! User settings for firetrack
//!
//! Holds the values the calculations need from the user: monthly income,
//! the FIRE withdrawal multiplier and the rebalancing materiality threshold,
//! plus display preferences.

use serde::{Deserialize, Serialize};

use super::paths::FirePaths;
use crate::error::FireError;
use crate::models::Money;

/// Default withdrawal multiplier (about a 3.5% withdrawal rate)
pub const DEFAULT_WITHDRAWAL_MULTIPLIER: f64 = 28.6;

/// Default materiality threshold for rebalancing, in percent of portfolio value
pub const DEFAULT_MATERIALITY_PERCENT: f64 = 1.0;

/// User settings for firetrack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Default currency symbol
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Net monthly income used for savings rate
    #[serde(default)]
    pub monthly_income: Money,

    /// Inverse of the safe withdrawal rate (25 = 4% rule)
    #[serde(default = "default_withdrawal_multiplier")]
    pub withdrawal_multiplier: f64,

    /// Minimum drift, in percent of portfolio value, worth a rebalance suggestion
    #[serde(default = "default_materiality_percent")]
    pub materiality_percent: f64,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_withdrawal_multiplier() -> f64 {
    DEFAULT_WITHDRAWAL_MULTIPLIER
}

fn default_materiality_percent() -> f64 {
    DEFAULT_MATERIALITY_PERCENT
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            monthly_income: Money::zero(),
            withdrawal_multiplier: default_withdrawal_multiplier(),
            materiality_percent: default_materiality_percent(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &FirePaths) -> Result<Self, FireError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| FireError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                FireError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            settings.validate()?;
            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &FirePaths) -> Result<(), FireError> {
        self.validate()?;
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| FireError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(&settings_path, contents)
            .map_err(|e| FireError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Reject values the calculations cannot use
    pub fn validate(&self) -> Result<(), FireError> {
        if !self.withdrawal_multiplier.is_finite() || self.withdrawal_multiplier <= 0.0 {
            return Err(FireError::Config(format!(
                "withdrawal_multiplier must be positive, got {}",
                self.withdrawal_multiplier
            )));
        }

        if !self.materiality_percent.is_finite() || self.materiality_percent < 0.0 {
            return Err(FireError::Config(format!(
                "materiality_percent must be zero or positive, got {}",
                self.materiality_percent
            )));
        }

        if self.monthly_income.is_negative() {
            return Err(FireError::Config(
                "monthly_income cannot be negative".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.withdrawal_multiplier, 28.6);
        assert_eq!(settings.materiality_percent, 1.0);
        assert!(settings.monthly_income.is_zero());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FirePaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.monthly_income = Money::from_dollars_cents(8500, 0);
        settings.withdrawal_multiplier = 25.0;

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.monthly_income.cents(), 850_000);
        assert_eq!(loaded.withdrawal_multiplier, 25.0);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"monthly_income": 500000}"#).unwrap();
        assert_eq!(settings.monthly_income.cents(), 500_000);
        assert_eq!(settings.withdrawal_multiplier, DEFAULT_WITHDRAWAL_MULTIPLIER);
        assert_eq!(settings.currency_symbol, "$");
    }

    #[test]
    fn test_rejects_bad_multiplier() {
        let mut settings = Settings::default();
        settings.withdrawal_multiplier = 0.0;
        assert!(settings.validate().is_err());

        settings.withdrawal_multiplier = f64::NAN;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_rejects_negative_threshold() {
        let mut settings = Settings::default();
        settings.materiality_percent = -1.0;
        assert!(settings.validate().is_err());
    }
}
