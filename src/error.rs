//! Error type shared by every firetrack layer
//!
//! Engine functions only ever return `Validation`. Storage, import and
//! export map their failures to the variant naming the layer that failed.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FireError {
    /// Settings file missing a usable value or unreadable
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),

    /// Malformed data file
    #[error("JSON error: {0}")]
    Json(String),

    /// Input a model or calculation refuses: negative amounts, bad targets,
    /// non-positive multipliers
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// A short id matched more than one record
    #[error("{entity_type} id '{reference}' is ambiguous; use more characters")]
    AmbiguousId {
        entity_type: &'static str,
        reference: String,
    },

    /// CSV import failed as a whole (single bad rows are reported per row)
    #[error("Import error: {0}")]
    Import(String),

    #[error("Export error: {0}")]
    Export(String),

    /// Quotes file could not be understood
    #[error("Quote error: {0}")]
    Quote(String),

    /// Repository lock poisoned
    #[error("Storage error: {0}")]
    Storage(String),
}

impl FireError {
    pub fn expense_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Expense",
            identifier: identifier.into(),
        }
    }

    pub fn investment_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Investment",
            identifier: identifier.into(),
        }
    }

    pub fn budget_not_found(category: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Budget",
            identifier: category.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for FireError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for FireError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for FireError {
    fn from(err: csv::Error) -> Self {
        Self::Import(err.to_string())
    }
}

pub type FireResult<T> = Result<T, FireError>;
