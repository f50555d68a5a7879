//! Expense record model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::ExpenseId;
use super::money::Money;
use crate::error::{FireError, FireResult};

/// A single logged expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: ExpenseId,

    /// Amount spent (always positive)
    pub amount: Money,

    /// Category code from the taxonomy (stored verbatim, matched exactly)
    pub category: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Date the money was spent
    pub date: NaiveDate,

    pub created_at: DateTime<Utc>,
}

impl ExpenseRecord {
    pub fn new(amount: Money, category: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: ExpenseId::new(),
            amount,
            category: category.into(),
            description: None,
            date,
            created_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = if description.trim().is_empty() {
            None
        } else {
            Some(description)
        };
        self
    }

    /// Validate the expense
    pub fn validate(&self) -> FireResult<()> {
        if !self.amount.is_positive() {
            return Err(FireError::Validation(format!(
                "Expense amount must be positive, got {}",
                self.amount
            )));
        }

        if self.category.trim().is_empty() {
            return Err(FireError::Validation(
                "Expense category cannot be empty".into(),
            ));
        }

        Ok(())
    }
}

impl fmt::Display for ExpenseRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.date, self.category, self.amount)
    }
}
