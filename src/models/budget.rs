//! Monthly budget limit model
//!
//! One limit per category; setting a limit for a category that already has
//! one replaces it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;
use crate::error::{FireError, FireResult};

/// Monthly spending limit for a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetLimit {
    /// Category code the limit applies to
    pub category: String,

    /// Maximum planned spend per month
    pub monthly_limit: Money,

    /// When this limit was last set
    pub updated_at: DateTime<Utc>,
}

impl BudgetLimit {
    pub fn new(category: impl Into<String>, monthly_limit: Money) -> Self {
        Self {
            category: category.into(),
            monthly_limit,
            updated_at: Utc::now(),
        }
    }

    /// Replace the limit amount
    pub fn set_limit(&mut self, amount: Money) {
        self.monthly_limit = amount;
        self.updated_at = Utc::now();
    }

    /// A limit must be positive and name a category
    pub fn validate(&self) -> FireResult<()> {
        if self.category.trim().is_empty() {
            return Err(FireError::Validation(
                "Budget category cannot be empty".into(),
            ));
        }

        if !self.monthly_limit.is_positive() {
            return Err(FireError::Validation(format!(
                "Monthly limit for '{}' must be positive, got {}",
                self.category, self.monthly_limit
            )));
        }

        Ok(())
    }
}

impl fmt::Display for BudgetLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} / month", self.category, self.monthly_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_limit() {
        let limit = BudgetLimit::new("housing", Money::from_dollars_cents(2000, 0));
        assert_eq!(limit.monthly_limit.cents(), 200_000);
        assert!(limit.validate().is_ok());
        assert_eq!(limit.to_string(), "housing: $2000.00 / month");
    }

    #[test]
    fn test_set_limit() {
        let mut limit = BudgetLimit::new("groceries", Money::from_cents(50_000));
        let before = limit.updated_at;
        limit.set_limit(Money::from_cents(60_000));
        assert_eq!(limit.monthly_limit.cents(), 60_000);
        assert!(limit.updated_at >= before);
    }

    #[test]
    fn test_validation() {
        assert!(BudgetLimit::new("housing", Money::zero())
            .validate()
            .unwrap_err()
            .is_validation());
        assert!(BudgetLimit::new("housing", Money::from_cents(-100))
            .validate()
            .is_err());
        assert!(BudgetLimit::new("", Money::from_cents(100))
            .validate()
            .is_err());
    }
}
