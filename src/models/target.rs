//! Target asset allocation
//!
//! The user's ideal split of portfolio value across the three canonical
//! asset classes. Percentages must add up to 100; that is checked when a
//! target is saved, the calculations themselves take whatever they are given.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{FireError, FireResult};

/// Allowed deviation of the percentage sum from 100
pub const TARGET_SUM_TOLERANCE: f64 = 0.01;

/// The canonical asset classes of a target allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    Stocks,
    Bonds,
    Cash,
}

impl AssetClass {
    pub const ALL: [AssetClass; 3] = [Self::Stocks, Self::Bonds, Self::Cash];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stocks => "stocks",
            Self::Bonds => "bonds",
            Self::Cash => "cash",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AssetClass {
    type Err = FireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stocks" => Ok(Self::Stocks),
            "bonds" => Ok(Self::Bonds),
            "cash" => Ok(Self::Cash),
            other => Err(FireError::Validation(format!(
                "Unknown asset class: {}. Use stocks, bonds or cash",
                other
            ))),
        }
    }
}

/// Target percentage for one asset class
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetAllocation {
    pub asset_class: AssetClass,
    /// Percentage of portfolio value, 0-100
    pub percentage: f64,
}

/// A complete target mix across stocks, bonds and cash
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetMix {
    pub stocks: f64,
    pub bonds: f64,
    pub cash: f64,
}

impl Default for TargetMix {
    /// Everything unassigned; a user without a target gets 0/0/0
    fn default() -> Self {
        Self {
            stocks: 0.0,
            bonds: 0.0,
            cash: 0.0,
        }
    }
}

impl TargetMix {
    pub fn new(stocks: f64, bonds: f64, cash: f64) -> Self {
        Self {
            stocks,
            bonds,
            cash,
        }
    }

    /// Build from per-class allocations; classes not listed get 0
    pub fn from_allocations(allocations: &[TargetAllocation]) -> Self {
        let mut mix = Self::default();
        for allocation in allocations {
            match allocation.asset_class {
                AssetClass::Stocks => mix.stocks = allocation.percentage,
                AssetClass::Bonds => mix.bonds = allocation.percentage,
                AssetClass::Cash => mix.cash = allocation.percentage,
            }
        }
        mix
    }

    pub fn percentage(&self, class: AssetClass) -> f64 {
        match class {
            AssetClass::Stocks => self.stocks,
            AssetClass::Bonds => self.bonds,
            AssetClass::Cash => self.cash,
        }
    }

    /// Per-class allocations in canonical order
    pub fn allocations(&self) -> Vec<TargetAllocation> {
        AssetClass::ALL
            .iter()
            .map(|&asset_class| TargetAllocation {
                asset_class,
                percentage: self.percentage(asset_class),
            })
            .collect()
    }

    pub fn total(&self) -> f64 {
        self.stocks + self.bonds + self.cash
    }

    /// Check each percentage is in [0, 100] and that they sum to 100
    pub fn validate(&self) -> FireResult<()> {
        for class in AssetClass::ALL {
            let pct = self.percentage(class);
            if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
                return Err(FireError::Validation(format!(
                    "Target percentage for {} must be between 0 and 100, got {}",
                    class, pct
                )));
            }
        }

        let total = self.total();
        if (total - 100.0).abs() > TARGET_SUM_TOLERANCE {
            return Err(FireError::Validation(format!(
                "Target percentages must sum to 100, got {:.2}",
                total
            )));
        }

        Ok(())
    }
}

impl fmt::Display for TargetMix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "stocks {}% / bonds {}% / cash {}%",
            self.stocks, self.bonds, self.cash
        )
    }
}
