//! Investment holding model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::InvestmentId;
use super::money::Money;
use super::quote::MarketQuote;
use super::target::AssetClass;
use crate::error::{FireError, FireResult};

/// Kind of holding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentType {
    Stocks,
    Bonds,
    Cash,
    Crypto,
}

impl InvestmentType {
    pub const ALL: [InvestmentType; 4] = [Self::Stocks, Self::Bonds, Self::Cash, Self::Crypto];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stocks => "stocks",
            Self::Bonds => "bonds",
            Self::Cash => "cash",
            Self::Crypto => "crypto",
        }
    }

    /// The canonical allocation class for this type, if it has one.
    /// Crypto sits outside the stocks/bonds/cash target mix.
    pub fn asset_class(&self) -> Option<AssetClass> {
        match self {
            Self::Stocks => Some(AssetClass::Stocks),
            Self::Bonds => Some(AssetClass::Bonds),
            Self::Cash => Some(AssetClass::Cash),
            Self::Crypto => None,
        }
    }
}

impl From<AssetClass> for InvestmentType {
    fn from(class: AssetClass) -> Self {
        match class {
            AssetClass::Stocks => Self::Stocks,
            AssetClass::Bonds => Self::Bonds,
            AssetClass::Cash => Self::Cash,
        }
    }
}

impl fmt::Display for InvestmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InvestmentType {
    type Err = FireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stocks" | "stock" | "equity" => Ok(Self::Stocks),
            "bonds" | "bond" => Ok(Self::Bonds),
            "cash" => Ok(Self::Cash),
            "crypto" => Ok(Self::Crypto),
            other => Err(FireError::Validation(format!(
                "Unknown investment type: {}. Use stocks, bonds, cash or crypto",
                other
            ))),
        }
    }
}

/// A holding in the portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentRecord {
    pub id: InvestmentId,

    #[serde(rename = "type")]
    pub investment_type: InvestmentType,

    /// Ticker symbol, when the holding is quoted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,

    pub name: String,

    /// Current value of the holding
    pub amount: Money,

    /// Price per unit at the time of the last update
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    /// Units held
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,

    pub date: NaiveDate,

    pub created_at: DateTime<Utc>,
}

impl InvestmentRecord {
    pub fn new(
        investment_type: InvestmentType,
        name: impl Into<String>,
        amount: Money,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: InvestmentId::new(),
            investment_type,
            symbol: None,
            name: name.into(),
            amount,
            price: None,
            quantity: None,
            date,
            created_at: Utc::now(),
        }
    }

    pub fn with_position(mut self, symbol: impl Into<String>, price: f64, quantity: f64) -> Self {
        self.symbol = Some(symbol.into());
        self.price = Some(price);
        self.quantity = Some(quantity);
        self
    }

    /// Validate the holding
    pub fn validate(&self) -> FireResult<()> {
        if !self.amount.is_positive() {
            return Err(FireError::Validation(format!(
                "Investment amount must be positive, got {}",
                self.amount
            )));
        }

        if self.name.trim().is_empty() {
            return Err(FireError::Validation("Investment name cannot be empty".into()));
        }

        for (field, value) in [("price", self.price), ("quantity", self.quantity)] {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(FireError::Validation(format!(
                        "Investment {} must be a non-negative number, got {}",
                        field, v
                    )));
                }
            }
        }

        Ok(())
    }

    /// Value of this holding at a quoted price.
    ///
    /// Returns `None` unless the holding has a quantity and the quote is for
    /// its symbol (case-insensitive).
    pub fn value_at(&self, quote: &MarketQuote) -> Option<Money> {
        let symbol = self.symbol.as_deref()?;
        let quantity = self.quantity?;
        if !symbol.eq_ignore_ascii_case(&quote.symbol) {
            return None;
        }
        Some(Money::from_f64_rounded(quantity * quote.price))
    }
}
