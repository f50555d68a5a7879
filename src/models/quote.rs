//! Market quote supplied by an external price source

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A price snapshot for one symbol.
///
/// Fetching quotes happens outside this crate; quotes arrive as JSON in the
/// shape below and are only used to revalue holdings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketQuote {
    pub symbol: String,
    pub price: f64,
    #[serde(default)]
    pub change: f64,
    #[serde(default)]
    pub change_percent: f64,
    #[serde(default)]
    pub volume: u64,
    #[serde(default = "Utc::now")]
    pub last_updated: DateTime<Utc>,
}

impl MarketQuote {
    pub fn new(symbol: impl Into<String>, price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            change: 0.0,
            change_percent: 0.0,
            volume: 0,
            last_updated: Utc::now(),
        }
    }

    /// A quote is usable when its price is a finite, non-negative number
    pub fn is_usable(&self) -> bool {
        self.price.is_finite() && self.price >= 0.0 && !self.symbol.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_provider_shape() {
        let json = r#"{
            "symbol": "VTI",
            "price": 251.3,
            "change": -1.2,
            "changePercent": -0.47,
            "volume": 3120000,
            "lastUpdated": "2025-01-15T21:00:00Z"
        }"#;
        let quote: MarketQuote = serde_json::from_str(json).unwrap();
        assert_eq!(quote.symbol, "VTI");
        assert_eq!(quote.change_percent, -0.47);
        assert_eq!(quote.volume, 3_120_000);
        assert!(quote.is_usable());
    }

    #[test]
    fn test_unusable_quote() {
        assert!(!MarketQuote::new("VTI", f64::NAN).is_usable());
        assert!(!MarketQuote::new("", 10.0).is_usable());
    }
}
