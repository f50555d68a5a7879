//! Holding revaluation from market quotes
//!
//! Quotes are read from a JSON file produced elsewhere. A holding is
//! revalued when it carries a symbol and a quantity and a usable quote for
//! that symbol is present; every other holding keeps its stored amount.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{FireError, FireResult};
use crate::models::{InvestmentRecord, MarketQuote};
use crate::storage::Storage;

/// Holdings after applying quotes
#[derive(Debug, Clone, Default)]
pub struct Revaluation {
    pub holdings: Vec<InvestmentRecord>,
    /// Number of holdings whose amount came from a quote
    pub repriced: usize,
    /// Symbols held with a quantity but absent from the quotes
    pub missing_symbols: Vec<String>,
}

/// Read quotes from a JSON file holding either an array of quotes or a
/// single quote object
pub fn load_quotes(path: &Path) -> FireResult<Vec<MarketQuote>> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| FireError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    let invalid = |e: serde_json::Error| FireError::Quote(format!("{}: {}", path.display(), e));

    let value: serde_json::Value = serde_json::from_str(&contents).map_err(invalid)?;
    let quotes: Vec<MarketQuote> = if value.is_array() {
        serde_json::from_value(value).map_err(invalid)?
    } else {
        vec![serde_json::from_value(value).map_err(invalid)?]
    };

    tracing::debug!("Loaded {} quotes from {}", quotes.len(), path.display());
    Ok(quotes)
}

/// Apply quotes to holdings without touching storage
pub fn revalue(holdings: &[InvestmentRecord], quotes: &[MarketQuote]) -> Revaluation {
    let by_symbol: HashMap<String, &MarketQuote> = quotes
        .iter()
        .filter(|q| {
            let usable = q.is_usable();
            if !usable {
                tracing::warn!(symbol = %q.symbol, price = q.price, "Ignoring unusable quote");
            }
            usable
        })
        .map(|q| (q.symbol.to_uppercase(), q))
        .collect();

    let mut result = Revaluation::default();

    for holding in holdings {
        let mut holding = holding.clone();

        if let (Some(symbol), Some(_)) = (holding.symbol.clone(), holding.quantity) {
            match by_symbol.get(&symbol.to_uppercase()) {
                Some(quote) => {
                    if let Some(value) = holding.value_at(quote) {
                        holding.amount = value;
                        holding.price = Some(quote.price);
                        result.repriced += 1;
                    }
                }
                None => result.missing_symbols.push(symbol),
            }
        }

        result.holdings.push(holding);
    }

    result.missing_symbols.sort();
    result.missing_symbols.dedup();
    result
}

/// Revalues stored holdings
pub struct PortfolioService<'a> {
    storage: &'a Storage,
}

impl<'a> PortfolioService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Current holdings, revalued with `quotes` when given
    pub fn holdings(&self, quotes: Option<&[MarketQuote]>) -> FireResult<Revaluation> {
        let stored = self.storage.investments.get_all()?;
        Ok(match quotes {
            Some(quotes) => revalue(&stored, quotes),
            None => Revaluation {
                holdings: stored,
                ..Revaluation::default()
            },
        })
    }

    /// Write revalued amounts back to storage.
    ///
    /// Holdings that would drop to zero keep their stored amount, since a
    /// stored holding must stay positive.
    pub fn apply_quotes(&self, quotes: &[MarketQuote]) -> FireResult<Revaluation> {
        let revaluation = self.holdings(Some(quotes))?;

        for holding in &revaluation.holdings {
            if holding.amount.is_positive() {
                self.storage.investments.upsert(holding.clone())?;
            } else {
                tracing::warn!(
                    name = %holding.name,
                    "Quote values holding at zero, keeping stored amount"
                );
            }
        }
        self.storage.investments.save()?;

        Ok(revaluation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FirePaths;
    use crate::models::{InvestmentType, Money};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()
    }

    fn sample_holdings() -> Vec<InvestmentRecord> {
        vec![
            InvestmentRecord::new(
                InvestmentType::Stocks,
                "Total Market",
                Money::from_cents(500_000),
                date(),
            )
            .with_position("VTI", 200.0, 25.0),
            InvestmentRecord::new(
                InvestmentType::Bonds,
                "Bond Fund",
                Money::from_cents(300_000),
                date(),
            )
            .with_position("BND", 75.0, 40.0),
            InvestmentRecord::new(InvestmentType::Cash, "HYSA", Money::from_cents(100_000), date()),
        ]
    }

    #[test]
    fn test_revalue_matching_symbols() {
        let quotes = vec![MarketQuote::new("vti", 240.0)];
        let result = revalue(&sample_holdings(), &quotes);

        assert_eq!(result.repriced, 1);
        assert_eq!(result.holdings[0].amount.cents(), 600_000);
        assert_eq!(result.holdings[0].price, Some(240.0));
        assert_eq!(result.holdings[1].amount.cents(), 300_000);
        assert_eq!(result.holdings[2].amount.cents(), 100_000);
        assert_eq!(result.missing_symbols, vec!["BND".to_string()]);
    }

    #[test]
    fn test_unusable_quotes_ignored() {
        let quotes = vec![MarketQuote::new("VTI", f64::NAN)];
        let result = revalue(&sample_holdings(), &quotes);
        assert_eq!(result.repriced, 0);
        assert_eq!(result.holdings[0].amount.cents(), 500_000);
    }

    #[test]
    fn test_load_quotes_array_and_single() {
        let temp_dir = TempDir::new().unwrap();
        let many = temp_dir.path().join("many.json");
        std::fs::write(
            &many,
            r#"[{"symbol":"VTI","price":250.0},{"symbol":"BND","price":72.5,"changePercent":0.1}]"#,
        )
        .unwrap();
        assert_eq!(load_quotes(&many).unwrap().len(), 2);

        let one = temp_dir.path().join("one.json");
        std::fs::write(&one, r#"{"symbol":"VTI","price":250.0}"#).unwrap();
        assert_eq!(load_quotes(&one).unwrap()[0].symbol, "VTI");

        let bad = temp_dir.path().join("bad.json");
        std::fs::write(&bad, r#"{"price":1.0}"#).unwrap();
        assert!(load_quotes(&bad).is_err());
    }

    #[test]
    fn test_apply_quotes_persists() {
        let temp_dir = TempDir::new().unwrap();
        let storage =
            Storage::new(FirePaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        for holding in sample_holdings() {
            storage.investments.upsert(holding).unwrap();
        }

        let service = PortfolioService::new(&storage);
        service
            .apply_quotes(&[MarketQuote::new("BND", 80.0), MarketQuote::new("VTI", 0.0)])
            .unwrap();

        storage.investments.load().unwrap();
        let amounts: HashMap<String, i64> = storage
            .investments
            .get_all()
            .unwrap()
            .into_iter()
            .map(|h| (h.name, h.amount.cents()))
            .collect();
        assert_eq!(amounts["Bond Fund"], 320_000);
        assert_eq!(amounts["Total Market"], 500_000);
    }
}
