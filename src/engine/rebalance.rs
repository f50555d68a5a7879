//! Rebalancing Suggester
//!
//! Turns the gap between current and target allocation into buy/sell
//! suggestions. Gaps at or below the materiality threshold (1% of portfolio
//! value by default) count as balanced and produce no suggestion.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use super::allocation::AllocationView;
use super::round2;
use crate::config::settings::DEFAULT_MATERIALITY_PERCENT;
use crate::error::{FireError, FireResult};
use crate::models::{AssetClass, Money, TargetMix};

/// Message returned in place of suggestions for an empty portfolio
pub const EMPTY_PORTFOLIO_MESSAGE: &str =
    "Portfolio has no value yet; add investments before rebalancing.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RebalanceAction {
    Buy,
    Sell,
}

impl fmt::Display for RebalanceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// One suggested trade
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RebalanceSuggestion {
    #[serde(rename = "type")]
    pub asset_class: AssetClass,
    pub current_amount: Money,
    /// Rounded to 2 decimals
    pub current_percentage: f64,
    pub target_percentage: f64,
    pub target_amount: Money,
    /// target_amount - current_amount; positive means buy
    pub difference: Money,
    pub action: RebalanceAction,
}

/// Suggestions for a portfolio, largest move first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RebalancePlan {
    pub total_value: Money,
    pub suggestions: Vec<RebalanceSuggestion>,
    /// Set instead of suggestions when there is nothing to compare against
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RebalancePlan {
    /// True when no trade is needed
    pub fn is_balanced(&self) -> bool {
        self.suggestions.is_empty()
    }

    /// Suggestions from an allocation view, using the view's own target
    pub fn from_allocation(view: &AllocationView) -> Self {
        suggest_rebalancing(&view.class_amounts(), &view.target_mix(), view.total_value)
    }
}

/// Suggest trades using the default 1% materiality threshold
pub fn suggest_rebalancing(
    current: &HashMap<AssetClass, Money>,
    target: &TargetMix,
    total_value: Money,
) -> RebalancePlan {
    build_plan(current, target, total_value, DEFAULT_MATERIALITY_PERCENT)
}

/// Suggest trades with a custom threshold, in percent of portfolio value
pub fn suggest_rebalancing_with_threshold(
    current: &HashMap<AssetClass, Money>,
    target: &TargetMix,
    total_value: Money,
    threshold_percent: f64,
) -> FireResult<RebalancePlan> {
    if !threshold_percent.is_finite() || threshold_percent < 0.0 {
        return Err(FireError::Validation(format!(
            "Materiality threshold must be zero or positive, got {}",
            threshold_percent
        )));
    }
    Ok(build_plan(current, target, total_value, threshold_percent))
}

fn build_plan(
    current: &HashMap<AssetClass, Money>,
    target: &TargetMix,
    total_value: Money,
    threshold_percent: f64,
) -> RebalancePlan {
    if !total_value.is_positive() {
        tracing::debug!("Skipping rebalance: portfolio value is {}", total_value);
        return RebalancePlan {
            total_value,
            suggestions: Vec::new(),
            message: Some(EMPTY_PORTFOLIO_MESSAGE.to_string()),
        };
    }

    let threshold_cents = total_value.cents() as f64 * threshold_percent / 100.0;

    let mut suggestions: Vec<RebalanceSuggestion> = AssetClass::ALL
        .iter()
        .filter_map(|&asset_class| {
            let current_amount = current.get(&asset_class).copied().unwrap_or_default();
            let target_percentage = target.percentage(asset_class);
            let target_amount = total_value.scale_percent(target_percentage);
            let difference = target_amount - current_amount;

            if (difference.abs().cents() as f64) <= threshold_cents {
                return None;
            }

            let action = if difference.is_positive() {
                RebalanceAction::Buy
            } else {
                RebalanceAction::Sell
            };

            Some(RebalanceSuggestion {
                asset_class,
                current_amount,
                current_percentage: round2(current_amount.percent_of(total_value)),
                target_percentage,
                target_amount,
                difference,
                action,
            })
        })
        .collect();

    suggestions.sort_by(|a, b| {
        b.difference
            .abs()
            .cmp(&a.difference.abs())
            .then_with(|| a.asset_class.as_str().cmp(b.asset_class.as_str()))
    });

    RebalancePlan {
        total_value,
        suggestions,
        message: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dollars(d: i64) -> Money {
        Money::from_dollars_cents(d, 0)
    }

    fn current(stocks: Money, bonds: Money, cash: Money) -> HashMap<AssetClass, Money> {
        HashMap::from([
            (AssetClass::Stocks, stocks),
            (AssetClass::Bonds, bonds),
            (AssetClass::Cash, cash),
        ])
    }

    fn standard_target() -> TargetMix {
        TargetMix::new(60.0, 30.0, 10.0)
    }

    #[test]
    fn test_balanced_portfolio_has_no_suggestions() {
        let plan = suggest_rebalancing(
            &current(dollars(6000), dollars(3000), dollars(1000)),
            &standard_target(),
            dollars(10_000),
        );
        assert!(plan.is_balanced());
        assert!(plan.message.is_none());
    }

    #[test]
    fn test_overweight_stocks() {
        let plan = suggest_rebalancing(
            &current(dollars(8000), dollars(1000), dollars(1000)),
            &standard_target(),
            dollars(10_000),
        );

        assert_eq!(plan.suggestions.len(), 2);

        let bonds = &plan.suggestions[0];
        assert_eq!(bonds.asset_class, AssetClass::Bonds);
        assert_eq!(bonds.current_percentage, 10.0);
        assert_eq!(bonds.target_amount, dollars(3000));
        assert_eq!(bonds.difference, dollars(2000));
        assert_eq!(bonds.action, RebalanceAction::Buy);

        let stocks = &plan.suggestions[1];
        assert_eq!(stocks.asset_class, AssetClass::Stocks);
        assert_eq!(stocks.current_percentage, 80.0);
        assert_eq!(stocks.target_amount, dollars(6000));
        assert_eq!(stocks.difference, dollars(-2000));
        assert_eq!(stocks.action, RebalanceAction::Sell);
    }

    #[test]
    fn test_threshold_boundary_is_exclusive() {
        let plan = suggest_rebalancing(
            &current(dollars(5900), dollars(3100), dollars(1000)),
            &standard_target(),
            dollars(10_000),
        );
        assert!(plan.is_balanced());

        let plan = suggest_rebalancing(
            &current(
                Money::from_cents(589_999),
                Money::from_cents(310_001),
                dollars(1000),
            ),
            &standard_target(),
            dollars(10_000),
        );
        assert_eq!(plan.suggestions.len(), 2);
        assert!(plan
            .suggestions
            .iter()
            .all(|s| s.difference.abs() == Money::from_cents(10_001)));
    }

    #[test]
    fn test_ordered_by_magnitude() {
        let plan = suggest_rebalancing(
            &current(dollars(7000), dollars(2500), dollars(500)),
            &standard_target(),
            dollars(10_000),
        );
        let order: Vec<AssetClass> = plan.suggestions.iter().map(|s| s.asset_class).collect();
        assert_eq!(
            order,
            vec![AssetClass::Stocks, AssetClass::Bonds, AssetClass::Cash]
        );
    }

    #[test]
    fn test_empty_portfolio_returns_message() {
        let plan = suggest_rebalancing(&HashMap::new(), &standard_target(), Money::zero());
        assert!(plan.suggestions.is_empty());
        assert_eq!(plan.message.as_deref(), Some(EMPTY_PORTFOLIO_MESSAGE));
    }

    #[test]
    fn test_idempotent() {
        let holdings = current(dollars(8000), dollars(1000), dollars(1000));
        let first = suggest_rebalancing(&holdings, &standard_target(), dollars(10_000));
        let second = suggest_rebalancing(&holdings, &standard_target(), dollars(10_000));
        assert_eq!(first, second);
    }

    #[test]
    fn test_crypto_in_total_only() {
        // 1000 of the 10000 total sits outside the canonical classes
        let plan = suggest_rebalancing(
            &current(dollars(5400), dollars(2700), dollars(900)),
            &standard_target(),
            dollars(10_000),
        );
        assert_eq!(plan.suggestions.len(), 2);
        assert_eq!(plan.suggestions[0].asset_class, AssetClass::Stocks);
        assert_eq!(plan.suggestions[0].difference, dollars(600));
        assert_eq!(plan.suggestions[1].difference, dollars(300));
    }

    #[test]
    fn test_custom_threshold() {
        let holdings = current(dollars(5500), dollars(3500), dollars(1000));
        let loose = suggest_rebalancing_with_threshold(
            &holdings,
            &standard_target(),
            dollars(10_000),
            5.0,
        )
        .unwrap();
        assert!(loose.is_balanced());

        let strict = suggest_rebalancing_with_threshold(
            &holdings,
            &standard_target(),
            dollars(10_000),
            0.0,
        )
        .unwrap();
        assert_eq!(strict.suggestions.len(), 2);

        assert!(suggest_rebalancing_with_threshold(
            &holdings,
            &standard_target(),
            dollars(10_000),
            -1.0
        )
        .is_err());
    }

    #[test]
    fn test_from_allocation_view() {
        use crate::engine::allocation::compute_allocation;
        use crate::models::InvestmentType;

        let holdings = HashMap::from([
            (InvestmentType::Stocks, dollars(8000)),
            (InvestmentType::Bonds, dollars(1000)),
            (InvestmentType::Cash, dollars(1000)),
        ]);
        let view = compute_allocation(&holdings, &standard_target()).unwrap();
        let plan = RebalancePlan::from_allocation(&view);
        assert_eq!(plan.suggestions.len(), 2);
        assert_eq!(plan.total_value, dollars(10_000));
    }
}
