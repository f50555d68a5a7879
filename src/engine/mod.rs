//! Pure calculation engine
//!
//! Every function here takes in-memory records or summaries and returns a
//! derived view. Nothing in this module touches storage or the terminal.

pub mod aggregate;
pub mod allocation;
pub mod budget;
pub mod fire;
pub mod rebalance;

use crate::error::FireError;

pub use aggregate::{aggregate, Aggregate, AggregateSummary, Categorized};
pub use allocation::{
    compute_allocation, holdings_by_type, AllocationSlice, AllocationView, TargetSlice,
};
pub use budget::{analyze_budget, BudgetAnalysisRow};
pub use fire::{
    compute_fire_metrics, compute_fire_metrics_with, multiplier_for_withdrawal_rate, FireMetrics,
};
pub use rebalance::{
    suggest_rebalancing, suggest_rebalancing_with_threshold, RebalanceAction, RebalancePlan,
    RebalanceSuggestion, EMPTY_PORTFOLIO_MESSAGE,
};

/// Validation error for a total that no longer fits in `Money`
pub(crate) fn amount_overflow(what: &str) -> FireError {
    FireError::Validation(format!("{} is too large to represent", what))
}

/// Round to 2 decimal places, half away from zero
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::round2;

    #[test]
    fn test_round2() {
        assert_eq!(round2(47.058_823), 47.06);
        assert_eq!(round2(33.333_333), 33.33);
        assert_eq!(round2(-1.236), -1.24);
        assert_eq!(round2(0.0), 0.0);
    }
}
