//! Allocation Calculator
//!
//! Compares current holdings, grouped by investment type, with the target
//! mix. Stocks, bonds and cash are always reported; other types (crypto)
//! are reported after them when held, and never folded into the three.

use serde::Serialize;
use std::collections::HashMap;

use super::amount_overflow;
use crate::error::FireResult;
use crate::models::{AssetClass, InvestmentRecord, InvestmentType, Money, TargetMix};

/// Current position in one investment type
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AllocationSlice {
    #[serde(rename = "type")]
    pub investment_type: InvestmentType,
    pub amount: Money,
    /// Share of total portfolio value, unrounded
    pub percentage: f64,
}

/// Target share for one canonical asset class
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TargetSlice {
    #[serde(rename = "type")]
    pub asset_class: AssetClass,
    pub percentage: f64,
}

/// Current vs. target allocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationView {
    pub current: Vec<AllocationSlice>,
    pub target: Vec<TargetSlice>,
    pub total_value: Money,
}

impl AllocationView {
    /// Current slice for a type
    pub fn current_for(&self, investment_type: InvestmentType) -> Option<&AllocationSlice> {
        self.current
            .iter()
            .find(|slice| slice.investment_type == investment_type)
    }

    /// Amounts held in the canonical classes, the input of the rebalancer
    pub fn class_amounts(&self) -> HashMap<AssetClass, Money> {
        self.current
            .iter()
            .filter_map(|slice| {
                slice
                    .investment_type
                    .asset_class()
                    .map(|class| (class, slice.amount))
            })
            .collect()
    }

    /// Target percentages as a mix
    pub fn target_mix(&self) -> TargetMix {
        let mut mix = TargetMix::default();
        for slice in &self.target {
            match slice.asset_class {
                AssetClass::Stocks => mix.stocks = slice.percentage,
                AssetClass::Bonds => mix.bonds = slice.percentage,
                AssetClass::Cash => mix.cash = slice.percentage,
            }
        }
        mix
    }
}

/// Sum investment records per type
pub fn holdings_by_type<'a, I>(investments: I) -> FireResult<HashMap<InvestmentType, Money>>
where
    I: IntoIterator<Item = &'a InvestmentRecord>,
{
    let mut holdings: HashMap<InvestmentType, Money> = HashMap::new();
    for investment in investments {
        let held = holdings.entry(investment.investment_type).or_default();
        *held = held.checked_add(investment.amount).ok_or_else(|| {
            amount_overflow(&format!("Holdings in {}", investment.investment_type))
        })?;
    }
    Ok(holdings)
}

/// Compute current percentages per type against the target mix.
///
/// `total_value` covers every type in `holdings`. Percentages are 0 when the
/// portfolio is empty.
///
/// # Errors
///
/// Returns a validation error when the portfolio total overflows.
pub fn compute_allocation(
    holdings: &HashMap<InvestmentType, Money>,
    target: &TargetMix,
) -> FireResult<AllocationView> {
    let total_value = Money::checked_sum(holdings.values().copied())
        .ok_or_else(|| amount_overflow("Portfolio value"))?;

    let slice = |investment_type: InvestmentType| {
        let amount = holdings.get(&investment_type).copied().unwrap_or_default();
        AllocationSlice {
            investment_type,
            amount,
            percentage: amount.percent_of(total_value),
        }
    };

    let mut current: Vec<AllocationSlice> = AssetClass::ALL
        .iter()
        .map(|&class| slice(InvestmentType::from(class)))
        .collect();

    let mut extra: Vec<InvestmentType> = holdings
        .iter()
        .filter(|(t, amount)| t.asset_class().is_none() && !amount.is_zero())
        .map(|(t, _)| *t)
        .collect();
    extra.sort();
    current.extend(extra.into_iter().map(slice));

    let target = AssetClass::ALL
        .iter()
        .map(|&asset_class| TargetSlice {
            asset_class,
            percentage: target.percentage(asset_class),
        })
        .collect();

    Ok(AllocationView {
        current,
        target,
        total_value,
    })
}
