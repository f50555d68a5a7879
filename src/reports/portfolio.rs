//! Portfolio Allocation Report
//!
//! Current allocation against the target mix, with rebalancing suggestions.

use std::io::Write;

use crate::display::report::{
    csv_amount, format_bar, format_signed, format_title, separator, write_csv, REPORT_WIDTH,
};
use crate::engine::{
    compute_allocation, holdings_by_type, suggest_rebalancing_with_threshold, AllocationView,
    RebalancePlan,
};
use crate::error::FireResult;
use crate::models::{AssetClass, InvestmentRecord, MarketQuote, TargetMix};
use crate::services::PortfolioService;
use crate::storage::Storage;

#[derive(Debug, Clone)]
pub struct PortfolioReport {
    pub allocation: AllocationView,
    pub plan: RebalancePlan,
    /// False when no target has been saved and an all-zero target was used
    pub has_target: bool,
    pub repriced: usize,
    pub missing_symbols: Vec<String>,
}

impl PortfolioReport {
    /// Generate from stored holdings and target, optionally revalued
    pub fn generate(
        storage: &Storage,
        quotes: Option<&[MarketQuote]>,
        threshold_percent: f64,
    ) -> FireResult<Self> {
        let revaluation = PortfolioService::new(storage).holdings(quotes)?;
        let target = storage.targets.get()?;

        let mut report = Self::from_holdings(&revaluation.holdings, target, threshold_percent)?;
        report.repriced = revaluation.repriced;
        report.missing_symbols = revaluation.missing_symbols;
        Ok(report)
    }

    pub fn from_holdings(
        holdings: &[InvestmentRecord],
        target: Option<TargetMix>,
        threshold_percent: f64,
    ) -> FireResult<Self> {
        let has_target = target.is_some();
        let target = target.unwrap_or_default();

        let allocation = compute_allocation(&holdings_by_type(holdings)?, &target)?;
        let plan = if has_target {
            suggest_rebalancing_with_threshold(
                &allocation.class_amounts(),
                &target,
                allocation.total_value,
                threshold_percent,
            )?
        } else {
            RebalancePlan {
                total_value: allocation.total_value,
                suggestions: Vec::new(),
                message: Some(
                    "No target allocation set; run `firetrack target set` first.".to_string(),
                ),
            }
        };

        Ok(Self {
            allocation,
            plan,
            has_target,
            repriced: 0,
            missing_symbols: Vec::new(),
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = format_title("Portfolio Allocation");
        output.push_str(&format!("Total Value: {}\n", self.allocation.total_value));
        if self.repriced > 0 {
            output.push_str(&format!("Holdings repriced from quotes: {}\n", self.repriced));
        }
        if !self.missing_symbols.is_empty() {
            output.push_str(&format!(
                "No quote for: {}\n",
                self.missing_symbols.join(", ")
            ));
        }
        output.push('\n');

        output.push_str(&format!(
            "{:<10} {:>14} {:>9} {:>9}  {}\n",
            "Type", "Amount", "Current", "Target", ""
        ));
        output.push_str(&separator(REPORT_WIDTH));
        output.push('\n');

        for slice in &self.allocation.current {
            let target = slice
                .investment_type
                .asset_class()
                .filter(|_| self.has_target)
                .map(|class| format!("{:.1}%", self.plan_target(class)))
                .unwrap_or_else(|| "-".to_string());

            output.push_str(&format!(
                "{:<10} {:>14} {:>8.1}% {:>9}  {}\n",
                slice.investment_type.as_str(),
                slice.amount.to_string(),
                slice.percentage,
                target,
                format_bar(slice.percentage, 100.0, 20)
            ));
        }

        output.push_str("\nRebalancing\n");
        output.push_str(&separator(REPORT_WIDTH));
        output.push('\n');

        if let Some(message) = &self.plan.message {
            output.push_str(message);
            output.push('\n');
        } else if self.plan.is_balanced() {
            output.push_str("Portfolio is within the materiality threshold. Nothing to do.\n");
        } else {
            for s in &self.plan.suggestions {
                output.push_str(&format!(
                    "{:<5} {:<7} {:>14}   ({:.2}% -> {:.2}%, target {})\n",
                    s.action.to_string().to_uppercase(),
                    s.asset_class.as_str(),
                    s.difference.abs().to_string(),
                    s.current_percentage,
                    s.target_percentage,
                    s.target_amount
                ));
            }
        }

        output
    }

    fn plan_target(&self, class: AssetClass) -> f64 {
        self.allocation.target_mix().percentage(class)
    }

    /// Export allocation and suggestions to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> FireResult<()> {
        let header = [
            "Type",
            "Amount",
            "Current Percentage",
            "Target Percentage",
            "Target Amount",
            "Difference",
            "Action",
        ];

        let rows = self.allocation.current.iter().map(|slice| {
            let class = slice.investment_type.asset_class();
            let suggestion =
                class.and_then(|c| self.plan.suggestions.iter().find(|s| s.asset_class == c));
            let target_pct = class
                .filter(|_| self.has_target)
                .map(|c| format!("{:.2}", self.plan_target(c)))
                .unwrap_or_default();

            vec![
                slice.investment_type.as_str().to_string(),
                csv_amount(slice.amount),
                format!("{:.2}", slice.percentage),
                target_pct,
                suggestion.map(|s| csv_amount(s.target_amount)).unwrap_or_default(),
                suggestion.map(|s| csv_amount(s.difference)).unwrap_or_default(),
                suggestion.map(|s| s.action.to_string()).unwrap_or_default(),
            ]
        });

        write_csv(writer, &header, rows)
    }

    /// One line per suggestion, for the CLI summary
    pub fn suggestion_lines(&self) -> Vec<String> {
        self.plan
            .suggestions
            .iter()
            .map(|s| format!("{} {}: {}", s.action, s.asset_class, format_signed(s.difference)))
            .collect()
    }
}
