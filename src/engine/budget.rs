//! Budget Analyzer
//!
//! Compares per-category spend with monthly limits. Categories with spend
//! but no limit are reported after the budgeted ones.

use serde::Serialize;
use std::collections::{HashMap, HashSet};

use super::round2;
use crate::error::{FireError, FireResult};
use crate::models::{BudgetLimit, Money};

/// Budget status of one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetAnalysisRow {
    pub category: String,
    /// Monthly limit; zero for unbudgeted categories
    pub budget: Money,
    pub spent: Money,
    /// budget - spent; negative when over
    pub remaining: Money,
    /// spent / budget * 100, rounded to 2 decimals; 0 when unbudgeted
    pub percentage: f64,
    pub over_budget: bool,
    pub has_no_budget: bool,
}

/// Analyze spend against limits.
///
/// Rows follow the order of `budgets`, then unbudgeted categories by spend
/// (largest first, ties by name).
///
/// # Errors
///
/// Returns a validation error when a limit is not positive or a category
/// has more than one limit.
pub fn analyze_budget(
    budgets: &[BudgetLimit],
    spend_by_category: &HashMap<String, Money>,
) -> FireResult<Vec<BudgetAnalysisRow>> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(budgets.len());
    let mut rows = Vec::with_capacity(budgets.len() + spend_by_category.len());

    for limit in budgets {
        limit.validate()?;
        if !seen.insert(limit.category.as_str()) {
            return Err(FireError::Validation(format!(
                "Duplicate budget for category '{}'",
                limit.category
            )));
        }

        let spent = spend_by_category
            .get(&limit.category)
            .copied()
            .unwrap_or_default();

        rows.push(BudgetAnalysisRow {
            category: limit.category.clone(),
            budget: limit.monthly_limit,
            spent,
            remaining: limit.monthly_limit - spent,
            percentage: round2(spent.percent_of(limit.monthly_limit)),
            over_budget: spent > limit.monthly_limit,
            has_no_budget: false,
        });
    }

    let mut unbudgeted: Vec<(&String, Money)> = spend_by_category
        .iter()
        .filter(|(category, spent)| spent.is_positive() && !seen.contains(category.as_str()))
        .map(|(category, spent)| (category, *spent))
        .collect();
    unbudgeted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    rows.extend(unbudgeted.into_iter().map(|(category, spent)| BudgetAnalysisRow {
        category: category.clone(),
        budget: Money::zero(),
        spent,
        remaining: -spent,
        percentage: 0.0,
        over_budget: false,
        has_no_budget: true,
    }));

    Ok(rows)
}
