//! FIRE Metrics Calculator
//!
//! Splits one month of spending into taxonomy groups and derives the savings
//! rate and the FIRE number (the nest egg that covers retirement spending at
//! the chosen withdrawal multiplier). Work-related spending is counted as an
//! expense today but is assumed to stop at retirement.

use serde::Serialize;
use std::collections::HashMap;

use super::{amount_overflow, round2};
use crate::error::{FireError, FireResult};
use crate::models::{CategoryGroup, CategoryTaxonomy, Money};

/// Derived FIRE figures for one month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FireMetrics {
    pub total_income: Money,
    /// essential + work + optional + debt
    pub total_expenses: Money,
    pub essential_expenses: Money,
    pub work_expenses: Money,
    pub optional_expenses: Money,
    pub savings: Money,
    pub debt_payments: Money,
    /// savings / income * 100, rounded to 2 decimals
    pub savings_rate: f64,
    /// essential + optional
    pub retirement_expenses: Money,
    /// retirement_expenses * 12 * multiplier, rounded to whole units
    pub fire_number: Money,
    pub withdrawal_multiplier: f64,
    /// Categories with spend that the taxonomy does not know, sorted
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unclassified_categories: Vec<String>,
}

impl FireMetrics {
    /// Portfolio value as a percentage of the FIRE number, rounded to 2
    /// decimals; 0 while the FIRE number is zero
    pub fn progress_percent(&self, portfolio_value: Money) -> f64 {
        round2(portfolio_value.percent_of(self.fire_number))
    }

    /// Annual spending expected to continue in retirement; `None` if it
    /// does not fit in `Money`
    pub fn annual_retirement_expenses(&self) -> Option<Money> {
        self.retirement_expenses.checked_mul(12)
    }

    pub fn group_total(&self, group: CategoryGroup) -> Money {
        match group {
            CategoryGroup::Essential => self.essential_expenses,
            CategoryGroup::Work => self.work_expenses,
            CategoryGroup::Optional => self.optional_expenses,
            CategoryGroup::Savings => self.savings,
            CategoryGroup::Debt => self.debt_payments,
        }
    }
}

/// Withdrawal multiplier for a withdrawal rate in percent (4.0 → 25)
pub fn multiplier_for_withdrawal_rate(rate_percent: f64) -> FireResult<f64> {
    if !rate_percent.is_finite() || rate_percent <= 0.0 || rate_percent >= 100.0 {
        return Err(FireError::Validation(format!(
            "Withdrawal rate must be between 0 and 100 percent, got {}",
            rate_percent
        )));
    }
    Ok(100.0 / rate_percent)
}

/// Compute FIRE metrics with the built-in category taxonomy
pub fn compute_fire_metrics(
    expense_summary: &HashMap<String, Money>,
    monthly_income: Money,
    withdrawal_multiplier: f64,
) -> FireResult<FireMetrics> {
    compute_fire_metrics_with(
        CategoryTaxonomy::standard(),
        expense_summary,
        monthly_income,
        withdrawal_multiplier,
    )
}

/// Compute FIRE metrics with a caller-supplied taxonomy.
///
/// Categories missing from the taxonomy are left out of every group total.
///
/// # Errors
///
/// Returns a validation error for a negative income, a non-positive or
/// non-finite multiplier, a negative category total, or totals (including
/// the FIRE number) too large to represent in cents.
pub fn compute_fire_metrics_with(
    taxonomy: &CategoryTaxonomy,
    expense_summary: &HashMap<String, Money>,
    monthly_income: Money,
    withdrawal_multiplier: f64,
) -> FireResult<FireMetrics> {
    if monthly_income.is_negative() {
        return Err(FireError::Validation(format!(
            "Monthly income cannot be negative, got {}",
            monthly_income
        )));
    }
    if !withdrawal_multiplier.is_finite() || withdrawal_multiplier <= 0.0 {
        return Err(FireError::Validation(format!(
            "Withdrawal multiplier must be positive, got {}",
            withdrawal_multiplier
        )));
    }

    let mut totals: HashMap<CategoryGroup, Money> = HashMap::new();
    let mut unclassified = Vec::new();

    for (category, amount) in expense_summary {
        if amount.is_negative() {
            return Err(FireError::Validation(format!(
                "Spend for '{}' cannot be negative, got {}",
                category, amount
            )));
        }

        match taxonomy.group_of(category) {
            Some(group) => {
                let total = totals.entry(group).or_default();
                *total = total
                    .checked_add(*amount)
                    .ok_or_else(|| amount_overflow(&format!("{} spending", group.label())))?;
            }
            None => {
                if !amount.is_zero() {
                    unclassified.push(category.clone());
                }
            }
        }
    }

    if !unclassified.is_empty() {
        unclassified.sort();
        tracing::warn!(
            categories = ?unclassified,
            "Excluding categories missing from the taxonomy"
        );
    }

    let group = |g: CategoryGroup| totals.get(&g).copied().unwrap_or_default();
    let essential_expenses = group(CategoryGroup::Essential);
    let work_expenses = group(CategoryGroup::Work);
    let optional_expenses = group(CategoryGroup::Optional);
    let savings = group(CategoryGroup::Savings);
    let debt_payments = group(CategoryGroup::Debt);

    let total_expenses = Money::checked_sum([
        essential_expenses,
        work_expenses,
        optional_expenses,
        debt_payments,
    ])
    .ok_or_else(|| amount_overflow("Total expenses"))?;
    let retirement_expenses = essential_expenses
        .checked_add(optional_expenses)
        .ok_or_else(|| amount_overflow("Retirement expenses"))?;

    let savings_rate = if monthly_income.is_positive() {
        round2(savings.percent_of(monthly_income))
    } else {
        0.0
    };

    let annual_expenses = retirement_expenses
        .checked_mul(12)
        .ok_or_else(|| amount_overflow("Annual retirement expenses"))?;
    let annual_dollars = annual_expenses.to_f64() * withdrawal_multiplier;
    let fire_number = Money::checked_from_f64(annual_dollars.round()).ok_or_else(|| {
        amount_overflow(&format!("FIRE number at multiplier {}", withdrawal_multiplier))
    })?;

    Ok(FireMetrics {
        total_income: monthly_income,
        total_expenses,
        essential_expenses,
        work_expenses,
        optional_expenses,
        savings,
        debt_payments,
        savings_rate,
        retirement_expenses,
        fire_number,
        withdrawal_multiplier,
        unclassified_categories: unclassified,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryInfo;

    fn dollars(d: i64) -> Money {
        Money::from_dollars_cents(d, 0)
    }

    fn summary(entries: &[(&str, i64)]) -> HashMap<String, Money> {
        entries
            .iter()
            .map(|(c, d)| (c.to_string(), dollars(*d)))
            .collect()
    }

    #[test]
    fn test_worked_scenario() {
        let metrics = compute_fire_metrics(
            &summary(&[
                ("housing", 2000),
                ("groceries", 1000),
                ("travel", 600),
                ("dining_out", 400),
                ("commute", 500),
                ("retirement_contribution", 4000),
                ("student_loan", 500),
            ]),
            dollars(8500),
            25.0,
        )
        .unwrap();

        assert_eq!(metrics.essential_expenses, dollars(3000));
        assert_eq!(metrics.optional_expenses, dollars(1000));
        assert_eq!(metrics.work_expenses, dollars(500));
        assert_eq!(metrics.savings, dollars(4000));
        assert_eq!(metrics.debt_payments, dollars(500));
        assert_eq!(metrics.total_expenses, dollars(5000));
        assert_eq!(metrics.savings_rate, 47.06);
        assert_eq!(metrics.retirement_expenses, dollars(4000));
        assert_eq!(metrics.fire_number, dollars(1_200_000));
        assert!(metrics.unclassified_categories.is_empty());
    }

    #[test]
    fn test_zero_income_gives_zero_rate() {
        let metrics =
            compute_fire_metrics(&summary(&[("emergency_fund", 500)]), Money::zero(), 25.0)
                .unwrap();
        assert_eq!(metrics.savings_rate, 0.0);
        assert_eq!(metrics.savings, dollars(500));
    }

    #[test]
    fn test_unknown_categories_excluded() {
        let metrics = compute_fire_metrics(
            &summary(&[("housing", 1000), ("pet_supplies", 250), ("zzz", 0)]),
            dollars(5000),
            25.0,
        )
        .unwrap();

        assert_eq!(metrics.essential_expenses, dollars(1000));
        assert_eq!(metrics.total_expenses, dollars(1000));
        assert_eq!(metrics.unclassified_categories, vec!["pet_supplies".to_string()]);
    }

    #[test]
    fn test_empty_month() {
        let metrics = compute_fire_metrics(&HashMap::new(), dollars(5000), 28.6).unwrap();
        assert!(metrics.total_expenses.is_zero());
        assert!(metrics.fire_number.is_zero());
        assert_eq!(metrics.progress_percent(dollars(100_000)), 0.0);
    }

    #[test]
    fn test_fractional_multiplier_rounds_to_whole_units() {
        // 1234.56 * 12 * 28.6 = 423,701.0592
        let expenses = HashMap::from([("housing".to_string(), Money::from_cents(123_456))]);
        let metrics = compute_fire_metrics(&expenses, dollars(5000), 28.6).unwrap();
        assert_eq!(metrics.fire_number, dollars(423_701));
    }

    #[test]
    fn test_invalid_inputs() {
        let spend = summary(&[("housing", 1000)]);
        assert!(compute_fire_metrics(&spend, dollars(-1), 25.0).is_err());
        assert!(compute_fire_metrics(&spend, dollars(5000), 0.0).is_err());
        assert!(compute_fire_metrics(&spend, dollars(5000), f64::INFINITY).is_err());

        let negative = HashMap::from([("housing".to_string(), Money::from_cents(-100))]);
        assert!(compute_fire_metrics(&negative, dollars(5000), 25.0)
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_huge_multiplier_is_rejected() {
        let spend = summary(&[("housing", 1000)]);
        let err = compute_fire_metrics(&spend, Money::zero(), 1e15).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("FIRE number"));
    }

    #[test]
    fn test_overflowing_group_totals_are_rejected() {
        let huge = Money::parse("90000000000000000").unwrap();
        let same_group = HashMap::from([
            ("housing".to_string(), huge),
            ("groceries".to_string(), huge),
        ]);
        assert!(compute_fire_metrics(&same_group, dollars(5000), 25.0)
            .unwrap_err()
            .is_validation());

        let across_groups = HashMap::from([
            ("housing".to_string(), huge),
            ("commute".to_string(), huge),
        ]);
        assert!(compute_fire_metrics(&across_groups, dollars(5000), 25.0)
            .unwrap_err()
            .is_validation());

        // Fits as a monthly figure but not once annualized
        let monthly = HashMap::from([("housing".to_string(), Money::from_cents(i64::MAX / 10))]);
        assert!(compute_fire_metrics(&monthly, dollars(5000), 25.0)
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_progress_percent() {
        let metrics =
            compute_fire_metrics(&summary(&[("housing", 1000)]), dollars(5000), 25.0).unwrap();
        assert_eq!(metrics.fire_number, dollars(300_000));
        assert_eq!(metrics.progress_percent(dollars(75_000)), 25.0);
        assert_eq!(metrics.annual_retirement_expenses(), Some(dollars(12_000)));
    }

    #[test]
    fn test_multiplier_for_rate() {
        assert_eq!(multiplier_for_withdrawal_rate(4.0).unwrap(), 25.0);
        assert!(multiplier_for_withdrawal_rate(0.0).is_err());
        assert!(multiplier_for_withdrawal_rate(100.0).is_err());
    }

    #[test]
    fn test_custom_taxonomy() {
        let taxonomy = CategoryTaxonomy::from_entries(vec![
            CategoryInfo::new("rent", "Rent", CategoryGroup::Essential),
            CategoryInfo::new("bus", "Bus", CategoryGroup::Work),
        ])
        .unwrap();
        let metrics = compute_fire_metrics_with(
            &taxonomy,
            &summary(&[("rent", 1200), ("bus", 100), ("housing", 900)]),
            dollars(3000),
            25.0,
        )
        .unwrap();
        assert_eq!(metrics.essential_expenses, dollars(1200));
        assert_eq!(metrics.work_expenses, dollars(100));
        assert_eq!(metrics.group_total(CategoryGroup::Work), dollars(100));
        assert_eq!(metrics.retirement_expenses, dollars(1200));
        assert_eq!(metrics.unclassified_categories, vec!["housing".to_string()]);
    }
}
