//! Aggregator
//!
//! Groups dated records by a categorical key and sums their amounts,
//! optionally restricted to an inclusive date range.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

use super::amount_overflow;
use crate::error::FireResult;
use crate::models::{DateRange, ExpenseRecord, InvestmentRecord, Money};

/// A record that can be grouped by the aggregator
pub trait Categorized {
    /// Grouping key (matched exactly, no case folding)
    fn category_key(&self) -> &str;
    fn amount(&self) -> Money;
    fn date(&self) -> NaiveDate;
}

impl Categorized for ExpenseRecord {
    fn category_key(&self) -> &str {
        &self.category
    }

    fn amount(&self) -> Money {
        self.amount
    }

    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Categorized for InvestmentRecord {
    fn category_key(&self) -> &str {
        self.investment_type.as_str()
    }

    fn amount(&self) -> Money {
        self.amount
    }

    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Sum and count for one key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Aggregate {
    pub total: Money,
    pub count: usize,
}

/// Totals per category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AggregateSummary {
    groups: HashMap<String, Aggregate>,
    #[serde(skip)]
    grand_total: Money,
}

impl AggregateSummary {
    pub fn get(&self, category: &str) -> Option<&Aggregate> {
        self.groups.get(category)
    }

    /// Total for a category, zero when absent
    pub fn total_for(&self, category: &str) -> Money {
        self.groups
            .get(category)
            .map(|agg| agg.total)
            .unwrap_or_default()
    }

    /// Sum over every category
    pub fn grand_total(&self) -> Money {
        self.grand_total
    }

    /// Number of records aggregated
    pub fn record_count(&self) -> usize {
        self.groups.values().map(|agg| agg.count).sum()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Aggregate)> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Largest total first; equal totals ordered by category name
    pub fn sorted_by_total(&self) -> Vec<(&str, &Aggregate)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| b.1.total.cmp(&a.1.total).then_with(|| a.0.cmp(b.0)));
        entries
    }

    /// Category → total, the shape the budget and FIRE calculators take
    pub fn totals(&self) -> HashMap<String, Money> {
        self.groups
            .iter()
            .map(|(k, v)| (k.clone(), v.total))
            .collect()
    }
}

/// Group `records` by category, summing amounts and counting occurrences.
///
/// When `range` is given, records dated outside it are skipped.
///
/// # Errors
///
/// Returns a validation error when a category total or the grand total
/// overflows.
pub fn aggregate<'a, R, I>(records: I, range: Option<&DateRange>) -> FireResult<AggregateSummary>
where
    R: Categorized + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let mut groups: HashMap<String, Aggregate> = HashMap::new();
    let mut grand_total = Money::zero();

    for record in records {
        if let Some(range) = range {
            if !range.contains(record.date()) {
                continue;
            }
        }

        let key = record.category_key();
        let entry = groups.entry(key.to_string()).or_default();
        entry.total = entry
            .total
            .checked_add(record.amount())
            .ok_or_else(|| amount_overflow(&format!("Total for '{}'", key)))?;
        entry.count += 1;

        grand_total = grand_total
            .checked_add(record.amount())
            .ok_or_else(|| amount_overflow("Total across categories"))?;
    }

    Ok(AggregateSummary {
        groups,
        grand_total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InvestmentType;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn expense(cents: i64, category: &str, m: u32, d: u32) -> ExpenseRecord {
        ExpenseRecord::new(Money::from_cents(cents), category, date(m, d))
    }

    #[test]
    fn test_empty_input() {
        let records: Vec<ExpenseRecord> = Vec::new();
        let summary = aggregate(&records, None).unwrap();
        assert!(summary.is_empty());
        assert!(summary.grand_total().is_zero());
        assert_eq!(summary.record_count(), 0);
    }

    #[test]
    fn test_groups_and_counts() {
        let records = vec![
            expense(5000, "groceries", 1, 3),
            expense(2500, "groceries", 1, 10),
            expense(200_000, "housing", 1, 1),
        ];
        let summary = aggregate(&records, None).unwrap();

        assert_eq!(summary.len(), 2);
        assert_eq!(
            summary.get("groceries"),
            Some(&Aggregate {
                total: Money::from_cents(7500),
                count: 2
            })
        );
        assert_eq!(summary.total_for("housing").cents(), 200_000);
        assert!(summary.total_for("travel").is_zero());
    }

    #[test]
    fn test_category_match_is_exact() {
        let records = vec![expense(100, "Groceries", 1, 1), expense(100, "groceries", 1, 1)];
        let summary = aggregate(&records, None).unwrap();
        assert_eq!(summary.len(), 2);
    }

    #[test]
    fn test_date_range_inclusive() {
        let records = vec![
            expense(100, "groceries", 1, 31),
            expense(200, "groceries", 2, 1),
            expense(400, "groceries", 2, 28),
            expense(800, "groceries", 3, 1),
        ];
        let range = DateRange::new(date(2, 1), date(2, 28)).unwrap();
        let summary = aggregate(&records, Some(&range)).unwrap();

        assert_eq!(summary.total_for("groceries").cents(), 600);
        assert_eq!(summary.get("groceries").unwrap().count, 2);
    }

    #[test]
    fn test_conserves_total() {
        let categories = ["housing", "groceries", "travel", "commute", "unknown"];
        let records: Vec<ExpenseRecord> = (0..50)
            .map(|i| expense(137 * (i + 1) % 9_973 + 1, categories[i as usize % 5], 1, 1))
            .collect();

        let expected = Money::checked_sum(records.iter().map(|r| r.amount)).unwrap();
        let summary = aggregate(&records, None).unwrap();

        assert_eq!(summary.grand_total(), expected);
        assert_eq!(summary.record_count(), records.len());
    }

    #[test]
    fn test_overflowing_total_is_rejected() {
        let huge = Money::parse("90000000000000000").unwrap();
        let records = vec![
            ExpenseRecord::new(huge, "housing", date(1, 1)),
            ExpenseRecord::new(huge, "housing", date(1, 2)),
        ];
        assert!(records.iter().all(|r| r.validate().is_ok()));

        let err = aggregate(&records, None).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("housing"));

        let split = vec![
            ExpenseRecord::new(huge, "housing", date(1, 1)),
            ExpenseRecord::new(huge, "groceries", date(1, 2)),
        ];
        assert!(aggregate(&split, None).unwrap_err().is_validation());
    }

    #[test]
    fn test_sorted_by_total() {
        let records = vec![
            expense(100, "b", 1, 1),
            expense(300, "c", 1, 1),
            expense(100, "a", 1, 1),
        ];
        let summary = aggregate(&records, None).unwrap();
        let keys: Vec<&str> = summary.sorted_by_total().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_investments_group_by_type() {
        let holding = |kind, name: &str, cents| {
            InvestmentRecord::new(kind, name, Money::from_cents(cents), date(1, 1))
        };
        let holdings = vec![
            holding(InvestmentType::Stocks, "VTI", 1000),
            holding(InvestmentType::Stocks, "VXUS", 500),
            holding(InvestmentType::Crypto, "BTC", 200),
        ];
        let summary = aggregate(&holdings, None).unwrap();
        assert_eq!(summary.total_for("stocks").cents(), 1500);
        assert_eq!(summary.total_for("crypto").cents(), 200);
    }
}
