//! Monthly Trend Report
//!
//! Runs the FIRE calculation once per month over a trailing window.

use std::io::Write;

use crate::display::report::{csv_amount, format_title, separator, write_csv, REPORT_WIDTH};
use crate::engine::{aggregate, compute_fire_metrics};
use crate::error::FireResult;
use crate::models::{DateRange, ExpenseRecord, Money, Month};
use crate::storage::Storage;

#[derive(Debug, Clone, PartialEq)]
pub struct TrendRow {
    pub month: Month,
    pub total_expenses: Money,
    pub savings: Money,
    pub savings_rate: f64,
    pub retirement_expenses: Money,
    pub fire_number: Money,
}

#[derive(Debug, Clone)]
pub struct TrendReport {
    /// Oldest month first
    pub rows: Vec<TrendRow>,
    pub monthly_income: Money,
}

impl TrendReport {
    pub fn generate(
        storage: &Storage,
        end: Month,
        months: usize,
        monthly_income: Money,
        withdrawal_multiplier: f64,
    ) -> FireResult<Self> {
        let window = end.trailing(months);
        let expenses = match (window.first(), window.last()) {
            (Some(first), Some(last)) => {
                storage
                    .expenses
                    .get_in_range(&DateRange::new(first.start_date(), last.end_date())?)?
            }
            _ => Vec::new(),
        };
        Self::from_expenses(&expenses, &window, monthly_income, withdrawal_multiplier)
    }

    pub fn from_expenses(
        expenses: &[ExpenseRecord],
        months: &[Month],
        monthly_income: Money,
        withdrawal_multiplier: f64,
    ) -> FireResult<Self> {
        let rows = months
            .iter()
            .map(|&month| -> FireResult<TrendRow> {
                let spend = aggregate(expenses, Some(&month.date_range()))?.totals();
                let metrics = compute_fire_metrics(&spend, monthly_income, withdrawal_multiplier)?;
                Ok(TrendRow {
                    month,
                    total_expenses: metrics.total_expenses,
                    savings: metrics.savings,
                    savings_rate: metrics.savings_rate,
                    retirement_expenses: metrics.retirement_expenses,
                    fire_number: metrics.fire_number,
                })
            })
            .collect::<FireResult<Vec<_>>>()?;

        Ok(Self {
            rows,
            monthly_income,
        })
    }

    /// Mean savings rate over months with any recorded activity
    pub fn average_savings_rate(&self) -> f64 {
        let active: Vec<f64> = self
            .rows
            .iter()
            .filter(|r| !(r.total_expenses.is_zero() && r.savings.is_zero()))
            .map(|r| r.savings_rate)
            .collect();

        if active.is_empty() {
            0.0
        } else {
            crate::engine::round2(active.iter().sum::<f64>() / active.len() as f64)
        }
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = format_title("Monthly Trend");
        output.push_str(&format!("Monthly income: {}\n\n", self.monthly_income));

        output.push_str(&format!(
            "{:<8} {:>14} {:>14} {:>9} {:>16}\n",
            "Month", "Expenses", "Savings", "Rate", "FIRE number"
        ));
        output.push_str(&separator(REPORT_WIDTH));
        output.push('\n');

        for row in &self.rows {
            output.push_str(&format!(
                "{:<8} {:>14} {:>14} {:>8.2}% {:>16}\n",
                row.month.to_string(),
                row.total_expenses.to_string(),
                row.savings.to_string(),
                row.savings_rate,
                row.fire_number.to_string()
            ));
        }

        output.push_str(&separator(REPORT_WIDTH));
        output.push('\n');
        output.push_str(&format!(
            "Average savings rate: {:.2}%\n",
            self.average_savings_rate()
        ));

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> FireResult<()> {
        let header = [
            "Month",
            "Total Expenses",
            "Savings",
            "Savings Rate",
            "Retirement Expenses",
            "FIRE Number",
        ];
        let rows = self.rows.iter().map(|row| {
            vec![
                row.month.to_string(),
                csv_amount(row.total_expenses),
                csv_amount(row.savings),
                format!("{:.2}", row.savings_rate),
                csv_amount(row.retirement_expenses),
                csv_amount(row.fire_number),
            ]
        });

        write_csv(writer, &header, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FirePaths;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn expense(dollars: i64, category: &str, m: u32) -> ExpenseRecord {
        ExpenseRecord::new(
            Money::from_dollars_cents(dollars, 0),
            category,
            NaiveDate::from_ymd_opt(2025, m, 15).unwrap(),
        )
    }

    #[test]
    fn test_one_row_per_month() {
        let expenses = vec![
            expense(1000, "housing", 1),
            expense(500, "emergency_fund", 1),
            expense(1200, "housing", 3),
            expense(1000, "retirement_contribution", 3),
        ];
        let months = Month::new(2025, 3).unwrap().trailing(3);
        let report =
            TrendReport::from_expenses(&expenses, &months, Money::from_dollars_cents(4000, 0), 25.0)
                .unwrap();

        assert_eq!(report.rows.len(), 3);
        assert_eq!(report.rows[0].month.to_string(), "2025-01");
        assert_eq!(report.rows[0].savings_rate, 12.5);
        assert!(report.rows[1].total_expenses.is_zero());
        assert_eq!(report.rows[2].savings_rate, 25.0);
        assert_eq!(report.rows[2].fire_number, Money::from_dollars_cents(360_000, 0));

        // February had no activity
        assert_eq!(report.average_savings_rate(), 18.75);
    }

    #[test]
    fn test_generate_from_storage() {
        let temp_dir = TempDir::new().unwrap();
        let storage =
            Storage::new(FirePaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        storage.expenses.upsert(expense(800, "groceries", 11)).unwrap();
        storage.expenses.upsert(expense(300, "groceries", 12)).unwrap();

        let report = TrendReport::generate(
            &storage,
            Month::new(2025, 12).unwrap(),
            2,
            Money::zero(),
            28.6,
        )
        .unwrap();

        assert_eq!(report.rows[0].total_expenses, Money::from_dollars_cents(800, 0));
        assert_eq!(report.rows[1].total_expenses, Money::from_dollars_cents(300, 0));
        assert!(report.format_terminal().contains("2025-11"));

        let mut buf = Vec::new();
        report.export_csv(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap().lines().count(), 3);
    }

    #[test]
    fn test_empty_window() {
        let temp_dir = TempDir::new().unwrap();
        let storage =
            Storage::new(FirePaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        let report =
            TrendReport::generate(&storage, Month::new(2025, 1).unwrap(), 0, Money::zero(), 25.0)
                .unwrap();
        assert!(report.rows.is_empty());
        assert_eq!(report.average_savings_rate(), 0.0);
    }
}
