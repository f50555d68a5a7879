//! FIRE Report
//!
//! Savings rate, FIRE number and progress toward it for one month.

use std::io::Write;

use crate::display::report::{
    csv_amount, format_bar, format_title, separator, write_csv, REPORT_WIDTH,
};
use crate::engine::{aggregate, amount_overflow, compute_fire_metrics, FireMetrics};
use crate::error::FireResult;
use crate::models::{CategoryGroup, ExpenseRecord, InvestmentRecord, Money, Month};
use crate::storage::Storage;

#[derive(Debug, Clone)]
pub struct FireReport {
    pub month: Month,
    pub metrics: FireMetrics,
    /// Current portfolio value across every holding
    pub portfolio_value: Money,
    pub progress_percent: f64,
}

impl FireReport {
    pub fn generate(
        storage: &Storage,
        month: Month,
        monthly_income: Money,
        withdrawal_multiplier: f64,
    ) -> FireResult<Self> {
        let expenses = storage.expenses.get_in_range(&month.date_range())?;
        let investments = storage.investments.get_all()?;
        Self::from_records(&expenses, &investments, month, monthly_income, withdrawal_multiplier)
    }

    pub fn from_records(
        expenses: &[ExpenseRecord],
        investments: &[InvestmentRecord],
        month: Month,
        monthly_income: Money,
        withdrawal_multiplier: f64,
    ) -> FireResult<Self> {
        let spend = aggregate(expenses, Some(&month.date_range()))?.totals();
        let metrics = compute_fire_metrics(&spend, monthly_income, withdrawal_multiplier)?;

        let portfolio_value = Money::checked_sum(investments.iter().map(|i| i.amount))
            .ok_or_else(|| amount_overflow("Portfolio value"))?;
        let progress_percent = metrics.progress_percent(portfolio_value);

        Ok(Self {
            month,
            metrics,
            portfolio_value,
            progress_percent,
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let m = &self.metrics;
        let mut output = format_title(&format!("FIRE Metrics - {}", self.month));

        output.push_str(&format!(
            "{:<34} {:>14}\n",
            "Monthly income",
            m.total_income.to_string()
        ));
        for group in CategoryGroup::ALL {
            output.push_str(&format!(
                "  {:<32} {:>14}\n",
                group.label(),
                m.group_total(group).to_string()
            ));
        }
        output.push_str(&separator(REPORT_WIDTH));
        output.push('\n');
        output.push_str(&format!(
            "{:<34} {:>14}\n",
            "Total expenses",
            m.total_expenses.to_string()
        ));
        output.push_str(&format!("{:<34} {:>13.2}%\n", "Savings rate", m.savings_rate));
        output.push_str(&format!(
            "{:<34} {:>14}\n",
            "Retirement expenses (monthly)",
            m.retirement_expenses.to_string()
        ));
        output.push_str(&format!(
            "{:<34} {:>14}\n",
            format!("FIRE number (x{})", m.withdrawal_multiplier),
            m.fire_number.to_string()
        ));
        output.push_str(&format!(
            "{:<34} {:>14}\n",
            "Portfolio value",
            self.portfolio_value.to_string()
        ));
        output.push_str(&format!(
            "{:<34} {:>13.2}%  {}\n",
            "Progress",
            self.progress_percent,
            format_bar(self.progress_percent.min(100.0), 100.0, 20)
        ));

        if !m.unclassified_categories.is_empty() {
            output.push_str(&format!(
                "\nNot counted (unknown categories): {}\n",
                m.unclassified_categories.join(", ")
            ));
        }

        output
    }

    /// Export the report to CSV format as metric/value rows
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> FireResult<()> {
        let m = &self.metrics;
        let rows = [
            ("total_income", csv_amount(m.total_income)),
            ("total_expenses", csv_amount(m.total_expenses)),
            ("essential_expenses", csv_amount(m.essential_expenses)),
            ("work_expenses", csv_amount(m.work_expenses)),
            ("optional_expenses", csv_amount(m.optional_expenses)),
            ("savings", csv_amount(m.savings)),
            ("debt_payments", csv_amount(m.debt_payments)),
            ("savings_rate", format!("{:.2}", m.savings_rate)),
            ("retirement_expenses", csv_amount(m.retirement_expenses)),
            ("fire_number", csv_amount(m.fire_number)),
            ("portfolio_value", csv_amount(self.portfolio_value)),
            ("progress_percent", format!("{:.2}", self.progress_percent)),
        ];

        let month = self.month.to_string();
        let rows = rows
            .into_iter()
            .map(|(metric, value)| [month.clone(), metric.to_string(), value]);

        write_csv(writer, &["Month", "Metric", "Value"], rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InvestmentType;
    use chrono::NaiveDate;

    fn dollars(d: i64) -> Money {
        Money::from_dollars_cents(d, 0)
    }

    fn expense(d: i64, category: &str) -> ExpenseRecord {
        ExpenseRecord::new(dollars(d), category, NaiveDate::from_ymd_opt(2025, 6, 10).unwrap())
    }

    fn scenario() -> FireReport {
        let expenses = vec![
            expense(3000, "housing"),
            expense(1000, "travel"),
            expense(500, "commute"),
            expense(4000, "retirement_contribution"),
            expense(500, "credit_card"),
        ];
        let investments = vec![InvestmentRecord::new(
            InvestmentType::Stocks,
            "Index fund",
            dollars(300_000),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        )];
        FireReport::from_records(
            &expenses,
            &investments,
            Month::new(2025, 6).unwrap(),
            dollars(8500),
            25.0,
        )
        .unwrap()
    }

    #[test]
    fn test_fire_report_metrics() {
        let report = scenario();
        assert_eq!(report.metrics.savings_rate, 47.06);
        assert_eq!(report.metrics.fire_number, dollars(1_200_000));
        assert_eq!(report.portfolio_value, dollars(300_000));
        assert_eq!(report.progress_percent, 25.0);
    }

    #[test]
    fn test_oversized_portfolio_is_an_error() {
        let huge = Money::parse("90000000000000000").unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let investments = vec![
            InvestmentRecord::new(InvestmentType::Stocks, "VTI", huge, date),
            InvestmentRecord::new(InvestmentType::Bonds, "BND", huge, date),
        ];
        let err = FireReport::from_records(
            &[expense(1000, "housing")],
            &investments,
            Month::new(2025, 6).unwrap(),
            dollars(8500),
            25.0,
        )
        .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_format_terminal() {
        let text = scenario().format_terminal();
        assert!(text.contains("FIRE Metrics - 2025-06"));
        assert!(text.contains("47.06%"));
        assert!(text.contains("$1200000.00"));
    }

    #[test]
    fn test_export_csv() {
        let mut buf = Vec::new();
        scenario().export_csv(&mut buf).unwrap();
        let csv = String::from_utf8(buf).unwrap();
        assert!(csv.contains("2025-06,savings_rate,47.06"));
        assert!(csv.contains("2025-06,fire_number,1200000.00"));
    }

    #[test]
    fn test_invalid_multiplier() {
        let result = FireReport::from_records(
            &[],
            &[],
            Month::new(2025, 6).unwrap(),
            dollars(1000),
            -1.0,
        );
        assert!(result.unwrap_err().is_validation());
    }
}
