//! Budget Overview Report
//!
//! One month of spending against the stored monthly limits.

use std::io::Write;

use crate::display::report::{csv_amount, format_title, separator, write_csv, REPORT_WIDTH};
use crate::engine::{aggregate, amount_overflow, analyze_budget, BudgetAnalysisRow};
use crate::error::FireResult;
use crate::models::{BudgetLimit, CategoryTaxonomy, ExpenseRecord, Money, Month};
use crate::storage::Storage;

#[derive(Debug, Clone)]
pub struct BudgetOverviewReport {
    pub month: Month,
    pub rows: Vec<BudgetAnalysisRow>,
    /// Sum of limits
    pub total_budgeted: Money,
    /// Spend in budgeted categories
    pub total_spent: Money,
    /// Spend in categories without a limit
    pub unbudgeted_spent: Money,
}

impl BudgetOverviewReport {
    pub fn generate(storage: &Storage, month: Month) -> FireResult<Self> {
        let budgets = storage.budgets.get_all()?;
        let expenses = storage.expenses.get_in_range(&month.date_range())?;
        Self::from_records(&budgets, &expenses, month)
    }

    pub fn from_records(
        budgets: &[BudgetLimit],
        expenses: &[ExpenseRecord],
        month: Month,
    ) -> FireResult<Self> {
        let spend = aggregate(expenses, Some(&month.date_range()))?.totals();
        let rows = analyze_budget(budgets, &spend)?;

        let (budgeted, unbudgeted): (Vec<_>, Vec<_>) = rows.iter().partition(|r| !r.has_no_budget);
        let total_budgeted = Money::checked_sum(budgeted.iter().map(|r| r.budget))
            .ok_or_else(|| amount_overflow("Total budgeted"))?;
        let total_spent = Money::checked_sum(budgeted.iter().map(|r| r.spent))
            .ok_or_else(|| amount_overflow("Total spent"))?;
        let unbudgeted_spent = Money::checked_sum(unbudgeted.iter().map(|r| r.spent))
            .ok_or_else(|| amount_overflow("Unbudgeted spending"))?;

        Ok(Self {
            month,
            total_budgeted,
            total_spent,
            unbudgeted_spent,
            rows,
        })
    }

    pub fn total_remaining(&self) -> Money {
        self.total_budgeted - self.total_spent
    }

    pub fn over_budget(&self) -> impl Iterator<Item = &BudgetAnalysisRow> {
        self.rows.iter().filter(|r| r.over_budget)
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let taxonomy = CategoryTaxonomy::standard();
        let mut output = format_title(&format!("Budget Overview - {}", self.month));

        if self.rows.is_empty() {
            output.push_str("No budgets set and no spending this month.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<26} {:>12} {:>12} {:>12} {:>8}\n",
            "Category", "Budget", "Spent", "Remaining", "Used"
        ));
        output.push_str(&separator(REPORT_WIDTH));
        output.push('\n');

        for row in &self.rows {
            let used = if row.has_no_budget {
                "no budget".to_string()
            } else if row.over_budget {
                format!("{:.1}% *", row.percentage)
            } else {
                format!("{:.1}%", row.percentage)
            };

            output.push_str(&format!(
                "{:<26} {:>12} {:>12} {:>12} {:>8}\n",
                taxonomy.label(&row.category),
                if row.has_no_budget { "-".to_string() } else { row.budget.to_string() },
                row.spent.to_string(),
                row.remaining.to_string(),
                used
            ));
        }

        output.push_str(&separator(REPORT_WIDTH));
        output.push('\n');
        output.push_str(&format!(
            "{:<26} {:>12} {:>12} {:>12}\n",
            "TOTAL (budgeted)",
            self.total_budgeted.to_string(),
            self.total_spent.to_string(),
            self.total_remaining().to_string()
        ));
        if !self.unbudgeted_spent.is_zero() {
            output.push_str(&format!(
                "{:<26} {:>12} {:>12}\n",
                "Unbudgeted spending",
                "",
                self.unbudgeted_spent.to_string()
            ));
        }

        let over = self.over_budget().count();
        if over > 0 {
            let noun = if over == 1 { "category" } else { "categories" };
            output.push_str(&format!("\n* {} {} over budget\n", over, noun));
        }

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> FireResult<()> {
        let header = [
            "Month",
            "Category",
            "Budget",
            "Spent",
            "Remaining",
            "Percentage",
            "Over Budget",
            "Has Budget",
        ];
        let rows = self.rows.iter().map(|row| {
            vec![
                self.month.to_string(),
                row.category.clone(),
                csv_amount(row.budget),
                csv_amount(row.spent),
                csv_amount(row.remaining),
                format!("{:.2}", row.percentage),
                row.over_budget.to_string(),
                (!row.has_no_budget).to_string(),
            ]
        });

        write_csv(writer, &header, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn march() -> Month {
        Month::new(2025, 3).unwrap()
    }

    fn expense(dollars: i64, category: &str, day: u32) -> ExpenseRecord {
        ExpenseRecord::new(
            Money::from_dollars_cents(dollars, 0),
            category,
            NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
        )
    }

    fn limits() -> Vec<BudgetLimit> {
        vec![
            BudgetLimit::new("housing", Money::from_dollars_cents(2000, 0)),
            BudgetLimit::new("groceries", Money::from_dollars_cents(600, 0)),
        ]
    }

    #[test]
    fn test_totals_and_over_budget() {
        let expenses = vec![
            expense(2500, "housing", 1),
            expense(200, "groceries", 5),
            expense(150, "groceries", 20),
            expense(90, "hobbies", 12),
        ];
        let report = BudgetOverviewReport::from_records(&limits(), &expenses, march()).unwrap();

        assert_eq!(report.rows.len(), 3);
        assert_eq!(report.total_budgeted.cents(), 260_000);
        assert_eq!(report.total_spent.cents(), 285_000);
        assert_eq!(report.unbudgeted_spent.cents(), 9_000);
        assert_eq!(report.total_remaining().cents(), -25_000);

        let over: Vec<&str> = report.over_budget().map(|r| r.category.as_str()).collect();
        assert_eq!(over, vec!["housing"]);

        let text = report.format_terminal();
        assert!(text.contains("125.0% *"));
        assert!(text.contains("no budget"));
        assert!(text.contains("1 category over budget"));
    }

    #[test]
    fn test_other_months_ignored() {
        let mut february = expense(999, "groceries", 1);
        february.date = NaiveDate::from_ymd_opt(2025, 2, 28).unwrap();
        let report = BudgetOverviewReport::from_records(&limits(), &[february], march()).unwrap();
        assert!(report.total_spent.is_zero());
        assert_eq!(report.rows.len(), 2);
    }

    #[test]
    fn test_export_csv() {
        let report =
            BudgetOverviewReport::from_records(&limits(), &[expense(300, "groceries", 2)], march())
                .unwrap();
        let mut buf = Vec::new();
        report.export_csv(&mut buf).unwrap();
        let csv = String::from_utf8(buf).unwrap();
        assert!(csv.contains("2025-03,groceries,600.00,300.00,300.00,50.00,false,true"));
    }
}
