//! Spending Report
//!
//! Spending by category and taxonomy group for a date range.

use std::io::Write;

use crate::display::report::{
    csv_amount, format_bar, format_percentage, format_title, separator, write_csv, REPORT_WIDTH,
};
use crate::engine::{aggregate, amount_overflow};
use crate::error::FireResult;
use crate::models::{CategoryGroup, CategoryTaxonomy, DateRange, ExpenseRecord, Money};
use crate::storage::Storage;

/// Spending in one category
#[derive(Debug, Clone)]
pub struct SpendingByCategory {
    pub category: String,
    pub label: String,
    /// None for categories missing from the taxonomy
    pub group: Option<CategoryGroup>,
    pub total: Money,
    pub count: usize,
    /// Share of total spending
    pub percentage: f64,
}

/// Spending in one taxonomy group
#[derive(Debug, Clone)]
pub struct SpendingByGroup {
    pub group: CategoryGroup,
    pub total: Money,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone)]
pub struct SpendingReport {
    pub range: DateRange,
    /// Largest total first
    pub categories: Vec<SpendingByCategory>,
    /// Groups with spending, in taxonomy order
    pub groups: Vec<SpendingByGroup>,
    pub total_spending: Money,
    pub total_count: usize,
    /// Spending in categories the taxonomy does not know
    pub unclassified_spending: Money,
}

impl SpendingReport {
    /// Generate the report from stored expenses
    pub fn generate(storage: &Storage, range: DateRange) -> FireResult<Self> {
        let expenses = storage.expenses.get_in_range(&range)?;
        Self::from_expenses(&expenses, range)
    }

    /// Build the report from expenses already in memory
    pub fn from_expenses(expenses: &[ExpenseRecord], range: DateRange) -> FireResult<Self> {
        let taxonomy = CategoryTaxonomy::standard();
        let summary = aggregate(expenses, Some(&range))?;
        let total_spending = summary.grand_total();

        let categories: Vec<SpendingByCategory> = summary
            .sorted_by_total()
            .into_iter()
            .map(|(category, agg)| SpendingByCategory {
                category: category.to_string(),
                label: taxonomy.label(category).to_string(),
                group: taxonomy.group_of(category),
                total: agg.total,
                count: agg.count,
                percentage: agg.total.percent_of(total_spending),
            })
            .collect();

        // Total and record count of the categories in one group
        let group_total = |group: Option<CategoryGroup>| -> FireResult<(Money, usize)> {
            let members = categories.iter().filter(|c| c.group == group);
            let count = members.clone().map(|c| c.count).sum();
            let total = Money::checked_sum(members.map(|c| c.total))
                .ok_or_else(|| amount_overflow("Group spending"))?;
            Ok((total, count))
        };

        let mut groups = Vec::new();
        for group in CategoryGroup::ALL {
            let (total, count) = group_total(Some(group))?;
            if count > 0 {
                groups.push(SpendingByGroup {
                    group,
                    total,
                    count,
                    percentage: total.percent_of(total_spending),
                });
            }
        }

        let (unclassified_spending, _) = group_total(None)?;

        Ok(Self {
            range,
            categories,
            groups,
            total_spending,
            total_count: summary.record_count(),
            unclassified_spending,
        })
    }

    /// The `limit` largest categories
    pub fn top_categories(&self, limit: usize) -> &[SpendingByCategory] {
        &self.categories[..limit.min(self.categories.len())]
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, limit: Option<usize>) -> String {
        let mut output = format_title(&format!("Spending Report: {}", self.range));

        output.push_str(&format!("Total Spending: {}\n", self.total_spending));
        output.push_str(&format!("Expenses: {}\n\n", self.total_count));

        if self.categories.is_empty() {
            output.push_str("No expenses in this period.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<26} {:<12} {:>12} {:>6} {:>7}  {}\n",
            "Category", "Group", "Amount", "Count", "%", ""
        ));
        output.push_str(&separator(REPORT_WIDTH));
        output.push('\n');

        let rows = match limit {
            Some(n) => self.top_categories(n),
            None => self.categories.as_slice(),
        };
        let max = self.categories.first().map(|c| c.total.to_f64()).unwrap_or(0.0);

        for row in rows {
            output.push_str(&format!(
                "{:<26} {:<12} {:>12} {:>6} {:>6.1}%  {}\n",
                row.label,
                row.group.map(|g| g.label()).unwrap_or("?"),
                row.total.to_string(),
                row.count,
                row.percentage,
                format_bar(row.total.to_f64(), max, 10)
            ));
        }

        output.push_str(&separator(REPORT_WIDTH));
        output.push_str("\nBy group\n");
        for group in &self.groups {
            output.push_str(&format!(
                "  {:<26} {:>12} {:>6} {:>7}\n",
                group.group.label(),
                group.total.to_string(),
                group.count,
                format_percentage(group.percentage)
            ));
        }
        if !self.unclassified_spending.is_zero() {
            output.push_str(&format!(
                "  {:<26} {:>12}\n",
                "Unclassified",
                self.unclassified_spending.to_string()
            ));
        }

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> FireResult<()> {
        let header = [
            "Start Date",
            "End Date",
            "Category",
            "Group",
            "Amount",
            "Count",
            "Percentage",
        ];
        let (start, end) = (self.range.start().to_string(), self.range.end().to_string());

        let rows = self.categories.iter().map(|row| {
            vec![
                start.clone(),
                end.clone(),
                row.category.clone(),
                row.group.map(|g| g.label()).unwrap_or("").to_string(),
                csv_amount(row.total),
                row.count.to_string(),
                format!("{:.2}", row.percentage),
            ]
        });
        let total = vec![
            start.clone(),
            end.clone(),
            "TOTAL".to_string(),
            String::new(),
            csv_amount(self.total_spending),
            self.total_count.to_string(),
            "100.00".to_string(),
        ];

        write_csv(writer, &header, rows.chain(std::iter::once(total)))
    }
}
