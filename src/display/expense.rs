//! Expense display formatting
//!
//! Renders expense lists as tables and single expenses as detail blocks.

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::display::report::{format_total, truncate};
use crate::models::{CategoryTaxonomy, ExpenseRecord};

#[derive(Tabled)]
struct ExpenseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&ExpenseRecord> for ExpenseRow {
    fn from(expense: &ExpenseRecord) -> Self {
        Self {
            id: expense.id.to_string(),
            date: expense.date.format("%Y-%m-%d").to_string(),
            category: expense.category.clone(),
            amount: expense.amount.to_string(),
            description: truncate(expense.description.as_deref().unwrap_or(""), 30),
        }
    }
}

/// Format expenses as a table with a total line
pub fn format_expense_list(expenses: &[ExpenseRecord]) -> String {
    if expenses.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let rows: Vec<ExpenseRow> = expenses.iter().map(ExpenseRow::from).collect();
    let table = Table::new(rows)
        .with(Style::psql())
        .with(Modify::new(Columns::single(3)).with(Alignment::right()))
        .to_string();

    let total = format_total(expenses.iter().map(|e| e.amount));
    format!(
        "{}\n\n{} expense{}, total {}\n",
        table,
        expenses.len(),
        if expenses.len() == 1 { "" } else { "s" },
        total
    )
}

/// Format a single expense
pub fn format_expense_details(expense: &ExpenseRecord) -> String {
    let taxonomy = CategoryTaxonomy::standard();
    let mut output = String::new();

    output.push_str(&format!("Expense:     {}\n", expense.id));
    output.push_str(&format!("Date:        {}\n", expense.date.format("%Y-%m-%d")));
    output.push_str(&format!("Amount:      {}\n", expense.amount));

    match taxonomy.group_of(&expense.category) {
        Some(group) => output.push_str(&format!(
            "Category:    {} ({})\n",
            taxonomy.label(&expense.category),
            group.label()
        )),
        None => output.push_str(&format!(
            "Category:    {} (unknown, not counted in FIRE metrics)\n",
            expense.category
        )),
    }

    if let Some(description) = &expense.description {
        output.push_str(&format!("Description: {}\n", description));
    }

    output
}

/// List the category taxonomy grouped the way FIRE metrics use it
pub fn format_category_list(taxonomy: &CategoryTaxonomy) -> String {
    let mut output = String::new();

    for group in crate::models::CategoryGroup::ALL {
        let entries: Vec<_> = taxonomy.iter().filter(|info| info.group == group).collect();
        if entries.is_empty() {
            continue;
        }

        output.push_str(&format!("{}\n", group.label()));
        for info in entries {
            output.push_str(&format!("  {:<28} {}\n", info.code, info.label));
        }
        output.push('\n');
    }

    output
}
