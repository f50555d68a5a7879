//! Investment and budget display formatting

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::display::report::{format_total, truncate};
use crate::models::{BudgetLimit, CategoryTaxonomy, InvestmentRecord, TargetMix};

#[derive(Tabled)]
struct InvestmentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    investment_type: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Quantity")]
    quantity: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

impl From<&InvestmentRecord> for InvestmentRow {
    fn from(inv: &InvestmentRecord) -> Self {
        Self {
            id: inv.id.to_string(),
            investment_type: inv.investment_type.to_string(),
            name: truncate(&inv.name, 24),
            symbol: inv.symbol.clone().unwrap_or_default(),
            quantity: inv.quantity.map(|q| format!("{}", q)).unwrap_or_default(),
            price: inv.price.map(|p| format!("{:.2}", p)).unwrap_or_default(),
            amount: inv.amount.to_string(),
        }
    }
}

/// Format holdings as a table with the portfolio total
pub fn format_investment_list(investments: &[InvestmentRecord]) -> String {
    if investments.is_empty() {
        return "No investments found.\n".to_string();
    }

    let rows: Vec<InvestmentRow> = investments.iter().map(InvestmentRow::from).collect();
    let table = Table::new(rows)
        .with(Style::psql())
        .with(Modify::new(Columns::new(4..)).with(Alignment::right()))
        .to_string();

    let total = format_total(investments.iter().map(|i| i.amount));
    format!("{}\n\nPortfolio value: {}\n", table, total)
}

#[derive(Tabled)]
struct BudgetRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Monthly Limit")]
    limit: String,
}

/// Format monthly budget limits as a table
pub fn format_budget_list(budgets: &[BudgetLimit]) -> String {
    if budgets.is_empty() {
        return "No budgets set.\n".to_string();
    }

    let taxonomy = CategoryTaxonomy::standard();
    let rows: Vec<BudgetRow> = budgets
        .iter()
        .map(|b| BudgetRow {
            category: b.category.clone(),
            label: taxonomy.label(&b.category).to_string(),
            limit: b.monthly_limit.to_string(),
        })
        .collect();

    let table = Table::new(rows)
        .with(Style::psql())
        .with(Modify::new(Columns::single(2)).with(Alignment::right()))
        .to_string();

    let total = format_total(budgets.iter().map(|b| b.monthly_limit));
    format!("{}\n\nTotal budgeted: {}\n", table, total)
}

/// Format the target mix
pub fn format_target(target: Option<&TargetMix>) -> String {
    match target {
        Some(mix) => format!(
            "Target allocation\n  stocks {:>6.2}%\n  bonds  {:>6.2}%\n  cash   {:>6.2}%\n",
            mix.stocks, mix.bonds, mix.cash
        ),
        None => "No target allocation set.\n".to_string(),
    }
}
