//! Expense category taxonomy
//!
//! Every expense category code maps to a display label and exactly one
//! semantic group. The group decides how spending is treated by the FIRE
//! calculation: essential and optional spending continues after retirement,
//! work-related spending does not, and savings are not expenses at all.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use crate::error::{FireError, FireResult};

/// Semantic group of an expense category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryGroup {
    /// Spending that persists after retirement (housing, food, health)
    Essential,
    /// Spending caused by having a job (commute, work meals)
    Work,
    /// Discretionary spending that persists after retirement
    Optional,
    /// Contributions to savings and investments
    Savings,
    /// Debt repayment
    Debt,
}

impl CategoryGroup {
    pub const ALL: [CategoryGroup; 5] = [
        Self::Essential,
        Self::Work,
        Self::Optional,
        Self::Savings,
        Self::Debt,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Essential => "Essential",
            Self::Work => "Work-related",
            Self::Optional => "Optional",
            Self::Savings => "Savings",
            Self::Debt => "Debt",
        }
    }

    /// Whether spending in this group is expected to continue in retirement
    pub fn continues_in_retirement(&self) -> bool {
        matches!(self, Self::Essential | Self::Optional)
    }
}

impl fmt::Display for CategoryGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One entry of the taxonomy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInfo {
    /// Stable code stored on expense records (e.g., "housing")
    pub code: String,
    /// Human readable label
    pub label: String,
    /// Semantic group
    pub group: CategoryGroup,
}

impl CategoryInfo {
    pub fn new(code: impl Into<String>, label: impl Into<String>, group: CategoryGroup) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
            group,
        }
    }
}

const STANDARD_CATEGORIES: &[(&str, &str, CategoryGroup)] = &[
    ("housing", "Housing", CategoryGroup::Essential),
    ("utilities", "Utilities", CategoryGroup::Essential),
    ("groceries", "Groceries", CategoryGroup::Essential),
    ("healthcare", "Healthcare", CategoryGroup::Essential),
    ("insurance", "Insurance", CategoryGroup::Essential),
    ("transportation", "Transportation", CategoryGroup::Essential),
    ("phone_internet", "Phone & Internet", CategoryGroup::Essential),
    ("childcare", "Childcare", CategoryGroup::Essential),
    ("commute", "Commute", CategoryGroup::Work),
    ("work_meals", "Work Meals", CategoryGroup::Work),
    ("work_clothing", "Work Clothing", CategoryGroup::Work),
    ("professional_development", "Professional Development", CategoryGroup::Work),
    ("dining_out", "Dining Out", CategoryGroup::Optional),
    ("entertainment", "Entertainment", CategoryGroup::Optional),
    ("travel", "Travel", CategoryGroup::Optional),
    ("shopping", "Shopping", CategoryGroup::Optional),
    ("subscriptions", "Subscriptions", CategoryGroup::Optional),
    ("hobbies", "Hobbies", CategoryGroup::Optional),
    ("gifts", "Gifts & Donations", CategoryGroup::Optional),
    ("personal_care", "Personal Care", CategoryGroup::Optional),
    ("retirement_contribution", "Retirement Contributions", CategoryGroup::Savings),
    ("brokerage_investment", "Brokerage Investments", CategoryGroup::Savings),
    ("emergency_fund", "Emergency Fund", CategoryGroup::Savings),
    ("credit_card", "Credit Card Payments", CategoryGroup::Debt),
    ("student_loan", "Student Loans", CategoryGroup::Debt),
    ("auto_loan", "Auto Loan", CategoryGroup::Debt),
    ("personal_loan", "Personal Loan", CategoryGroup::Debt),
];

/// Immutable lookup table from category code to label and group
#[derive(Debug, Clone, Default)]
pub struct CategoryTaxonomy {
    entries: HashMap<String, CategoryInfo>,
    /// Codes in declaration order, for listing
    order: Vec<String>,
}

impl CategoryTaxonomy {
    /// The built-in taxonomy, built once per process
    pub fn standard() -> &'static CategoryTaxonomy {
        static STANDARD: OnceLock<CategoryTaxonomy> = OnceLock::new();
        STANDARD.get_or_init(|| {
            let mut taxonomy = CategoryTaxonomy::default();
            for (code, label, group) in STANDARD_CATEGORIES {
                taxonomy.order.push((*code).to_string());
                taxonomy
                    .entries
                    .insert((*code).to_string(), CategoryInfo::new(*code, *label, *group));
            }
            taxonomy
        })
    }

    /// Build a custom taxonomy; codes must be unique and non-empty
    pub fn from_entries(entries: impl IntoIterator<Item = CategoryInfo>) -> FireResult<Self> {
        let mut taxonomy = CategoryTaxonomy::default();
        for info in entries {
            if info.code.trim().is_empty() {
                return Err(FireError::Validation("Category code cannot be empty".into()));
            }
            if taxonomy.entries.contains_key(&info.code) {
                return Err(FireError::Validation(format!(
                    "Duplicate category code: {}",
                    info.code
                )));
            }
            taxonomy.order.push(info.code.clone());
            taxonomy.entries.insert(info.code.clone(), info);
        }
        Ok(taxonomy)
    }

    pub fn get(&self, code: &str) -> Option<&CategoryInfo> {
        self.entries.get(code)
    }

    /// Group of a category code; `None` for codes outside the taxonomy
    pub fn group_of(&self, code: &str) -> Option<CategoryGroup> {
        self.entries.get(code).map(|info| info.group)
    }

    /// Display label, falling back to the raw code for unknown categories
    pub fn label<'a>(&'a self, code: &'a str) -> &'a str {
        self.entries
            .get(code)
            .map(|info| info.label.as_str())
            .unwrap_or(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    /// All entries in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &CategoryInfo> {
        self.order.iter().filter_map(|code| self.entries.get(code))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
