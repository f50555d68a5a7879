//! CSV expense import
//!
//! Reads bank or spreadsheet exports into expense records: column mapping,
//! lenient date and amount parsing, and duplicate detection against the
//! expenses already stored.

use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};

use crate::error::{FireError, FireResult};
use crate::models::{ExpenseRecord, Money};
use crate::storage::Storage;

/// Date formats tried after the configured one
const FALLBACK_DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y",
];

/// Where each expense field lives in a CSV row
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    pub date_column: usize,
    pub amount_column: usize,
    /// Category code column; rows without one use the import default
    pub category_column: Option<usize>,
    pub description_column: Option<usize>,
    /// strftime format tried first
    pub date_format: String,
    pub has_header: bool,
    pub delimiter: u8,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            date_column: 0,
            amount_column: 1,
            category_column: Some(2),
            description_column: Some(3),
            date_format: "%Y-%m-%d".to_string(),
            has_header: true,
            delimiter: b',',
        }
    }
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date_format(mut self, format: &str) -> Self {
        self.date_format = format.to_string();
        self
    }

    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Guess the mapping from a header row, starting from the defaults
    pub fn detect(headers: &StringRecord) -> Self {
        let mut mapping = Self {
            category_column: None,
            description_column: None,
            ..Self::default()
        };

        for (idx, header) in headers.iter().enumerate() {
            let h = header.trim().to_lowercase();
            if h.contains("date") || h.contains("posted") {
                mapping.date_column = idx;
            } else if h.contains("amount") || h.contains("debit") || h.contains("spent") {
                mapping.amount_column = idx;
            } else if h.contains("category") {
                mapping.category_column = Some(idx);
            } else if h.contains("description")
                || h.contains("memo")
                || h.contains("payee")
                || h.contains("merchant")
            {
                mapping.description_column = Some(idx);
            }
        }

        mapping
    }
}

/// A CSV row turned into expense fields
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedExpense {
    pub date: NaiveDate,
    pub amount: Money,
    pub category: Option<String>,
    pub description: Option<String>,
    /// 1-based data row number, header excluded
    pub row_number: usize,
}

impl ParsedExpense {
    fn into_record(self, default_category: Option<&str>) -> Result<ExpenseRecord, String> {
        let category = self
            .category
            .or_else(|| default_category.map(normalize_category))
            .ok_or_else(|| "No category in row and no default category given".to_string())?;

        let mut record = ExpenseRecord::new(self.amount, category, self.date);
        if let Some(description) = self.description {
            record = record.with_description(description);
        }
        record.validate().map_err(|e| e.to_string())?;
        Ok(record)
    }
}

/// Outcome of an import run
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub imported: usize,
    pub duplicates_skipped: usize,
    /// Row number → reason
    pub errors: HashMap<usize, String>,
}

impl ImportResult {
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}

/// Imports expenses into storage
pub struct ImportService<'a> {
    storage: &'a Storage,
}

impl<'a> ImportService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Parse every data row; a bad row yields an error for that row only
    pub fn parse_csv<R: Read>(
        &self,
        input: R,
        mapping: &ColumnMapping,
    ) -> FireResult<Vec<Result<ParsedExpense, (usize, String)>>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(mapping.has_header)
            .delimiter(mapping.delimiter)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(input);

        let mut results = Vec::new();
        for (idx, record) in reader.records().enumerate() {
            let row_number = idx + 1;
            let parsed = record
                .map_err(|e| format!("Error reading CSV record: {}", e))
                .and_then(|record| parse_record(&record, row_number, mapping));
            results.push(parsed.map_err(|e| (row_number, e)));
        }

        Ok(results)
    }

    /// Store parsed rows, skipping ones that match an existing expense on
    /// date, amount, category and description
    pub fn import(
        &self,
        parsed: Vec<Result<ParsedExpense, (usize, String)>>,
        default_category: Option<&str>,
    ) -> FireResult<ImportResult> {
        let mut seen: HashSet<Fingerprint> = self
            .storage
            .expenses
            .get_all()?
            .iter()
            .map(Fingerprint::of)
            .collect();

        let mut result = ImportResult::default();

        for row in parsed {
            let row = match row {
                Ok(row) => row,
                Err((row_number, reason)) => {
                    result.errors.insert(row_number, reason);
                    continue;
                }
            };

            let row_number = row.row_number;
            let record = match row.into_record(default_category) {
                Ok(record) => record,
                Err(reason) => {
                    result.errors.insert(row_number, reason);
                    continue;
                }
            };

            if !seen.insert(Fingerprint::of(&record)) {
                tracing::debug!(row = row_number, "Skipping duplicate expense");
                result.duplicates_skipped += 1;
                continue;
            }

            self.storage.expenses.upsert(record)?;
            result.imported += 1;
        }

        if result.imported > 0 {
            self.storage.expenses.save()?;
        }

        tracing::info!(
            imported = result.imported,
            duplicates = result.duplicates_skipped,
            errors = result.error_count(),
            "CSV import finished"
        );

        Ok(result)
    }

    /// Parse and import a CSV file, detecting columns from its header row
    pub fn import_file(
        &self,
        path: &Path,
        date_format: Option<&str>,
        default_category: Option<&str>,
    ) -> FireResult<ImportResult> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| FireError::Import(format!("Failed to read {}: {}", path.display(), e)))?;

        let mut header_reader = ReaderBuilder::new()
            .has_headers(false)
            .from_reader(contents.as_bytes());
        let headers = match header_reader.records().next() {
            Some(record) => record?,
            None => return Ok(ImportResult::default()),
        };

        let mut mapping = ColumnMapping::detect(&headers);
        if let Some(format) = date_format {
            mapping = mapping.with_date_format(format);
        }

        let parsed = self.parse_csv(contents.as_bytes(), &mapping)?;
        self.import(parsed, default_category)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Fingerprint {
    date: NaiveDate,
    cents: i64,
    category: String,
    description: Option<String>,
}

impl Fingerprint {
    fn of(expense: &ExpenseRecord) -> Self {
        Self {
            date: expense.date,
            cents: expense.amount.cents(),
            category: expense.category.clone(),
            description: expense.description.clone(),
        }
    }
}

fn parse_record(
    record: &StringRecord,
    row_number: usize,
    mapping: &ColumnMapping,
) -> Result<ParsedExpense, String> {
    let date_str = record
        .get(mapping.date_column)
        .ok_or_else(|| "Missing date column".to_string())?;
    let date = parse_date(date_str, &mapping.date_format)?;

    let amount_str = record
        .get(mapping.amount_column)
        .ok_or_else(|| "Missing amount column".to_string())?;
    let amount = parse_amount(amount_str)?;

    let non_empty = |col: Option<usize>| {
        col.and_then(|c| record.get(c))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };

    Ok(ParsedExpense {
        date,
        amount,
        category: non_empty(mapping.category_column).map(normalize_category),
        description: non_empty(mapping.description_column).map(str::to_string),
        row_number,
    })
}

fn parse_date(s: &str, primary_format: &str) -> Result<NaiveDate, String> {
    let s = s.trim();
    std::iter::once(primary_format)
        .chain(FALLBACK_DATE_FORMATS)
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
        .ok_or_else(|| format!("Could not parse date: '{}'", s))
}

/// Parse an amount; outflows exported as negative or "(12.34)" become positive
fn parse_amount(s: &str) -> Result<Money, String> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '(' | ')'))
        .collect();

    let value = cleaned
        .strip_prefix('(')
        .and_then(|v| v.strip_suffix(')'))
        .or_else(|| cleaned.strip_prefix('-'))
        .unwrap_or(&cleaned);

    let amount = Money::parse(value)
        .map_err(|e| format!("Could not parse amount '{}': {}", s.trim(), e))?
        .abs();

    if amount.is_zero() {
        return Err(format!("Amount '{}' is zero", s.trim()));
    }
    Ok(amount)
}

/// "Dining Out" → "dining_out"
pub fn normalize_category(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FirePaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FirePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    #[test]
    fn test_parse_default_layout() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);

        let csv_data = "Date,Amount,Category,Description\n\
                        2025-01-15,-50.00,Groceries,Corner store\n\
                        2025-01-16,\"1,200.00\",housing,";
        let rows = service.parse_csv(csv_data.as_bytes(), &ColumnMapping::new()).unwrap();

        assert_eq!(rows.len(), 2);
        let first = rows[0].as_ref().unwrap();
        assert_eq!(first.date, date(1, 15));
        assert_eq!(first.amount.cents(), 5_000);
        assert_eq!(first.category.as_deref(), Some("groceries"));
        assert_eq!(first.description.as_deref(), Some("Corner store"));

        let second = rows[1].as_ref().unwrap();
        assert_eq!(second.amount.cents(), 120_000);
        assert!(second.description.is_none());
    }

    #[test]
    fn test_headerless_semicolon_file() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);

        let csv_data = "2025-01-15;12.34;travel;Train\n2025-01-16;8.00;travel;Bus";
        let mapping = ColumnMapping::new().with_header(false).with_delimiter(b';');
        let rows = service.parse_csv(csv_data.as_bytes(), &mapping).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].as_ref().unwrap().amount.cents(), 1_234);
        assert_eq!(rows[1].as_ref().unwrap().description.as_deref(), Some("Bus"));
    }

    #[test]
    fn test_bad_rows_are_reported_per_row() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);

        let csv_data = "Date,Amount,Category\n\
                        not-a-date,10,travel\n\
                        2025-02-01,0,travel\n\
                        2025-02-02,(12.50),travel";
        let rows = service.parse_csv(csv_data.as_bytes(), &ColumnMapping::new()).unwrap();

        assert_eq!(rows[0].as_ref().unwrap_err().0, 1);
        assert!(rows[1].is_err());
        assert_eq!(rows[2].as_ref().unwrap().amount.cents(), 1_250);
    }

    #[test]
    fn test_alternate_date_format() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);

        let mapping = ColumnMapping::new().with_date_format("%d.%m.%Y");
        let rows = service
            .parse_csv("Date,Amount,Category\n15.03.2025,9.99,subscriptions".as_bytes(), &mapping)
            .unwrap();
        assert_eq!(rows[0].as_ref().unwrap().date, date(3, 15));
    }

    #[test]
    fn test_detect_mapping() {
        let headers = StringRecord::from(vec!["Posted Date", "Merchant", "Debit", "Category"]);
        let mapping = ColumnMapping::detect(&headers);

        assert_eq!(mapping.date_column, 0);
        assert_eq!(mapping.description_column, Some(1));
        assert_eq!(mapping.amount_column, 2);
        assert_eq!(mapping.category_column, Some(3));
    }

    #[test]
    fn test_import_with_duplicates_and_default_category() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);

        let csv_data = "Date,Amount,Category,Description\n\
                        2025-01-15,50.00,,Bus pass\n\
                        2025-01-15,50.00,,Bus pass\n\
                        2025-01-20,80.00,dining_out,Dinner";
        let parsed = service.parse_csv(csv_data.as_bytes(), &ColumnMapping::new()).unwrap();
        let result = service.import(parsed, Some("Commute")).unwrap();

        assert_eq!(result.imported, 2);
        assert_eq!(result.duplicates_skipped, 1);
        assert_eq!(result.error_count(), 0);

        let categories: HashSet<String> = storage
            .expenses
            .get_all()
            .unwrap()
            .into_iter()
            .map(|e| e.category)
            .collect();
        assert!(categories.contains("commute"));
        assert!(categories.contains("dining_out"));

        // Same file again: nothing new
        let parsed = service.parse_csv(csv_data.as_bytes(), &ColumnMapping::new()).unwrap();
        let again = service.import(parsed, Some("commute")).unwrap();
        assert_eq!(again.imported, 0);
        assert_eq!(again.duplicates_skipped, 3);
    }

    #[test]
    fn test_missing_category_without_default_is_row_error() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ImportService::new(&storage);

        let parsed = service
            .parse_csv("Date,Amount,Category\n2025-01-15,5.00,".as_bytes(), &ColumnMapping::new())
            .unwrap();
        let result = service.import(parsed, None).unwrap();
        assert_eq!(result.imported, 0);
        assert!(result.errors.contains_key(&1));
    }

    #[test]
    fn test_import_file() {
        let (temp_dir, storage) = create_test_storage();
        let path = temp_dir.path().join("bank.csv");
        std::fs::write(&path, "Amount,Date,Category\n12.00,01/31/2025,gifts\n").unwrap();

        let result = ImportService::new(&storage)
            .import_file(&path, Some("%m/%d/%Y"), None)
            .unwrap();
        assert_eq!(result.imported, 1);

        let stored = storage.expenses.get_all().unwrap();
        assert_eq!(stored[0].date, date(1, 31));
        assert_eq!(stored[0].amount.cents(), 1_200);
    }

    #[test]
    fn test_normalize_category() {
        assert_eq!(normalize_category("  Dining   Out "), "dining_out");
        assert_eq!(normalize_category("housing"), "housing");
    }
}
