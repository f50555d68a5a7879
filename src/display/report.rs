//! Report formatting utilities for terminal output and CSV export

use std::io::Write;

use crate::error::{FireError, FireResult};
use crate::models::Money;

/// Report width in columns
pub const REPORT_WIDTH: usize = 80;

/// Format a signed amount with an explicit sign ("+$10.00", "-$10.00")
pub fn format_signed(amount: Money) -> String {
    if amount.is_negative() {
        format!("-{}", amount.abs())
    } else {
        format!("+{}", amount)
    }
}

/// Format a percentage with precision scaled to its size
pub fn format_percentage(pct: f64) -> String {
    let magnitude = pct.abs();
    if magnitude < 0.1 && magnitude > 0.0 {
        format!("{:.2}%", pct)
    } else if magnitude < 10.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// Horizontal bar proportional to `value / max_value`
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return " ".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Title line followed by a double rule
pub fn format_title(title: &str) -> String {
    format!("{}\n{}\n", title, "=".repeat(REPORT_WIDTH))
}

/// Format a separator line
pub fn separator(width: usize) -> String {
    "-".repeat(width)
}

/// Truncate to `max_len` characters, ending with "..." when cut
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

/// Amount as a plain decimal for CSV output ("1234.50", "-3.00")
pub fn csv_amount(amount: Money) -> String {
    format!("{:.2}", amount.to_f64())
}

/// Sum of `amounts` for a footer line, or a marker when it overflows
pub fn format_total<I: IntoIterator<Item = Money>>(amounts: I) -> String {
    Money::checked_sum(amounts)
        .map(|total| total.to_string())
        .unwrap_or_else(|| "out of range".to_string())
}

/// Write `header` and `rows` as CSV; every row must have as many fields
/// as the header
pub fn write_csv<W, R, I>(writer: W, header: &[&str], rows: I) -> FireResult<()>
where
    W: Write,
    I: IntoIterator<Item = R>,
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
{
    let export = |e: csv::Error| FireError::Export(e.to_string());
    let mut out = csv::Writer::from_writer(writer);

    out.write_record(header).map_err(export)?;
    for row in rows {
        out.write_record(row).map_err(export)?;
    }
    out.flush().map_err(|e| FireError::Export(e.to_string()))
}
