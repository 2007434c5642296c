//! CSV export
//!
//! Report detail tables and the full expense list. Quoting of commas, quotes
//! and newlines is left to the `csv` writer.

use std::io::Write;

use crate::error::{MedexpError, MedexpResult};
use crate::models::Expense;
use crate::reports::composer::yes_no;
use crate::reports::ReportDocument;

/// Marker row written when a report has no line items
pub const NO_DATA: &str = "No data";

const EXPENSE_HEADERS: [&str; 9] = [
    "Date",
    "Provider",
    "Description",
    "Amount",
    "Category",
    "Payment Method",
    "Insurance Claim",
    "Status",
    "Tax Deductible",
];

/// Write a report's detail table: the column headers, then one row per line item
pub fn write_report_csv<W: Write>(doc: &ReportDocument, writer: W) -> MedexpResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    let columns = doc.columns();

    csv.write_record(columns.iter().map(|c| c.header()))?;

    if doc.is_empty() {
        let mut row = vec![""; columns.len()];
        row[0] = NO_DATA;
        csv.write_record(&row)?;
    } else {
        for row in doc.rows() {
            csv.write_record(&row)?;
        }
    }

    csv.flush()
        .map_err(|e| MedexpError::Export(format!("Failed to write CSV: {}", e)))
}

/// Export expenses with every user-entered field
pub fn export_expenses_csv<W: Write>(expenses: &[Expense], writer: W) -> MedexpResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(EXPENSE_HEADERS)?;

    for expense in expenses {
        csv.write_record([
            expense.date.format("%Y-%m-%d").to_string(),
            expense.provider.clone(),
            expense.description.clone(),
            expense.amount.to_decimal_string(),
            expense.category.to_string(),
            expense
                .payment_method
                .map(|m| m.to_string())
                .unwrap_or_default(),
            yes_no(expense.insurance_claim).to_string(),
            expense.status.to_string(),
            yes_no(expense.tax_deductible).to_string(),
        ])?;
    }

    csv.flush()
        .map_err(|e| MedexpError::Export(format!("Failed to write CSV: {}", e)))
}
