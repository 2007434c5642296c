//! JSON export
//!
//! Report documents and the full per-user data export. Amounts are integer
//! cents, the same as the data files.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{MedexpError, MedexpResult};
use crate::models::{Expense, Money, UserProfile};
use crate::reports::ReportDocument;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Everything one user has recorded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    pub schema_version: String,
    pub exported_at: DateTime<Utc>,
    /// Application version that created the export
    pub app_version: String,
    pub user: UserProfile,
    pub expenses: Vec<Expense>,
    pub metadata: ExportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub expense_count: usize,
    pub total_amount: Money,
    pub earliest_expense: Option<String>,
    pub latest_expense: Option<String>,
}

impl FullExport {
    pub fn new(user: UserProfile, expenses: Vec<Expense>) -> Self {
        let metadata = ExportMetadata {
            expense_count: expenses.len(),
            total_amount: expenses.iter().map(|e| e.amount).sum(),
            earliest_expense: expenses.iter().map(|e| e.date).min().map(|d| d.to_string()),
            latest_expense: expenses.iter().map(|e| e.date).max().map(|d| d.to_string()),
        };

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            user,
            expenses,
            metadata,
        }
    }
}

pub fn export_full_json<W: Write>(export: &FullExport, writer: W, pretty: bool) -> MedexpResult<()> {
    if pretty {
        serde_json::to_writer_pretty(writer, export)
    } else {
        serde_json::to_writer(writer, export)
    }
    .map_err(|e| MedexpError::Export(e.to_string()))
}

pub fn write_report_json<W: Write>(doc: &ReportDocument, writer: W) -> MedexpResult<()> {
    serde_json::to_writer_pretty(writer, doc).map_err(|e| MedexpError::Export(e.to_string()))
}
