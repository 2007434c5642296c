//! CLI commands for reports
//!
//! General expense reports and the yearly tax document, printed or written
//! to a file as text, CSV or JSON.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use chrono::Datelike;
use clap::{Subcommand, ValueEnum};

use super::expense::FilterArgs;
use super::today;
use crate::config::Settings;
use crate::error::{MedexpError, MedexpResult};
use crate::export::{write_report_csv, write_report_json};
use crate::models::UserProfile;
use crate::reports::{general_report, tax_document, ReportDocument, ReportMetadata};
use crate::services::ExpenseService;
use crate::storage::Storage;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReportFormat {
    /// Plain text
    Text,
    /// Detail table as CSV
    Csv,
    /// Full document as JSON
    Json,
}

impl ReportFormat {
    fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Expense report over any filter
    General {
        #[command(flatten)]
        filter: FilterArgs,

        #[arg(short, long, value_enum, default_value = "text")]
        format: ReportFormat,

        /// Output file, or a directory to use the suggested file name
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Tax-deductible expenses for one year
    Tax {
        /// Tax year, defaults to the current year
        #[arg(short, long)]
        year: Option<i32>,

        #[arg(short, long, value_enum, default_value = "text")]
        format: ReportFormat,

        /// Output file, or a directory to use the suggested file name
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    user: &UserProfile,
    cmd: ReportCommands,
) -> MedexpResult<()> {
    let expenses = ExpenseService::new(&storage.expenses).list(user.id)?;
    let metadata = ReportMetadata::new(user.name.clone(), today());

    let (doc, format, output) = match cmd {
        ReportCommands::General {
            filter,
            format,
            output,
        } => {
            let criteria = filter.to_form().to_criteria();
            (general_report(&expenses, &criteria, metadata), format, output)
        }
        ReportCommands::Tax {
            year,
            format,
            output,
        } => {
            let year = year.unwrap_or_else(|| today().year());
            (tax_document(&expenses, year, metadata)?, format, output)
        }
    };

    tracing::info!(
        title = %doc.title,
        lines = doc.line_items().len(),
        "report composed"
    );

    match output {
        Some(path) => {
            let path = if path.is_dir() {
                path.join(format!("{}.{}", doc.suggested_filename(), format.extension()))
            } else {
                path
            };
            let file = File::create(&path).map_err(|e| {
                MedexpError::Export(format!("Failed to create {}: {}", path.display(), e))
            })?;
            let mut writer = BufWriter::new(file);
            render(&doc, format, &settings.currency_symbol, &mut writer)?;
            writer
                .flush()
                .map_err(|e| MedexpError::Export(e.to_string()))?;
            println!("Report written to: {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            render(&doc, format, &settings.currency_symbol, stdout.lock())?;
        }
    }

    Ok(())
}

fn render<W: Write>(
    doc: &ReportDocument,
    format: ReportFormat,
    currency: &str,
    mut writer: W,
) -> MedexpResult<()> {
    match format {
        ReportFormat::Text => writer
            .write_all(doc.format_terminal(currency).as_bytes())
            .map_err(|e| MedexpError::Export(e.to_string())),
        ReportFormat::Csv => write_report_csv(doc, writer),
        ReportFormat::Json => {
            write_report_json(doc, &mut writer)?;
            writeln!(writer).map_err(|e| MedexpError::Export(e.to_string()))
        }
    }
}
