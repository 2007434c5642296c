//! CLI commands for data export

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Subcommand, ValueEnum};

use crate::error::{MedexpError, MedexpResult};
use crate::export::{export_expenses_csv, export_full_json, export_full_yaml, FullExport};
use crate::models::UserProfile;
use crate::services::ExpenseService;
use crate::storage::Storage;

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// JSON (machine-readable)
    Json,
    /// YAML (human-readable)
    Yaml,
}

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export the profile and every expense to a file
    All {
        /// Output file path
        output: PathBuf,

        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Export expenses to CSV
    Expenses {
        /// Output file path
        output: PathBuf,
    },
}

pub fn handle_export_command(
    storage: &Storage,
    user: &UserProfile,
    cmd: ExportCommands,
) -> MedexpResult<()> {
    let expenses = ExpenseService::new(&storage.expenses).list(user.id)?;

    match cmd {
        ExportCommands::All {
            output,
            format,
            pretty,
        } => {
            let count = expenses.len();
            let export = FullExport::new(user.clone(), expenses);
            let mut writer = create_writer(&output)?;
            match format {
                ExportFormat::Json => export_full_json(&export, &mut writer, pretty)?,
                ExportFormat::Yaml => export_full_yaml(&export, &mut writer)?,
            }
            finish(writer)?;
            println!("Exported {} expenses to: {}", count, output.display());
        }

        ExportCommands::Expenses { output } => {
            let mut writer = create_writer(&output)?;
            export_expenses_csv(&expenses, &mut writer)?;
            finish(writer)?;
            println!("Exported {} expenses to: {}", expenses.len(), output.display());
        }
    }

    Ok(())
}

fn create_writer(path: &Path) -> MedexpResult<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| MedexpError::Export(format!("Failed to create {}: {}", path.display(), e)))
}

fn finish(mut writer: BufWriter<File>) -> MedexpResult<()> {
    writer
        .flush()
        .map_err(|e| MedexpError::Export(format!("Failed to write export: {}", e)))
}
