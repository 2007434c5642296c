//! YAML export of the full per-user data set

use std::io::Write;

use crate::error::{MedexpError, MedexpResult};
use crate::export::json::FullExport;

pub fn export_full_yaml<W: Write>(export: &FullExport, mut writer: W) -> MedexpResult<()> {
    let header = format!(
        "# MedExp Expense Export\n# Generated: {}\n# App Version: {}\n#\n# Contains medical and insurance details; store it somewhere private.\n\n",
        export.exported_at, export.app_version
    );
    writer
        .write_all(header.as_bytes())
        .map_err(|e| MedexpError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, export).map_err(|e| MedexpError::Export(e.to_string()))
}
