//! Export module for MedExp
//!
//! - CSV: report detail tables and the full expense list
//! - JSON: report documents and the full data export
//! - YAML: human-readable full data export
//!
//! PDF rendering is left to external tools fed from the JSON document.

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::{export_expenses_csv, write_report_csv};
pub use json::{export_full_json, write_report_json, FullExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_full_yaml;
