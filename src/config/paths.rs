//! Path management for MedExp
//!
//! ## Path Resolution Order
//!
//! 1. `MEDEXP_DATA_DIR` environment variable (if set)
//! 2. The platform data directory from `directories::ProjectDirs`
//!    (e.g. `~/.local/share/medexp` on Linux)

use std::path::PathBuf;

use crate::error::MedexpError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "MEDEXP_DATA_DIR";

/// Manages all paths used by MedExp
#[derive(Debug, Clone)]
pub struct MedexpPaths {
    base_dir: PathBuf,
}

impl MedexpPaths {
    /// Resolve the base directory from the environment or the platform default
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, MedexpError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Use an explicit base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding the JSON data files
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn expenses_file(&self) -> PathBuf {
        self.data_dir().join("expenses.json")
    }

    pub fn users_file(&self) -> PathBuf {
        self.data_dir().join("users.json")
    }

    /// Create the base and data directories if missing
    pub fn ensure_directories(&self) -> Result<(), MedexpError> {
        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| MedexpError::Io(format!("Failed to create data directory: {}", e)))
    }

    /// Check if MedExp has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, MedexpError> {
    directories::ProjectDirs::from("org", "medexp", "medexp")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| MedexpError::Config("Could not determine a data directory".into()))
}
