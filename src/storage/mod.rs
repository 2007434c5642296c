//! Storage layer for MedExp
//!
//! JSON files under the data directory, written atomically on every change.

pub mod expenses;
pub mod file_io;
pub mod users;

pub use expenses::{ExpenseRepository, InMemoryExpenseRepository, JsonExpenseRepository};
pub use file_io::{read_json, write_json_atomic};
pub use users::UserRepository;

use crate::config::paths::MedexpPaths;
use crate::error::MedexpError;

/// Owns every repository for one data directory
pub struct Storage {
    paths: MedexpPaths,
    pub expenses: JsonExpenseRepository,
    pub users: UserRepository,
}

impl Storage {
    pub fn new(paths: MedexpPaths) -> Result<Self, MedexpError> {
        paths.ensure_directories()?;

        Ok(Self {
            expenses: JsonExpenseRepository::new(paths.expenses_file()),
            users: UserRepository::new(paths.users_file()),
            paths,
        })
    }

    pub fn paths(&self) -> &MedexpPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), MedexpError> {
        self.expenses.load()?;
        self.users.load()?;
        tracing::debug!(base = %self.paths.base_dir().display(), "storage loaded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MedexpPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert_eq!(storage.expenses.count().unwrap(), 0);
        assert_eq!(storage.users.count().unwrap(), 0);
    }
}
