//! User repository backed by `users.json`

use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{MedexpError, MedexpResult};
use crate::models::user::normalize_email;
use crate::models::{User, UserId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
struct UserData {
    users: Vec<User>,
}

pub struct UserRepository {
    path: PathBuf,
    users: RwLock<Vec<User>>,
}

impl UserRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            users: RwLock::new(Vec::new()),
        }
    }

    pub fn load(&self) -> MedexpResult<()> {
        let file_data: UserData = read_json(&self.path)?;

        let mut users = self
            .users
            .write()
            .map_err(|e| MedexpError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *users = file_data.users;
        Ok(())
    }

    pub fn get(&self, id: UserId) -> MedexpResult<Option<User>> {
        let users = self
            .users
            .read()
            .map_err(|e| MedexpError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    /// Case-insensitive lookup
    pub fn find_by_email(&self, email: &str) -> MedexpResult<Option<User>> {
        let email = normalize_email(email);
        let users = self
            .users
            .read()
            .map_err(|e| MedexpError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    /// Add a user and persist; `Duplicate` if the email is already taken
    pub fn insert(&self, user: User) -> MedexpResult<()> {
        let mut users = self
            .users
            .write()
            .map_err(|e| MedexpError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if users.iter().any(|u| u.email == user.email) {
            return Err(MedexpError::Duplicate {
                entity_type: "User",
                identifier: user.email,
            });
        }

        let mut next = users.clone();
        next.push(user);
        let file_data = UserData { users: next };
        write_json_atomic(&self.path, &file_data).inspect_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "failed to save users")
        })?;

        *users = file_data.users;
        Ok(())
    }

    pub fn count(&self) -> MedexpResult<usize> {
        let users = self
            .users
            .read()
            .map_err(|e| MedexpError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(users.len())
    }
}
