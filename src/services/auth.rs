//! Registration and login
//!
//! Passwords are hashed with Argon2id and never stored or returned in the
//! clear.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

use crate::error::{MedexpError, MedexpResult};
use crate::models::{User, UserId, UserProfile};
use crate::storage::UserRepository;

pub const MIN_PASSWORD_LEN: usize = 8;

pub struct AuthService<'a> {
    users: &'a UserRepository,
}

impl<'a> AuthService<'a> {
    pub fn new(users: &'a UserRepository) -> Self {
        Self { users }
    }

    /// Create an account; the email must not already be registered
    pub fn register(&self, name: &str, email: &str, password: &str) -> MedexpResult<UserProfile> {
        if name.trim().is_empty() {
            return Err(MedexpError::Validation("Name is required".into()));
        }
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(MedexpError::Validation(format!(
                "Invalid email address: '{}'",
                email
            )));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(MedexpError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        if self.users.find_by_email(email)?.is_some() {
            return Err(MedexpError::Duplicate {
                entity_type: "User",
                identifier: email.to_lowercase(),
            });
        }

        let user = User::new(name, email, hash_password(password)?);
        let profile = user.profile();
        self.users.insert(user)?;

        tracing::info!(user = %profile.id, "user registered");
        Ok(profile)
    }

    pub fn login(&self, email: &str, password: &str) -> MedexpResult<UserProfile> {
        let user = self.users.find_by_email(email)?;

        match user {
            Some(user) if verify_password(password, &user.password_hash)? => {
                tracing::info!(user = %user.id, "login succeeded");
                Ok(user.profile())
            }
            _ => {
                tracing::warn!("login failed");
                Err(MedexpError::Auth("Invalid credentials".into()))
            }
        }
    }

    pub fn profile(&self, id: UserId) -> MedexpResult<UserProfile> {
        self.users
            .get(id)?
            .map(|u| u.profile())
            .ok_or_else(|| MedexpError::user_not_found(id.to_string()))
    }
}

fn hash_password(password: &str) -> MedexpResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| MedexpError::Auth(format!("Password hashing failed: {}", e)))
}

fn verify_password(password: &str, stored: &str) -> MedexpResult<bool> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| MedexpError::Storage(format!("Corrupt password hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
