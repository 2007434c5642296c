//! Service layer for MedExp
//!
//! Validation and account rules on top of the storage layer.

pub mod auth;
pub mod expense;

pub use auth::AuthService;
pub use expense::ExpenseService;
