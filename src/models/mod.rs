//! Core data models for MedExp
//!
//! Expenses, their categories and claim statuses, money amounts, and users.

pub mod category;
pub mod expense;
pub mod ids;
pub mod money;
pub mod user;

pub use category::{ExpenseCategory, PaymentMethod};
pub use expense::{ClaimStatus, Expense, ExpenseUpdate, ExpenseValidationError, NewExpense};
pub use ids::{ExpenseId, UserId};
pub use money::{Money, MoneyParseError};
pub use user::{User, UserProfile};
