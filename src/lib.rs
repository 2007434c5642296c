//! MedExp - medical expense tracking
//!
//! Records medical expenses, tracks their insurance claims, and turns them
//! into dashboards, analytics and exportable reports.
//!
//! # Architecture
//!
//! - `config`: Data directory and settings
//! - `error`: Error types
//! - `models`: Expenses, categories, claim statuses, money, users
//! - `storage`: The `ExpenseRepository` trait and its JSON/in-memory implementations
//! - `services`: Validation, id lookup and authentication
//! - `reports`: Filter, aggregation engine, analytics views, report composer
//! - `export`: CSV, JSON and YAML writers
//! - `display`: Terminal tables and charts
//! - `cli`: Command handlers for the `medexp` binary
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use medexp_cli::models::{ExpenseCategory, Money, NewExpense, UserId};
//! use medexp_cli::reports::{general_report, FilterCriteria, ReportMetadata};
//! use medexp_cli::storage::{ExpenseRepository, InMemoryExpenseRepository};
//!
//! let repo = InMemoryExpenseRepository::new();
//! let user = UserId::new();
//! let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//! repo.create_expense(
//!     user,
//!     NewExpense::new(date, "Smile Dental", "Cleaning", Money::from_cents(12000), ExpenseCategory::Dental),
//! )?;
//!
//! let records = repo.list_expenses(user)?;
//! let doc = general_report(&records, &FilterCriteria::new(), ReportMetadata::new("Sam", date));
//! assert_eq!(doc.summary.total_expenses, Money::from_cents(12000));
//! # Ok::<(), medexp_cli::MedexpError>(())
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{MedexpError, MedexpResult};
