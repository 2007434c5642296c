//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod expense;
pub mod export;
pub mod report;
pub mod user;
pub mod views;

pub use expense::{handle_expense_command, ExpenseCommands, FilterArgs};
pub use export::{handle_export_command, ExportCommands};
pub use report::{handle_report_command, ReportCommands};
pub use user::{handle_user_command, UserCommands};
pub use views::{handle_analytics, handle_claims, handle_dashboard, AnalyticsArgs};

use chrono::NaiveDate;

use crate::config::Settings;
use crate::error::{MedexpError, MedexpResult};
use crate::models::UserProfile;
use crate::services::AuthService;
use crate::storage::Storage;

/// The signed-in user, or an error telling them to log in
pub fn require_user(storage: &Storage, settings: &Settings) -> MedexpResult<UserProfile> {
    let id = settings.active_user.ok_or_else(|| {
        MedexpError::Auth("Not logged in. Run 'medexp user login' first.".into())
    })?;

    AuthService::new(&storage.users).profile(id).map_err(|e| {
        if e.is_not_found() {
            MedexpError::Auth("Session user no longer exists. Please log in again.".into())
        } else {
            e
        }
    })
}

pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub(crate) fn parse_date(s: &str) -> MedexpResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        MedexpError::Validation(format!("Invalid date '{}'. Use YYYY-MM-DD.", s.trim()))
    })
}
