//! Dashboard, analytics and claim-tracker commands

use chrono::Datelike;
use clap::Args;

use super::today;
use crate::config::Settings;
use crate::display::{format_category_chart, format_expense_table};
use crate::error::{MedexpError, MedexpResult};
use crate::models::UserProfile;
use crate::reports::{AnalyticsReport, ClaimSummary, DashboardSummary, Timeframe};
use crate::services::ExpenseService;
use crate::storage::Storage;

#[derive(Args, Debug)]
pub struct AnalyticsArgs {
    /// Year to analyse, defaults to the current year
    #[arg(short, long)]
    pub year: Option<i32>,
    /// Narrow to one quarter (1-4)
    #[arg(short, long, conflicts_with = "month")]
    pub quarter: Option<u32>,
    /// Narrow to one month (1-12)
    #[arg(short, long)]
    pub month: Option<u32>,
}

impl AnalyticsArgs {
    pub fn timeframe(&self, default_year: i32) -> MedexpResult<Timeframe> {
        let year = self.year.unwrap_or(default_year);
        match (self.quarter, self.month) {
            (Some(_), Some(_)) => Err(MedexpError::Validation(
                "Choose either a quarter or a month, not both".into(),
            )),
            (Some(q), None) => Timeframe::quarter(year, q),
            (None, Some(m)) => Timeframe::month(year, m),
            (None, None) => Ok(Timeframe::Year(year)),
        }
    }
}

pub fn handle_dashboard(
    storage: &Storage,
    settings: &Settings,
    user: &UserProfile,
) -> MedexpResult<()> {
    let expenses = ExpenseService::new(&storage.expenses).list(user.id)?;
    let summary = DashboardSummary::generate(&expenses, today(), settings.recent_expense_count);

    println!("Welcome back, {}", user.name);
    println!();
    print!(
        "{}",
        summary.format_terminal(&settings.currency_symbol, &settings.date_format)
    );
    Ok(())
}

pub fn handle_analytics(
    storage: &Storage,
    settings: &Settings,
    user: &UserProfile,
    args: AnalyticsArgs,
) -> MedexpResult<()> {
    let timeframe = args.timeframe(today().year())?;
    let expenses = ExpenseService::new(&storage.expenses).list(user.id)?;
    let report = AnalyticsReport::generate(&expenses, timeframe);

    print!("{}", report.format_terminal(&settings.currency_symbol));
    if !report.aggregation.is_empty() {
        println!();
        print!(
            "{}",
            format_category_chart(&report.aggregation, &settings.currency_symbol)
        );
    }
    Ok(())
}

pub fn handle_claims(
    storage: &Storage,
    settings: &Settings,
    user: &UserProfile,
) -> MedexpResult<()> {
    let expenses = ExpenseService::new(&storage.expenses).list(user.id)?;
    let summary = ClaimSummary::generate(&expenses);

    print!("{}", summary.format_terminal(&settings.currency_symbol));
    if !summary.claims.is_empty() {
        println!();
        print!(
            "{}",
            format_expense_table(
                &summary.claims,
                &settings.currency_symbol,
                &settings.date_format
            )
        );
    }
    Ok(())
}
