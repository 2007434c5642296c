//! Reports module for MedExp
//!
//! Filtering, aggregation, the dashboard/analytics/claim views, and report
//! composition. Everything here is a pure function of the records passed in.

pub mod aggregation;
pub mod analytics;
pub mod composer;
pub mod filter;

pub use aggregation::{
    aggregate, month_name, month_over_month, percentage_of, Aggregation, CategoryTotal,
    MonthOverMonth,
};
pub use analytics::{AnalyticsReport, ClaimSummary, DashboardSummary, Timeframe};
pub use composer::{
    compose, general_report, tax_document, ReportColumn, ReportDocument, ReportKind,
    ReportMetadata, ReportSummary, TAX_GUIDANCE,
};
pub use filter::{filter_expenses, FilterCriteria, FilterForm};
