//! Dashboard, analytics and claim-tracker views
//!
//! Each view selects records and hands them to the aggregation engine; none
//! of them computes totals of its own.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::aggregation::{
    aggregate, month_name, month_over_month, Aggregation, CategoryTotal, MonthOverMonth,
};
use crate::display::truncate;
use crate::error::{MedexpError, MedexpResult};
use crate::models::{ClaimStatus, Expense, Money};

/// Period covered by the analytics view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Timeframe {
    Year(i32),
    /// Year and quarter 1-4
    Quarter(i32, u32),
    /// Year and month 1-12
    Month(i32, u32),
}

impl Timeframe {
    pub fn quarter(year: i32, quarter: u32) -> MedexpResult<Self> {
        if !(1..=4).contains(&quarter) {
            return Err(MedexpError::Validation(format!(
                "Quarter must be between 1 and 4, got {}",
                quarter
            )));
        }
        Ok(Self::Quarter(year, quarter))
    }

    pub fn month(year: i32, month: u32) -> MedexpResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(MedexpError::Validation(format!(
                "Month must be between 1 and 12, got {}",
                month
            )));
        }
        Ok(Self::Month(year, month))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            Self::Year(year) => date.year() == year,
            Self::Quarter(year, quarter) => {
                date.year() == year && (date.month() - 1) / 3 + 1 == quarter
            }
            Self::Month(year, month) => date.year() == year && date.month() == month,
        }
    }

    pub fn label(&self) -> String {
        match *self {
            Self::Year(year) => year.to_string(),
            Self::Quarter(year, quarter) => format!("Q{} {}", quarter, year),
            Self::Month(year, month) => {
                let name = month.checked_sub(1).map_or("Unknown", month_name);
                format!("{} {}", name, year)
            }
        }
    }
}

/// Spending breakdown for one timeframe
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub timeframe: Timeframe,
    pub aggregation: Aggregation,
    pub highest_category: Option<CategoryTotal>,
    /// Zero-based month index and its total
    pub highest_month: Option<(u32, Money)>,
    pub average_expense: Money,
}

impl AnalyticsReport {
    pub fn generate(records: &[Expense], timeframe: Timeframe) -> Self {
        let selected: Vec<Expense> = records
            .iter()
            .filter(|e| timeframe.contains(e.date))
            .cloned()
            .collect();
        let aggregation = aggregate(&selected);

        Self {
            timeframe,
            highest_category: aggregation.highest_category(),
            highest_month: aggregation.highest_month(),
            average_expense: aggregation.average_expense(),
            aggregation,
        }
    }

    pub fn format_terminal(&self, currency: &str) -> String {
        let agg = &self.aggregation;
        let mut output = String::new();

        output.push_str(&format!("Expense Analytics: {}\n", self.timeframe.label()));
        output.push_str(&"=".repeat(60));
        output.push('\n');

        if agg.is_empty() {
            output.push_str("No expenses recorded for this period.\n");
            return output;
        }

        output.push_str(&format!(
            "Total Spent:       {}\n",
            agg.total_amount.format_with_symbol(currency)
        ));
        output.push_str(&format!("Expenses:          {}\n", agg.expense_count));
        output.push_str(&format!(
            "Average Expense:   {}\n",
            self.average_expense.format_with_symbol(currency)
        ));
        output.push_str(&format!(
            "Tax Deductible:    {}\n",
            agg.tax_deductible_total.format_with_symbol(currency)
        ));
        output.push_str(&format!(
            "Reimbursed:        {}\n\n",
            agg.reimbursed_total.format_with_symbol(currency)
        ));

        output.push_str(&format!(
            "{:<22} {:>6} {:>14} {:>7}\n",
            "Category", "Count", "Amount", "%"
        ));
        output.push_str(&"-".repeat(60));
        output.push('\n');
        for entry in agg.categories_by_total() {
            output.push_str(&format!(
                "{:<22} {:>6} {:>14} {:>6.1}%\n",
                entry.category.label(),
                entry.count,
                entry.total.format_with_symbol(currency),
                agg.category_share(&entry)
            ));
        }

        if agg.by_month.len() > 1 {
            output.push_str("\nBy Month\n");
            for (&month, total) in &agg.by_month {
                output.push_str(&format!(
                    "  {:<12} {:>14}\n",
                    month_name(month),
                    total.format_with_symbol(currency)
                ));
            }
        }

        output.push_str("\nInsights\n");
        if let Some(top) = &self.highest_category {
            output.push_str(&format!(
                "  Highest spending category: {} ({})\n",
                top.category,
                top.total.format_with_symbol(currency)
            ));
        }
        if let Some((month, total)) = self.highest_month {
            output.push_str(&format!(
                "  Highest spending month: {} ({})\n",
                month_name(month),
                total.format_with_symbol(currency)
            ));
        }

        output
    }
}

/// Headline figures for the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub total_expenses: Money,
    pub expense_count: usize,
    /// Claimed expenses not yet reimbursed, denied ones included
    pub pending_claims: Money,
    pub reimbursed: Money,
    pub tax_deductible: Money,
    pub monthly: MonthOverMonth,
    /// Newest first
    pub recent: Vec<Expense>,
}

impl DashboardSummary {
    pub fn generate(records: &[Expense], today: NaiveDate, recent_limit: usize) -> Self {
        let overall = aggregate(records);

        let pending_claims = records
            .iter()
            .filter(|e| e.insurance_claim && e.status != ClaimStatus::Reimbursed)
            .map(|e| e.amount)
            .sum();

        let (last_year, last_month) = if today.month() == 1 {
            (today.year() - 1, 12)
        } else {
            (today.year(), today.month() - 1)
        };
        let this_month = month_total(records, today.year(), today.month());
        let previous_month = month_total(records, last_year, last_month);

        let mut recent = records.to_vec();
        recent.sort_by(|a, b| b.date.cmp(&a.date));
        recent.truncate(recent_limit);

        Self {
            total_expenses: overall.total_amount,
            expense_count: overall.expense_count,
            pending_claims,
            reimbursed: overall.reimbursed_total,
            tax_deductible: overall.tax_deductible_total,
            monthly: month_over_month(this_month, previous_month),
            recent,
        }
    }

    pub fn format_terminal(&self, currency: &str, date_format: &str) -> String {
        let mut output = String::new();

        output.push_str("Dashboard\n");
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "Total Expenses:    {} ({} recorded)\n",
            self.total_expenses.format_with_symbol(currency),
            self.expense_count
        ));
        output.push_str(&format!(
            "Pending Claims:    {}\n",
            self.pending_claims.format_with_symbol(currency)
        ));
        output.push_str(&format!(
            "Reimbursed:        {}\n",
            self.reimbursed.format_with_symbol(currency)
        ));
        output.push_str(&format!(
            "Tax Deductible:    {}\n\n",
            self.tax_deductible.format_with_symbol(currency)
        ));

        output.push_str(&format!(
            "This Month:        {}\n",
            self.monthly.current.format_with_symbol(currency)
        ));
        output.push_str(&format!(
            "Last Month:        {}",
            self.monthly.previous.format_with_symbol(currency)
        ));
        match self.monthly.percent_change {
            Some(pct) => output.push_str(&format!(" ({:+.1}%)\n", pct)),
            None => output.push('\n'),
        }

        output.push_str("\nRecent Expenses\n");
        output.push_str(&"-".repeat(60));
        output.push('\n');
        if self.recent.is_empty() {
            output.push_str("No expenses recorded yet.\n");
        }
        for expense in &self.recent {
            output.push_str(&format!(
                "{:<12} {:<24} {:>12}  {}\n",
                expense.date.format(date_format),
                truncate(&expense.provider, 24),
                expense.amount.format_with_symbol(currency),
                expense.status
            ));
        }

        output
    }
}

fn month_total(records: &[Expense], year: i32, month: u32) -> Money {
    records
        .iter()
        .filter(|e| e.date.year() == year && e.date.month() == month)
        .map(|e| e.amount)
        .sum()
}

/// Insurance claim tracker totals
#[derive(Debug, Clone, Serialize)]
pub struct ClaimSummary {
    /// Every expense filed with insurance, in input order
    pub claims: Vec<Expense>,
    pub total_claims: usize,
    pub pending_count: usize,
    pub denied_count: usize,
    pub reimbursed_amount: Money,
}

impl ClaimSummary {
    pub fn generate(records: &[Expense]) -> Self {
        let claims: Vec<Expense> = records
            .iter()
            .filter(|e| e.insurance_claim)
            .cloned()
            .collect();
        let count_of = |status: ClaimStatus| claims.iter().filter(|e| e.status == status).count();

        Self {
            total_claims: claims.len(),
            pending_count: count_of(ClaimStatus::PendingClaim),
            denied_count: count_of(ClaimStatus::Denied),
            reimbursed_amount: aggregate(&claims).reimbursed_total,
            claims,
        }
    }

    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();

        output.push_str("Insurance Claims\n");
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!("Total Claims:      {}\n", self.total_claims));
        output.push_str(&format!("Pending:           {}\n", self.pending_count));
        output.push_str(&format!("Denied:            {}\n", self.denied_count));
        output.push_str(&format!(
            "Reimbursed:        {}\n",
            self.reimbursed_amount.format_with_symbol(currency)
        ));

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseCategory, NewExpense, UserId};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expense(on: NaiveDate, cents: i64, category: ExpenseCategory) -> Expense {
        Expense::new(
            UserId::new(),
            NewExpense::new(on, "Clinic", "Visit", Money::from_cents(cents), category),
        )
    }

    fn claim(on: NaiveDate, cents: i64, status: ClaimStatus) -> Expense {
        let mut e = expense(on, cents, ExpenseCategory::Hospital);
        e.insurance_claim = true;
        e.status = status;
        e
    }

    #[test]
    fn test_timeframe_contains() {
        let q2 = Timeframe::quarter(2024, 2).unwrap();
        assert!(q2.contains(date(2024, 4, 1)));
        assert!(q2.contains(date(2024, 6, 30)));
        assert!(!q2.contains(date(2024, 7, 1)));
        assert!(!q2.contains(date(2023, 5, 1)));

        let march = Timeframe::month(2024, 3).unwrap();
        assert!(march.contains(date(2024, 3, 31)));
        assert!(!march.contains(date(2024, 4, 1)));
        assert!(Timeframe::Year(2024).contains(date(2024, 12, 31)));
    }

    #[test]
    fn test_timeframe_validation_and_labels() {
        assert!(Timeframe::quarter(2024, 5).unwrap_err().is_validation());
        assert!(Timeframe::month(2024, 0).unwrap_err().is_validation());
        assert_eq!(Timeframe::Year(2024).label(), "2024");
        assert_eq!(Timeframe::quarter(2024, 3).unwrap().label(), "Q3 2024");
        assert_eq!(Timeframe::month(2024, 2).unwrap().label(), "February 2024");
    }

    #[test]
    fn test_unchecked_month_label() {
        assert_eq!(Timeframe::Month(2024, 0).label(), "Unknown 2024");
        assert_eq!(Timeframe::Month(2024, 13).label(), "Unknown 2024");
        assert!(!Timeframe::Month(2024, 0).contains(date(2024, 1, 1)));
    }

    #[test]
    fn test_analytics_only_counts_timeframe() {
        let records = vec![
            expense(date(2024, 1, 5), 1000, ExpenseCategory::Dental),
            expense(date(2024, 1, 20), 4000, ExpenseCategory::Pharmacy),
            expense(date(2024, 3, 2), 2000, ExpenseCategory::Dental),
            expense(date(2023, 12, 31), 9900, ExpenseCategory::Hospital),
        ];
        let report = AnalyticsReport::generate(&records, Timeframe::Year(2024));

        assert_eq!(report.aggregation.total_amount, Money::from_cents(7000));
        assert_eq!(
            report.highest_category.as_ref().unwrap().category,
            ExpenseCategory::Pharmacy
        );
        assert_eq!(report.highest_month, Some((0, Money::from_cents(5000))));
        assert_eq!(report.average_expense, Money::from_cents(2333));

        let text = report.format_terminal("$");
        assert!(text.contains("Highest spending month: January"));
    }

    #[test]
    fn test_analytics_empty_period() {
        let report = AnalyticsReport::generate(&[], Timeframe::Year(2024));
        assert!(report.highest_category.is_none());
        assert!(report
            .format_terminal("$")
            .contains("No expenses recorded for this period."));
    }

    #[test]
    fn test_dashboard_month_wraps_year() {
        let records = vec![
            expense(date(2024, 1, 3), 5000, ExpenseCategory::Vision),
            expense(date(2023, 12, 28), 2500, ExpenseCategory::Vision),
            expense(date(2023, 1, 15), 7700, ExpenseCategory::Vision),
        ];
        let summary = DashboardSummary::generate(&records, date(2024, 1, 20), 5);

        assert_eq!(summary.monthly.current, Money::from_cents(5000));
        assert_eq!(summary.monthly.previous, Money::from_cents(2500));
        assert_eq!(summary.monthly.percent_change, Some(100.0));
        assert_eq!(summary.total_expenses, Money::from_cents(15200));
    }

    #[test]
    fn test_dashboard_pending_claims_and_recent() {
        let records = vec![
            claim(date(2024, 2, 1), 1000, ClaimStatus::PendingClaim),
            claim(date(2024, 2, 3), 2000, ClaimStatus::Denied),
            claim(date(2024, 2, 2), 4000, ClaimStatus::Reimbursed),
            expense(date(2024, 2, 4), 800, ExpenseCategory::Pharmacy),
        ];
        let summary = DashboardSummary::generate(&records, date(2024, 2, 10), 2);

        assert_eq!(summary.pending_claims, Money::from_cents(3000));
        assert_eq!(summary.reimbursed, Money::from_cents(4000));
        let recent: Vec<_> = summary.recent.iter().map(|e| e.date.day()).collect();
        assert_eq!(recent, vec![4, 3]);
    }

    #[test]
    fn test_claim_summary() {
        let records = vec![
            claim(date(2024, 2, 1), 1000, ClaimStatus::PendingClaim),
            claim(date(2024, 2, 3), 2000, ClaimStatus::Denied),
            claim(date(2024, 2, 2), 4000, ClaimStatus::Reimbursed),
            claim(date(2024, 2, 5), 500, ClaimStatus::PendingClaim),
            expense(date(2024, 2, 4), 800, ExpenseCategory::Pharmacy),
        ];
        let summary = ClaimSummary::generate(&records);

        assert_eq!(summary.total_claims, 4);
        assert_eq!(summary.pending_count, 2);
        assert_eq!(summary.denied_count, 1);
        assert_eq!(summary.reimbursed_amount, Money::from_cents(4000));
        assert!(summary.format_terminal("$").contains("Pending:           2"));
    }
}
