//! Expense filtering
//!
//! `FilterCriteria` is the typed form used by the engine. Every criterion is
//! optional and the set ones are combined with AND. `FilterForm` holds raw
//! text as a user typed it and converts to criteria without ever failing:
//! blank or unreadable values simply leave that criterion unset.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{ClaimStatus, Expense, ExpenseCategory, Money};

/// Typed filter over expense records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Case-insensitive substring of provider or description
    pub search: Option<String>,
    pub category: Option<ExpenseCategory>,
    pub status: Option<ClaimStatus>,
    /// Inclusive
    pub start_date: Option<NaiveDate>,
    /// Inclusive
    pub end_date: Option<NaiveDate>,
    /// Inclusive
    pub min_amount: Option<Money>,
    /// Inclusive
    pub max_amount: Option<Money>,
    #[serde(default)]
    pub tax_deductible_only: bool,
    #[serde(default)]
    pub insurance_claim_only: bool,
}

impl FilterCriteria {
    /// Create a filter that matches everything
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.search = if text.trim().is_empty() {
            None
        } else {
            Some(text)
        };
        self
    }

    pub fn category(mut self, category: ExpenseCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn status(mut self, status: ClaimStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn start_date(mut self, start: NaiveDate) -> Self {
        self.start_date = Some(start);
        self
    }

    pub fn end_date(mut self, end: NaiveDate) -> Self {
        self.end_date = Some(end);
        self
    }

    pub fn min_amount(mut self, min: Money) -> Self {
        self.min_amount = Some(min);
        self
    }

    pub fn max_amount(mut self, max: Money) -> Self {
        self.max_amount = Some(max);
        self
    }

    pub fn tax_deductible_only(mut self) -> Self {
        self.tax_deductible_only = true;
        self
    }

    pub fn insurance_claim_only(mut self) -> Self {
        self.insurance_claim_only = true;
        self
    }

    /// True when no criterion is set
    pub fn is_unrestricted(&self) -> bool {
        *self == Self::default()
    }

    /// Whether one record satisfies every set criterion
    pub fn matches(&self, expense: &Expense) -> bool {
        if let Some(search) = &self.search {
            let needle = search.trim().to_lowercase();
            let hit = expense.provider.to_lowercase().contains(&needle)
                || expense.description.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }

        if self.category.is_some_and(|c| c != expense.category) {
            return false;
        }
        if self.status.is_some_and(|s| s != expense.status) {
            return false;
        }

        if self.start_date.is_some_and(|start| expense.date < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| expense.date > end) {
            return false;
        }

        if self.min_amount.is_some_and(|min| expense.amount < min) {
            return false;
        }
        if self.max_amount.is_some_and(|max| expense.amount > max) {
            return false;
        }

        if self.tax_deductible_only && !expense.tax_deductible {
            return false;
        }
        if self.insurance_claim_only && !expense.insurance_claim {
            return false;
        }

        true
    }
}

/// Records that satisfy `criteria`, in their original relative order
pub fn filter_expenses(records: &[Expense], criteria: &FilterCriteria) -> Vec<Expense> {
    records
        .iter()
        .filter(|e| criteria.matches(e))
        .cloned()
        .collect()
}

/// Filter inputs as free text, the way a search form or command line supplies them
#[derive(Debug, Clone, Default)]
pub struct FilterForm {
    pub search: String,
    /// A category label, or "All Categories" / "All"
    pub category: String,
    /// A status label, or "All"
    pub status: String,
    /// `YYYY-MM-DD`
    pub start_date: String,
    /// `YYYY-MM-DD`
    pub end_date: String,
    pub min_amount: String,
    pub max_amount: String,
    pub tax_deductible_only: bool,
    pub insurance_claim_only: bool,
}

impl FilterForm {
    pub fn to_criteria(&self) -> FilterCriteria {
        FilterCriteria {
            search: non_blank(&self.search).map(str::to_string),
            category: parse_choice(&self.category, "category", &["all", "all categories"]),
            status: parse_choice(&self.status, "status", &["all"]),
            start_date: parse_field(&self.start_date, "start date", |s| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
            }),
            end_date: parse_field(&self.end_date, "end date", |s| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
            }),
            min_amount: parse_field(&self.min_amount, "minimum amount", |s| {
                Money::parse(s).ok()
            }),
            max_amount: parse_field(&self.max_amount, "maximum amount", |s| {
                Money::parse(s).ok()
            }),
            tax_deductible_only: self.tax_deductible_only,
            insurance_claim_only: self.insurance_claim_only,
        }
    }
}

fn non_blank(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}

fn parse_field<T>(raw: &str, field: &str, parse: impl FnOnce(&str) -> Option<T>) -> Option<T> {
    let value = non_blank(raw)?;
    let parsed = parse(value);
    if parsed.is_none() {
        tracing::warn!(field, value, "ignoring unreadable filter value");
    }
    parsed
}

fn parse_choice<T: std::str::FromStr>(raw: &str, field: &str, wildcards: &[&str]) -> Option<T> {
    let value = non_blank(raw)?;
    if wildcards.contains(&value.to_lowercase().as_str()) {
        return None;
    }
    parse_field(value, field, |s| s.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewExpense, UserId};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expense(
        day: NaiveDate,
        provider: &str,
        description: &str,
        cents: i64,
        category: ExpenseCategory,
    ) -> Expense {
        Expense::new(
            UserId::new(),
            NewExpense::new(
                day,
                provider,
                description,
                Money::from_cents(cents),
                category,
            ),
        )
    }

    fn sample() -> Vec<Expense> {
        let mut claimed = expense(
            date(2024, 1, 10),
            "Smile Dental",
            "Cleaning",
            12000,
            ExpenseCategory::Dental,
        );
        claimed.insurance_claim = true;
        claimed.status = ClaimStatus::PendingClaim;

        let mut deductible = expense(
            date(2024, 2, 5),
            "Corner Pharmacy",
            "Antibiotics",
            3000,
            ExpenseCategory::Pharmacy,
        );
        deductible.tax_deductible = true;

        vec![
            claimed,
            deductible,
            expense(
                date(2024, 2, 20),
                "Dr. Patel",
                "Dental x-ray referral",
                0,
                ExpenseCategory::DoctorVisit,
            ),
        ]
    }

    #[test]
    fn test_unrestricted_returns_input() {
        let records = sample();
        let criteria = FilterCriteria::new();
        assert!(criteria.is_unrestricted());
        assert_eq!(filter_expenses(&records, &criteria), records);
    }

    #[test]
    fn test_category_filter() {
        let records = sample();
        let result = filter_expenses(
            &records,
            &FilterCriteria::new().category(ExpenseCategory::Dental),
        );
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].provider, "Smile Dental");
    }

    #[test]
    fn test_search_matches_provider_or_description() {
        let records = sample();
        let result = filter_expenses(&records, &FilterCriteria::new().search("DENTAL"));
        let providers: Vec<_> = result.iter().map(|e| e.provider.as_str()).collect();
        assert_eq!(providers, vec!["Smile Dental", "Dr. Patel"]);
    }

    #[test]
    fn test_date_bounds_inclusive() {
        let records = sample();
        let criteria = FilterCriteria::new().date_range(date(2024, 1, 10), date(2024, 2, 5));
        assert_eq!(filter_expenses(&records, &criteria).len(), 2);
    }

    #[test]
    fn test_inverted_bounds_yield_nothing() {
        let records = sample();
        let criteria = FilterCriteria::new().date_range(date(2024, 3, 1), date(2024, 1, 1));
        assert!(filter_expenses(&records, &criteria).is_empty());

        let criteria = FilterCriteria::new()
            .min_amount(Money::from_cents(5000))
            .max_amount(Money::from_cents(100));
        assert!(filter_expenses(&records, &criteria).is_empty());
    }

    #[test]
    fn test_amount_bounds_inclusive() {
        let records = sample();
        let criteria = FilterCriteria::new()
            .min_amount(Money::from_cents(3000))
            .max_amount(Money::from_cents(12000));
        assert_eq!(filter_expenses(&records, &criteria).len(), 2);
    }

    #[test]
    fn test_flag_filters() {
        let records = sample();
        let taxed = filter_expenses(&records, &FilterCriteria::new().tax_deductible_only());
        assert_eq!(taxed.len(), 1);
        assert_eq!(taxed[0].provider, "Corner Pharmacy");

        let claimed = filter_expenses(&records, &FilterCriteria::new().insurance_claim_only());
        assert_eq!(claimed.len(), 1);
        assert_eq!(claimed[0].status, ClaimStatus::PendingClaim);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let records = sample();
        let criteria = FilterCriteria::new()
            .search("d")
            .start_date(date(2024, 1, 15));
        let once = filter_expenses(&records, &criteria);
        let twice = filter_expenses(&once, &criteria);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_form_wildcards_and_blanks_are_unset() {
        let form = FilterForm {
            search: "   ".into(),
            category: "All Categories".into(),
            status: "All".into(),
            ..Default::default()
        };
        assert!(form.to_criteria().is_unrestricted());
    }

    #[test]
    fn test_form_malformed_values_are_unset() {
        let form = FilterForm {
            start_date: "next tuesday".into(),
            min_amount: "abc".into(),
            category: "Chiropractic".into(),
            ..Default::default()
        };
        assert!(form.to_criteria().is_unrestricted());
    }

    #[test]
    fn test_form_zero_max_is_a_real_bound() {
        let form = FilterForm {
            max_amount: "0".into(),
            ..Default::default()
        };
        let criteria = form.to_criteria();
        assert_eq!(criteria.max_amount, Some(Money::zero()));

        let result = filter_expenses(&sample(), &criteria);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].provider, "Dr. Patel");
    }

    #[test]
    fn test_form_parses_typed_values() {
        let form = FilterForm {
            category: "dental".into(),
            status: "Pending claim".into(),
            start_date: "2024-01-01".into(),
            max_amount: "$150.00".into(),
            ..Default::default()
        };
        let criteria = form.to_criteria();
        assert_eq!(criteria.category, Some(ExpenseCategory::Dental));
        assert_eq!(criteria.status, Some(ClaimStatus::PendingClaim));
        assert_eq!(criteria.start_date, Some(date(2024, 1, 1)));
        assert_eq!(criteria.max_amount, Some(Money::from_cents(15000)));
    }
}
