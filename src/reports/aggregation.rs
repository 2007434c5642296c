//! Aggregation engine
//!
//! One pass over a list of expenses produces every total the dashboard,
//! analytics view, claim tracker and reports need. Month buckets are keyed by
//! month index only, so callers that want a single year must filter first.

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::Serialize;

use crate::models::{Expense, ExpenseCategory, Money};

/// Count and sum for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: ExpenseCategory,
    pub count: usize,
    pub total: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Aggregation {
    pub total_amount: Money,
    pub expense_count: usize,
    /// In order of first occurrence
    pub by_category: Vec<CategoryTotal>,
    /// Month index 0 (January) to 11, only months that occur
    pub by_month: BTreeMap<u32, Money>,
    pub tax_deductible_total: Money,
    pub insurance_claim_total: Money,
    pub reimbursed_total: Money,
    pub out_of_pocket_total: Money,
}

/// Summarize `records`; an empty slice gives an all-zero result
pub fn aggregate(records: &[Expense]) -> Aggregation {
    let mut result = Aggregation::default();

    for expense in records {
        result.total_amount += expense.amount;
        result.expense_count += 1;

        match result
            .by_category
            .iter_mut()
            .find(|c| c.category == expense.category)
        {
            Some(entry) => {
                entry.count += 1;
                entry.total += expense.amount;
            }
            None => result.by_category.push(CategoryTotal {
                category: expense.category,
                count: 1,
                total: expense.amount,
            }),
        }

        *result
            .by_month
            .entry(expense.date.month0())
            .or_default() += expense.amount;

        if expense.tax_deductible {
            result.tax_deductible_total += expense.amount;
        }
        if expense.insurance_claim {
            result.insurance_claim_total += expense.amount;
        }
        if expense.is_reimbursed() {
            result.reimbursed_total += expense.amount;
        }
    }

    result.out_of_pocket_total = result.total_amount - result.reimbursed_total;
    result
}

impl Aggregation {
    pub fn is_empty(&self) -> bool {
        self.expense_count == 0
    }

    pub fn category(&self, category: ExpenseCategory) -> Option<&CategoryTotal> {
        self.by_category.iter().find(|c| c.category == category)
    }

    /// Largest total first; equal totals ordered by category name
    pub fn categories_by_total(&self) -> Vec<CategoryTotal> {
        let mut sorted = self.by_category.clone();
        sorted.sort_by(|a, b| {
            b.total
                .cmp(&a.total)
                .then_with(|| a.category.label().cmp(b.category.label()))
        });
        sorted
    }

    pub fn highest_category(&self) -> Option<CategoryTotal> {
        self.categories_by_total().into_iter().next()
    }

    /// Month with the largest total; the earlier month wins a tie
    pub fn highest_month(&self) -> Option<(u32, Money)> {
        self.by_month
            .iter()
            .fold(None, |best: Option<(u32, Money)>, (&month, &total)| match best {
                Some((_, best_total)) if best_total >= total => best,
                _ => Some((month, total)),
            })
    }

    /// Share of the overall total for one category, in percent
    pub fn category_share(&self, entry: &CategoryTotal) -> f64 {
        percentage_of(entry.total, self.total_amount)
    }

    pub fn average_expense(&self) -> Money {
        if self.expense_count == 0 {
            Money::zero()
        } else {
            Money::from_cents(self.total_amount.cents() / self.expense_count as i64)
        }
    }
}

/// `part` as a percentage of `total`; 0.0 when `total` is zero
pub fn percentage_of(part: Money, total: Money) -> f64 {
    if total.is_zero() {
        0.0
    } else {
        (part.cents() as f64 / total.cents() as f64) * 100.0
    }
}

/// Comparison of two consecutive periods
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthOverMonth {
    pub current: Money,
    pub previous: Money,
    pub delta: Money,
    /// `None` when there is nothing to compare against
    pub percent_change: Option<f64>,
}

pub fn month_over_month(current: Money, previous: Money) -> MonthOverMonth {
    let delta = current - previous;
    let percent_change = (!previous.is_zero()).then(|| percentage_of(delta, previous));
    MonthOverMonth {
        current,
        previous,
        delta,
        percent_change,
    }
}

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// English name for a zero-based month index
pub fn month_name(index: u32) -> &'static str {
    MONTH_NAMES.get(index as usize).copied().unwrap_or("Unknown")
}
