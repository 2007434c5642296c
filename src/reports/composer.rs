//! Report composition
//!
//! Turns filtered records plus their aggregation into a `ReportDocument`: an
//! ordered, renderer-neutral description of a report. Exporters and the
//! terminal renderer only ever read documents.

use chrono::NaiveDate;
use serde::Serialize;

use super::aggregation::{aggregate, Aggregation, CategoryTotal};
use super::filter::{filter_expenses, FilterCriteria};
use crate::error::{MedexpError, MedexpResult};
use crate::models::{Expense, Money};

/// Who the report is for and what period it covers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportMetadata {
    pub user_name: String,
    pub generated_on: NaiveDate,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ReportMetadata {
    pub fn new(user_name: impl Into<String>, generated_on: NaiveDate) -> Self {
        Self {
            user_name: user_name.into(),
            generated_on,
            start_date: None,
            end_date: None,
        }
    }

    pub fn with_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    /// "All Time" when no bound is set
    pub fn range_label(&self) -> String {
        match (self.start_date, self.end_date) {
            (None, None) => "All Time".to_string(),
            (start, end) => format!("{} to {}", bound_label(start), bound_label(end)),
        }
    }
}

fn bound_label(bound: Option<NaiveDate>) -> String {
    bound.map_or_else(|| "all".to_string(), |d| d.format("%Y-%m-%d").to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    General,
    TaxDocument { tax_year: i32 },
}

impl ReportKind {
    pub fn title(&self) -> String {
        match self {
            Self::General => "Medical Expense Report".to_string(),
            Self::TaxDocument { tax_year } => {
                format!("Medical Expenses Tax Summary - {}", tax_year)
            }
        }
    }

    pub fn columns(&self) -> &'static [ReportColumn] {
        match self {
            Self::General => &GENERAL_COLUMNS,
            Self::TaxDocument { .. } => &TAX_COLUMNS,
        }
    }
}

/// One column of the detail table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReportColumn {
    Date,
    Provider,
    Description,
    Amount,
    Category,
    Status,
    TaxDeductible,
}

const GENERAL_COLUMNS: [ReportColumn; 6] = [
    ReportColumn::Date,
    ReportColumn::Provider,
    ReportColumn::Description,
    ReportColumn::Amount,
    ReportColumn::Status,
    ReportColumn::TaxDeductible,
];

const TAX_COLUMNS: [ReportColumn; 5] = [
    ReportColumn::Date,
    ReportColumn::Provider,
    ReportColumn::Description,
    ReportColumn::Amount,
    ReportColumn::Category,
];

impl ReportColumn {
    pub fn header(&self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Provider => "Provider",
            Self::Description => "Description",
            Self::Amount => "Amount",
            Self::Category => "Category",
            Self::Status => "Status",
            Self::TaxDeductible => "Tax Deductible",
        }
    }

    /// Plain cell value; amounts are decimals without a currency symbol
    pub fn cell(&self, expense: &Expense) -> String {
        match self {
            Self::Date => expense.date.format("%Y-%m-%d").to_string(),
            Self::Provider => expense.provider.clone(),
            Self::Description => expense.description.clone(),
            Self::Amount => expense.amount.to_decimal_string(),
            Self::Category => expense.category.to_string(),
            Self::Status => expense.status.to_string(),
            Self::TaxDeductible => yes_no(expense.tax_deductible).to_string(),
        }
    }
}

pub fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// The five headline totals plus the record count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub total_expenses: Money,
    pub tax_deductible: Money,
    pub insurance_claims: Money,
    pub reimbursed: Money,
    pub out_of_pocket: Money,
    pub expense_count: usize,
}

impl From<&Aggregation> for ReportSummary {
    fn from(agg: &Aggregation) -> Self {
        Self {
            total_expenses: agg.total_amount,
            tax_deductible: agg.tax_deductible_total,
            insurance_claims: agg.insurance_claim_total,
            reimbursed: agg.reimbursed_total,
            out_of_pocket: agg.out_of_pocket_total,
            expense_count: agg.expense_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GuidanceSection {
    pub heading: &'static str,
    pub items: &'static [&'static str],
}

/// Fixed reference page appended to tax documents
#[derive(Debug, Serialize)]
pub struct TaxGuidance {
    pub heading: &'static str,
    pub intro: &'static str,
    pub sections: &'static [GuidanceSection],
    pub closing: &'static [&'static str],
}

/// Printed under the tax document summary
pub const TAX_NOTES: [&str; 2] = [
    "Medical expenses are generally deductible to the extent they exceed 7.5% of your adjusted gross income.",
    "Please consult with a tax professional for specific advice regarding your tax situation.",
];

pub static TAX_GUIDANCE: TaxGuidance = TaxGuidance {
    heading: "Tax Form Information",
    intro: "The following information may be helpful when completing your tax return:",
    sections: &[
        GuidanceSection {
            heading: "For Form 1040, Schedule A (Itemized Deductions):",
            items: &[
                "Medical and dental expenses are reported on Schedule A, lines 1-4.",
                "Enter the total amount of your medical expenses on line 1.",
                "Enter your adjusted gross income (from Form 1040) on line 2.",
                "Multiply line 2 by 7.5% (0.075) and enter the result on line 3.",
                "Subtract line 3 from line 1 to calculate your deductible amount on line 4.",
            ],
        },
        GuidanceSection {
            heading: "Common Deductible Medical Expenses:",
            items: &[
                "Payments to doctors, dentists, surgeons, and other medical professionals",
                "Hospital and nursing home care",
                "Prescription medications and insulin",
                "Medical insurance premiums (not paid through pre-tax employer plans)",
                "Medical equipment, supplies, and diagnostic devices",
                "Transportation costs for medical care (mileage, parking, tolls)",
            ],
        },
    ],
    closing: &[
        "Important: This document is for informational purposes only and does not constitute tax advice.",
        "Please consult with a qualified tax professional for guidance specific to your situation.",
    ],
};

/// A composed report, ready for any renderer
#[derive(Debug, Clone, Serialize)]
pub struct ReportDocument {
    pub kind: ReportKind,
    pub title: String,
    pub metadata: ReportMetadata,
    pub summary: ReportSummary,
    /// Total descending, ties by name
    pub categories: Vec<CategoryTotal>,
    /// Date ascending
    line_items: Vec<Expense>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidance: Option<&'static TaxGuidance>,
}

/// Assemble a document from records already selected by the caller
///
/// Every record becomes a line item, so `aggregation` must describe exactly
/// `records`. Use `tax_document` to select a tax year's deductible rows.
pub fn compose(
    records: &[Expense],
    aggregation: &Aggregation,
    metadata: ReportMetadata,
    kind: ReportKind,
) -> ReportDocument {
    let mut line_items = records.to_vec();
    // Stable, so same-day records keep their input order
    line_items.sort_by_key(|e| e.date);

    let (notes, guidance) = match kind {
        ReportKind::General => (Vec::new(), None),
        ReportKind::TaxDocument { .. } => (TAX_NOTES.to_vec(), Some(&TAX_GUIDANCE)),
    };

    ReportDocument {
        kind,
        title: kind.title(),
        metadata,
        summary: ReportSummary::from(aggregation),
        categories: aggregation.categories_by_total(),
        line_items,
        notes,
        guidance,
    }
}

/// Filter, aggregate and compose a general report
pub fn general_report(
    records: &[Expense],
    criteria: &FilterCriteria,
    metadata: ReportMetadata,
) -> ReportDocument {
    let selected = filter_expenses(records, criteria);
    let aggregation = aggregate(&selected);
    let metadata = metadata.with_range(criteria.start_date, criteria.end_date);
    compose(&selected, &aggregation, metadata, ReportKind::General)
}

/// Tax-deductible expenses dated in `tax_year`
pub fn tax_document(
    records: &[Expense],
    tax_year: i32,
    metadata: ReportMetadata,
) -> MedexpResult<ReportDocument> {
    let start = NaiveDate::from_ymd_opt(tax_year, 1, 1);
    let end = NaiveDate::from_ymd_opt(tax_year, 12, 31);
    let (Some(start), Some(end)) = (start, end) else {
        return Err(MedexpError::Validation(format!(
            "Unsupported tax year: {}",
            tax_year
        )));
    };

    let criteria = FilterCriteria::new()
        .date_range(start, end)
        .tax_deductible_only();
    let selected = filter_expenses(records, &criteria);
    let aggregation = aggregate(&selected);
    let metadata = metadata.with_range(Some(start), Some(end));
    Ok(compose(
        &selected,
        &aggregation,
        metadata,
        ReportKind::TaxDocument { tax_year },
    ))
}

impl ReportDocument {
    pub fn line_items(&self) -> &[Expense] {
        &self.line_items
    }

    pub fn columns(&self) -> &'static [ReportColumn] {
        self.kind.columns()
    }

    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }

    /// Detail table as plain strings, one row per line item
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.line_items
            .iter()
            .map(|e| self.columns().iter().map(|c| c.cell(e)).collect())
            .collect()
    }

    /// Base filename without extension
    pub fn suggested_filename(&self) -> String {
        match self.kind {
            ReportKind::General => format!(
                "medical-expenses-{}-to-{}",
                bound_label(self.metadata.start_date),
                bound_label(self.metadata.end_date)
            ),
            ReportKind::TaxDocument { tax_year } => {
                format!("medical-expenses-tax-document-{}", tax_year)
            }
        }
    }

    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();

        output.push_str(&self.title);
        output.push('\n');
        output.push_str(&"=".repeat(80));
        output.push('\n');
        output.push_str(&format!(
            "Generated on: {}\n",
            self.metadata.generated_on.format("%Y-%m-%d")
        ));
        output.push_str(&format!("Date Range: {}\n", self.metadata.range_label()));
        output.push_str(&format!("User: {}\n\n", self.metadata.user_name));

        let money = |m: Money| m.format_with_symbol(currency);
        output.push_str("Summary\n");
        output.push_str(&"-".repeat(80));
        output.push('\n');
        output.push_str(&format!(
            "Total Expenses:   {}\n",
            money(self.summary.total_expenses)
        ));
        if self.guidance.is_none() {
            output.push_str(&format!(
                "Tax Deductible:   {}\n",
                money(self.summary.tax_deductible)
            ));
            output.push_str(&format!(
                "Insurance Claims: {}\n",
                money(self.summary.insurance_claims)
            ));
            output.push_str(&format!(
                "Reimbursed:       {}\n",
                money(self.summary.reimbursed)
            ));
            output.push_str(&format!(
                "Out of Pocket:    {}\n",
                money(self.summary.out_of_pocket)
            ));
        }
        output.push_str(&format!(
            "Expenses:         {}\n",
            self.summary.expense_count
        ));
        for note in &self.notes {
            output.push_str(&format!("\n{}", note));
        }
        if !self.notes.is_empty() {
            output.push('\n');
        }

        if self.is_empty() {
            output.push_str("\nNo expenses match the selected criteria.\n");
        } else {
            output.push_str("\nExpenses by Category\n");
            output.push_str(&"-".repeat(80));
            output.push('\n');
            output.push_str(&format!(
                "{:<24} {:>8} {:>16}\n",
                "Category", "Count", "Total Amount"
            ));
            for entry in &self.categories {
                output.push_str(&format!(
                    "{:<24} {:>8} {:>16}\n",
                    entry.category.label(),
                    entry.count,
                    money(entry.total)
                ));
            }

            output.push_str("\nExpense Details\n");
            output.push_str(&"-".repeat(80));
            output.push('\n');
            let headers: Vec<&str> = self.columns().iter().map(|c| c.header()).collect();
            output.push_str(&headers.join(" | "));
            output.push('\n');
            for item in &self.line_items {
                let cells: Vec<String> = self
                    .columns()
                    .iter()
                    .map(|c| match c {
                        ReportColumn::Amount => money(item.amount),
                        other => other.cell(item),
                    })
                    .collect();
                output.push_str(&cells.join(" | "));
                output.push('\n');
            }
        }

        if let Some(guidance) = self.guidance {
            output.push('\n');
            output.push_str(guidance.heading);
            output.push('\n');
            output.push_str(&"-".repeat(80));
            output.push('\n');
            output.push_str(guidance.intro);
            output.push('\n');
            for section in guidance.sections {
                output.push_str(&format!("\n{}\n", section.heading));
                for item in section.items {
                    output.push_str(&format!("  - {}\n", item));
                }
            }
            output.push('\n');
            for line in guidance.closing {
                output.push_str(line);
                output.push('\n');
            }
        }

        output
    }
}
