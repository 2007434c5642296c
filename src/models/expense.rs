//! Expense model
//!
//! A single medical expenditure owned by one user, tagged for insurance claims
//! and tax deductibility, with a claim status that the user moves by hand.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::category::{ExpenseCategory, PaymentMethod};
use super::ids::{ExpenseId, UserId};
use super::money::Money;

/// Insurance claim status of an expense
///
/// Any status may follow any other. Nothing moves on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimStatus {
    #[serde(rename = "Not claimed")]
    NotClaimed,
    #[serde(rename = "Pending claim")]
    PendingClaim,
    Reimbursed,
    Denied,
}

impl ClaimStatus {
    pub const ALL: [ClaimStatus; 4] = [
        Self::NotClaimed,
        Self::PendingClaim,
        Self::Reimbursed,
        Self::Denied,
    ];

    /// Status assigned when an expense is first recorded
    pub fn initial(insurance_claim: bool) -> Self {
        if insurance_claim {
            Self::PendingClaim
        } else {
            Self::NotClaimed
        }
    }

    /// Whether the insurer has answered (paid or refused)
    ///
    /// Resolved claims can still be reopened.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Reimbursed | Self::Denied)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::NotClaimed => "Not claimed",
            Self::PendingClaim => "Pending claim",
            Self::Reimbursed => "Reimbursed",
            Self::Denied => "Denied",
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ClaimStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();
        match wanted.as_str() {
            "notclaimed" => Ok(Self::NotClaimed),
            "pending" | "pendingclaim" => Ok(Self::PendingClaim),
            "reimbursed" => Ok(Self::Reimbursed),
            "denied" => Ok(Self::Denied),
            _ => Err(format!("Unknown claim status: '{}'", s.trim())),
        }
    }
}

/// A recorded medical expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// Unique identifier, never reused
    pub id: ExpenseId,

    /// Owner of the record
    pub user_id: UserId,

    /// Date the expense was incurred
    pub date: NaiveDate,

    /// Provider name (doctor, pharmacy, clinic...)
    pub provider: String,

    pub description: String,

    /// Amount paid, never negative
    pub amount: Money,

    #[serde(default)]
    pub category: ExpenseCategory,

    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,

    /// Submitted (or to be submitted) to an insurer
    #[serde(default)]
    pub insurance_claim: bool,

    /// User-asserted deductibility, not checked against tax law
    #[serde(default)]
    pub tax_deductible: bool,

    pub status: ClaimStatus,

    /// Opaque pointer to a stored receipt image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_reference: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when recording a new expense
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub date: NaiveDate,
    pub provider: String,
    pub description: String,
    pub amount: Money,
    pub category: ExpenseCategory,
    pub payment_method: Option<PaymentMethod>,
    pub insurance_claim: bool,
    pub tax_deductible: bool,
    /// Explicit starting status; derived from `insurance_claim` when absent
    pub status: Option<ClaimStatus>,
    pub receipt_reference: Option<String>,
}

impl NewExpense {
    /// Minimal new expense; flags off, no payment method
    pub fn new(
        date: NaiveDate,
        provider: impl Into<String>,
        description: impl Into<String>,
        amount: Money,
        category: ExpenseCategory,
    ) -> Self {
        Self {
            date,
            provider: provider.into(),
            description: description.into(),
            amount,
            category,
            payment_method: None,
            insurance_claim: false,
            tax_deductible: false,
            status: None,
            receipt_reference: None,
        }
    }

    pub fn insurance_claim(mut self, claim: bool) -> Self {
        self.insurance_claim = claim;
        self
    }

    pub fn tax_deductible(mut self, deductible: bool) -> Self {
        self.tax_deductible = deductible;
        self
    }

    pub fn payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self
    }
}

/// A partial edit; `None` leaves a field unchanged
///
/// `receipt_reference` is doubly optional: `Some(None)` removes the receipt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseUpdate {
    pub date: Option<NaiveDate>,
    pub provider: Option<String>,
    pub description: Option<String>,
    pub amount: Option<Money>,
    pub category: Option<ExpenseCategory>,
    pub payment_method: Option<Option<PaymentMethod>>,
    pub insurance_claim: Option<bool>,
    pub tax_deductible: Option<bool>,
    pub status: Option<ClaimStatus>,
    pub receipt_reference: Option<Option<String>>,
}

impl ExpenseUpdate {
    /// An update that only changes the claim status
    pub fn status(status: ClaimStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Expense {
    /// Create a record with a fresh id and creation timestamp
    pub fn new(user_id: UserId, input: NewExpense) -> Self {
        let now = Utc::now();
        let status = input
            .status
            .unwrap_or_else(|| ClaimStatus::initial(input.insurance_claim));
        Self {
            id: ExpenseId::new(),
            user_id,
            date: input.date,
            provider: input.provider.trim().to_string(),
            description: input.description.trim().to_string(),
            amount: input.amount,
            category: input.category,
            payment_method: input.payment_method,
            insurance_claim: input.insurance_claim,
            tax_deductible: input.tax_deductible,
            status,
            receipt_reference: input.receipt_reference,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial edit. `id`, `user_id` and `created_at` never change.
    pub fn apply(&mut self, update: ExpenseUpdate) {
        if let Some(date) = update.date {
            self.date = date;
        }
        if let Some(provider) = update.provider {
            self.provider = provider.trim().to_string();
        }
        if let Some(description) = update.description {
            self.description = description.trim().to_string();
        }
        if let Some(amount) = update.amount {
            self.amount = amount;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(method) = update.payment_method {
            self.payment_method = method;
        }
        if let Some(claim) = update.insurance_claim {
            self.insurance_claim = claim;
        }
        if let Some(deductible) = update.tax_deductible {
            self.tax_deductible = deductible;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(receipt) = update.receipt_reference {
            self.receipt_reference = receipt;
        }
        self.updated_at = Utc::now();
    }

    pub fn set_status(&mut self, status: ClaimStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    pub fn is_reimbursed(&self) -> bool {
        self.status == ClaimStatus::Reimbursed
    }

    /// Check the form-level rules
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if self.provider.trim().is_empty() {
            return Err(ExpenseValidationError::MissingField("provider"));
        }
        if self.description.trim().is_empty() {
            return Err(ExpenseValidationError::MissingField("description"));
        }
        if self.amount.is_negative() {
            return Err(ExpenseValidationError::NegativeAmount(self.amount));
        }
        if self.amount > Money::MAX_EXPENSE {
            return Err(ExpenseValidationError::AmountTooLarge(self.amount));
        }
        Ok(())
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.provider,
            self.amount
        )
    }
}

/// Validation errors for expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    MissingField(&'static str),
    NegativeAmount(Money),
    AmountTooLarge(Money),
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "The {} field is required", field),
            Self::NegativeAmount(amount) => {
                write!(f, "Amount cannot be negative (got {})", amount)
            }
            Self::AmountTooLarge(amount) => write!(
                f,
                "Amount {} exceeds the limit of {}",
                amount,
                Money::MAX_EXPENSE
            ),
        }
    }
}

impl std::error::Error for ExpenseValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dental_visit() -> NewExpense {
        NewExpense::new(
            date(2024, 1, 10),
            "Bright Smiles",
            "Cleaning",
            Money::from_dollars(100),
            ExpenseCategory::Dental,
        )
    }

    #[test]
    fn test_initial_status_follows_claim_flag() {
        let user = UserId::new();
        let claimed = Expense::new(user, dental_visit().insurance_claim(true));
        assert_eq!(claimed.status, ClaimStatus::PendingClaim);

        let unclaimed = Expense::new(user, dental_visit());
        assert_eq!(unclaimed.status, ClaimStatus::NotClaimed);
    }

    #[test]
    fn test_explicit_status_wins() {
        let mut input = dental_visit().insurance_claim(true);
        input.status = Some(ClaimStatus::Reimbursed);
        let expense = Expense::new(UserId::new(), input);
        assert_eq!(expense.status, ClaimStatus::Reimbursed);
    }

    #[test]
    fn test_any_status_transition_allowed() {
        let mut expense = Expense::new(UserId::new(), dental_visit());
        for from in ClaimStatus::ALL {
            for to in ClaimStatus::ALL {
                expense.set_status(from);
                expense.set_status(to);
                assert_eq!(expense.status, to);
            }
        }
        assert!(ClaimStatus::Denied.is_resolved());
        assert!(!ClaimStatus::PendingClaim.is_resolved());
    }

    #[test]
    fn test_apply_keeps_identity() {
        let mut expense = Expense::new(UserId::new(), dental_visit());
        let id = expense.id;
        let created = expense.created_at;

        expense.apply(ExpenseUpdate {
            provider: Some("  City Dental ".into()),
            amount: Some(Money::from_dollars(80)),
            receipt_reference: Some(Some("receipts/abc.png".into())),
            ..Default::default()
        });

        assert_eq!(expense.id, id);
        assert_eq!(expense.created_at, created);
        assert_eq!(expense.provider, "City Dental");
        assert_eq!(expense.amount, Money::from_dollars(80));
        assert_eq!(expense.receipt_reference.as_deref(), Some("receipts/abc.png"));

        expense.apply(ExpenseUpdate {
            receipt_reference: Some(None),
            ..Default::default()
        });
        assert!(expense.receipt_reference.is_none());
    }

    #[test]
    fn test_validation() {
        let user = UserId::new();
        assert!(Expense::new(user, dental_visit()).validate().is_ok());

        let mut blank = dental_visit();
        blank.provider = "   ".into();
        assert_eq!(
            Expense::new(user, blank).validate(),
            Err(ExpenseValidationError::MissingField("provider"))
        );

        let mut negative = dental_visit();
        negative.amount = Money::from_cents(-1);
        assert!(matches!(
            Expense::new(user, negative).validate(),
            Err(ExpenseValidationError::NegativeAmount(_))
        ));

        let mut oversized = dental_visit();
        oversized.amount = Money::MAX_EXPENSE + Money::from_cents(1);
        assert!(matches!(
            Expense::new(user, oversized).validate(),
            Err(ExpenseValidationError::AmountTooLarge(_))
        ));

        let mut at_limit = dental_visit();
        at_limit.amount = Money::MAX_EXPENSE;
        assert!(Expense::new(user, at_limit).validate().is_ok());
    }

    #[test]
    fn test_status_parse_and_serde() {
        assert_eq!("pending".parse(), Ok(ClaimStatus::PendingClaim));
        assert_eq!("Not claimed".parse(), Ok(ClaimStatus::NotClaimed));
        assert_eq!("not-claimed".parse(), Ok(ClaimStatus::NotClaimed));
        assert!("approved".parse::<ClaimStatus>().is_err());

        let json = serde_json::to_string(&ClaimStatus::PendingClaim).unwrap();
        assert_eq!(json, "\"Pending claim\"");
    }

    #[test]
    fn test_missing_category_defaults_to_uncategorized() {
        let expense = Expense::new(UserId::new(), dental_visit());
        let mut value = serde_json::to_value(&expense).unwrap();
        value.as_object_mut().unwrap().remove("category");

        let back: Expense = serde_json::from_value(value).unwrap();
        assert_eq!(back.category, ExpenseCategory::Uncategorized);
        assert_eq!(back.id, expense.id);
    }
}
