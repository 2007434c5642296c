//! Expense CLI commands
//!
//! Implements CLI commands for recording and managing expenses.

use clap::{Args, Subcommand};

use super::{parse_date, today};
use crate::config::Settings;
use crate::display::{format_expense_details, format_expense_table};
use crate::error::{MedexpError, MedexpResult};
use crate::models::{
    ClaimStatus, ExpenseCategory, ExpenseUpdate, Money, NewExpense, PaymentMethod, UserProfile,
};
use crate::reports::FilterForm;
use crate::services::ExpenseService;
use crate::storage::Storage;

/// Filter flags shared by listing and reporting commands
#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Text to look for in provider or description
    #[arg(short, long)]
    pub search: Option<String>,
    /// Category name, or "All"
    #[arg(short, long)]
    pub category: Option<String>,
    /// Claim status (not-claimed, pending, reimbursed, denied), or "All"
    #[arg(long)]
    pub status: Option<String>,
    /// Start date (YYYY-MM-DD), inclusive
    #[arg(long)]
    pub from: Option<String>,
    /// End date (YYYY-MM-DD), inclusive
    #[arg(long)]
    pub to: Option<String>,
    /// Minimum amount, inclusive
    #[arg(long)]
    pub min: Option<String>,
    /// Maximum amount, inclusive
    #[arg(long)]
    pub max: Option<String>,
    /// Only tax-deductible expenses
    #[arg(long)]
    pub tax_deductible: bool,
    /// Only expenses filed with insurance
    #[arg(long)]
    pub insurance_claim: bool,
}

impl FilterArgs {
    pub fn to_form(&self) -> FilterForm {
        FilterForm {
            search: self.search.clone().unwrap_or_default(),
            category: self.category.clone().unwrap_or_default(),
            status: self.status.clone().unwrap_or_default(),
            start_date: self.from.clone().unwrap_or_default(),
            end_date: self.to.clone().unwrap_or_default(),
            min_amount: self.min.clone().unwrap_or_default(),
            max_amount: self.max.clone().unwrap_or_default(),
            tax_deductible_only: self.tax_deductible,
            insurance_claim_only: self.insurance_claim,
        }
    }
}

/// Expense subcommands
#[derive(Subcommand, Debug)]
pub enum ExpenseCommands {
    /// Record a new expense
    Add {
        /// Doctor, clinic, pharmacy...
        provider: String,
        /// What the expense was for
        description: String,
        /// Amount, e.g. "85.50"
        amount: String,
        /// Category name
        #[arg(short, long)]
        category: String,
        /// Date of service (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Payment method (cash, credit-card, debit-card, insurance, hsa-fsa, other)
        #[arg(short, long)]
        payment: Option<String>,
        /// File with insurance (starts as "Pending claim")
        #[arg(long)]
        insurance_claim: bool,
        /// Mark as tax deductible
        #[arg(long)]
        tax_deductible: bool,
        /// Receipt file name or reference
        #[arg(long)]
        receipt: Option<String>,
    },
    /// List expenses
    List {
        #[command(flatten)]
        filter: FilterArgs,
        /// Show only the N most recent
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show expense details
    Show {
        /// Expense ID (full or short form)
        id: String,
    },
    /// Edit an expense
    Edit {
        /// Expense ID (full or short form)
        id: String,
        #[arg(long)]
        provider: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(short, long)]
        amount: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        payment: Option<String>,
        /// true or false
        #[arg(long)]
        insurance_claim: Option<bool>,
        /// true or false
        #[arg(long)]
        tax_deductible: Option<bool>,
        #[arg(long)]
        receipt: Option<String>,
    },
    /// Change the claim status
    Status {
        /// Expense ID (full or short form)
        id: String,
        /// not-claimed, pending, reimbursed or denied
        status: String,
    },
    /// Delete an expense
    Delete {
        /// Expense ID (full or short form)
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle an expense command for the signed-in user
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    user: &UserProfile,
    cmd: ExpenseCommands,
) -> MedexpResult<()> {
    let service = ExpenseService::new(&storage.expenses);
    let currency = settings.currency_symbol.as_str();
    let date_format = settings.date_format.as_str();

    match cmd {
        ExpenseCommands::Add {
            provider,
            description,
            amount,
            category,
            date,
            payment,
            insurance_claim,
            tax_deductible,
            receipt,
        } => {
            let date = match date {
                Some(d) => parse_date(&d)?,
                None => today(),
            };

            let mut input = NewExpense::new(
                date,
                provider,
                description,
                parse_amount(&amount)?,
                parse_category(&category)?,
            )
            .insurance_claim(insurance_claim)
            .tax_deductible(tax_deductible);
            if let Some(method) = payment {
                input = input.payment_method(parse_payment(&method)?);
            }
            input.receipt_reference = receipt;

            let expense = service.create(user.id, input)?;
            println!(
                "Recorded {} at {} ({}) [{}]",
                expense.amount.format_with_symbol(currency),
                expense.provider,
                expense.status,
                expense.id.short()
            );
        }

        ExpenseCommands::List { filter, limit } => {
            let criteria = filter.to_form().to_criteria();
            let mut expenses = service.list_filtered(user.id, &criteria)?;
            expenses.sort_by(|a, b| b.date.cmp(&a.date));
            if let Some(limit) = limit {
                expenses.truncate(limit);
            }
            print!("{}", format_expense_table(&expenses, currency, date_format));
        }

        ExpenseCommands::Show { id } => {
            let expense = service.find(user.id, &id)?;
            print!("{}", format_expense_details(&expense, currency, date_format));
        }

        ExpenseCommands::Edit {
            id,
            provider,
            description,
            amount,
            category,
            date,
            payment,
            insurance_claim,
            tax_deductible,
            receipt,
        } => {
            let expense = service.find(user.id, &id)?;

            let update = ExpenseUpdate {
                date: date.as_deref().map(parse_date).transpose()?,
                provider,
                description,
                amount: amount.as_deref().map(parse_amount).transpose()?,
                category: category.as_deref().map(parse_category).transpose()?,
                payment_method: payment
                    .as_deref()
                    .map(parse_payment)
                    .transpose()?
                    .map(Some),
                insurance_claim,
                tax_deductible,
                status: None,
                receipt_reference: receipt.map(Some),
            };

            let updated = service.update(expense.id, update)?;
            println!("Updated expense [{}]", updated.id.short());
            print!("{}", format_expense_details(&updated, currency, date_format));
        }

        ExpenseCommands::Status { id, status } => {
            let status: ClaimStatus = status.parse().map_err(MedexpError::Validation)?;
            let expense = service.find(user.id, &id)?;
            let updated = service.set_status(expense.id, status)?;
            println!(
                "{} at {}: {} -> {}",
                updated.amount.format_with_symbol(currency),
                updated.provider,
                expense.status,
                updated.status
            );
        }

        ExpenseCommands::Delete { id, force } => {
            let expense = service.find(user.id, &id)?;

            if !force {
                println!("About to delete expense:");
                println!("  Date:     {}", expense.date.format(date_format));
                println!("  Provider: {}", expense.provider);
                println!("  Amount:   {}", expense.amount.format_with_symbol(currency));
                println!();
                println!("Use --force to confirm deletion");
                return Ok(());
            }

            service.delete(expense.id)?;
            println!(
                "Deleted expense: {} ({} {})",
                expense.id.short(),
                expense.provider,
                expense.amount.format_with_symbol(currency)
            );
        }
    }

    Ok(())
}

fn parse_amount(s: &str) -> MedexpResult<Money> {
    Money::parse(s).map_err(|e| MedexpError::Validation(e.to_string()))
}

fn parse_category(s: &str) -> MedexpResult<ExpenseCategory> {
    s.parse().map_err(MedexpError::Validation)
}

fn parse_payment(s: &str) -> MedexpResult<PaymentMethod> {
    s.parse().map_err(MedexpError::Validation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClaimStatus, ExpenseCategory};

    #[test]
    fn test_filter_args_to_criteria() {
        let args = FilterArgs {
            category: Some("dental".into()),
            status: Some("All".into()),
            from: Some("2024-01-01".into()),
            max: Some("0".into()),
            tax_deductible: true,
            ..Default::default()
        };
        let criteria = args.to_form().to_criteria();

        assert_eq!(criteria.category, Some(ExpenseCategory::Dental));
        assert_eq!(criteria.status, None::<ClaimStatus>);
        assert_eq!(criteria.max_amount, Some(Money::zero()));
        assert!(criteria.tax_deductible_only);
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_amount("$12.5").unwrap(), Money::from_cents(1250));
        assert!(parse_amount("twelve").unwrap_err().is_validation());
        assert!(parse_category("Chiropractic").unwrap_err().is_validation());
        assert_eq!(parse_payment("hsa-fsa").unwrap(), PaymentMethod::HsaFsa);
    }
}
