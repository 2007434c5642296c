//! Expense display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::report::truncate;
use crate::models::Expense;
use crate::reports::composer::yes_no;

#[derive(Tabled)]
struct ExpenseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Provider")]
    provider: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Tax")]
    tax: &'static str,
}

/// Expense list as a table, in the order given
pub fn format_expense_table(expenses: &[Expense], currency: &str, date_format: &str) -> String {
    if expenses.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let rows = expenses.iter().map(|e| ExpenseRow {
        id: e.id.short(),
        date: e.date.format(date_format).to_string(),
        provider: truncate(&e.provider, 28),
        category: e.category.to_string(),
        amount: e.amount.format_with_symbol(currency),
        status: e.status.to_string(),
        tax: yes_no(e.tax_deductible),
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("{}\n", table)
}

pub fn format_expense_details(expense: &Expense, currency: &str, date_format: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Expense:         {}\n", expense.id));
    output.push_str(&format!(
        "Date:            {}\n",
        expense.date.format(date_format)
    ));
    output.push_str(&format!("Provider:        {}\n", expense.provider));
    output.push_str(&format!("Description:     {}\n", expense.description));
    output.push_str(&format!(
        "Amount:          {}\n",
        expense.amount.format_with_symbol(currency)
    ));
    output.push_str(&format!("Category:        {}\n", expense.category));
    if let Some(method) = expense.payment_method {
        output.push_str(&format!("Payment Method:  {}\n", method));
    }
    output.push_str(&format!(
        "Insurance Claim: {}\n",
        yes_no(expense.insurance_claim)
    ));
    output.push_str(&format!("Status:          {}\n", expense.status));
    output.push_str(&format!(
        "Tax Deductible:  {}\n",
        yes_no(expense.tax_deductible)
    ));
    if let Some(receipt) = &expense.receipt_reference {
        output.push_str(&format!("Receipt:         {}\n", receipt));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseCategory, Money, NewExpense, PaymentMethod, UserId};
    use chrono::NaiveDate;

    fn sample() -> Expense {
        Expense::new(
            UserId::new(),
            NewExpense::new(
                NaiveDate::from_ymd_opt(2024, 7, 4).unwrap(),
                "Bright Eyes Optometry",
                "Annual exam",
                Money::from_cents(14000),
                ExpenseCategory::Vision,
            )
            .payment_method(PaymentMethod::CreditCard)
            .insurance_claim(true),
        )
    }

    #[test]
    fn test_table_lists_expenses() {
        let expense = sample();
        let table = format_expense_table(&[expense.clone()], "$", "%d/%m/%Y");

        assert!(table.contains(&expense.id.short()));
        assert!(table.contains("04/07/2024"));
        assert!(table.contains("$140.00"));
        assert!(table.contains("Pending claim"));
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(
            format_expense_table(&[], "$", "%Y-%m-%d"),
            "No expenses found.\n"
        );
    }

    #[test]
    fn test_details() {
        let details = format_expense_details(&sample(), "€", "%Y-%m-%d");
        assert!(details.contains("Amount:          €140.00"));
        assert!(details.contains("Payment Method:  Credit Card"));
        assert!(details.contains("Insurance Claim: Yes"));
        assert!(!details.contains("Receipt:"));
    }
}
