//! Expense service
//!
//! Business rules on top of an [`ExpenseRepository`]: validation before
//! anything is stored, id lookup by full or short form, and filtered listing.

use crate::error::{MedexpError, MedexpResult};
use crate::models::{ClaimStatus, Expense, ExpenseId, ExpenseUpdate, NewExpense, UserId};
use crate::reports::filter::{filter_expenses, FilterCriteria};
use crate::storage::ExpenseRepository;

/// Service for expense management
pub struct ExpenseService<'a> {
    repo: &'a dyn ExpenseRepository,
}

impl<'a> ExpenseService<'a> {
    pub fn new(repo: &'a dyn ExpenseRepository) -> Self {
        Self { repo }
    }

    /// Validate and store a new expense
    pub fn create(&self, user_id: UserId, input: NewExpense) -> MedexpResult<Expense> {
        Expense::new(user_id, input.clone())
            .validate()
            .map_err(|e| MedexpError::Validation(e.to_string()))?;

        let expense = self.repo.create_expense(user_id, input)?;
        tracing::info!(id = %expense.id, status = %expense.status, "expense created");
        Ok(expense)
    }

    pub fn list(&self, user_id: UserId) -> MedexpResult<Vec<Expense>> {
        self.repo.list_expenses(user_id)
    }

    pub fn list_filtered(
        &self,
        user_id: UserId,
        criteria: &FilterCriteria,
    ) -> MedexpResult<Vec<Expense>> {
        let expenses = self.repo.list_expenses(user_id)?;
        Ok(filter_expenses(&expenses, criteria))
    }

    pub fn get(&self, id: ExpenseId) -> MedexpResult<Expense> {
        self.repo
            .get_expense(id)?
            .ok_or_else(|| MedexpError::expense_not_found(id.to_string()))
    }

    /// Find one of the user's expenses by full UUID or a short `exp-xxxxxxxx` prefix
    pub fn find(&self, user_id: UserId, query: &str) -> MedexpResult<Expense> {
        if let Ok(id) = query.parse::<ExpenseId>() {
            return match self.repo.get_expense(id)? {
                Some(expense) if expense.user_id == user_id => Ok(expense),
                _ => Err(MedexpError::expense_not_found(query)),
            };
        }

        let needle = query
            .trim()
            .trim_start_matches("exp-")
            .replace('-', "")
            .to_lowercase();
        if needle.is_empty() {
            return Err(MedexpError::expense_not_found(query));
        }

        let mut matches = self
            .repo
            .list_expenses(user_id)?
            .into_iter()
            .filter(|e| e.id.as_uuid().simple().to_string().starts_with(&needle));

        match (matches.next(), matches.next()) {
            (Some(expense), None) => Ok(expense),
            (Some(_), Some(_)) => Err(MedexpError::Validation(format!(
                "Expense id '{}' is ambiguous; use more characters",
                query
            ))),
            (None, _) => Err(MedexpError::expense_not_found(query)),
        }
    }

    /// Apply a partial edit, rejecting it if the result would be invalid
    pub fn update(&self, id: ExpenseId, update: ExpenseUpdate) -> MedexpResult<Expense> {
        if update.is_empty() {
            return Err(MedexpError::Validation("No changes given".into()));
        }

        let mut preview = self.get(id)?;
        preview.apply(update.clone());
        preview
            .validate()
            .map_err(|e| MedexpError::Validation(e.to_string()))?;

        let updated = self.repo.update_expense(id, update)?;
        tracing::info!(id = %id, "expense updated");
        Ok(updated)
    }

    /// Move an expense to any claim status
    pub fn set_status(&self, id: ExpenseId, status: ClaimStatus) -> MedexpResult<Expense> {
        let updated = self.repo.update_expense(id, ExpenseUpdate::status(status))?;
        tracing::info!(id = %id, status = %status, "claim status changed");
        Ok(updated)
    }

    pub fn delete(&self, id: ExpenseId) -> MedexpResult<()> {
        self.repo.delete_expense(id)?;
        tracing::info!(id = %id, "expense deleted");
        Ok(())
    }
}
