//! Expense repositories
//!
//! `ExpenseRepository` is the seam between the reporting core and wherever
//! records live. `JsonExpenseRepository` persists to `expenses.json`;
//! `InMemoryExpenseRepository` keeps everything in memory.
//!
//! Both keep records in creation order, and a failed write leaves the stored
//! set untouched.

use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{MedexpError, MedexpResult};
use crate::models::{Expense, ExpenseId, ExpenseUpdate, NewExpense, UserId};

use super::file_io::{read_json, write_json_atomic};

/// Storage operations for expense records
pub trait ExpenseRepository {
    /// All expenses owned by `user_id`, in creation order
    fn list_expenses(&self, user_id: UserId) -> MedexpResult<Vec<Expense>>;

    fn get_expense(&self, id: ExpenseId) -> MedexpResult<Option<Expense>>;

    /// Store a new expense, assigning its id and creation time
    fn create_expense(&self, user_id: UserId, input: NewExpense) -> MedexpResult<Expense>;

    /// Apply a partial edit; `NotFound` if `id` is absent
    fn update_expense(&self, id: ExpenseId, update: ExpenseUpdate) -> MedexpResult<Expense>;

    /// Remove an expense for good; `NotFound` if `id` is absent
    fn delete_expense(&self, id: ExpenseId) -> MedexpResult<()>;
}

fn apply_update(
    rows: &mut [Expense],
    id: ExpenseId,
    update: ExpenseUpdate,
) -> MedexpResult<Expense> {
    let expense = rows
        .iter_mut()
        .find(|e| e.id == id)
        .ok_or_else(|| MedexpError::expense_not_found(id.to_string()))?;
    expense.apply(update);
    Ok(expense.clone())
}

fn remove(rows: &mut Vec<Expense>, id: ExpenseId) -> MedexpResult<Expense> {
    let index = rows
        .iter()
        .position(|e| e.id == id)
        .ok_or_else(|| MedexpError::expense_not_found(id.to_string()))?;
    Ok(rows.remove(index))
}

fn owned_by(rows: &[Expense], user_id: UserId) -> Vec<Expense> {
    rows.iter()
        .filter(|e| e.user_id == user_id)
        .cloned()
        .collect()
}

fn read_lock(lock: &RwLock<Vec<Expense>>) -> MedexpResult<RwLockReadGuard<'_, Vec<Expense>>> {
    lock.read()
        .map_err(|e| MedexpError::Storage(format!("Failed to acquire read lock: {}", e)))
}

fn write_lock(lock: &RwLock<Vec<Expense>>) -> MedexpResult<RwLockWriteGuard<'_, Vec<Expense>>> {
    lock.write()
        .map_err(|e| MedexpError::Storage(format!("Failed to acquire write lock: {}", e)))
}

/// Volatile repository, used by tests and embedders
#[derive(Debug, Default)]
pub struct InMemoryExpenseRepository {
    expenses: RwLock<Vec<Expense>>,
}

impl InMemoryExpenseRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with existing records, keeping their ids
    pub fn with_expenses(expenses: Vec<Expense>) -> Self {
        Self {
            expenses: RwLock::new(expenses),
        }
    }

    pub fn count(&self) -> MedexpResult<usize> {
        Ok(read_lock(&self.expenses)?.len())
    }
}

impl ExpenseRepository for InMemoryExpenseRepository {
    fn list_expenses(&self, user_id: UserId) -> MedexpResult<Vec<Expense>> {
        Ok(owned_by(&read_lock(&self.expenses)?, user_id))
    }

    fn get_expense(&self, id: ExpenseId) -> MedexpResult<Option<Expense>> {
        Ok(read_lock(&self.expenses)?
            .iter()
            .find(|e| e.id == id)
            .cloned())
    }

    fn create_expense(&self, user_id: UserId, input: NewExpense) -> MedexpResult<Expense> {
        let expense = Expense::new(user_id, input);
        write_lock(&self.expenses)?.push(expense.clone());
        Ok(expense)
    }

    fn update_expense(&self, id: ExpenseId, update: ExpenseUpdate) -> MedexpResult<Expense> {
        let mut rows = write_lock(&self.expenses)?;
        apply_update(&mut rows, id, update)
    }

    fn delete_expense(&self, id: ExpenseId) -> MedexpResult<()> {
        let mut rows = write_lock(&self.expenses)?;
        remove(&mut rows, id).map(|_| ())
    }
}

/// On-disk layout of expenses.json
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ExpenseData {
    expenses: Vec<Expense>,
}

/// Repository backed by a JSON file, written through on every change
pub struct JsonExpenseRepository {
    path: PathBuf,
    expenses: RwLock<Vec<Expense>>,
}

impl JsonExpenseRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            expenses: RwLock::new(Vec::new()),
        }
    }

    /// Load expenses from disk, replacing anything held in memory
    ///
    /// A record that fails validation rejects the whole file and leaves memory untouched.
    pub fn load(&self) -> MedexpResult<()> {
        let file_data: ExpenseData = read_json(&self.path).inspect_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "failed to load expenses")
        })?;

        for expense in &file_data.expenses {
            expense.validate().map_err(|e| {
                tracing::error!(
                    path = %self.path.display(),
                    id = %expense.id,
                    error = %e,
                    "invalid expense on disk"
                );
                MedexpError::Storage(format!(
                    "Invalid expense {} in {}: {}",
                    expense.id,
                    self.path.display(),
                    e
                ))
            })?;
        }

        tracing::debug!(count = file_data.expenses.len(), "loaded expenses");
        *write_lock(&self.expenses)? = file_data.expenses;
        Ok(())
    }

    /// Every stored expense regardless of owner, in creation order
    pub fn get_all(&self) -> MedexpResult<Vec<Expense>> {
        Ok(read_lock(&self.expenses)?.clone())
    }

    pub fn count(&self) -> MedexpResult<usize> {
        Ok(read_lock(&self.expenses)?.len())
    }

    /// Run `change` against a copy, persist the copy, then swap it in
    fn commit<T>(
        &self,
        change: impl FnOnce(&mut Vec<Expense>) -> MedexpResult<T>,
    ) -> MedexpResult<T> {
        let mut guard = write_lock(&self.expenses)?;
        let mut next = guard.clone();
        let value = change(&mut next)?;

        let file_data = ExpenseData { expenses: next };
        write_json_atomic(&self.path, &file_data).inspect_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "failed to save expenses")
        })?;

        *guard = file_data.expenses;
        Ok(value)
    }
}

impl ExpenseRepository for JsonExpenseRepository {
    fn list_expenses(&self, user_id: UserId) -> MedexpResult<Vec<Expense>> {
        Ok(owned_by(&read_lock(&self.expenses)?, user_id))
    }

    fn get_expense(&self, id: ExpenseId) -> MedexpResult<Option<Expense>> {
        Ok(read_lock(&self.expenses)?
            .iter()
            .find(|e| e.id == id)
            .cloned())
    }

    fn create_expense(&self, user_id: UserId, input: NewExpense) -> MedexpResult<Expense> {
        let expense = Expense::new(user_id, input);
        self.commit(|rows| {
            rows.push(expense.clone());
            Ok(())
        })?;
        Ok(expense)
    }

    fn update_expense(&self, id: ExpenseId, update: ExpenseUpdate) -> MedexpResult<Expense> {
        self.commit(|rows| apply_update(rows, id, update))
    }

    fn delete_expense(&self, id: ExpenseId) -> MedexpResult<()> {
        self.commit(|rows| remove(rows, id).map(|_| ()))
    }
}
