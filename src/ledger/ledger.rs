use serde::{Deserialize, Serialize};

use crate::core::clock::Clock;
use crate::errors::ValidationError;

use super::expense::{Expense, ExpenseDraft};

/// Ordered expense collection, newest first. Serializes as a plain JSON array.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Ledger {
    expenses: Vec<Expense>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_expenses(expenses: Vec<Expense>) -> Self {
        Self { expenses }
    }

    /// Validates `draft` and prepends the new record. Nothing changes on error.
    pub fn add(
        &mut self,
        draft: &ExpenseDraft,
        clock: &dyn Clock,
    ) -> Result<Expense, ValidationError> {
        let (amount, description, category, date) = draft.validate(clock.now().date())?;
        let timestamp = clock.utc_now();
        let expense = Expense {
            id: self.next_id(timestamp.timestamp_millis()),
            amount,
            description,
            category,
            date,
            timestamp,
        };
        self.expenses.insert(0, expense.clone());
        Ok(expense)
    }

    /// Removes the record with `id`, reporting whether one was found.
    pub fn remove(&mut self, id: i64) -> bool {
        self.take(id).is_some()
    }

    /// Removes and returns the record with `id`.
    pub fn take(&mut self, id: i64) -> Option<Expense> {
        let index = self.expenses.iter().position(|expense| expense.id == id)?;
        Some(self.expenses.remove(index))
    }

    /// Empties the ledger, returning how many records were dropped.
    pub fn clear(&mut self) -> usize {
        let count = self.expenses.len();
        self.expenses.clear();
        count
    }

    pub fn get(&self, id: i64) -> Option<&Expense> {
        self.expenses.iter().find(|expense| expense.id == id)
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    /// Millisecond ids collide when two records are added within one tick.
    fn next_id(&self, candidate: i64) -> i64 {
        if self.get(candidate).is_none() {
            return candidate;
        }
        self.expenses
            .iter()
            .map(|expense| expense.id)
            .max()
            .map_or(candidate, |max| max + 1)
    }
}
