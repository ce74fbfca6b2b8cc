//! Owns the expense ledger and writes a full snapshot after every mutation.

use std::sync::Arc;

use tracing::{info, warn};

use crate::core::clock::Clock;
use crate::errors::{StorageError, ValidationError};
use crate::ledger::{Expense, ExpenseDraft, Ledger};
use crate::storage::{Committed, KeyValueStore, EXPENSES_KEY};

/// Outcome of [`LedgerStore::load_from_storage`].
#[derive(Debug)]
pub struct LoadReport {
    pub count: usize,
    /// Set when stored data could not be read and the ledger was reset to empty.
    pub recovered: Option<StorageError>,
}

/// Outcome of [`LedgerStore::clear`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    Cleared(usize),
    AlreadyEmpty,
}

pub struct LedgerStore {
    ledger: Ledger,
    storage: Arc<dyn KeyValueStore>,
}

impl LedgerStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            ledger: Ledger::new(),
            storage,
        }
    }

    /// Replaces the in-memory ledger with the persisted snapshot.
    ///
    /// Missing data yields an empty ledger. Unreadable or malformed data also
    /// yields an empty ledger, with the cause reported in the returned report.
    pub fn load_from_storage(&mut self) -> LoadReport {
        let loaded = self.storage.get(EXPENSES_KEY).and_then(|raw| match raw {
            Some(data) => {
                serde_json::from_str::<Ledger>(&data).map_err(|err| StorageError::Corrupt {
                    key: EXPENSES_KEY.to_string(),
                    reason: err.to_string(),
                })
            }
            None => Ok(Ledger::new()),
        });
        match loaded {
            Ok(ledger) => {
                self.ledger = ledger;
                info!(count = self.ledger.len(), "ledger loaded");
                LoadReport {
                    count: self.ledger.len(),
                    recovered: None,
                }
            }
            Err(err) => {
                warn!(error = %err, "failed to load expenses, starting with an empty ledger");
                self.ledger = Ledger::new();
                LoadReport {
                    count: 0,
                    recovered: Some(err),
                }
            }
        }
    }

    /// Serializes the entire ledger under the `expenses` key.
    pub fn persist(&self) -> Result<(), StorageError> {
        let json = serde_json::to_string(&self.ledger)?;
        self.storage.set(EXPENSES_KEY, &json).map_err(|err| {
            warn!(error = %err, "failed to persist expenses, storage is behind memory");
            err
        })
    }

    pub fn add(
        &mut self,
        draft: &ExpenseDraft,
        clock: &dyn Clock,
    ) -> Result<Committed<Expense>, ValidationError> {
        let expense = self.ledger.add(draft, clock)?;
        info!(
            id = expense.id,
            amount = expense.amount,
            category = %expense.category,
            "expense added"
        );
        Ok(Committed::new(expense, self.persist()))
    }

    /// Removes the record with `id`. Storage is only written when something was removed.
    pub fn remove(&mut self, id: i64) -> Committed<bool> {
        if !self.ledger.remove(id) {
            return Committed::new(false, Ok(()));
        }
        info!(id, "expense removed");
        Committed::new(true, self.persist())
    }

    /// Removes the record and hands it back so it can be resubmitted through
    /// [`LedgerStore::add`]. The original is gone immediately, whether or not
    /// the caller ever resubmits.
    pub fn edit(&mut self, id: i64) -> Option<Committed<Expense>> {
        let expense = self.ledger.take(id)?;
        info!(id, "expense taken for editing");
        Some(Committed::new(expense, self.persist()))
    }

    pub fn clear(&mut self) -> Committed<ClearOutcome> {
        if self.ledger.is_empty() {
            return Committed::new(ClearOutcome::AlreadyEmpty, Ok(()));
        }
        let count = self.ledger.clear();
        info!(count, "ledger cleared");
        Committed::new(ClearOutcome::Cleared(count), self.persist())
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn expenses(&self) -> &[Expense] {
        self.ledger.expenses()
    }

    pub fn get(&self, id: i64) -> Option<&Expense> {
        self.ledger.get(id)
    }

    pub fn len(&self) -> usize {
        self.ledger.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ledger.is_empty()
    }
}
