//! Expense domain models and the in-memory ledger.

pub mod category;
pub mod expense;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod period;

pub use category::Category;
pub use expense::{Expense, ExpenseDraft, ExpenseForm, DATE_FORMAT};
pub use ledger::Ledger;
pub use period::{AnalyticsPeriod, DateWindow};
