//! Ledger store, query engine and the session that ties them to a presenter.

pub mod chart;
pub mod clock;
pub mod format;
pub mod ledger_store;
pub mod presenter;
pub mod query;
pub mod session;

pub use clock::{Clock, FixedClock, SystemClock};
pub use ledger_store::{ClearOutcome, LedgerStore, LoadReport};
pub use presenter::{ConfirmationRequest, Confirmer, PendingAction, Presenter, Severity};
pub use query::{
    AnalyticsReport, BudgetLevel, BudgetStatus, CategoryTotals, FilterState, QueryEngine, Summary,
};
pub use session::Session;
