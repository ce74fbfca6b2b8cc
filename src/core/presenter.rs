//! Contract between the session and whatever renders it.

use crate::config::Settings;
use crate::core::query::{AnalyticsReport, BudgetStatus, Summary};
use crate::ledger::Expense;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// Receives view updates from a [`crate::core::session::Session`].
///
/// Implementations must neutralise user-supplied text for their medium
/// before showing it (see [`crate::core::format::escape_control`]).
pub trait Presenter {
    /// The filtered expense list, newest first.
    fn render(&mut self, expenses: &[&Expense]);
    fn render_summary(&mut self, summary: Summary);
    fn render_analytics(&mut self, report: &AnalyticsReport);
    fn render_budget_status(&mut self, status: &BudgetStatus);
    fn render_settings(&mut self, settings: &Settings);
    fn notify(&mut self, message: &str, severity: Severity);
}

/// Destructive action awaiting an explicit yes/no from the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    Delete(i64),
    ClearAll,
}

/// A question the presenter must put to the user before the action runs.
///
/// Hand it back to [`crate::core::session::Session::resolve`] with the answer;
/// dropping it is the same as declining.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct ConfirmationRequest {
    pub message: String,
    pub action: PendingAction,
}

impl ConfirmationRequest {
    pub fn delete(id: i64) -> Self {
        Self {
            message: "Are you sure you want to delete this expense?".into(),
            action: PendingAction::Delete(id),
        }
    }

    pub fn clear_all() -> Self {
        Self {
            message: "Are you sure you want to delete ALL expenses? This cannot be undone!".into(),
            action: PendingAction::ClearAll,
        }
    }
}

/// Answers confirmation requests synchronously, e.g. with a terminal prompt.
pub trait Confirmer {
    fn confirm(&mut self, request: &ConfirmationRequest) -> bool;
}

impl<F> Confirmer for F
where
    F: FnMut(&ConfirmationRequest) -> bool,
{
    fn confirm(&mut self, request: &ConfirmationRequest) -> bool {
        self(request)
    }
}
