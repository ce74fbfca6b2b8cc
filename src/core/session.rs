//! One application instance: ledger, settings and view state behind user intents.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{Settings, SettingsManager};
use crate::core::clock::Clock;
use crate::core::ledger_store::{ClearOutcome, LedgerStore};
use crate::core::presenter::{
    ConfirmationRequest, Confirmer, PendingAction, Presenter, Severity,
};
use crate::core::query::{FilterState, QueryEngine};
use crate::errors::{LedgerError, StorageError};
use crate::ledger::{AnalyticsPeriod, Category, Expense, ExpenseDraft, ExpenseForm};
use crate::storage::KeyValueStore;

const SAVE_EXPENSES_FAILED: &str =
    "Failed to save expenses. Local storage might be full or disallowed.";

/// Application state plus the presenter it drives.
///
/// Every intent mutates state, re-renders the affected views and reports the
/// outcome through [`Presenter::notify`]. Nothing here is fatal.
pub struct Session<P: Presenter> {
    store: LedgerStore,
    settings: SettingsManager,
    filter: FilterState,
    period: AnalyticsPeriod,
    clock: Box<dyn Clock>,
    presenter: P,
}

impl<P: Presenter> Session<P> {
    pub fn new(storage: Arc<dyn KeyValueStore>, clock: Box<dyn Clock>, presenter: P) -> Self {
        Self {
            store: LedgerStore::new(storage.clone()),
            settings: SettingsManager::new(storage),
            filter: FilterState::default(),
            period: AnalyticsPeriod::default(),
            clock,
            presenter,
        }
    }

    /// Loads persisted state and renders every view once.
    pub fn start(&mut self) {
        self.settings.load();
        if let Some(err) = self.settings.load_errors().first() {
            warn!(error = %err, "preferences reset after read failure");
            self.presenter.notify(
                "Failed to load preferences. Using defaults.",
                Severity::Error,
            );
        }
        let report = self.store.load_from_storage();
        if let Some(err) = report.recovered {
            warn!(error = %err, "expenses reset after load failure");
            self.presenter.notify(
                "Failed to load expenses. Local storage might be corrupted.",
                Severity::Error,
            );
        }
        self.presenter.render_settings(self.settings.settings());
        self.refresh_all();
    }

    pub fn on_submit(&mut self, form: &ExpenseForm) -> Option<Expense> {
        match form.parse() {
            Ok(draft) => self.submit_draft(&draft),
            Err(err) => {
                self.report_error(&err.into());
                None
            }
        }
    }

    pub fn submit_draft(&mut self, draft: &ExpenseDraft) -> Option<Expense> {
        let committed = match self.store.add(draft, self.clock.as_ref()) {
            Ok(committed) => committed,
            Err(err) => {
                self.report_error(&err.into());
                return None;
            }
        };
        let (expense, storage_error) = committed.into_parts();
        self.refresh_all();
        self.report_storage_failure(storage_error, SAVE_EXPENSES_FAILED);
        self.presenter
            .notify("Expense added successfully!", Severity::Success);
        Some(expense)
    }

    /// Pulls the record out of the ledger and returns its fields for resubmission.
    pub fn on_edit_request(&mut self, id: i64) -> Option<ExpenseForm> {
        let Some(committed) = self.store.edit(id) else {
            warn!(id, "edit requested for missing expense");
            self.presenter
                .notify("Expense not found for editing.", Severity::Error);
            return None;
        };
        let (expense, storage_error) = committed.into_parts();
        self.refresh_all();
        self.report_storage_failure(storage_error, SAVE_EXPENSES_FAILED);
        self.presenter.notify(
            "Edit the expense and click Add Expense to save changes",
            Severity::Success,
        );
        Some(ExpenseForm::from(&expense))
    }

    pub fn on_delete_request(&self, id: i64) -> ConfirmationRequest {
        ConfirmationRequest::delete(id)
    }

    /// Returns `None` without asking anything when there is nothing to clear.
    pub fn on_clear_all_request(&mut self) -> Option<ConfirmationRequest> {
        if self.store.is_empty() {
            self.presenter
                .notify("No expenses to clear!", Severity::Error);
            return None;
        }
        Some(ConfirmationRequest::clear_all())
    }

    /// Completes a pending request. A declined request changes nothing.
    pub fn resolve(&mut self, request: ConfirmationRequest, confirmed: bool) {
        if !confirmed {
            info!(action = ?request.action, "confirmation declined");
            return;
        }
        match request.action {
            PendingAction::Delete(id) => self.delete(id),
            PendingAction::ClearAll => self.clear_all(),
        }
    }

    pub fn confirm_with(&mut self, request: ConfirmationRequest, confirmer: &mut dyn Confirmer) {
        let confirmed = confirmer.confirm(&request);
        self.resolve(request, confirmed);
    }

    fn delete(&mut self, id: i64) {
        let (removed, storage_error) = self.store.remove(id).into_parts();
        if !removed {
            self.report_error(&LedgerError::NotFound(id));
            return;
        }
        self.refresh_all();
        self.report_storage_failure(storage_error, SAVE_EXPENSES_FAILED);
        self.presenter
            .notify("Expense deleted successfully!", Severity::Success);
    }

    fn clear_all(&mut self) {
        let (outcome, storage_error) = self.store.clear().into_parts();
        if outcome == ClearOutcome::AlreadyEmpty {
            self.presenter
                .notify("No expenses to clear!", Severity::Error);
            return;
        }
        self.filter = FilterState::default();
        self.refresh_all();
        self.report_storage_failure(storage_error, SAVE_EXPENSES_FAILED);
        self.presenter
            .notify("All expenses cleared!", Severity::Success);
    }

    /// Blank input removes the category filter.
    pub fn on_filter_change(&mut self, raw: &str) {
        match Category::parse_optional(raw) {
            Ok(category) => self.filter.category = category,
            Err(err) => {
                self.filter.category = None;
                self.report_error(&err.into());
            }
        }
        self.refresh_list();
    }

    pub fn on_search(&mut self, text: &str) {
        self.filter.search = text.trim().to_string();
        self.refresh_list();
    }

    pub fn on_period_change(&mut self, raw: &str) {
        self.period = AnalyticsPeriod::parse_lenient(raw);
        self.refresh_analytics();
    }

    pub fn on_budget_set(&mut self, raw: &str) {
        match self.settings.set_budget(raw) {
            Ok(committed) => {
                let (_, storage_error) = committed.into_parts();
                self.refresh_budget();
                self.report_storage_failure(
                    storage_error,
                    "Failed to save budget. Local storage might be full or disallowed.",
                );
                self.presenter
                    .notify("Budget set successfully!", Severity::Success);
            }
            Err(err) => self.report_error(&err.into()),
        }
    }

    pub fn on_currency_change(&mut self, symbol: &str) {
        match self.settings.set_currency(symbol) {
            Ok(committed) => {
                let (_, storage_error) = committed.into_parts();
                self.presenter.render_settings(self.settings.settings());
                self.refresh_all();
                self.report_storage_failure(
                    storage_error,
                    "Failed to save currency preference.",
                );
            }
            Err(err) => self.report_error(&err.into()),
        }
    }

    pub fn on_theme_toggle(&mut self) {
        let (theme, storage_error) = self.settings.toggle_theme().into_parts();
        self.presenter.render_settings(self.settings.settings());
        self.report_storage_failure(storage_error, "Failed to save theme preference.");
        let message = if theme.is_dark() {
            "Dark mode enabled!"
        } else {
            "Light mode enabled!"
        };
        self.presenter.notify(message, Severity::Success);
        // Chart colours follow the theme.
        self.refresh_analytics();
    }

    pub fn refresh_all(&mut self) {
        self.refresh_list();
        self.refresh_analytics();
        self.refresh_budget();
    }

    fn refresh_list(&mut self) {
        let visible = QueryEngine::filtered_by(self.store.expenses(), &self.filter);
        let summary = QueryEngine::summary(&visible);
        self.presenter.render(&visible);
        self.presenter.render_summary(summary);
    }

    fn refresh_analytics(&mut self) {
        let report = QueryEngine::analytics(self.store.expenses(), self.period, self.clock.now());
        self.presenter.render_analytics(&report);
    }

    fn refresh_budget(&mut self) {
        let status = QueryEngine::budget_status(
            self.store.expenses(),
            self.settings.settings().budget_limit,
            self.clock.now(),
        );
        self.presenter.render_budget_status(&status);
    }

    fn report_error(&mut self, err: &LedgerError) {
        warn!(error = %err, "request rejected");
        let message = match err {
            LedgerError::NotFound(_) => "Expense not found.".to_string(),
            other => other.to_string(),
        };
        self.presenter.notify(&message, Severity::Error);
    }

    fn report_storage_failure(&mut self, error: Option<StorageError>, message: &str) {
        if let Some(err) = error {
            warn!(error = %err, "change kept in memory but not persisted");
            self.presenter.notify(message, Severity::Error);
        }
    }

    pub fn expenses(&self) -> &[Expense] {
        self.store.expenses()
    }

    pub fn ledger_store(&self) -> &LedgerStore {
        &self.store
    }

    pub fn settings(&self) -> &Settings {
        self.settings.settings()
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn period(&self) -> AnalyticsPeriod {
        self.period
    }

    pub fn now(&self) -> chrono::NaiveDateTime {
        self.clock.now()
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }
}
