#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveDateTime};
use expense_tracker::{
    config::Settings,
    core::{
        AnalyticsReport, BudgetStatus, FixedClock, Presenter, Session, Severity, Summary,
    },
    ledger::{Expense, ExpenseForm},
    storage::{JsonFileStore, KeyValueStore, MemoryStore},
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// 2026-10-15 14:00, the instant every session test runs at.
pub fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 15)
        .unwrap()
        .and_hms_opt(14, 0, 0)
        .unwrap()
}

pub fn clock() -> FixedClock {
    FixedClock(now())
}

pub fn days_ago(days: i64) -> String {
    (now().date() - chrono::Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

pub fn form(amount: &str, description: &str, category: &str, date: &str) -> ExpenseForm {
    ExpenseForm {
        amount: amount.into(),
        description: description.into(),
        category: category.into(),
        date: date.into(),
    }
}

/// Creates a file-backed store in a unique directory.
pub fn temp_store() -> (JsonFileStore, std::path::PathBuf) {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    let store = JsonFileStore::new(Some(base.clone())).expect("create json store");
    (store, base)
}

/// Every call the session made on its presenter, in order.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub lists: Vec<Vec<Expense>>,
    pub summaries: Vec<Summary>,
    pub analytics: Vec<AnalyticsReport>,
    pub budgets: Vec<BudgetStatus>,
    pub settings: Vec<Settings>,
    pub notices: Vec<(String, Severity)>,
}

impl RecordingPresenter {
    pub fn last_list(&self) -> &[Expense] {
        self.lists.last().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn last_notice(&self) -> Option<&str> {
        self.notices.last().map(|(message, _)| message.as_str())
    }

    pub fn last_severity(&self) -> Option<Severity> {
        self.notices.last().map(|(_, severity)| *severity)
    }

    pub fn has_notice(&self, message: &str) -> bool {
        self.notices.iter().any(|(text, _)| text == message)
    }
}

impl Presenter for RecordingPresenter {
    fn render(&mut self, expenses: &[&Expense]) {
        self.lists
            .push(expenses.iter().map(|expense| (*expense).clone()).collect());
    }

    fn render_summary(&mut self, summary: Summary) {
        self.summaries.push(summary);
    }

    fn render_analytics(&mut self, report: &AnalyticsReport) {
        self.analytics.push(report.clone());
    }

    fn render_budget_status(&mut self, status: &BudgetStatus) {
        self.budgets.push(*status);
    }

    fn render_settings(&mut self, settings: &Settings) {
        self.settings.push(settings.clone());
    }

    fn notify(&mut self, message: &str, severity: Severity) {
        self.notices.push((message.to_string(), severity));
    }
}

pub fn session_with(storage: Arc<dyn KeyValueStore>) -> Session<RecordingPresenter> {
    let mut session = Session::new(storage, Box::new(clock()), RecordingPresenter::default());
    session.start();
    session
}

/// A started session over a fresh in-memory store.
pub fn memory_session() -> (Session<RecordingPresenter>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (session_with(store.clone()), store)
}
