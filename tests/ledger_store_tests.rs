mod common;

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use common::{clock, now};
use expense_tracker::{
    core::{ClearOutcome, Clock, LedgerStore},
    errors::StorageError,
    ledger::{Category, Expense, ExpenseDraft},
    storage::{KeyValueStore, MemoryStore, EXPENSES_KEY},
};

fn draft(amount: f64, description: &str, category: Category, days_ago: i64) -> ExpenseDraft {
    ExpenseDraft::new(
        amount,
        description,
        category,
        now().date() - Duration::days(days_ago),
    )
}

fn add(store: &mut LedgerStore, draft: ExpenseDraft) -> Expense {
    store.add(&draft, &clock()).unwrap().value
}

fn store_over(backend: Arc<MemoryStore>) -> LedgerStore {
    let mut store = LedgerStore::new(backend);
    let report = store.load_from_storage();
    assert!(report.recovered.is_none());
    store
}

#[test]
fn add_prepends_and_persists() {
    let backend = Arc::new(MemoryStore::new());
    let mut store = store_over(backend.clone());

    let first = store
        .add(&draft(10.0, "Groceries", Category::Food, 2), &clock())
        .unwrap();
    assert!(first.is_persisted());
    let second = store
        .add(&draft(20.0, "Train", Category::Transport, 1), &clock())
        .unwrap();

    assert_eq!(store.len(), 2);
    assert_eq!(store.expenses()[0].id, second.value.id);
    assert_eq!(store.expenses()[1].id, first.value.id);
    assert_ne!(first.value.id, second.value.id);
    assert!(backend.raw(EXPENSES_KEY).unwrap().contains("Train"));
}

#[test]
fn rejected_draft_does_not_touch_storage() {
    let backend = Arc::new(MemoryStore::new());
    let mut store = store_over(backend.clone());

    let err = store
        .add(&draft(0.0, "Nothing", Category::Other, 0), &clock())
        .unwrap_err();
    assert_eq!(err.to_string(), "Please enter a valid amount greater than 0");
    assert!(store.is_empty());
    assert!(backend.raw(EXPENSES_KEY).is_none());
}

#[test]
fn remove_missing_id_is_false_and_unchanged() {
    let backend = Arc::new(MemoryStore::new());
    let mut store = store_over(backend);
    add(&mut store, draft(10.0, "Groceries", Category::Food, 2));
    let before = store.ledger().clone();

    let outcome = store.remove(999);
    assert!(!outcome.value);
    assert_eq!(store.ledger(), &before);
}

#[test]
fn remove_existing_id_drops_exactly_one() {
    let backend = Arc::new(MemoryStore::new());
    let mut store = store_over(backend);
    let kept = add(&mut store, draft(10.0, "Groceries", Category::Food, 2));
    let gone = add(&mut store, draft(4.0, "Bus", Category::Transport, 1));

    let outcome = store.remove(gone.id);
    assert!(outcome.value);
    assert_eq!(store.len(), 1);
    assert!(store.get(gone.id).is_none());
    assert!(store.get(kept.id).is_some());
}

#[test]
fn clear_reports_count_or_noop() {
    let backend = Arc::new(MemoryStore::new());
    let mut store = store_over(backend.clone());
    assert_eq!(store.clear().value, ClearOutcome::AlreadyEmpty);

    add(&mut store, draft(10.0, "Groceries", Category::Food, 2));
    add(&mut store, draft(4.0, "Bus", Category::Transport, 1));
    assert_eq!(store.clear().value, ClearOutcome::Cleared(2));
    assert!(store.is_empty());
    assert_eq!(backend.raw(EXPENSES_KEY).as_deref(), Some("[]"));
}

#[test]
fn snapshot_round_trips_in_order() {
    let backend = Arc::new(MemoryStore::new());
    let mut store = store_over(backend.clone());
    for (index, category) in Category::ALL.iter().enumerate() {
        add(
            &mut store,
            draft(index as f64 + 1.5, "Item", *category, index as i64),
        );
    }

    let reloaded = store_over(backend);
    assert_eq!(reloaded.len(), Category::ALL.len());
    assert_eq!(reloaded.expenses(), store.expenses());
}

#[test]
fn unknown_category_loads_as_other() {
    let snapshot = r#"[{"id":1,"amount":3.5,"description":"Gift","category":"gifts","date":"2026-10-01","timestamp":"2026-10-01T09:00:00Z"}]"#;
    let backend = Arc::new(MemoryStore::new().with_value(EXPENSES_KEY, snapshot));
    let store = store_over(backend);
    assert_eq!(store.expenses()[0].category, Category::Other);
}

#[test]
fn malformed_snapshot_recovers_empty() {
    let backend = Arc::new(MemoryStore::new().with_value(EXPENSES_KEY, "[{\"id\": true}]"));
    let mut store = LedgerStore::new(backend);
    let report = store.load_from_storage();
    assert_eq!(report.count, 0);
    assert!(matches!(report.recovered, Some(StorageError::Corrupt { .. })));
    assert!(store.is_empty());
}

#[test]
fn quota_failure_keeps_memory_authoritative() {
    let backend = Arc::new(MemoryStore::with_quota(16));
    let mut store = store_over(backend.clone());

    let committed = store
        .add(&draft(10.0, "A fairly long description", Category::Food, 0), &clock())
        .unwrap();
    assert!(!committed.is_persisted());
    let (expense, error) = committed.into_parts();
    assert!(matches!(error, Some(StorageError::QuotaExceeded { .. })));
    assert_eq!(store.get(expense.id), Some(&expense));
    assert!(backend.get(EXPENSES_KEY).unwrap().is_none());
}

/// Half past midnight local time in UTC+1, still the previous day in UTC.
struct AheadOfUtc;

impl Clock for AheadOfUtc {
    fn now(&self) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(0, 30, 0)
            .unwrap()
    }

    fn utc_now(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 15, 23, 30, 0).unwrap()
    }
}

#[test]
fn future_date_check_uses_the_local_day() {
    let mut store = store_over(Arc::new(MemoryStore::new()));
    let local_today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();

    let committed = store
        .add(
            &ExpenseDraft::new(3.0, "Night bus", Category::Transport, local_today),
            &AheadOfUtc,
        )
        .unwrap();
    assert_eq!(committed.value.date, local_today);

    let err = store
        .add(
            &ExpenseDraft::new(3.0, "Night bus", Category::Transport, local_today + Duration::days(1)),
            &AheadOfUtc,
        )
        .unwrap_err();
    assert_eq!(err.to_string(), "Future dates are not allowed");
}
