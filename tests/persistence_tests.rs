mod common;

use std::sync::Arc;

use common::{days_ago, form, session_with, temp_store};
use expense_tracker::{
    config::Theme,
    storage::{KeyValueStore, BUDGET_KEY, CURRENCY_KEY, DARK_MODE_KEY, EXPENSES_KEY},
};

#[test]
fn expenses_and_settings_survive_a_restart() {
    let (store, base) = temp_store();
    let storage: Arc<dyn KeyValueStore> = Arc::new(store);

    let mut session = session_with(storage.clone());
    session.on_submit(&form("12.5", "Lunch", "food", &days_ago(1)));
    session.on_submit(&form("40", "Concert", "entertainment", &days_ago(3)));
    session.on_budget_set("250");
    session.on_currency_change("$");
    session.on_theme_toggle();
    let before = session.expenses().to_vec();
    drop(session);

    assert!(base.join("expenses.json").exists());

    let reopened = session_with(storage);
    assert_eq!(reopened.expenses(), before.as_slice());
    assert_eq!(reopened.settings().budget_limit, 250.0);
    assert_eq!(reopened.settings().currency, "$");
    assert_eq!(reopened.settings().theme, Theme::Dark);
    assert!(reopened.presenter().notices.is_empty());
}

#[test]
fn scalar_settings_use_string_values() {
    let (store, _base) = temp_store();
    let storage: Arc<dyn KeyValueStore> = Arc::new(store);

    let mut session = session_with(storage.clone());
    session.on_budget_set("99.5");
    session.on_currency_change("€");
    session.on_theme_toggle();

    assert_eq!(storage.get(BUDGET_KEY).unwrap().as_deref(), Some("99.5"));
    assert_eq!(storage.get(CURRENCY_KEY).unwrap().as_deref(), Some("€"));
    assert_eq!(storage.get(DARK_MODE_KEY).unwrap().as_deref(), Some("true"));
}

#[test]
fn hand_edited_garbage_is_treated_as_absent() {
    let (store, _base) = temp_store();
    store.set(EXPENSES_KEY, "this is not json").unwrap();
    store.set(BUDGET_KEY, "lots").unwrap();
    store.set(DARK_MODE_KEY, "yes").unwrap();
    let storage: Arc<dyn KeyValueStore> = Arc::new(store);

    let session = session_with(storage);
    assert!(session.expenses().is_empty());
    assert_eq!(session.settings().budget_limit, 0.0);
    assert_eq!(session.settings().theme, Theme::Light);
    assert!(session
        .presenter()
        .has_notice("Failed to load expenses. Local storage might be corrupted."));
}

#[test]
fn removed_key_reads_as_missing() {
    let (store, base) = temp_store();
    store.set(CURRENCY_KEY, "$").unwrap();
    store.remove(CURRENCY_KEY).unwrap();
    store.remove(CURRENCY_KEY).unwrap();
    assert!(store.get(CURRENCY_KEY).unwrap().is_none());
    assert!(!base.join("currency.json").exists());
}
