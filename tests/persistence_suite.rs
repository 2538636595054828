mod common;

use std::fs;

use common::{at, setup_test_env, temp_base};
use quick_budget::{
    config::Config,
    core::utils::tmp_path,
    currency::Money,
    ledger::{Category, ExpenseDraft, Recurrence},
    storage::{JsonStore, RecordStore, StoreSnapshot, SNAPSHOT_SCHEMA_VERSION},
};
use serde_json::Value;

#[test]
fn expenses_and_budgets_survive_reopen() {
    let now = at(2025, 11, 12, 9, 0);
    let (mut manager, _config, base) = setup_test_env(now);
    manager.set_current_budget("150").unwrap();
    let expense = manager
        .add_expense(&ExpenseDraft::new(
            "Gym membership",
            "29,90",
            Some(Category::Health),
            Some(Recurrence::Monthly),
        ))
        .unwrap();
    drop(manager);

    let reopened = JsonStore::new(Some(base)).unwrap();
    let stored = reopened.get_by_id(expense.id).unwrap().expect("expense persisted");
    assert_eq!(stored, expense);
    let budgets = reopened.list_budgets().unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0].amount, Money::from_cents(15_000));
}

#[test]
fn snapshot_layout_is_versioned_json() {
    let base = temp_base();
    let mut store = JsonStore::new(Some(base.clone())).unwrap();
    store
        .upsert_budget(at(2025, 11, 10, 0, 0), Money::from_cents(5_000))
        .unwrap();

    let raw = fs::read_to_string(store.path()).unwrap();
    let json: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["schema_version"], SNAPSHOT_SCHEMA_VERSION);
    assert_eq!(json["budgets"][0]["amount"], 5_000);
    assert!(json["expenses"].as_array().unwrap().is_empty());
    assert!(!tmp_path(store.path()).exists());
    assert!(store.path().starts_with(&base));
}

#[test]
fn snapshot_without_collections_loads_empty() {
    let base = temp_base();
    let store = JsonStore::new(Some(base)).unwrap();
    fs::write(store.path(), r#"{"schema_version": 1}"#).unwrap();
    let snapshot: StoreSnapshot = store.load_snapshot().unwrap();
    assert!(snapshot.expenses.is_empty());
    assert!(snapshot.budgets.is_empty());
}

#[test]
fn upsert_replaces_existing_week() {
    let base = temp_base();
    let mut store = JsonStore::new(Some(base)).unwrap();
    let week = at(2025, 11, 10, 0, 0);
    store.upsert_budget(week, Money::from_cents(100)).unwrap();
    store.upsert_budget(week, Money::from_cents(200)).unwrap();
    assert_eq!(store.list_budgets().unwrap().len(), 1);
    assert_eq!(store.get_budget(week).unwrap(), Some(Money::from_cents(200)));
}

#[test]
fn config_round_trips_through_manager() {
    let (_manager, config_manager, base) = setup_test_env(at(2025, 11, 12, 9, 0));
    let config = Config {
        currency_symbol: "R$".into(),
        ..Config::default()
    };
    config_manager.save(&config).unwrap();
    assert!(config_manager.path().starts_with(base.join("config")));
    assert_eq!(config_manager.load().unwrap(), config);
}
