#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use chrono::{DateTime, TimeZone, Utc, Weekday};
use once_cell::sync::Lazy;
use quick_budget::{
    config::{Config, ConfigManager},
    core::{BudgetManager, FixedClock},
    ledger::WeekCalculator,
    storage::JsonStore,
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Fresh data directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Creates an isolated manager backed by a JSON store in a unique directory,
/// with UTC Monday-first weeks and a clock frozen at `now`.
pub fn setup_test_env(now: DateTime<Utc>) -> (BudgetManager<Utc>, ConfigManager, PathBuf) {
    let base = temp_base();
    let store = JsonStore::new(Some(base.clone())).expect("create json store");
    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    let manager = BudgetManager::new(
        Box::new(store),
        Box::new(FixedClock(now)),
        WeekCalculator::new(Utc, Weekday::Mon),
        Config::default(),
    );
    (manager, config_manager, base)
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}
