use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;
use uuid::Uuid;

use crate::{
    core::utils::{ensure_dir, write_atomic, PathResolver},
    currency::Money,
    errors::BudgetError,
    ledger::{Expense, WeeklyBudget},
};

use super::{RecordStore, Result};

pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// On-disk document holding every expense and budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub schema_version: u32,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub budgets: Vec<WeeklyBudget>,
}

impl Default for StoreSnapshot {
    fn default() -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            expenses: Vec::new(),
            budgets: Vec::new(),
        }
    }
}

/// Flat-file store: every operation reads the JSON snapshot, applies the
/// change, and writes it back atomically. Nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    /// Opens (or prepares) the store under `root`, defaulting to the
    /// application data directory.
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let base = PathResolver::resolve_base(root);
        ensure_dir(&base)?;
        Ok(Self {
            path: PathResolver::store_file_in(&base),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load_snapshot(&self) -> Result<StoreSnapshot> {
        if !self.path.exists() {
            return Ok(StoreSnapshot::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let snapshot: StoreSnapshot = serde_json::from_str(&data)?;
        if snapshot.schema_version > SNAPSHOT_SCHEMA_VERSION {
            return Err(BudgetError::Storage(format!(
                "store `{}` was written by a newer schema version ({})",
                self.path.display(),
                snapshot.schema_version
            )));
        }
        Ok(snapshot)
    }

    fn save_snapshot(&self, snapshot: &StoreSnapshot) -> Result<()> {
        let json = serde_json::to_string_pretty(snapshot)?;
        write_atomic(&self.path, &json)
    }

    fn modify<T>(&self, apply: impl FnOnce(&mut StoreSnapshot) -> T) -> Result<T> {
        let mut snapshot = self.load_snapshot()?;
        let outcome = apply(&mut snapshot);
        snapshot.schema_version = SNAPSHOT_SCHEMA_VERSION;
        self.save_snapshot(&snapshot)?;
        Ok(outcome)
    }
}

impl RecordStore for JsonStore {
    fn insert(&mut self, expense: Expense) -> Result<Uuid> {
        let id = expense.id;
        self.modify(|snapshot| snapshot.expenses.push(expense))?;
        debug!(%id, path = %self.path.display(), "expense inserted");
        Ok(id)
    }

    fn get_by_id(&self, id: Uuid) -> Result<Option<Expense>> {
        Ok(self
            .load_snapshot()?
            .expenses
            .into_iter()
            .find(|expense| expense.id == id))
    }

    fn list_all(&self) -> Result<Vec<Expense>> {
        Ok(self.load_snapshot()?.expenses)
    }

    fn update(&mut self, expense: Expense) -> Result<bool> {
        let id = expense.id;
        let mut snapshot = self.load_snapshot()?;
        let Some(slot) = snapshot.expenses.iter_mut().find(|e| e.id == id) else {
            return Ok(false);
        };
        *slot = expense;
        self.save_snapshot(&snapshot)?;
        debug!(%id, "expense updated");
        Ok(true)
    }

    fn delete(&mut self, id: Uuid) -> Result<bool> {
        let mut snapshot = self.load_snapshot()?;
        let before = snapshot.expenses.len();
        snapshot.expenses.retain(|expense| expense.id != id);
        if snapshot.expenses.len() == before {
            return Ok(false);
        }
        self.save_snapshot(&snapshot)?;
        debug!(%id, "expense deleted");
        Ok(true)
    }

    fn upsert_budget(&mut self, week_start: DateTime<Utc>, amount: Money) -> Result<()> {
        self.modify(|snapshot| {
            match snapshot
                .budgets
                .iter_mut()
                .find(|budget| budget.week_start == week_start)
            {
                Some(existing) => existing.amount = amount,
                None => {
                    snapshot.budgets.push(WeeklyBudget::new(week_start, amount));
                    snapshot.budgets.sort_by_key(|budget| budget.week_start);
                }
            }
        })?;
        debug!(%week_start, %amount, "budget stored");
        Ok(())
    }

    fn get_budget(&self, week_start: DateTime<Utc>) -> Result<Option<Money>> {
        Ok(self
            .load_snapshot()?
            .budgets
            .iter()
            .find(|budget| budget.week_start == week_start)
            .map(|budget| budget.amount))
    }

    fn list_budgets(&self) -> Result<Vec<WeeklyBudget>> {
        Ok(self.load_snapshot()?.budgets)
    }

    fn clear(&mut self) -> Result<()> {
        self.save_snapshot(&StoreSnapshot::default())?;
        debug!(path = %self.path.display(), "store cleared");
        Ok(())
    }
}
