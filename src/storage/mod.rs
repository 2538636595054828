pub mod json_backend;
pub mod memory;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    currency::Money,
    errors::BudgetError,
    ledger::{Expense, WeeklyBudget},
};

pub type Result<T> = std::result::Result<T, BudgetError>;

/// Abstraction over the record stores that hold expenses and weekly budgets.
///
/// Lookups that miss return `Ok(None)` / `Ok(false)`; `Err` is reserved for
/// backend failures.
pub trait RecordStore: Send {
    fn insert(&mut self, expense: Expense) -> Result<Uuid>;
    fn get_by_id(&self, id: Uuid) -> Result<Option<Expense>>;
    fn list_all(&self) -> Result<Vec<Expense>>;
    /// Replaces the stored expense with the same id. Returns `false` when absent.
    fn update(&mut self, expense: Expense) -> Result<bool>;
    fn delete(&mut self, id: Uuid) -> Result<bool>;

    /// Inserts or replaces the budget for `week_start`.
    fn upsert_budget(&mut self, week_start: DateTime<Utc>, amount: Money) -> Result<()>;
    fn get_budget(&self, week_start: DateTime<Utc>) -> Result<Option<Money>>;
    fn list_budgets(&self) -> Result<Vec<WeeklyBudget>>;

    /// Removes every expense and budget.
    fn clear(&mut self) -> Result<()>;

    /// Most recent budget stored strictly before `week_start`.
    fn latest_budget_before(&self, week_start: DateTime<Utc>) -> Result<Option<WeeklyBudget>> {
        Ok(self
            .list_budgets()?
            .into_iter()
            .filter(|budget| budget.week_start < week_start)
            .max_by_key(|budget| budget.week_start))
    }
}

pub use json_backend::{JsonStore, StoreSnapshot, SNAPSHOT_SCHEMA_VERSION};
pub use memory::MemoryStore;
