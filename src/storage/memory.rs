use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    currency::Money,
    ledger::{Expense, WeeklyBudget},
};

use super::{RecordStore, Result};

/// Volatile store used by tests and by hosts that persist elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    expenses: Vec<Expense>,
    budgets: BTreeMap<DateTime<Utc>, Money>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn insert(&mut self, expense: Expense) -> Result<Uuid> {
        let id = expense.id;
        self.expenses.push(expense);
        Ok(id)
    }

    fn get_by_id(&self, id: Uuid) -> Result<Option<Expense>> {
        Ok(self.expenses.iter().find(|e| e.id == id).cloned())
    }

    fn list_all(&self) -> Result<Vec<Expense>> {
        Ok(self.expenses.clone())
    }

    fn update(&mut self, expense: Expense) -> Result<bool> {
        match self.expenses.iter_mut().find(|e| e.id == expense.id) {
            Some(slot) => {
                *slot = expense;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete(&mut self, id: Uuid) -> Result<bool> {
        let before = self.expenses.len();
        self.expenses.retain(|e| e.id != id);
        Ok(self.expenses.len() != before)
    }

    fn upsert_budget(&mut self, week_start: DateTime<Utc>, amount: Money) -> Result<()> {
        self.budgets.insert(week_start, amount);
        Ok(())
    }

    fn get_budget(&self, week_start: DateTime<Utc>) -> Result<Option<Money>> {
        Ok(self.budgets.get(&week_start).copied())
    }

    fn list_budgets(&self) -> Result<Vec<WeeklyBudget>> {
        Ok(self
            .budgets
            .iter()
            .map(|(week_start, amount)| WeeklyBudget::new(*week_start, *amount))
            .collect())
    }

    fn clear(&mut self) -> Result<()> {
        self.expenses.clear();
        self.budgets.clear();
        Ok(())
    }

    fn latest_budget_before(&self, week_start: DateTime<Utc>) -> Result<Option<WeeklyBudget>> {
        Ok(self
            .budgets
            .range(..week_start)
            .next_back()
            .map(|(start, amount)| WeeklyBudget::new(*start, *amount)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Category, Recurrence};
    use chrono::TimeZone;

    fn sample() -> Expense {
        Expense::new(
            "Bus pass",
            Category::Transport,
            Money::from_cents(2000),
            Recurrence::None,
            Utc.with_ymd_and_hms(2025, 5, 5, 8, 0, 0).unwrap(),
        )
    }

    #[test]
    fn crud_roundtrip() {
        let mut store = MemoryStore::new();
        let id = store.insert(sample()).unwrap();
        assert_eq!(store.get_by_id(id).unwrap().unwrap().description, "Bus pass");

        let mut edited = store.get_by_id(id).unwrap().unwrap();
        edited.amount = Money::from_cents(2200);
        assert!(store.update(edited).unwrap());
        assert_eq!(store.list_all().unwrap()[0].amount, Money::from_cents(2200));

        assert!(store.delete(id).unwrap());
        assert!(!store.delete(id).unwrap());
        assert!(store.get_by_id(id).unwrap().is_none());
    }

    #[test]
    fn update_of_unknown_id_reports_false() {
        let mut store = MemoryStore::new();
        assert!(!store.update(sample()).unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn budgets_replace_on_conflict() {
        let mut store = MemoryStore::new();
        let week = Utc.with_ymd_and_hms(2025, 5, 5, 0, 0, 0).unwrap();
        store.upsert_budget(week, Money::from_cents(100)).unwrap();
        store.upsert_budget(week, Money::from_cents(250)).unwrap();
        assert_eq!(store.list_budgets().unwrap().len(), 1);
        assert_eq!(store.get_budget(week).unwrap(), Some(Money::from_cents(250)));
    }

    #[test]
    fn latest_budget_before_skips_the_week_itself() {
        let mut store = MemoryStore::new();
        let w1 = Utc.with_ymd_and_hms(2025, 4, 21, 0, 0, 0).unwrap();
        let w2 = Utc.with_ymd_and_hms(2025, 4, 28, 0, 0, 0).unwrap();
        let w3 = Utc.with_ymd_and_hms(2025, 5, 5, 0, 0, 0).unwrap();
        store.upsert_budget(w1, Money::from_cents(100)).unwrap();
        store.upsert_budget(w2, Money::from_cents(200)).unwrap();
        store.upsert_budget(w3, Money::from_cents(300)).unwrap();
        let found = store.latest_budget_before(w3).unwrap().unwrap();
        assert_eq!(found.amount, Money::from_cents(200));
        assert!(store.latest_budget_before(w1).unwrap().is_none());
    }
}
