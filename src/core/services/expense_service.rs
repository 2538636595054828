use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::BudgetError;
use crate::ledger::{summary::sort_newest_first, Expense, ExpenseDraft, ValidExpense};
use crate::storage::RecordStore;

use super::ServiceResult;

pub struct ExpenseService;

impl ExpenseService {
    /// Validates the draft and stores a new expense stamped at `now`.
    pub fn add(
        store: &mut dyn RecordStore,
        draft: &ExpenseDraft,
        now: DateTime<Utc>,
    ) -> ServiceResult<Expense> {
        let valid = Self::validated(draft)?;
        let expense = Expense::new(
            valid.description,
            valid.category,
            valid.amount,
            valid.recurrence,
            now,
        );
        store.insert(expense.clone())?;
        debug!(id = %expense.id, amount = %expense.amount, "expense recorded");
        Ok(expense)
    }

    pub fn get(store: &dyn RecordStore, id: Uuid) -> ServiceResult<Option<Expense>> {
        store.get_by_id(id)
    }

    /// Applies a validated draft to an existing expense. With
    /// `refresh_timestamp` the expense is re-dated to `now`.
    pub fn edit(
        store: &mut dyn RecordStore,
        id: Uuid,
        draft: &ExpenseDraft,
        now: DateTime<Utc>,
        refresh_timestamp: bool,
    ) -> ServiceResult<Expense> {
        let valid = Self::validated(draft)?;
        let mut expense = store
            .get_by_id(id)?
            .ok_or_else(|| BudgetError::expense_not_found(id))?;
        expense.description = valid.description;
        expense.amount = valid.amount;
        expense.category = valid.category;
        expense.recurrence = valid.recurrence;
        if refresh_timestamp {
            expense.occurred_at = now;
        }
        if !store.update(expense.clone())? {
            return Err(BudgetError::expense_not_found(id));
        }
        debug!(%id, "expense edited");
        Ok(expense)
    }

    /// Removes the expense; `false` when no record had that id.
    pub fn delete(store: &mut dyn RecordStore, id: Uuid) -> ServiceResult<bool> {
        let removed = store.delete(id)?;
        if removed {
            debug!(%id, "expense deleted");
        }
        Ok(removed)
    }

    /// Every expense, newest first.
    pub fn list(store: &dyn RecordStore) -> ServiceResult<Vec<Expense>> {
        let mut all = store.list_all()?;
        sort_newest_first(&mut all);
        Ok(all)
    }

    /// Resolves a full id or an unambiguous id prefix.
    pub fn resolve_id(store: &dyn RecordStore, needle: &str) -> ServiceResult<Uuid> {
        let needle = needle.trim().to_lowercase();
        if let Ok(id) = Uuid::parse_str(&needle) {
            return Ok(id);
        }
        if needle.is_empty() {
            return Err(BudgetError::Validation("expense id is required".into()));
        }
        let matches: Vec<Uuid> = store
            .list_all()?
            .into_iter()
            .map(|expense| expense.id)
            .filter(|id| id.to_string().starts_with(&needle))
            .collect();
        match matches.as_slice() {
            [id] => Ok(*id),
            [] => Err(BudgetError::expense_not_found(needle)),
            _ => Err(BudgetError::Validation(format!(
                "id prefix `{needle}` matches {} expenses",
                matches.len()
            ))),
        }
    }

    fn validated(draft: &ExpenseDraft) -> ServiceResult<ValidExpense> {
        draft.validate().map_err(|err| {
            warn!(error = %err, "rejected expense input");
            err
        })
    }
}
