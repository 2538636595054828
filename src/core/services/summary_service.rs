use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};

use crate::currency::Money;
use crate::ledger::{
    summary::{self, sort_newest_first},
    Category, Expense, TimeWindow, WeekCalculator, WeekSnapshot, WeekSummary,
};
use crate::storage::RecordStore;

use super::{BudgetService, ServiceResult};

/// Read-only aggregation queries over a record store.
pub struct SummaryService;

impl SummaryService {
    pub fn total_between(
        store: &dyn RecordStore,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ServiceResult<Money> {
        Ok(summary::total_between(&store.list_all()?, start, end))
    }

    pub fn totals_by_category(
        store: &dyn RecordStore,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ServiceResult<BTreeMap<Category, Money>> {
        Ok(summary::totals_by_category(&store.list_all()?, start, end))
    }

    pub fn expenses_between(
        store: &dyn RecordStore,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ServiceResult<Vec<Expense>> {
        Ok(summary::expenses_between(&store.list_all()?, start, end))
    }

    /// Up to `limit` most recent expenses inside `window`.
    pub fn recent_in(
        store: &dyn RecordStore,
        window: TimeWindow,
        limit: usize,
    ) -> ServiceResult<Vec<Expense>> {
        let mut within = Self::expenses_between(store, window.start, window.end)?;
        within.truncate(limit);
        Ok(within)
    }

    /// Up to `limit` most recent expenses regardless of date.
    pub fn recent(store: &dyn RecordStore, limit: usize) -> ServiceResult<Vec<Expense>> {
        let mut all = store.list_all()?;
        sort_newest_first(&mut all);
        all.truncate(limit);
        Ok(all)
    }

    pub fn week_summary(store: &dyn RecordStore, week: TimeWindow) -> ServiceResult<WeekSummary> {
        let budget = BudgetService::peek(store, week.start)?;
        Ok(WeekSummary::build(week, &store.list_all()?, budget))
    }

    /// Spent against budget for the `weeks` most recent weeks ending with the
    /// one containing `reference`, oldest first.
    pub fn history<Tz: TimeZone>(
        store: &dyn RecordStore,
        calculator: &WeekCalculator<Tz>,
        weeks: u32,
        reference: DateTime<Utc>,
    ) -> ServiceResult<Vec<WeekSnapshot>> {
        let weeks = calculator.last_weeks(weeks, reference)?;
        let expenses = store.list_all()?;
        weeks
            .into_iter()
            .map(|week| {
                Ok(WeekSnapshot {
                    week,
                    label: calculator.label(&week),
                    spent: summary::total_between(&expenses, week.start, week.end),
                    budget: BudgetService::peek(store, week.start)?,
                })
            })
            .collect()
    }
}
