use chrono::{DateTime, Local, TimeZone, Utc};
use tracing::info;
use uuid::Uuid;

use crate::config::Config;
use crate::currency::Money;
use crate::ledger::{
    Expense, ExpenseDraft, TimeWindow, WeekCalculator, WeekSnapshot, WeekSummary,
};
use crate::storage::RecordStore;

use super::clock::{Clock, SystemClock};
use super::services::{
    BudgetService, ExpenseService, RecurrenceService, ServiceResult, SummaryService,
};

/// Outcome of [`BudgetManager::startup`].
#[derive(Debug, Clone)]
pub struct StartupReport {
    pub week: TimeWindow,
    pub budget: Money,
    pub materialized: Vec<Expense>,
}

/// Everything the dashboard view renders for the current week.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub label: String,
    pub summary: WeekSummary,
    pub recent: Vec<Expense>,
}

/// Coordinates the store, clock, and week calculator behind the services.
///
/// Every mutating call borrows the manager mutably, so a host that shares it
/// across threads wraps it in a `Mutex`.
pub struct BudgetManager<Tz: TimeZone = Local> {
    store: Box<dyn RecordStore>,
    clock: Box<dyn Clock>,
    calculator: WeekCalculator<Tz>,
    config: Config,
}

impl BudgetManager<Local> {
    /// Manager on the host time zone and system clock, honoring the
    /// configured first day of the week.
    pub fn from_config(store: Box<dyn RecordStore>, config: Config) -> Self {
        let calculator = WeekCalculator::local().with_first_day(config.first_day_of_week);
        Self::new(store, Box::new(SystemClock), calculator, config)
    }
}

impl<Tz: TimeZone> BudgetManager<Tz> {
    pub fn new(
        store: Box<dyn RecordStore>,
        clock: Box<dyn Clock>,
        calculator: WeekCalculator<Tz>,
        config: Config,
    ) -> Self {
        Self {
            store,
            clock,
            calculator,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn calculator(&self) -> &WeekCalculator<Tz> {
        &self.calculator
    }

    pub fn store(&self) -> &dyn RecordStore {
        &*self.store
    }

    pub fn set_clock(&mut self, clock: Box<dyn Clock>) {
        self.clock = clock;
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn current_week(&self) -> TimeWindow {
        self.calculator.current_week(self.now())
    }

    pub fn week(&self, offset_weeks: i32) -> ServiceResult<TimeWindow> {
        self.calculator.week_range(offset_weeks, self.now())
    }

    pub fn label(&self, week: &TimeWindow) -> String {
        self.calculator.label(week)
    }

    /// Launch routine: make sure the current week has a budget, then
    /// materialize recurring expenses that are due.
    pub fn startup(&mut self) -> ServiceResult<StartupReport> {
        let now = self.now();
        let week = self.calculator.current_week(now);
        let budget = BudgetService::budget_for(&mut *self.store, week.start)?;
        let materialized = RecurrenceService::run(&mut *self.store, &self.calculator, now)?;
        info!(
            week = %self.calculator.label(&week),
            materialized = materialized.len(),
            "startup complete"
        );
        Ok(StartupReport {
            week,
            budget,
            materialized,
        })
    }

    pub fn materialize_recurring(&mut self) -> ServiceResult<Vec<Expense>> {
        let now = self.now();
        RecurrenceService::run(&mut *self.store, &self.calculator, now)
    }

    pub fn add_expense(&mut self, draft: &ExpenseDraft) -> ServiceResult<Expense> {
        let now = self.now();
        ExpenseService::add(&mut *self.store, draft, now)
    }

    pub fn edit_expense(
        &mut self,
        id: Uuid,
        draft: &ExpenseDraft,
        refresh_timestamp: bool,
    ) -> ServiceResult<Expense> {
        let now = self.now();
        ExpenseService::edit(&mut *self.store, id, draft, now, refresh_timestamp)
    }

    pub fn delete_expense(&mut self, id: Uuid) -> ServiceResult<bool> {
        ExpenseService::delete(&mut *self.store, id)
    }

    pub fn expense(&self, id: Uuid) -> ServiceResult<Option<Expense>> {
        ExpenseService::get(&*self.store, id)
    }

    pub fn resolve_expense_id(&self, needle: &str) -> ServiceResult<Uuid> {
        ExpenseService::resolve_id(&*self.store, needle)
    }

    /// Budget of the current week, seeded when missing.
    pub fn current_budget(&mut self) -> ServiceResult<Money> {
        let week = self.current_week();
        BudgetService::budget_for(&mut *self.store, week.start)
    }

    pub fn set_current_budget(&mut self, input: &str) -> ServiceResult<Money> {
        let week = self.current_week();
        BudgetService::set_from_input(&mut *self.store, week.start, input)
    }

    pub fn dashboard(&self) -> ServiceResult<Dashboard> {
        let week = self.current_week();
        let store = &*self.store;
        Ok(Dashboard {
            label: self.calculator.label(&week),
            summary: SummaryService::week_summary(store, week)?,
            recent: SummaryService::recent_in(store, week, self.config.recent_limit)?,
        })
    }

    /// Expenses of the week `offset_weeks` away from the current one.
    pub fn week_expenses(&self, offset_weeks: i32) -> ServiceResult<(TimeWindow, Vec<Expense>)> {
        let week = self.week(offset_weeks)?;
        let expenses =
            SummaryService::expenses_between(&*self.store, week.start, week.end)?;
        Ok((week, expenses))
    }

    /// History for `weeks` weeks, or the configured default.
    pub fn history(&self, weeks: Option<u32>) -> ServiceResult<Vec<WeekSnapshot>> {
        let weeks = weeks.unwrap_or(self.config.history_weeks);
        SummaryService::history(&*self.store, &self.calculator, weeks, self.now())
    }

    /// Recurring templates, newest first.
    pub fn recurring_templates(&self) -> ServiceResult<Vec<Expense>> {
        Ok(ExpenseService::list(&*self.store)?
            .into_iter()
            .filter(|expense| expense.recurrence.is_recurring())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use crate::ledger::{Category, Recurrence};
    use crate::storage::MemoryStore;
    use chrono::{Duration, Weekday};

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn manager(now: DateTime<Utc>) -> BudgetManager<Utc> {
        BudgetManager::new(
            Box::new(MemoryStore::new()),
            Box::new(FixedClock(now)),
            WeekCalculator::new(Utc, Weekday::Mon),
            Config::default(),
        )
    }

    fn assert_send<T: Send>() {}

    #[test]
    fn manager_is_send() {
        assert_send::<BudgetManager<Utc>>();
        assert_send::<BudgetManager<Local>>();
    }

    #[test]
    fn startup_seeds_zero_budget_on_fresh_store() {
        let mut manager = manager(at(2025, 11, 12, 9));
        let report = manager.startup().unwrap();
        assert_eq!(report.budget, Money::ZERO);
        assert!(report.materialized.is_empty());
        assert_eq!(
            manager.store().get_budget(report.week.start).unwrap(),
            Some(Money::ZERO)
        );
    }

    #[test]
    fn startup_materializes_once_per_week() {
        let last_week = at(2025, 11, 5, 10);
        let mut manager = manager(last_week);
        manager
            .add_expense(&ExpenseDraft::new(
                "Gym",
                "12,00",
                Some(Category::Health),
                Some(Recurrence::Weekly),
            ))
            .unwrap();

        manager.set_clock(Box::new(FixedClock(last_week + Duration::days(7))));
        assert_eq!(manager.startup().unwrap().materialized.len(), 1);
        assert!(manager.startup().unwrap().materialized.is_empty());
        assert_eq!(manager.recurring_templates().unwrap().len(), 2);
    }

    #[test]
    fn dashboard_limits_recent_to_current_week() {
        let now = at(2025, 11, 12, 9);
        let mut manager = manager(now);
        manager.set_current_budget("100").unwrap();
        for (description, amount) in [("Bus", "2"), ("Lunch", "18"), ("Cinema", "20")] {
            manager
                .add_expense(&ExpenseDraft::new(
                    description,
                    amount,
                    Some(Category::Other),
                    Some(Recurrence::None),
                ))
                .unwrap();
        }
        let dashboard = manager.dashboard().unwrap();
        assert_eq!(dashboard.summary.spent, Money::from_cents(4000));
        assert_eq!(dashboard.summary.remaining, Money::from_cents(6000));
        assert_eq!(dashboard.recent.len(), 2);
        assert_eq!(dashboard.label, "10 Nov - 16 Nov");
    }

    #[test]
    fn materialize_recurring_creates_instances_readable_by_id() {
        let last_week = at(2025, 11, 5, 10);
        let mut manager = manager(last_week);
        manager
            .add_expense(&ExpenseDraft::new(
                "Cleaner",
                "30",
                Some(Category::Home),
                Some(Recurrence::Weekly),
            ))
            .unwrap();

        manager.set_clock(Box::new(FixedClock(last_week + Duration::days(7))));
        let created = manager.materialize_recurring().unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(manager.expense(created[0].id).unwrap(), Some(created[0].clone()));
        assert!(manager.materialize_recurring().unwrap().is_empty());
        assert_eq!(manager.expense(uuid::Uuid::new_v4()).unwrap(), None);
    }

    #[test]
    fn oversized_amounts_never_reach_the_totals() {
        let mut manager = manager(at(2025, 11, 12, 9));
        let draft = |amount: &str| {
            ExpenseDraft::new("Yacht", amount, Some(Category::Leisure), Some(Recurrence::None))
        };
        assert!(manager
            .add_expense(&draft("92233720368547758"))
            .unwrap_err()
            .is_validation());
        manager.add_expense(&draft("10000000000")).unwrap();
        manager.add_expense(&draft("10000000000")).unwrap();
        let summary = manager.dashboard().unwrap().summary;
        assert_eq!(summary.spent, Money::from_cents(2 * crate::currency::MAX_AMOUNT_CENTS));
    }

    #[test]
    fn week_offsets_out_of_range_are_validation_errors() {
        let manager = manager(at(2025, 11, 12, 9));
        assert!(manager.week_expenses(i32::MAX).unwrap_err().is_validation());
        assert!(manager.history(Some(u32::MAX)).unwrap_err().is_validation());
        assert_eq!(manager.week(-1).unwrap().start, at(2025, 11, 3, 0));
    }
}
