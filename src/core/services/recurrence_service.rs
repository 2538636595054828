use chrono::{DateTime, TimeZone, Utc};
use tracing::{debug, info};

use crate::ledger::{Expense, RecurrenceMaterializer, WeekCalculator};
use crate::storage::RecordStore;

use super::ServiceResult;

pub struct RecurrenceService;

impl RecurrenceService {
    /// Materializes due recurring expenses for the period containing `now`
    /// and inserts them. Returns the inserted records.
    ///
    /// The exclusive store borrow keeps the load/check/insert sequence from
    /// interleaving with another run on the same handle.
    pub fn run<Tz: TimeZone>(
        store: &mut dyn RecordStore,
        calculator: &WeekCalculator<Tz>,
        now: DateTime<Utc>,
    ) -> ServiceResult<Vec<Expense>> {
        let existing = store.list_all()?;
        let current_week = calculator.current_week(now);
        let created =
            RecurrenceMaterializer::new(calculator).materialize(current_week, now, &existing);
        for expense in &created {
            store.insert(expense.clone())?;
            debug!(
                id = %expense.id,
                description = %expense.description,
                "recurring expense materialized"
            );
        }
        if !created.is_empty() {
            info!(count = created.len(), "materialized recurring expenses");
        }
        Ok(created)
    }
}
