use chrono::{DateTime, TimeZone, Utc};

use super::expense::{Expense, Recurrence};
use super::week::{TimeWindow, WeekCalculator};

/// Turns recurring templates into concrete expenses for the current period.
pub struct RecurrenceMaterializer<'a, Tz: TimeZone> {
    calculator: &'a WeekCalculator<Tz>,
}

impl<'a, Tz: TimeZone> RecurrenceMaterializer<'a, Tz> {
    pub fn new(calculator: &'a WeekCalculator<Tz>) -> Self {
        Self { calculator }
    }

    /// Builds the expenses that should be inserted for the period containing
    /// `now`. Nothing is persisted here; the caller inserts the returned
    /// records.
    ///
    /// A weekly template is due when it predates `current_week`; a monthly
    /// one when it falls in a different local month than `now`. A due
    /// template is skipped if an equivalent expense (description, category,
    /// amount) already sits in the period, including instances produced
    /// earlier in the same call, so repeated runs never duplicate.
    pub fn materialize(
        &self,
        current_week: TimeWindow,
        now: DateTime<Utc>,
        expenses: &[Expense],
    ) -> Vec<Expense> {
        let current_month = self.calculator.month_range(now);
        let mut creations: Vec<Expense> = Vec::new();

        for template in expenses.iter().filter(|e| e.recurrence.is_recurring()) {
            let window = match template.recurrence {
                Recurrence::Weekly if template.occurred_at < current_week.start => current_week,
                Recurrence::Monthly if !self.calculator.same_month(template.occurred_at, now) => {
                    current_month
                }
                _ => continue,
            };

            let already_recorded = expenses.iter().chain(creations.iter()).any(|existing| {
                existing.is_equivalent(template) && window.contains(existing.occurred_at)
            });
            if already_recorded {
                continue;
            }

            creations.push(template.instantiate(now));
        }

        creations
    }
}
