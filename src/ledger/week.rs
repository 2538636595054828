//! Week and month boundary arithmetic.
//!
//! All boundaries are computed on the local calendar of the configured time
//! zone and returned as UTC instants. A week runs from the configured first
//! day at 00:00:00.000 to six days later at 23:59:59.999.

use chrono::{
    DateTime, Datelike, Days, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
    Weekday,
};
use serde::{Deserialize, Serialize};

use crate::errors::{BudgetError, BudgetResult};

const DAYS_PER_WEEK: i64 = 7;
/// Upper bound on the number of weeks a single history query may span.
pub const MAX_HISTORY_WEEKS: u32 = 520;
const WEEK_LABEL_FORMAT: &str = "%d %b";

/// Inclusive span between two instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        is_within(instant, self.start, self.end)
    }
}

/// Inclusive range test on both ends.
pub fn is_within(instant: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    instant >= start && instant <= end
}

#[derive(Debug, Clone)]
pub struct WeekCalculator<Tz: TimeZone = Local> {
    tz: Tz,
    first_day: Weekday,
}

impl WeekCalculator<Local> {
    /// Calculator on the host time zone with Monday-first weeks.
    pub fn local() -> Self {
        Self::new(Local, Weekday::Mon)
    }
}

impl WeekCalculator<Utc> {
    pub fn utc() -> Self {
        Self::new(Utc, Weekday::Mon)
    }
}

impl<Tz: TimeZone> WeekCalculator<Tz> {
    pub fn new(tz: Tz, first_day: Weekday) -> Self {
        Self { tz, first_day }
    }

    pub fn with_first_day(mut self, first_day: Weekday) -> Self {
        self.first_day = first_day;
        self
    }

    /// Local calendar date of `instant`.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.tz).date_naive()
    }

    /// Start of the week containing `instant`.
    ///
    /// The result never lies after `instant`: with Monday-first weeks a
    /// Sunday resolves to the Monday six days earlier.
    pub fn week_start(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        let first = self.first_date_of_week(self.local_date(instant));
        self.start_of_day(first)
    }

    /// Last millisecond of the week containing `instant`.
    pub fn week_end(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        let first = self.first_date_of_week(self.local_date(instant));
        self.end_of_day(first + Duration::days(DAYS_PER_WEEK - 1))
    }

    /// Week shifted `offset_weeks` from the one containing `reference`.
    ///
    /// Offsets that leave the representable calendar are a validation error.
    pub fn week_range(
        &self,
        offset_weeks: i32,
        reference: DateTime<Utc>,
    ) -> BudgetResult<TimeWindow> {
        let out_of_range = || {
            BudgetError::Validation(format!("week offset {offset_weeks} is out of range"))
        };
        let date = self.local_date(reference);
        let days = Days::new(u64::from(offset_weeks.unsigned_abs()) * DAYS_PER_WEEK as u64);
        let shifted = if offset_weeks >= 0 {
            date.checked_add_days(days)
        } else {
            date.checked_sub_days(days)
        }
        .ok_or_else(out_of_range)?;
        let first = shifted
            .checked_sub_days(Days::new(self.days_since_first(shifted)))
            .ok_or_else(out_of_range)?;
        let next_first = first
            .checked_add_days(Days::new(DAYS_PER_WEEK as u64))
            .ok_or_else(out_of_range)?;
        Ok(TimeWindow::new(
            self.start_of_day(first),
            self.start_of_day(next_first) - Duration::milliseconds(1),
        ))
    }

    pub fn current_week(&self, now: DateTime<Utc>) -> TimeWindow {
        TimeWindow::new(self.week_start(now), self.week_end(now))
    }

    /// The `count` most recent weeks ending with the one containing
    /// `reference`, oldest first. `count` is capped at [`MAX_HISTORY_WEEKS`].
    pub fn last_weeks(
        &self,
        count: u32,
        reference: DateTime<Utc>,
    ) -> BudgetResult<Vec<TimeWindow>> {
        if count > MAX_HISTORY_WEEKS {
            return Err(BudgetError::Validation(format!(
                "history is limited to {MAX_HISTORY_WEEKS} weeks, got {count}"
            )));
        }
        (0..count)
            .rev()
            .map(|back| {
                let offset = i32::try_from(back).map_err(|_| {
                    BudgetError::Validation(format!("week offset -{back} is out of range"))
                })?;
                self.week_range(-offset, reference)
            })
            .collect()
    }

    /// Local calendar month containing `instant`.
    pub fn month_range(&self, instant: DateTime<Utc>) -> TimeWindow {
        let date = self.local_date(instant);
        let first = date.with_day(1).unwrap_or(date);
        let next_first = if first.month() == 12 {
            NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
        }
        .unwrap_or(first + Duration::days(31));
        TimeWindow::new(
            self.start_of_day(first),
            self.end_of_day(next_first - Duration::days(1)),
        )
    }

    /// Whether both instants share the same local (year, month).
    pub fn same_month(&self, a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
        let (a, b) = (self.local_date(a), self.local_date(b));
        a.year() == b.year() && a.month() == b.month()
    }

    /// Human label such as `03 Nov - 09 Nov`.
    pub fn label(&self, window: &TimeWindow) -> String {
        format!(
            "{} - {}",
            self.local_date(window.start).format(WEEK_LABEL_FORMAT),
            self.local_date(window.end).format(WEEK_LABEL_FORMAT)
        )
    }

    fn days_since_first(&self, date: NaiveDate) -> u64 {
        let today = i64::from(date.weekday().num_days_from_monday());
        let first = i64::from(self.first_day.num_days_from_monday());
        (today - first).rem_euclid(DAYS_PER_WEEK) as u64
    }

    fn first_date_of_week(&self, date: NaiveDate) -> NaiveDate {
        date - Days::new(self.days_since_first(date))
    }

    fn start_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        self.resolve_local(date.and_time(NaiveTime::default()))
    }

    fn end_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        self.start_of_day(date + Duration::days(1)) - Duration::milliseconds(1)
    }

    // Midnight can be skipped by a DST jump; take the first instant after the gap.
    fn resolve_local(&self, naive: NaiveDateTime) -> DateTime<Utc> {
        self.tz
            .from_local_datetime(&naive)
            .earliest()
            .or_else(|| {
                let after_gap = naive.checked_add_signed(Duration::hours(1))?;
                self.tz.from_local_datetime(&after_gap).earliest()
            })
            .map(|local| local.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
    }
}
