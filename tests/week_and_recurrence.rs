mod common;

use chrono::{DateTime, Datelike, Duration, FixedOffset, TimeZone, Utc, Weekday};
use common::at;
use quick_budget::{
    currency::Money,
    ledger::{Category, Expense, Recurrence, RecurrenceMaterializer, WeekCalculator},
};

fn template(description: &str, recurrence: Recurrence, occurred_at: DateTime<Utc>) -> Expense {
    Expense::new(
        description,
        Category::Home,
        Money::from_cents(85_000),
        recurrence,
        occurred_at,
    )
}

#[test]
fn week_bounds_enclose_every_instant_in_a_fixed_offset_zone() {
    let zone = FixedOffset::west_opt(3 * 3600).unwrap();
    let calc = WeekCalculator::new(zone, Weekday::Mon);
    let mut instant = at(2025, 12, 25, 0, 0);
    let stop = at(2026, 1, 12, 0, 0);
    while instant < stop {
        let start = calc.week_start(instant);
        let end = calc.week_end(instant);
        assert!(start <= instant && instant <= end, "{instant} outside {start}..{end}");
        assert_eq!(end - start, Duration::days(7) - Duration::milliseconds(1));
        assert_eq!(start.with_timezone(&zone).weekday(), Weekday::Mon);

        let range = calc.week_range(0, instant).unwrap();
        assert_eq!((range.start, range.end), (start, end));
        instant += Duration::minutes(97);
    }
}

#[test]
fn sunday_night_stays_in_the_concluding_week() {
    let calc = WeekCalculator::utc();
    let sunday = at(2025, 11, 9, 23, 59);
    assert_eq!(calc.week_start(sunday), at(2025, 11, 3, 0, 0));
    assert_eq!(
        calc.week_end(sunday),
        Utc.with_ymd_and_hms(2025, 11, 9, 23, 59, 59).unwrap() + Duration::milliseconds(999)
    );
}

#[test]
fn previous_week_offset_crosses_the_year() {
    let calc = WeekCalculator::utc();
    let previous = calc.week_range(-1, at(2026, 1, 2, 12, 0)).unwrap();
    assert_eq!(previous.start, at(2025, 12, 22, 0, 0));
    assert_eq!(calc.label(&previous), "22 Dec - 28 Dec");
}

#[test]
fn weekly_template_materializes_exactly_once_per_week() {
    let calc = WeekCalculator::utc();
    let now = at(2025, 11, 12, 8, 0);
    let week = calc.current_week(now);
    let mut expenses = vec![template("Rent share", Recurrence::Weekly, now - Duration::days(7))];

    let first = RecurrenceMaterializer::new(&calc).materialize(week, now, &expenses);
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].occurred_at, now);
    assert_eq!(first[0].recurrence, Recurrence::Weekly);
    assert_ne!(first[0].id, expenses[0].id);

    expenses.extend(first);
    let later = now + Duration::hours(30);
    let second = RecurrenceMaterializer::new(&calc).materialize(week, later, &expenses);
    assert!(second.is_empty());
}

#[test]
fn monthly_template_waits_for_the_next_month() {
    let calc = WeekCalculator::utc();
    let created = at(2025, 11, 3, 9, 0);
    let expenses = vec![template("Rent", Recurrence::Monthly, created)];

    let same_month = at(2025, 11, 28, 9, 0);
    let none = RecurrenceMaterializer::new(&calc).materialize(
        calc.current_week(same_month),
        same_month,
        &expenses,
    );
    assert!(none.is_empty());

    let next_month = at(2025, 12, 1, 9, 0);
    let due = RecurrenceMaterializer::new(&calc).materialize(
        calc.current_week(next_month),
        next_month,
        &expenses,
    );
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].description, "Rent");
}

#[test]
fn midnight_skipped_by_dst_starts_the_week_after_the_gap() {
    // Sao Paulo clocks jumped from 00:00 to 01:00 on Sunday 2018-11-04.
    let calc = WeekCalculator::new(chrono_tz::America::Sao_Paulo, Weekday::Sun);
    let tuesday = at(2018, 11, 6, 12, 0);

    let start = calc.week_start(tuesday);
    assert_eq!(start, at(2018, 11, 4, 3, 0));
    assert_eq!(
        start.with_timezone(&chrono_tz::America::Sao_Paulo).to_rfc3339(),
        "2018-11-04T01:00:00-02:00"
    );
    let end = calc.week_end(tuesday);
    assert!(start <= tuesday && tuesday <= end);
    assert_eq!(end + Duration::milliseconds(1), at(2018, 11, 11, 2, 0));

    let previous = calc.week_range(-1, tuesday).unwrap();
    assert_eq!(previous.start, at(2018, 10, 28, 3, 0));
    assert_eq!(previous.end + Duration::milliseconds(1), start);
    assert_eq!(calc.label(&previous), "28 Oct - 03 Nov");
}
