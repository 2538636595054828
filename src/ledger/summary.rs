use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::currency::Money;

use super::budget::BudgetStatus;
use super::expense::{Category, Expense};
use super::week::TimeWindow;

const DAYS_PER_WEEK: u32 = 7;

/// Sum of amounts for expenses that occurred within `[start, end]`.
pub fn total_between(expenses: &[Expense], start: DateTime<Utc>, end: DateTime<Utc>) -> Money {
    let window = TimeWindow::new(start, end);
    expenses
        .iter()
        .filter(|expense| window.contains(expense.occurred_at))
        .map(|expense| expense.amount)
        .sum()
}

/// Per-category totals within `[start, end]`. Categories without spending are absent.
pub fn totals_by_category(
    expenses: &[Expense],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> BTreeMap<Category, Money> {
    let window = TimeWindow::new(start, end);
    let mut totals = BTreeMap::new();
    for expense in expenses.iter().filter(|e| window.contains(e.occurred_at)) {
        *totals.entry(expense.category).or_insert(Money::ZERO) += expense.amount;
    }
    totals
}

/// Expenses within `[start, end]`, newest first.
pub fn expenses_between(
    expenses: &[Expense],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<Expense> {
    let window = TimeWindow::new(start, end);
    let mut selected: Vec<Expense> = expenses
        .iter()
        .filter(|expense| window.contains(expense.occurred_at))
        .cloned()
        .collect();
    sort_newest_first(&mut selected);
    selected
}

pub fn sort_newest_first(expenses: &mut [Expense]) {
    expenses.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
}

/// Dashboard figures for one week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekSummary {
    pub week: TimeWindow,
    pub spent: Money,
    pub budget: Money,
    pub remaining: Money,
    pub status: BudgetStatus,
    pub daily_average: Money,
    pub percent_used: f64,
    pub by_category: BTreeMap<Category, Money>,
}

impl WeekSummary {
    pub fn build(week: TimeWindow, expenses: &[Expense], budget: Money) -> Self {
        let spent = total_between(expenses, week.start, week.end);
        let remaining = budget - spent;
        Self {
            week,
            spent,
            budget,
            remaining,
            status: BudgetStatus::from_remaining(remaining),
            daily_average: spent.split_even(DAYS_PER_WEEK),
            percent_used: spent.percent_of(budget),
            by_category: totals_by_category(expenses, week.start, week.end),
        }
    }

    pub fn is_exceeded(&self) -> bool {
        self.status == BudgetStatus::Exceeded
    }
}

/// Spent vs. budget for one week of the history view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekSnapshot {
    pub week: TimeWindow,
    pub label: String,
    pub spent: Money,
    pub budget: Money,
}
