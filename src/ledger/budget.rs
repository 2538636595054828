use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::currency::Money;

/// Spending allowance for one week, keyed by the week's start instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyBudget {
    pub week_start: DateTime<Utc>,
    pub amount: Money,
}

impl WeeklyBudget {
    pub fn new(week_start: DateTime<Utc>, amount: Money) -> Self {
        Self { week_start, amount }
    }
}

/// Whether spending stayed inside the week's budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetStatus {
    WithinBudget,
    Exceeded,
}

impl BudgetStatus {
    pub fn from_remaining(remaining: Money) -> Self {
        if remaining.is_negative() {
            BudgetStatus::Exceeded
        } else {
            BudgetStatus::WithinBudget
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BudgetStatus::WithinBudget => "Within budget",
            BudgetStatus::Exceeded => "Budget exceeded",
        }
    }
}
