//! Fixed-point currency amounts.
//!
//! Amounts are stored as integer cents so equality checks (duplicate detection
//! during recurrence materialization) never suffer from float rounding.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Serialize};

use crate::errors::{BudgetError, BudgetResult};

const CENTS_PER_UNIT: i64 = 100;
/// Largest magnitude accepted from user input: ten billion units.
pub const MAX_AMOUNT_CENTS: i64 = 1_000_000_000_000;

/// A currency amount in cents.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Parses user input such as `12`, `12.5`, `12,50`, or `-3.10`.
    ///
    /// Both `.` and `,` are accepted as the decimal separator; at most two
    /// fractional digits are allowed. Magnitudes above [`MAX_AMOUNT_CENTS`]
    /// are rejected.
    pub fn parse(input: &str) -> BudgetResult<Self> {
        let raw = input.trim().replace(',', ".");
        if raw.is_empty() {
            return Err(BudgetError::Validation("amount is required".into()));
        }
        let invalid = || BudgetError::Validation(format!("invalid amount `{}`", input.trim()));

        let (negative, digits) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw.as_str()),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
            || fraction.len() > 2
        {
            return Err(invalid());
        }

        let whole_value: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let fraction_value: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };
        let cents = whole_value
            .checked_mul(CENTS_PER_UNIT)
            .and_then(|value| value.checked_add(fraction_value))
            .ok_or_else(invalid)?;
        if cents > MAX_AMOUNT_CENTS {
            return Err(BudgetError::Validation(format!(
                "amount `{}` exceeds the maximum of {}",
                input.trim(),
                Money(MAX_AMOUNT_CENTS)
            )));
        }

        Ok(Self(if negative { -cents } else { cents }))
    }

    /// Divides the amount into `parts`, rounding half away from zero.
    pub fn split_even(self, parts: u32) -> Money {
        if parts == 0 {
            return Money::ZERO;
        }
        let parts = i64::from(parts);
        let (quotient, remainder) = (self.0 / parts, self.0 % parts);
        if remainder.abs() * 2 >= parts {
            Money(quotient + self.0.signum())
        } else {
            Money(quotient)
        }
    }

    /// Percentage of `whole` this amount represents, or zero when `whole` is zero.
    pub fn percent_of(self, whole: Money) -> f64 {
        if whole.0 <= 0 {
            return 0.0;
        }
        self.0 as f64 / whole.0 as f64 * 100.0
    }

    /// Renders the amount with a currency symbol, e.g. `€12.50` or `-€3.00`.
    pub fn format_with(self, symbol: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!(
            "{sign}{symbol}{}.{:02}",
            abs / CENTS_PER_UNIT as u64,
            abs % CENTS_PER_UNIT as u64
        )
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with(""))
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        *self = *self + rhs;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}
