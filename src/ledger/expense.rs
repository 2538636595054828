use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::currency::Money;
use crate::errors::BudgetError;

/// Fixed set of spending categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transport,
    Leisure,
    Health,
    Home,
    Education,
    Groceries,
    Subscription,
    Other,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Food,
        Category::Transport,
        Category::Leisure,
        Category::Health,
        Category::Home,
        Category::Education,
        Category::Groceries,
        Category::Subscription,
        Category::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Leisure => "Leisure",
            Category::Health => "Health",
            Category::Home => "Home",
            Category::Education => "Education",
            Category::Groceries => "Groceries",
            Category::Subscription => "Subscription",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Category::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| BudgetError::Validation(format!("unknown category `{needle}`")))
    }
}

/// How often an expense repeats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recurrence {
    #[default]
    None,
    Weekly,
    Monthly,
}

impl Recurrence {
    pub const ALL: [Recurrence; 3] = [Recurrence::None, Recurrence::Weekly, Recurrence::Monthly];

    pub fn is_recurring(self) -> bool {
        !matches!(self, Recurrence::None)
    }

    pub fn label(self) -> &'static str {
        match self {
            Recurrence::None => "None",
            Recurrence::Weekly => "Weekly",
            Recurrence::Monthly => "Monthly",
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Recurrence {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Recurrence::ALL
            .into_iter()
            .find(|recurrence| recurrence.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| BudgetError::Validation(format!("unknown recurrence `{needle}`")))
    }
}

/// A single spending event, or the template of a recurring one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub description: String,
    pub category: Category,
    pub amount: Money,
    #[serde(default)]
    pub recurrence: Recurrence,
    pub occurred_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(
        description: impl Into<String>,
        category: Category,
        amount: Money,
        recurrence: Recurrence,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            category,
            amount,
            recurrence,
            occurred_at,
        }
    }

    /// Same description, category, and amount; ids and timestamps are ignored.
    pub fn is_equivalent(&self, other: &Expense) -> bool {
        self.description == other.description
            && self.category == other.category
            && self.amount == other.amount
    }

    /// Copies the template fields into a fresh record stamped at `at`.
    pub fn instantiate(&self, at: DateTime<Utc>) -> Expense {
        Expense::new(
            self.description.clone(),
            self.category,
            self.amount,
            self.recurrence,
            at,
        )
    }
}

/// Raw user input for creating or editing an expense.
///
/// Every field is optional so that missing selections surface as validation
/// errors instead of silently defaulting.
#[derive(Debug, Clone, Default)]
pub struct ExpenseDraft {
    pub description: String,
    pub amount: String,
    pub category: Option<Category>,
    pub recurrence: Option<Recurrence>,
}

/// Output of [`ExpenseDraft::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidExpense {
    pub description: String,
    pub amount: Money,
    pub category: Category,
    pub recurrence: Recurrence,
}

impl ExpenseDraft {
    pub fn new(
        description: impl Into<String>,
        amount: impl Into<String>,
        category: Option<Category>,
        recurrence: Option<Recurrence>,
    ) -> Self {
        Self {
            description: description.into(),
            amount: amount.into(),
            category,
            recurrence,
        }
    }

    pub fn validate(&self) -> Result<ValidExpense, BudgetError> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(BudgetError::Validation("description is required".into()));
        }
        let amount = Money::parse(&self.amount)?;
        if amount.is_negative() {
            return Err(BudgetError::Validation(
                "amount must not be negative".into(),
            ));
        }
        let category = self
            .category
            .ok_or_else(|| BudgetError::Validation("choose a category".into()))?;
        let recurrence = self
            .recurrence
            .ok_or_else(|| BudgetError::Validation("choose a recurrence".into()))?;

        Ok(ValidExpense {
            description: description.to_string(),
            amount,
            category,
            recurrence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn draft() -> ExpenseDraft {
        ExpenseDraft::new(
            "  Coffee ",
            "2,40",
            Some(Category::Food),
            Some(Recurrence::None),
        )
    }

    #[test]
    fn validate_trims_and_parses() {
        let valid = draft().validate().expect("valid draft");
        assert_eq!(valid.description, "Coffee");
        assert_eq!(valid.amount, Money::from_cents(240));
        assert_eq!(valid.category, Category::Food);
    }

    #[test]
    fn validate_rejects_missing_fields() {
        let mut empty = draft();
        empty.description = "   ".into();
        assert!(empty.validate().unwrap_err().is_validation());

        let mut negative = draft();
        negative.amount = "-1".into();
        assert!(negative.validate().unwrap_err().is_validation());

        let mut no_category = draft();
        no_category.category = None;
        assert!(no_category.validate().unwrap_err().is_validation());

        let mut no_recurrence = draft();
        no_recurrence.recurrence = None;
        assert!(no_recurrence.validate().unwrap_err().is_validation());
    }

    #[test]
    fn enums_parse_case_insensitively() {
        assert_eq!("groceries".parse::<Category>().unwrap(), Category::Groceries);
        assert_eq!("MONTHLY".parse::<Recurrence>().unwrap(), Recurrence::Monthly);
        assert!("Rent".parse::<Category>().is_err());
    }

    #[test]
    fn instantiate_copies_template_fields() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let template = Expense::new(
            "Gym",
            Category::Health,
            Money::from_cents(3000),
            Recurrence::Monthly,
            at,
        );
        let later = Utc.with_ymd_and_hms(2025, 4, 1, 9, 0, 0).unwrap();
        let copy = template.instantiate(later);
        assert_ne!(copy.id, template.id);
        assert!(copy.is_equivalent(&template));
        assert_eq!(copy.recurrence, Recurrence::Monthly);
        assert_eq!(copy.occurred_at, later);
    }
}
