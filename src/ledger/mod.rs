//! Expense and budget models plus the pure calendar and recurrence logic.

pub mod budget;
pub mod expense;
pub mod recurring;
pub mod summary;
pub mod week;

pub use budget::{BudgetStatus, WeeklyBudget};
pub use expense::{Category, Expense, ExpenseDraft, Recurrence, ValidExpense};
pub use recurring::RecurrenceMaterializer;
pub use summary::{WeekSnapshot, WeekSummary};
pub use week::{is_within, TimeWindow, WeekCalculator, MAX_HISTORY_WEEKS};
