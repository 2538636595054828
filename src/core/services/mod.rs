pub mod budget_service;
pub mod expense_service;
pub mod recurrence_service;
pub mod summary_service;

pub use budget_service::BudgetService;
pub use expense_service::ExpenseService;
pub use recurrence_service::RecurrenceService;
pub use summary_service::SummaryService;

use crate::errors::BudgetError;

pub type ServiceResult<T> = Result<T, BudgetError>;
