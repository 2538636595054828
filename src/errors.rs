use thiserror::Error;

/// Error type shared by the ledger, storage, and service layers.
#[derive(Debug, Error)]
pub enum BudgetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
}

impl BudgetError {
    pub fn expense_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            entity: "Expense",
            id: id.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type BudgetResult<T> = Result<T, BudgetError>;
