use chrono::{DateTime, Utc};
use tracing::info;

use crate::currency::Money;
use crate::errors::BudgetError;
use crate::storage::RecordStore;

use super::ServiceResult;

pub struct BudgetService;

impl BudgetService {
    /// Budget for the week starting at `week_start`, creating it when missing.
    ///
    /// A missing week inherits the most recent earlier budget, or zero when
    /// none has ever been set. The seeded value is persisted before returning.
    pub fn budget_for(
        store: &mut dyn RecordStore,
        week_start: DateTime<Utc>,
    ) -> ServiceResult<Money> {
        if let Some(amount) = store.get_budget(week_start)? {
            return Ok(amount);
        }
        let seeded = store
            .latest_budget_before(week_start)?
            .map(|previous| previous.amount)
            .unwrap_or(Money::ZERO);
        store.upsert_budget(week_start, seeded)?;
        info!(%week_start, amount = %seeded, "seeded weekly budget");
        Ok(seeded)
    }

    /// Stored budget for the week, zero when absent. Never writes.
    pub fn peek(store: &dyn RecordStore, week_start: DateTime<Utc>) -> ServiceResult<Money> {
        Ok(store.get_budget(week_start)?.unwrap_or(Money::ZERO))
    }

    pub fn set(
        store: &mut dyn RecordStore,
        week_start: DateTime<Utc>,
        amount: Money,
    ) -> ServiceResult<()> {
        if amount.is_negative() {
            return Err(BudgetError::Validation(
                "budget must not be negative".into(),
            ));
        }
        store.upsert_budget(week_start, amount)?;
        info!(%week_start, %amount, "weekly budget updated");
        Ok(())
    }

    /// Parses free-form input (`150`, `150,00`) and stores it.
    pub fn set_from_input(
        store: &mut dyn RecordStore,
        week_start: DateTime<Utc>,
        input: &str,
    ) -> ServiceResult<Money> {
        let amount = Money::parse(input)?;
        Self::set(store, week_start, amount)?;
        Ok(amount)
    }
}
