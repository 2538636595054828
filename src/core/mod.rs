pub mod clock;
pub mod manager;
pub mod services;
pub mod utils;

pub use clock::{Clock, FixedClock, SystemClock};
pub use manager::{BudgetManager, Dashboard, StartupReport};
