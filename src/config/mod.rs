use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    core::utils::{ensure_dir, write_atomic, PathResolver},
    errors::BudgetError,
    ledger::MAX_HISTORY_WEEKS,
};

const DEFAULT_CURRENCY_SYMBOL: &str = "€";
const DEFAULT_HISTORY_WEEKS: u32 = 4;
const DEFAULT_RECENT_LIMIT: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub first_day_of_week: Weekday,
    pub currency_symbol: String,
    /// Weeks shown by the history view.
    pub history_weeks: u32,
    /// Recent expenses shown on the dashboard.
    pub recent_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            first_day_of_week: Weekday::Mon,
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.into(),
            history_weeks: DEFAULT_HISTORY_WEEKS,
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), BudgetError> {
        if self.history_weeks == 0 {
            return Err(BudgetError::Config(
                "history_weeks must be at least 1".into(),
            ));
        }
        if self.history_weeks > MAX_HISTORY_WEEKS {
            return Err(BudgetError::Config(format!(
                "history_weeks must be at most {MAX_HISTORY_WEEKS}"
            )));
        }
        if self.currency_symbol.trim().is_empty() {
            return Err(BudgetError::Config("currency_symbol must not be empty".into()));
        }
        Ok(())
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, BudgetError> {
        Self::from_base(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, BudgetError> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self, BudgetError> {
        ensure_dir(&base)?;
        ensure_dir(&PathResolver::config_dir_in(&base))?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
        })
    }

    /// Reads the config file, falling back to defaults when it does not exist.
    pub fn load(&self) -> Result<Config, BudgetError> {
        let config = if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            serde_json::from_str(&data)?
        } else {
            Config::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<(), BudgetError> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
