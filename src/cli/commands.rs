//! Command table, dispatch, and the shell state shared by both modes.

use std::io;

use rustyline::error::ReadlineError;
use strsim::levenshtein;
use thiserror::Error;

use crate::{
    config::{Config, ConfigManager},
    core::BudgetManager,
    errors::BudgetError,
    ledger::{Category, ExpenseDraft, Recurrence},
    storage::JsonStore,
};

use super::output;

const SUGGESTION_DISTANCE: usize = 3;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] BudgetError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Core(#[from] BudgetError),
    #[error("exit requested")]
    ExitRequested,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub struct CommandSpec {
    pub name: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
}

pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "dashboard",
        usage: "dashboard",
        description: "Current week summary and latest expenses",
    },
    CommandSpec {
        name: "history",
        usage: "history [weeks]",
        description: "Spent against budget for recent weeks",
    },
    CommandSpec {
        name: "list",
        usage: "list [offset]",
        description: "Expenses of a week (0 = current, -1 = previous)",
    },
    CommandSpec {
        name: "add",
        usage: "add <description> <amount> <category> [recurrence]",
        description: "Record an expense",
    },
    CommandSpec {
        name: "edit",
        usage: "edit <id> <description> <amount> <category> <recurrence>",
        description: "Change an expense and re-date it to now",
    },
    CommandSpec {
        name: "delete",
        usage: "delete <id>",
        description: "Remove an expense",
    },
    CommandSpec {
        name: "budget",
        usage: "budget [amount]",
        description: "Show or set the current week's budget",
    },
    CommandSpec {
        name: "recurring",
        usage: "recurring",
        description: "List recurring expenses",
    },
    CommandSpec {
        name: "categories",
        usage: "categories",
        description: "List categories and recurrences",
    },
    CommandSpec {
        name: "help",
        usage: "help [command]",
        description: "Show available commands",
    },
    CommandSpec {
        name: "exit",
        usage: "exit",
        description: "Leave the shell",
    },
];

pub struct ShellContext {
    pub mode: CliMode,
    pub running: bool,
    manager: BudgetManager,
}

impl ShellContext {
    /// Opens the store and config under the data directory and runs the
    /// startup routine.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config = ConfigManager::new()?.load()?;
        let store = JsonStore::new_default()?;
        Self::with_manager(mode, BudgetManager::from_config(Box::new(store), config))
    }

    pub fn with_manager(mode: CliMode, mut manager: BudgetManager) -> Result<Self, CliError> {
        let report = manager.startup()?;
        if !report.materialized.is_empty() {
            output::info(format!(
                "Added {} recurring expense(s) for this period.",
                report.materialized.len()
            ));
        }
        Ok(Self {
            mode,
            running: true,
            manager,
        })
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        COMMANDS.iter().map(|spec| spec.name).collect()
    }

    pub fn prompt(&self) -> String {
        format!("budget [{}]> ", self.manager.label(&self.manager.current_week()))
    }

    fn config(&self) -> &Config {
        self.manager.config()
    }

    fn symbol(&self) -> &str {
        &self.config().currency_symbol
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        match command {
            "dashboard" => self.cmd_dashboard(args)?,
            "history" => self.cmd_history(args)?,
            "list" => self.cmd_list(args)?,
            "add" => self.cmd_add(args)?,
            "edit" => self.cmd_edit(args)?,
            "delete" => self.cmd_delete(args)?,
            "budget" => self.cmd_budget(args)?,
            "recurring" => self.cmd_recurring(args)?,
            "categories" => self.cmd_categories(args)?,
            "help" => self.cmd_help(args)?,
            "exit" | "quit" => return Ok(LoopControl::Exit),
            other => self.suggest_command(other),
        }
        Ok(LoopControl::Continue)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        if let Some(best) = closest_command(input) {
            output::info(format!("Suggestion: `{}`?", best));
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::info("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Core(
                err @ (BudgetError::Validation(_) | BudgetError::NotFound { .. }),
            ) => {
                output::error(err);
                Ok(())
            }
            CommandError::Core(err) => {
                if self.mode == CliMode::Script {
                    return Err(err.into());
                }
                output::error(err);
                Ok(())
            }
        }
    }

    fn cmd_dashboard(&mut self, args: &[&str]) -> CommandResult {
        expect_args("dashboard", args, 0, 0)?;
        let dashboard = self.manager.dashboard()?;
        output::render_summary(&dashboard.label, &dashboard.summary, self.symbol());
        output::section("Recent expenses");
        output::render_expenses(&dashboard.recent, self.symbol());
        Ok(())
    }

    fn cmd_history(&mut self, args: &[&str]) -> CommandResult {
        expect_args("history", args, 0, 1)?;
        let weeks = match args.first() {
            Some(raw) => Some(parse_number::<u32>(raw, "weeks")?).filter(|weeks| *weeks > 0),
            None => None,
        };
        let history = self.manager.history(weeks)?;
        output::section("History");
        output::render_history(&history, self.symbol());
        Ok(())
    }

    fn cmd_list(&mut self, args: &[&str]) -> CommandResult {
        expect_args("list", args, 0, 1)?;
        let offset = match args.first() {
            Some(raw) => parse_number::<i32>(raw, "offset")?,
            None => 0,
        };
        let (week, expenses) = self.manager.week_expenses(offset)?;
        output::section(format!("Expenses {}", self.manager.label(&week)));
        output::render_expenses(&expenses, self.symbol());
        Ok(())
    }

    fn cmd_add(&mut self, args: &[&str]) -> CommandResult {
        expect_args("add", args, 3, 4)?;
        let recurrence = match args.get(3) {
            Some(raw) => raw.parse::<Recurrence>()?,
            None => Recurrence::None,
        };
        let draft = ExpenseDraft::new(
            args[0],
            args[1],
            Some(args[2].parse::<Category>()?),
            Some(recurrence),
        );
        let expense = self.manager.add_expense(&draft)?;
        output::success(format!(
            "Expense recorded: {}",
            output::expense_line(&expense, self.symbol())
        ));
        Ok(())
    }

    fn cmd_edit(&mut self, args: &[&str]) -> CommandResult {
        expect_args("edit", args, 5, 5)?;
        let id = self.manager.resolve_expense_id(args[0])?;
        let draft = ExpenseDraft::new(
            args[1],
            args[2],
            Some(args[3].parse::<Category>()?),
            Some(args[4].parse::<Recurrence>()?),
        );
        let expense = self.manager.edit_expense(id, &draft, true)?;
        output::success(format!(
            "Expense updated: {}",
            output::expense_line(&expense, self.symbol())
        ));
        Ok(())
    }

    fn cmd_delete(&mut self, args: &[&str]) -> CommandResult {
        expect_args("delete", args, 1, 1)?;
        let id = self.manager.resolve_expense_id(args[0])?;
        if self.manager.delete_expense(id)? {
            output::success("Expense deleted.");
        } else {
            output::warning(format!("No expense with id {id}."));
        }
        Ok(())
    }

    fn cmd_budget(&mut self, args: &[&str]) -> CommandResult {
        expect_args("budget", args, 0, 1)?;
        let label = self.manager.label(&self.manager.current_week());
        match args.first() {
            Some(raw) => {
                let amount = self.manager.set_current_budget(raw)?;
                output::success(format!(
                    "Budget for {label} set to {}",
                    amount.format_with(self.symbol())
                ));
            }
            None => {
                let amount = self.manager.current_budget()?;
                output::info(format!(
                    "Budget for {label}: {}",
                    amount.format_with(self.symbol())
                ));
            }
        }
        Ok(())
    }

    fn cmd_recurring(&mut self, args: &[&str]) -> CommandResult {
        expect_args("recurring", args, 0, 0)?;
        let templates = self.manager.recurring_templates()?;
        output::section("Recurring expenses");
        output::render_expenses(&templates, self.symbol());
        Ok(())
    }

    fn cmd_categories(&mut self, args: &[&str]) -> CommandResult {
        expect_args("categories", args, 0, 0)?;
        output::section("Categories");
        for category in Category::ALL {
            output::info(format!("  {}", category.label()));
        }
        output::section("Recurrence");
        for recurrence in Recurrence::ALL {
            output::info(format!("  {}", recurrence.label()));
        }
        Ok(())
    }

    fn cmd_help(&mut self, args: &[&str]) -> CommandResult {
        expect_args("help", args, 0, 1)?;
        if let Some(name) = args.first() {
            let name = name.to_lowercase();
            return match COMMANDS.iter().find(|spec| spec.name == name) {
                Some(spec) => {
                    output::info(format!("{}\n  {}", spec.usage, spec.description));
                    Ok(())
                }
                None => {
                    self.suggest_command(&name);
                    Ok(())
                }
            };
        }
        output::section("Commands");
        for spec in COMMANDS {
            output::info(format!("  {:<58} {}", spec.usage, spec.description));
        }
        Ok(())
    }
}

/// Closest known command within the suggestion distance.
pub fn closest_command(input: &str) -> Option<&'static str> {
    COMMANDS
        .iter()
        .map(|spec| (levenshtein(spec.name, input), spec.name))
        .min_by_key(|(distance, _)| *distance)
        .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
        .map(|(_, name)| name)
}

fn expect_args(command: &str, args: &[&str], min: usize, max: usize) -> CommandResult {
    if args.len() < min || args.len() > max {
        let usage = COMMANDS
            .iter()
            .find(|spec| spec.name == command)
            .map(|spec| spec.usage)
            .unwrap_or(command);
        return Err(CommandError::InvalidArguments(format!("Usage: {usage}")));
    }
    Ok(())
}

fn parse_number<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T, CommandError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| CommandError::InvalidArguments(format!("invalid {what}: `{raw}`")))
}
