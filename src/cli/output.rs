use colored::Colorize;
use std::fmt;

use crate::currency::Money;
use crate::ledger::{BudgetStatus, Expense, WeekSnapshot, WeekSummary};

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Section,
}

fn apply_style(kind: MessageKind, message: impl fmt::Display) -> String {
    let text = message.to_string();
    match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()).bold().to_string(),
        MessageKind::Info => text,
        MessageKind::Success => format!("[ok] {text}").bright_green().to_string(),
        MessageKind::Warning => format!("[!] {text}").bright_yellow().to_string(),
        MessageKind::Error => format!("[x] {text}").bright_red().to_string(),
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let formatted = apply_style(kind, message);
    match kind {
        MessageKind::Section => println!("\n{}", formatted),
        MessageKind::Error | MessageKind::Warning => eprintln!("{}", formatted),
        _ => println!("{}", formatted),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

/// Colors an amount by the status it represents.
pub fn status_amount(amount: Money, status: BudgetStatus, symbol: &str) -> String {
    let text = amount.format_with(symbol);
    match status {
        BudgetStatus::WithinBudget => text.bright_cyan().to_string(),
        BudgetStatus::Exceeded => text.bright_red().bold().to_string(),
    }
}

fn short_id(expense: &Expense) -> String {
    expense.id.to_string().chars().take(8).collect()
}

pub fn expense_line(expense: &Expense, symbol: &str) -> String {
    let recurrence = if expense.recurrence.is_recurring() {
        format!(" ({})", expense.recurrence.label())
    } else {
        String::new()
    };
    format!(
        "{}  {}  {:<24} {:<13} {:>10}{}",
        short_id(expense).dimmed(),
        expense.occurred_at.format("%Y-%m-%d"),
        expense.description,
        expense.category.label(),
        expense.amount.format_with(symbol),
        recurrence
    )
}

pub fn render_summary(label: &str, summary: &WeekSummary, symbol: &str) {
    section(format!("Week {label}"));
    info(format!("Budget:        {}", summary.budget.format_with(symbol)));
    info(format!("Spent:         {}", summary.spent.format_with(symbol)));
    info(format!(
        "Remaining:     {}",
        status_amount(summary.remaining, summary.status, symbol)
    ));
    info(format!("Daily average: {}", summary.daily_average.format_with(symbol)));
    info(format!("Used:          {:.0}%", summary.percent_used));
    let status = match summary.status {
        BudgetStatus::WithinBudget => summary.status.label().bright_cyan(),
        BudgetStatus::Exceeded => summary.status.label().bright_red().bold(),
    };
    info(format!("Status:        {status}"));
    if !summary.by_category.is_empty() {
        info("By category:");
        for (category, amount) in &summary.by_category {
            info(format!("  {:<13} {}", category.label(), amount.format_with(symbol)));
        }
    }
}

pub fn render_expenses(expenses: &[Expense], symbol: &str) {
    if expenses.is_empty() {
        info("No expenses recorded.");
        return;
    }
    for expense in expenses {
        info(expense_line(expense, symbol));
    }
}

pub fn render_history(history: &[WeekSnapshot], symbol: &str) {
    for week in history {
        let status = BudgetStatus::from_remaining(week.budget - week.spent);
        info(format!(
            "{:<16} spent {:>10} of {:>10}",
            week.label,
            status_amount(week.spent, status, symbol),
            week.budget.format_with(symbol)
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_wraps_title() {
        colored::control::set_override(false);
        assert_eq!(apply_style(MessageKind::Section, " Week "), "=== Week ===");
        assert_eq!(apply_style(MessageKind::Error, "boom"), "[x] boom");
    }

    #[test]
    fn exceeded_amount_keeps_sign() {
        colored::control::set_override(false);
        let text = status_amount(Money::from_cents(-2500), BudgetStatus::Exceeded, "€");
        assert_eq!(text, "-€25.00");
    }
}
