//! Spend-vs-budget progress for a month.
//!
//! Income and expense records are filtered to the target month and year.
//! Budgets are keyed by month only. When a month has no budget the arithmetic
//! divides by a sentinel of 1 instead; whether a budget exists is reported
//! separately so the UI can say "no budget set".

use chrono::{Datelike, NaiveDateTime};
use shared::{BudgetSummary, ExpenseCategory, ExpenseItem, IncomeRecord};

/// Divisor used when no usable budget is set
pub const UNSET_BUDGET_SENTINEL: f64 = 1.0;

fn in_month(timestamp: &NaiveDateTime, month_index: u32, year: i32) -> bool {
    timestamp.year() == year && timestamp.month0() == month_index
}

/// Income records dated within the month
pub fn monthly_income(income: &[IncomeRecord], month_index: u32, year: i32) -> Vec<&IncomeRecord> {
    income
        .iter()
        .filter(|record| in_month(&record.created_at, month_index, year))
        .collect()
}

/// Expense items of every category dated within the month
pub fn monthly_expense_items(expenses: &[ExpenseCategory], month_index: u32, year: i32) -> Vec<&ExpenseItem> {
    expenses
        .iter()
        .flat_map(|category| category.items.iter())
        .filter(|item| in_month(&item.created_at, month_index, year))
        .collect()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BudgetProgressCalculator;

impl BudgetProgressCalculator {
    pub fn new() -> Self {
        Self
    }

    pub fn total_expenses(&self, expenses: &[ExpenseCategory], month_index: u32, year: i32) -> f64 {
        monthly_expense_items(expenses, month_index, year)
            .iter()
            .map(|item| item.amount)
            .sum()
    }

    pub fn total_income(&self, income: &[IncomeRecord], month_index: u32, year: i32) -> f64 {
        monthly_income(income, month_index, year)
            .iter()
            .map(|record| record.amount)
            .sum()
    }

    /// The divisor for the percentage. A missing or zero budget falls back to
    /// the sentinel.
    pub fn effective_budget(&self, budget: Option<f64>) -> f64 {
        match budget {
            Some(amount) if amount > 0.0 => amount,
            _ => UNSET_BUDGET_SENTINEL,
        }
    }

    /// `100 * total / budget`, clamped to `0..=100`
    pub fn percent(&self, total_expenses: f64, budget: Option<f64>) -> f64 {
        let percent = 100.0 * total_expenses / self.effective_budget(budget);
        if percent.is_nan() {
            return 0.0;
        }
        percent.clamp(0.0, 100.0)
    }

    pub fn summarize(
        &self,
        income: &[IncomeRecord],
        expenses: &[ExpenseCategory],
        budget: Option<f64>,
        month_index: u32,
        year: i32,
        month_name: &str,
    ) -> BudgetSummary {
        let total_expenses = self.total_expenses(expenses, month_index, year);
        BudgetSummary {
            month_index,
            month_name: month_name.to_string(),
            budget,
            total_expenses,
            total_income: self.total_income(income, month_index, year),
            percent: self.percent(total_expenses, budget),
        }
    }
}
