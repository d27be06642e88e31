//! # Storage Traits
//!
//! Contracts for the persistence collaborators the calendar engine calls.
//! The engine never owns persisted data; it reads snapshots through these
//! traits and requests changes, treating every call as fallible.

use anyhow::Result;
use async_trait::async_trait;
use shared::{CalendarDate, DayEvent, ExpenseCategory, IncomeRecord};

/// Persistence of day events
#[async_trait]
pub trait EventStorage: Send + Sync {
    /// All events dated within the month, in commit order
    async fn get_events_for_month(&self, year: i32, month_index: u32) -> Result<Vec<DayEvent>>;

    /// Store a new event and return it with its assigned id
    async fn add_event(&self, date: CalendarDate, text: &str, expense: f64) -> Result<DayEvent>;

    /// Delete a single event.
    /// Returns true if the event was found and deleted, false otherwise
    async fn delete_event(&self, event_id: &str) -> Result<bool>;
}

/// Persistence of month budgets, indexed by zero-based month
#[async_trait]
pub trait BudgetStorage: Send + Sync {
    /// `None` when no budget was ever set for the month
    async fn get_budget(&self, month_index: u32) -> Result<Option<f64>>;

    /// Create or replace the budget of a month
    async fn set_budget(&self, month_index: u32, amount: f64) -> Result<()>;
}

/// Read access to logged income and expenses
#[async_trait]
pub trait FinanceStorage: Send + Sync {
    async fn list_income(&self) -> Result<Vec<IncomeRecord>>;

    async fn list_expenses(&self) -> Result<Vec<ExpenseCategory>>;
}
