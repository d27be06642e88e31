//! In-memory implementation of every storage trait.
//!
//! Used by tests and as a scratch backend; nothing survives the process.

use super::traits::{BudgetStorage, EventStorage, FinanceStorage};
use crate::clock::{commit_stamp, Clock, SystemClock};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::{CalendarDate, DayEvent, ExpenseCategory, IncomeRecord};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Default)]
struct MemoryState {
    events: Vec<DayEvent>,
    budgets: BTreeMap<u32, f64>,
    income: Vec<IncomeRecord>,
    expenses: Vec<ExpenseCategory>,
}

#[derive(Debug)]
pub struct InMemoryStorage {
    state: Mutex<MemoryState>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp new events from `clock`
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(MemoryState::default()),
            clock,
        }
    }

    /// Seed income and expense records
    pub fn with_finances(income: Vec<IncomeRecord>, expenses: Vec<ExpenseCategory>) -> Self {
        let storage = Self::new();
        if let Ok(mut state) = storage.state.lock() {
            state.income = income;
            state.expenses = expenses;
        }
        storage
    }

    /// Insert an already-built event, keeping its id and timestamp
    pub fn insert_event(&self, event: DayEvent) -> Result<()> {
        self.lock()?.events.push(event);
        Ok(())
    }

    pub fn event_count(&self) -> usize {
        self.lock().map(|state| state.events.len()).unwrap_or(0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| anyhow!("in-memory storage lock poisoned"))
    }
}

#[async_trait]
impl EventStorage for InMemoryStorage {
    async fn get_events_for_month(&self, year: i32, month_index: u32) -> Result<Vec<DayEvent>> {
        let state = self.lock()?;
        Ok(state
            .events
            .iter()
            .filter(|event| event.date.year == year && event.date.month_index() == month_index)
            .cloned()
            .collect())
    }

    async fn add_event(&self, date: CalendarDate, text: &str, expense: f64) -> Result<DayEvent> {
        let mut state = self.lock()?;
        let latest = state.events.iter().map(|event| event.created_at).max();
        let event = DayEvent {
            id: format!("event::{}", Uuid::new_v4()),
            date,
            text: text.to_string(),
            expense,
            created_at: commit_stamp(self.clock.as_ref(), latest),
        };
        debug!("Storing event {} on {}", event.id, date);
        state.events.push(event.clone());
        Ok(event)
    }

    async fn delete_event(&self, event_id: &str) -> Result<bool> {
        let mut state = self.lock()?;
        let before = state.events.len();
        state.events.retain(|event| event.id != event_id);
        Ok(state.events.len() < before)
    }
}

#[async_trait]
impl BudgetStorage for InMemoryStorage {
    async fn get_budget(&self, month_index: u32) -> Result<Option<f64>> {
        Ok(self.lock()?.budgets.get(&month_index).copied())
    }

    async fn set_budget(&self, month_index: u32, amount: f64) -> Result<()> {
        self.lock()?.budgets.insert(month_index, amount);
        Ok(())
    }
}

#[async_trait]
impl FinanceStorage for InMemoryStorage {
    async fn list_income(&self) -> Result<Vec<IncomeRecord>> {
        Ok(self.lock()?.income.clone())
    }

    async fn list_expenses(&self) -> Result<Vec<ExpenseCategory>> {
        Ok(self.lock()?.expenses.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::domain::events_by_day::EventsByDay;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_event_lifecycle() {
        let storage = InMemoryStorage::new();
        let day = CalendarDate::new(2024, 3, 20);

        let event = storage.add_event(day, "Concert", 45.0).await.unwrap();
        assert!(event.id.starts_with("event::"));
        storage.add_event(CalendarDate::new(2024, 4, 1), "Rent", 900.0).await.unwrap();

        let march = storage.get_events_for_month(2024, 2).await.unwrap();
        assert_eq!(march.len(), 1);
        assert_eq!(march[0].text, "Concert");

        assert!(storage.delete_event(&event.id).await.unwrap());
        assert!(!storage.delete_event(&event.id).await.unwrap());
        assert_eq!(storage.event_count(), 1);
    }

    #[tokio::test]
    async fn test_budget_absent_vs_zero() {
        let storage = InMemoryStorage::new();
        assert_eq!(storage.get_budget(2).await.unwrap(), None);

        storage.set_budget(2, 0.0).await.unwrap();
        assert_eq!(storage.get_budget(2).await.unwrap(), Some(0.0));

        storage.set_budget(0, 300.0).await.unwrap();
        assert_eq!(storage.get_budget(0).await.unwrap(), Some(300.0));
        assert_eq!(storage.get_budget(2).await.unwrap(), Some(0.0));
    }

    #[tokio::test]
    async fn test_commit_order_survives_clock_going_back() {
        let first_stamp = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap().and_hms_opt(10, 0, 0).unwrap();
        let clock = Arc::new(FixedClock::new(first_stamp));
        let storage = InMemoryStorage::with_clock(clock.clone());
        let day = CalendarDate::new(2024, 3, 20);

        let first = storage.add_event(day, "First", 1.0).await.unwrap();
        assert_eq!(first.created_at, first_stamp);

        clock.advance(chrono::Duration::hours(-2));
        let second = storage.add_event(day, "Second", 2.0).await.unwrap();
        assert!(second.created_at >= first.created_at);

        let month = EventsByDay::from_events(storage.get_events_for_month(2024, 2).await.unwrap());
        assert_eq!(month.latest(&day).map(|event| event.text.as_str()), Some("Second"));
    }
}
