//! # Domain Module
//!
//! Calendar rendering and day-state logic for the expense calendar.
//!
//! Everything here is independent of how the calendar is painted and of where
//! events and budgets are stored. Persistence is reached only through the
//! storage traits; user feedback only through the notifier.
//!
//! ## Module Organization
//!
//! - **calendar**: month grid construction and date arithmetic
//! - **events_by_day**: persisted events grouped per calendar day
//! - **day_classifier**: past/today/future classification and style flags
//! - **day_selection**: selection and draft editing state machine
//! - **panel**: projection of the selection onto the day panel
//! - **budget_progress**: spend-vs-budget percentage
//! - **budget_service**: budget input handling and monthly summaries
//! - **calendar_controller**: per-tick view assembly and user intents
//! - **money**: amount parsing shared by the expense and budget inputs
//!
//! ## Rules
//!
//! - Days before today are always past, whatever they hold
//! - Event text is at most 5 words and 60 characters by default
//! - Expenses and budgets are never negative
//! - Budgets are keyed by month only

pub mod budget_progress;
pub mod budget_service;
pub mod calendar;
pub mod calendar_controller;
pub mod day_classifier;
pub mod day_selection;
pub mod events_by_day;
pub mod money;
pub mod panel;

pub use budget_progress::BudgetProgressCalculator;
pub use budget_service::{BudgetChange, BudgetService};
pub use calendar::CalendarService;
pub use calendar_controller::CalendarController;
pub use day_classifier::{ClassificationContext, DayClassifier};
pub use day_selection::{DaySelectionEditor, EntryRules};
pub use events_by_day::EventsByDay;
pub use panel::render_panel;
