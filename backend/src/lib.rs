//! # Expense Calendar Backend
//!
//! Non-UI logic for the expense calendar: the month grid, day classification,
//! the day selection and draft editor, the day panel, budget progress, and the
//! clock that drives re-rendering.
//!
//! ## Architecture
//!
//! ```text
//! UI (terminal binary, or any other front end)
//!     ↓
//! IO Layer (notifier, text renderer)
//!     ↓
//! Domain Layer (calendar controller and services)
//!     ↓
//! Storage Layer (storage traits; in-memory and CSV/YAML implementations)
//! ```

pub mod clock;
pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod storage;

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::clock::Clock;
use crate::config::CalendarConfig;
use crate::domain::{BudgetService, CalendarController, EntryRules};
use crate::io::Notifier;
use crate::storage::{CsvBudgetRepository, CsvConnection, CsvEventRepository, CsvFinanceRepository};

pub use error::{CalendarError, CalendarResult, ValidationError};

/// Everything a front end needs to drive the calendar
pub struct AppState {
    pub config: CalendarConfig,
    pub clock: Arc<dyn Clock>,
    pub controller: CalendarController,
}

/// Initialize the backend over the on-disk repositories in the configured
/// data directory
pub async fn initialize_backend(
    config: CalendarConfig,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
) -> Result<AppState> {
    let data_directory = config.resolve_data_directory()?;
    info!("Setting up storage in {}", data_directory.display());
    let connection = CsvConnection::new(&data_directory)?;
    let events = Arc::new(CsvEventRepository::with_clock(connection.clone(), clock.clone()));
    let budgets = Arc::new(CsvBudgetRepository::new(connection.clone()));
    let finances = Arc::new(CsvFinanceRepository::new(connection));

    info!("Setting up domain model");
    let budget_service = BudgetService::new(budgets, finances, &config.currency_symbol);
    let controller = CalendarController::open(
        EntryRules::from_config(&config),
        events,
        budget_service,
        notifier,
        clock.now(),
    )
    .await;

    Ok(AppState {
        config,
        clock,
        controller,
    })
}
