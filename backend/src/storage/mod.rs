//! # Storage Module
//!
//! Persistence collaborators for the calendar engine.
//!
//! The engine depends only on the traits in [`traits`]. Two implementations
//! ship with the crate:
//!
//! - **memory**: everything in a mutex-guarded struct, for tests
//! - **csv**: CSV and YAML files in a data directory, for the desktop binary

pub mod csv;
pub mod memory;
pub mod traits;

pub use self::csv::{CsvBudgetRepository, CsvConnection, CsvEventRepository, CsvFinanceRepository};
pub use memory::InMemoryStorage;
pub use traits::{BudgetStorage, EventStorage, FinanceStorage};
