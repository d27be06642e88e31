//! # CSV Storage
//!
//! File-based storage in a single data directory:
//!
//! ```text
//! data/
//! ├── calendar_config.yaml
//! ├── events.csv      id,date,text,expense,created_at
//! ├── budgets.yaml    month budgets
//! ├── income.csv      id,description,amount,created_at
//! └── expenses.csv    category_id,title,color,item_id,amount,created_at
//! ```
//!
//! Writes go through a temp file followed by a rename.

pub mod budget_repository;
pub mod connection;
pub mod event_repository;
pub mod finance_repository;

pub use budget_repository::CsvBudgetRepository;
pub use connection::CsvConnection;
pub use event_repository::CsvEventRepository;
pub use finance_repository::CsvFinanceRepository;
