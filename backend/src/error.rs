//! Error types for the calendar engine.
//!
//! Validation problems are recovered locally and shown to the user; collaborator
//! failures leave selection and draft state untouched so the user can retry.
//! Nothing here is fatal to the engine.

use thiserror::Error;

/// Input rejected before any collaborator is called
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Please enter a description for the event")]
    BlankText,
    #[error("Event text has {words} words. Maximum is {max}.")]
    TooManyWords { words: usize, max: usize },
    #[error("Event text is too long ({chars} characters). Maximum is {max}.")]
    TextTooLong { chars: usize, max: usize },
    #[error("Please enter a valid expense (like 5 or 5.00): {0}")]
    InvalidExpense(String),
    #[error("Expense cannot be negative")]
    NegativeExpense,
    #[error("Invalid month: {0}. Must be between 0 and 11")]
    InvalidMonthIndex(u32),
    #[error("Please enter a valid number: {0}")]
    InvalidBudget(String),
    #[error("Budget cannot be negative")]
    NegativeBudget,
}

/// Errors surfaced by the calendar engine
#[derive(Debug, Error)]
pub enum CalendarError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A persistence call was rejected
    #[error("Storage request failed: {0}")]
    CollaboratorFailure(String),

    /// The operation is not available in the current selection state
    #[error("Operation not allowed: {0}")]
    InvalidState(&'static str),

    #[error("Invalid calendar date {year}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },
}

impl CalendarError {
    /// Wrap a storage-layer error
    pub fn collaborator(err: anyhow::Error) -> Self {
        CalendarError::CollaboratorFailure(format!("{:#}", err))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, CalendarError::Validation(_))
    }
}

pub type CalendarResult<T> = std::result::Result<T, CalendarError>;
