//! Month grid construction and calendar date arithmetic.
//!
//! Months are addressed by a zero-based index (0 = January) throughout the
//! domain layer. The grid is never padded: it holds exactly the days of the
//! month, each placed on a (week row, weekday column) coordinate.

use crate::error::{CalendarError, CalendarResult, ValidationError};
use chrono::{Datelike, NaiveDate};
use shared::{CalendarDate, GridDate};
use tracing::debug;

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

/// Calendar arithmetic and month grid generation
#[derive(Debug, Clone, Copy, Default)]
pub struct CalendarService;

impl CalendarService {
    pub fn new() -> Self {
        Self
    }

    /// Build the ordered day sequence for a month, with grid coordinates.
    ///
    /// `weekday_col` is 0 for Sunday. `week_row` counts the Sunday week
    /// boundaries crossed since the 1st, so the first (possibly partial) week is
    /// row 0.
    pub fn build_month_grid(&self, year: i32, month_index: u32) -> CalendarResult<Vec<GridDate>> {
        validate_month_index(month_index)?;

        let month = month_index + 1;
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(CalendarError::InvalidDate {
            year,
            month,
            day: 1,
        })?;
        let first_offset = first.weekday().num_days_from_sunday();

        let grid: Vec<GridDate> = first
            .iter_days()
            .take_while(|date| date.month() == month)
            .map(|date| GridDate {
                date: CalendarDate::from_naive(date),
                week_row: (first_offset + date.day() - 1) / 7,
                weekday_col: date.weekday().num_days_from_sunday(),
            })
            .collect();

        if grid.is_empty() {
            return Err(CalendarError::InvalidDate { year, month, day: 1 });
        }

        debug!(
            "Built grid for {}/{}: {} days, first weekday {}",
            month, year, grid.len(), first_offset
        );
        Ok(grid)
    }

    /// Number of days in a month
    pub fn days_in_month(&self, month_index: u32, year: i32) -> u32 {
        match month_index {
            1 => if self.is_leap_year(year) { 29 } else { 28 },
            3 | 5 | 8 | 10 => 30,
            _ => 31,
        }
    }

    pub fn is_leap_year(&self, year: i32) -> bool {
        year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
    }

    /// Weekday of the 1st of the month (0 = Sunday), `None` for an invalid month
    pub fn first_weekday_of_month(&self, month_index: u32, year: i32) -> Option<u32> {
        NaiveDate::from_ymd_opt(year, month_index + 1, 1)
            .map(|date| date.weekday().num_days_from_sunday())
    }

    /// Number of week rows the month occupies in the grid
    pub fn week_rows_in_month(&self, month_index: u32, year: i32) -> u32 {
        match self.first_weekday_of_month(month_index, year) {
            Some(offset) => (offset + self.days_in_month(month_index, year) + 6) / 7,
            None => 0,
        }
    }

    pub fn month_name(&self, month_index: u32) -> &'static str {
        MONTH_NAMES
            .get(month_index as usize)
            .copied()
            .unwrap_or("Invalid Month")
    }

    /// Numeric month/year label, e.g. `3/2024`
    pub fn month_label(&self, month_index: u32, year: i32) -> String {
        format!("{}/{}", month_index + 1, year)
    }

    pub fn previous_month(&self, month_index: u32, year: i32) -> (u32, i32) {
        if month_index == 0 {
            (11, year - 1)
        } else {
            (month_index - 1, year)
        }
    }

    pub fn next_month(&self, month_index: u32, year: i32) -> (u32, i32) {
        if month_index >= 11 {
            (0, year + 1)
        } else {
            (month_index + 1, year)
        }
    }
}

/// Reject month indexes outside `0..=11`
pub fn validate_month_index(month_index: u32) -> Result<(), ValidationError> {
    if month_index > 11 {
        return Err(ValidationError::InvalidMonthIndex(month_index));
    }
    Ok(())
}
