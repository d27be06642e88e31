//! Derives the visual/semantic state of each calendar cell.
//!
//! Classification is a pure function of the date, the current time, the
//! persisted events, the active draft and the removed markers. It is recomputed
//! for every cell on every tick and never patched in place.

use super::events_by_day::EventsByDay;
use crate::error::{CalendarError, CalendarResult};
use chrono::NaiveDateTime;
use shared::{CalendarCell, CalendarDate, DayBaseClass, DayClassification, GridDate};
use std::collections::HashSet;
use tracing::warn;

/// Everything classification depends on besides the date itself
#[derive(Debug, Clone, Copy)]
pub struct ClassificationContext<'a> {
    pub now: NaiveDateTime,
    pub events: &'a EventsByDay,
    /// Day owning a non-blank draft, if any
    pub draft_day: Option<CalendarDate>,
    pub removed: &'a HashSet<CalendarDate>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DayClassifier;

impl DayClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify a day, degrading to `Future` with no flags if the date cannot
    /// be interpreted
    pub fn classify(&self, date: CalendarDate, context: &ClassificationContext<'_>) -> DayClassification {
        match self.try_classify(date, context) {
            Ok(classification) => classification,
            Err(err) => {
                warn!("Falling back to default classification for {}: {}", date, err);
                DayClassification::default()
            }
        }
    }

    pub fn try_classify(
        &self,
        date: CalendarDate,
        context: &ClassificationContext<'_>,
    ) -> CalendarResult<DayClassification> {
        let day = date.to_naive().ok_or(CalendarError::InvalidDate {
            year: date.year,
            month: date.month,
            day: date.day,
        })?;
        let today = context.now.date();
        let has_events = context.events.has_events(&date);

        let base = if day < today {
            DayBaseClass::Past
        } else if day == today && has_events {
            DayBaseClass::TodayWithEvent
        } else if day == today {
            DayBaseClass::Today
        } else {
            DayBaseClass::Future
        };

        let has_draft = context.draft_day == Some(date);
        Ok(DayClassification {
            base,
            has_data: base != DayBaseClass::Past && (has_events || has_draft),
            removed: context.removed.contains(&date),
        })
    }

    /// Classify every day of a month grid
    pub fn classify_grid(&self, grid: &[GridDate], context: &ClassificationContext<'_>) -> Vec<CalendarCell> {
        grid.iter()
            .map(|grid_date| CalendarCell {
                date: grid_date.date,
                week_row: grid_date.week_row,
                weekday_col: grid_date.weekday_col,
                classification: self.classify(grid_date.date, context),
            })
            .collect()
    }
}
