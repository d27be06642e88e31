//! Day selection and draft editing.
//!
//! A small state machine over [`DaySelectionState`]:
//!
//! ```text
//!            select(day with events)            start_edit()
//!   Idle ─────────────────────────────▶ Viewing ─────────────▶ Editing
//!     ▲   select(day without events)                              │
//!     │ ─────────────────────────────────────────────────────────▶│
//!     └──────────────────────── close() ◀─────────────────────────┘
//! ```
//!
//! The draft lives inside the `Editing` state, so a draft for any day other
//! than the selected one cannot exist. Switching days discards the draft.
//! Removal markers are kept here until the next render consumes them.

use super::events_by_day::EventsByDay;
use super::money::clean_and_parse_amount;
use crate::config::CalendarConfig;
use crate::error::{CalendarError, CalendarResult, ValidationError};
use crate::storage::traits::EventStorage;
use shared::{CalendarDate, DayEvent, DaySelectionState, DraftEntry};
use std::collections::HashSet;
use tracing::{error, info, warn};

/// Limits applied to event input
#[derive(Debug, Clone, PartialEq)]
pub struct EntryRules {
    pub max_chars: usize,
    pub max_words: usize,
    pub currency_symbol: String,
}

impl EntryRules {
    pub fn from_config(config: &CalendarConfig) -> Self {
        Self {
            max_chars: config.max_event_chars,
            max_words: config.max_event_words,
            currency_symbol: config.currency_symbol.clone(),
        }
    }
}

impl Default for EntryRules {
    fn default() -> Self {
        Self::from_config(&CalendarConfig::default())
    }
}

/// A draft that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidDraft {
    pub day: CalendarDate,
    pub text: String,
    pub expense: f64,
}

#[derive(Debug, Default)]
pub struct DaySelectionEditor {
    state: DaySelectionState,
    removed: HashSet<CalendarDate>,
    rules: EntryRules,
}

impl DaySelectionEditor {
    pub fn new(rules: EntryRules) -> Self {
        Self {
            state: DaySelectionState::Idle,
            removed: HashSet::new(),
            rules,
        }
    }

    pub fn state(&self) -> &DaySelectionState {
        &self.state
    }

    pub fn rules(&self) -> &EntryRules {
        &self.rules
    }

    pub fn selected_day(&self) -> Option<CalendarDate> {
        self.state.selected_day()
    }

    /// Day owning a draft with content, used for the with-data flag
    pub fn draft_day(&self) -> Option<CalendarDate> {
        self.state
            .draft()
            .filter(|draft| !draft.is_blank())
            .map(|draft| draft.day)
    }

    /// Select a day. A day without committed events opens straight into
    /// editing; otherwise its events are shown. Any previous draft is dropped.
    pub fn select(&mut self, day: CalendarDate, committed: &[DayEvent]) {
        if let Some(draft) = self.state.draft() {
            if draft.day != day && !draft.is_blank() {
                info!("Discarding unsaved draft for {}", draft.day);
            }
        }

        self.removed.remove(&day);
        let has_events = committed.iter().any(|event| event.date == day);
        self.state = if has_events {
            DaySelectionState::Viewing { day }
        } else {
            DaySelectionState::Editing { draft: DraftEntry::empty(day) }
        };
        info!("Selected {} ({})", day, if has_events { "viewing" } else { "editing" });
    }

    /// Switch from viewing to composing a new event
    pub fn start_edit(&mut self) -> CalendarResult<()> {
        match self.state {
            DaySelectionState::Viewing { day } => {
                self.state = DaySelectionState::Editing { draft: DraftEntry::empty(day) };
                info!("Started editing {}", day);
                Ok(())
            }
            _ => Err(CalendarError::InvalidState("start editing requires a day being viewed")),
        }
    }

    /// Replace the draft text, cut to the character limit
    pub fn update_draft_text(&mut self, text: &str) -> CalendarResult<()> {
        let max_chars = self.rules.max_chars;
        let draft = self.draft_mut()?;
        draft.text = text.chars().take(max_chars).collect();
        Ok(())
    }

    /// Replace the raw expense input
    pub fn update_draft_expense(&mut self, expense_input: &str) -> CalendarResult<()> {
        let draft = self.draft_mut()?;
        draft.expense_input = expense_input.to_string();
        Ok(())
    }

    /// Check the current draft without changing anything
    pub fn validate_draft(&self) -> CalendarResult<ValidDraft> {
        let draft = self
            .state
            .draft()
            .ok_or(CalendarError::InvalidState("submit requires a draft being edited"))?;
        Ok(validate_entry(draft, &self.rules)?)
    }

    /// Commit the draft as a new event for the selected day.
    ///
    /// On success the draft fields are cleared and the editor stays in
    /// `Editing` so more events can be added. On any failure the state is left
    /// exactly as it was.
    pub async fn submit(&mut self, storage: &dyn EventStorage) -> CalendarResult<DayEvent> {
        let valid = match self.validate_draft() {
            Ok(valid) => valid,
            Err(err) => {
                warn!("Rejected draft submit: {}", err);
                return Err(err);
            }
        };

        let event = storage
            .add_event(valid.day, &valid.text, valid.expense)
            .await
            .map_err(|err| {
                error!("Failed to add event on {}: {:#}", valid.day, err);
                CalendarError::collaborator(err)
            })?;

        self.state = DaySelectionState::Editing { draft: DraftEntry::empty(valid.day) };
        info!("Committed event {} on {}", event.id, valid.day);
        Ok(event)
    }

    /// Delete the most recently committed event of the selected day and mark
    /// the day as removed for the next render
    pub async fn remove_last(
        &mut self,
        storage: &dyn EventStorage,
        committed: &EventsByDay,
    ) -> CalendarResult<DayEvent> {
        let day = self
            .selected_day()
            .ok_or(CalendarError::InvalidState("remove requires a selected day"))?;

        let latest = committed
            .latest(&day)
            .cloned()
            .ok_or(CalendarError::InvalidState("the selected day has no events to remove"))?;

        let deleted = storage.delete_event(&latest.id).await.map_err(|err| {
            error!("Failed to delete event {}: {:#}", latest.id, err);
            CalendarError::collaborator(err)
        })?;
        if !deleted {
            warn!("Event {} was already gone from storage", latest.id);
            return Err(CalendarError::CollaboratorFailure(format!(
                "event {} not found",
                latest.id
            )));
        }

        self.removed.insert(day);
        info!("Removed event {} from {}", latest.id, day);
        Ok(latest)
    }

    /// Deselect and discard any uncommitted draft
    pub fn close(&mut self) {
        if let Some(day) = self.selected_day() {
            info!("Closed panel for {}", day);
        }
        self.state = DaySelectionState::Idle;
    }

    /// Hand the removed markers to a render and forget them
    pub fn take_removed_markers(&mut self) -> HashSet<CalendarDate> {
        std::mem::take(&mut self.removed)
    }

    fn draft_mut(&mut self) -> CalendarResult<&mut DraftEntry> {
        match &mut self.state {
            DaySelectionState::Editing { draft } => Ok(draft),
            _ => Err(CalendarError::InvalidState("draft input requires a day being edited")),
        }
    }
}

/// Validate draft text and expense against the entry rules.
///
/// An empty expense field counts as no expense (0).
pub fn validate_entry(draft: &DraftEntry, rules: &EntryRules) -> Result<ValidDraft, ValidationError> {
    let text = draft.text.trim();
    if text.is_empty() {
        return Err(ValidationError::BlankText);
    }

    let chars = text.chars().count();
    if chars > rules.max_chars {
        return Err(ValidationError::TextTooLong { chars, max: rules.max_chars });
    }

    let words = text.split_whitespace().count();
    if words > rules.max_words {
        return Err(ValidationError::TooManyWords { words, max: rules.max_words });
    }

    let expense = if draft.expense_input.trim().is_empty() {
        0.0
    } else {
        let amount = clean_and_parse_amount(&draft.expense_input, &rules.currency_symbol)
            .map_err(ValidationError::InvalidExpense)?;
        if amount < 0.0 {
            return Err(ValidationError::NegativeExpense);
        }
        amount
    };

    Ok(ValidDraft {
        day: draft.day,
        text: text.to_string(),
        expense,
    })
}
