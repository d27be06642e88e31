//! Projection of the selection state onto the day panel.

use super::day_selection::EntryRules;
use shared::{DayEvent, DaySelectionState, PanelEventLine, PanelView};

pub const EXPENSE_PLACEHOLDER: &str = "Enter expected expenses...";

/// Build the panel display model.
///
/// `committed` may contain events of other days; only those of the selected
/// day are shown, in the order given.
pub fn render_panel(state: &DaySelectionState, committed: &[DayEvent], rules: &EntryRules) -> PanelView {
    match state {
        DaySelectionState::Idle => PanelView::NoSelection,
        DaySelectionState::Viewing { day } => {
            let events: Vec<PanelEventLine> = committed
                .iter()
                .filter(|event| event.date == *day)
                .enumerate()
                .map(|(index, event)| PanelEventLine {
                    number: index + 1,
                    text: event.text.clone(),
                    expense: event.expense,
                })
                .collect();
            let total_expense: f64 = events.iter().map(|line| line.expense).sum();

            PanelView::EventList {
                day: *day,
                date_label: format!("Events of {}", day.format_for_display()),
                can_remove: !events.is_empty(),
                events,
                total_expense,
            }
        }
        DaySelectionState::Editing { draft } => {
            let words_used = draft.text.split_whitespace().count();
            PanelView::EditForm {
                day: draft.day,
                date_label: format!("Events for {}", draft.day.format_for_display()),
                text: draft.text.clone(),
                expense_input: draft.expense_input.clone(),
                text_placeholder: format!("Write something... (max {} words)", rules.max_words),
                expense_placeholder: EXPENSE_PLACEHOLDER.to_string(),
                max_chars: rules.max_chars,
                words_remaining: rules.max_words.saturating_sub(words_used),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::{CalendarDate, DraftEntry};

    fn event(date: CalendarDate, text: &str, expense: f64) -> DayEvent {
        DayEvent {
            id: text.to_string(),
            date,
            text: text.to_string(),
            expense,
            created_at: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_idle_renders_nothing() {
        let view = render_panel(&DaySelectionState::Idle, &[], &EntryRules::default());
        assert_eq!(view, PanelView::NoSelection);
    }

    #[test]
    fn test_viewing_lists_day_events_with_total() {
        let day = CalendarDate::new(2024, 3, 20);
        let committed = vec![
            event(day, "Concert", 45.0),
            event(CalendarDate::new(2024, 3, 21), "Elsewhere", 99.0),
            event(day, "Taxi", 12.5),
        ];

        let view = render_panel(&DaySelectionState::Viewing { day }, &committed, &EntryRules::default());
        match view {
            PanelView::EventList { date_label, events, total_expense, can_remove, .. } => {
                assert_eq!(date_label, "Events of 3/20/2024");
                assert_eq!(events.len(), 2);
                assert_eq!(events[1], PanelEventLine { number: 2, text: "Taxi".to_string(), expense: 12.5 });
                assert_eq!(total_expense, 57.5);
                assert!(can_remove);
            }
            other => panic!("expected event list, got {:?}", other),
        }
    }

    #[test]
    fn test_viewing_after_last_removal_is_empty_list() {
        let day = CalendarDate::new(2024, 3, 20);
        let view = render_panel(&DaySelectionState::Viewing { day }, &[], &EntryRules::default());
        assert!(matches!(
            view,
            PanelView::EventList { ref events, can_remove: false, .. } if events.is_empty()
        ));
    }

    #[test]
    fn test_editing_shows_form() {
        let mut draft = DraftEntry::empty(CalendarDate::new(2024, 3, 20));
        draft.text = "Dinner with Sam".to_string();
        draft.expense_input = "30".to_string();

        let view = render_panel(&DaySelectionState::Editing { draft }, &[], &EntryRules::default());
        match view {
            PanelView::EditForm { text, expense_input, max_chars, words_remaining, text_placeholder, .. } => {
                assert_eq!(text, "Dinner with Sam");
                assert_eq!(expense_input, "30");
                assert_eq!(max_chars, 60);
                assert_eq!(words_remaining, 2);
                assert_eq!(text_placeholder, "Write something... (max 5 words)");
            }
            other => panic!("expected edit form, got {:?}", other),
        }
    }
}
