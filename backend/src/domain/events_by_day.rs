//! Persisted events grouped by calendar day.

use shared::{CalendarDate, DayEvent};
use std::collections::HashMap;

/// Events of the viewed month keyed by their calendar date.
///
/// Within a day, events are kept in commit order (oldest first).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventsByDay {
    days: HashMap<CalendarDate, Vec<DayEvent>>,
}

impl EventsByDay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_events(events: Vec<DayEvent>) -> Self {
        let mut days: HashMap<CalendarDate, Vec<DayEvent>> = HashMap::new();
        for event in events {
            days.entry(event.date).or_default().push(event);
        }
        for day_events in days.values_mut() {
            // Stable sort keeps storage order for equal timestamps
            day_events.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        }
        Self { days }
    }

    pub fn events_for(&self, day: &CalendarDate) -> &[DayEvent] {
        self.days.get(day).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn count(&self, day: &CalendarDate) -> usize {
        self.events_for(day).len()
    }

    pub fn has_events(&self, day: &CalendarDate) -> bool {
        self.count(day) > 0
    }

    /// Most recently committed event of the day
    pub fn latest(&self, day: &CalendarDate) -> Option<&DayEvent> {
        self.events_for(day).last()
    }

    pub fn total_events(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    /// Add a confirmed event without reloading the month
    pub fn insert(&mut self, event: DayEvent) {
        let day_events = self.days.entry(event.date).or_default();
        let position = day_events.partition_point(|existing| existing.created_at <= event.created_at);
        day_events.insert(position, event);
    }

    /// Drop an event by id; true if it was present
    pub fn remove(&mut self, event_id: &str) -> bool {
        let mut found = false;
        for day_events in self.days.values_mut() {
            let before = day_events.len();
            day_events.retain(|event| event.id != event_id);
            found |= day_events.len() < before;
        }
        self.days.retain(|_, day_events| !day_events.is_empty());
        found
    }
}
