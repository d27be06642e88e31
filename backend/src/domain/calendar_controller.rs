//! # Calendar Controller
//!
//! Owns the viewed month, the latest clock reading, the month's persisted
//! events and the day selection editor, and turns user intents into editor
//! transitions and collaborator calls.
//!
//! Every tick rebuilds the whole [`CalendarView`] from scratch. Failures are
//! reported to the user through the [`Notifier`] and returned to the caller;
//! none of them stop the engine.

use super::budget_service::{BudgetChange, BudgetService};
use super::calendar::{validate_month_index, CalendarService};
use super::day_classifier::{ClassificationContext, DayClassifier};
use super::day_selection::{DaySelectionEditor, EntryRules};
use super::events_by_day::EventsByDay;
use super::panel::render_panel;
use crate::error::{CalendarError, CalendarResult};
use crate::io::notifier::Notifier;
use crate::storage::traits::EventStorage;
use chrono::{Datelike, NaiveDateTime};
use shared::{CalendarDate, CalendarView, DayEvent, DaySelectionState, Severity};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct CalendarController {
    calendar: CalendarService,
    classifier: DayClassifier,
    editor: DaySelectionEditor,
    events: Arc<dyn EventStorage>,
    budgets: BudgetService,
    notifier: Arc<dyn Notifier>,
    year: i32,
    month_index: u32,
    now: NaiveDateTime,
    month_events: EventsByDay,
}

impl CalendarController {
    /// Create a controller viewing the month containing `now` and load its
    /// events. A failed load is reported and leaves the month empty.
    pub async fn open(
        rules: EntryRules,
        events: Arc<dyn EventStorage>,
        budgets: BudgetService,
        notifier: Arc<dyn Notifier>,
        now: NaiveDateTime,
    ) -> Self {
        let mut controller = Self {
            calendar: CalendarService::new(),
            classifier: DayClassifier::new(),
            editor: DaySelectionEditor::new(rules),
            events,
            budgets,
            notifier,
            year: now.year(),
            month_index: now.month0(),
            now,
            month_events: EventsByDay::new(),
        };
        // Already reported to the user
        let _ = controller.refresh_events().await;
        controller
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month_index(&self) -> u32 {
        self.month_index
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    pub fn selection(&self) -> &DaySelectionState {
        self.editor.state()
    }

    /// Persisted events of a day in the viewed month, oldest first
    pub fn events_for(&self, day: &CalendarDate) -> &[DayEvent] {
        self.month_events.events_for(day)
    }

    /// Rebuild the full view for a clock reading.
    ///
    /// Removed markers are consumed here, so each shows on one render only.
    pub async fn on_tick(&mut self, now: NaiveDateTime) -> CalendarView {
        self.now = now;

        let grid = match self.calendar.build_month_grid(self.year, self.month_index) {
            Ok(grid) => grid,
            Err(err) => {
                warn!("Could not build grid for {}/{}: {}", self.month_index + 1, self.year, err);
                Vec::new()
            }
        };

        let removed = self.editor.take_removed_markers();
        let context = ClassificationContext {
            now,
            events: &self.month_events,
            draft_day: self.editor.draft_day(),
            removed: &removed,
        };
        let cells = self.classifier.classify_grid(&grid, &context);

        let committed: &[DayEvent] = match self.editor.selected_day() {
            Some(day) => self.month_events.events_for(&day),
            None => &[],
        };
        let panel = render_panel(self.editor.state(), committed, self.editor.rules());

        let budget = match self.budgets.summary(self.month_index, self.year).await {
            Ok(summary) => Some(summary),
            Err(err) => {
                warn!("Budget summary unavailable this tick: {}", err);
                None
            }
        };

        debug!("Rendered {} cells for {}/{}", cells.len(), self.month_index + 1, self.year);
        CalendarView {
            year: self.year,
            month_index: self.month_index,
            month_label: self.calendar.month_label(self.month_index, self.year),
            time_label: now.format("%H:%M:%S").to_string(),
            cells,
            panel,
            budget,
        }
    }

    /// Select a day. A day outside the viewed month switches the view first.
    pub async fn select_day(&mut self, day: CalendarDate) -> CalendarResult<()> {
        if day.to_naive().is_none() {
            let err = CalendarError::InvalidDate {
                year: day.year,
                month: day.month,
                day: day.day,
            };
            return Err(self.report(err));
        }

        if (day.year, day.month_index()) != (self.year, self.month_index) {
            let events = self.load_month(day.month_index(), day.year).await?;
            self.switch_month(day.month_index(), day.year, events);
        }

        self.editor.select(day, self.month_events.events_for(&day));
        Ok(())
    }

    pub fn start_edit(&mut self) -> CalendarResult<()> {
        self.editor.start_edit().map_err(|err| self.report(err))
    }

    pub fn update_draft_text(&mut self, text: &str) -> CalendarResult<()> {
        self.editor.update_draft_text(text).map_err(|err| self.report(err))
    }

    pub fn update_draft_expense(&mut self, expense_input: &str) -> CalendarResult<()> {
        self.editor
            .update_draft_expense(expense_input)
            .map_err(|err| self.report(err))
    }

    /// Commit the draft and reload the month's events
    pub async fn submit_draft(&mut self) -> CalendarResult<DayEvent> {
        let event = match self.editor.submit(self.events.as_ref()).await {
            Ok(event) => event,
            Err(err) => return Err(self.report(err)),
        };

        self.notifier.notify_user("Event added.", Severity::Success);
        if self.refresh_events().await.is_err() {
            // Keep the confirmed event visible until the next successful load
            self.month_events.insert(event.clone());
        }
        Ok(event)
    }

    /// Delete the latest event of the selected day and reload the month
    pub async fn remove_last_event(&mut self) -> CalendarResult<DayEvent> {
        let removed = match self.editor.remove_last(self.events.as_ref(), &self.month_events).await {
            Ok(event) => event,
            Err(err) => return Err(self.report(err)),
        };

        self.notifier.notify_user("Event removed.", Severity::Info);
        if self.refresh_events().await.is_err() {
            self.month_events.remove(&removed.id);
        }
        Ok(removed)
    }

    /// Deselect the day and drop any unsaved draft
    pub fn close_panel(&mut self) {
        self.editor.close();
    }

    /// Switch the viewed month. The month's events are loaded first; only
    /// then is the panel closed and the view swapped. A failed load keeps the
    /// current month, selection and draft.
    pub async fn show_month(&mut self, month_index: u32, year: i32) -> CalendarResult<()> {
        if let Err(err) = validate_month_index(month_index) {
            return Err(self.report(err.into()));
        }

        let events = self.load_month(month_index, year).await?;
        self.switch_month(month_index, year, events);
        Ok(())
    }

    pub async fn previous_month(&mut self) -> CalendarResult<()> {
        let (month_index, year) = self.calendar.previous_month(self.month_index, self.year);
        self.show_month(month_index, year).await
    }

    pub async fn next_month(&mut self) -> CalendarResult<()> {
        let (month_index, year) = self.calendar.next_month(self.month_index, self.year);
        self.show_month(month_index, year).await
    }

    /// Store the budget typed for a month
    pub async fn set_budget(&mut self, month_index: u32, input: &str) -> CalendarResult<BudgetChange> {
        match self.budgets.set_monthly_budget(month_index, input).await {
            Ok(change) => {
                self.notifier.notify_user(change.success_message(), Severity::Success);
                Ok(change)
            }
            Err(err) => Err(self.report(err)),
        }
    }

    pub async fn delete_budget(&mut self, month_index: u32) -> CalendarResult<BudgetChange> {
        match self.budgets.delete_monthly_budget(month_index).await {
            Ok(change) => {
                self.notifier.notify_user(change.success_message(), Severity::Info);
                Ok(change)
            }
            Err(err) => Err(self.report(err)),
        }
    }

    /// Reload the viewed month's events. On failure the previous events are kept.
    pub async fn refresh_events(&mut self) -> CalendarResult<()> {
        self.month_events = self.load_month(self.month_index, self.year).await?;
        Ok(())
    }

    async fn load_month(&self, month_index: u32, year: i32) -> CalendarResult<EventsByDay> {
        match self.events.get_events_for_month(year, month_index).await {
            Ok(events) => {
                let month_events = EventsByDay::from_events(events);
                debug!("Loaded {} events for {}/{}", month_events.total_events(), month_index + 1, year);
                Ok(month_events)
            }
            Err(err) => Err(self.report(CalendarError::collaborator(err))),
        }
    }

    fn switch_month(&mut self, month_index: u32, year: i32, events: EventsByDay) {
        self.editor.close();
        self.year = year;
        self.month_index = month_index;
        self.month_events = events;
        info!("Viewing {}", self.calendar.month_label(month_index, year));
    }

    fn report(&self, err: CalendarError) -> CalendarError {
        let severity = match &err {
            CalendarError::Validation(_) | CalendarError::InvalidState(_) => Severity::Warning,
            CalendarError::CollaboratorFailure(_) | CalendarError::InvalidDate { .. } => Severity::Error,
        };
        self.notifier.notify_user(&err.to_string(), severity);
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::notifier::QueuedNotifier;
    use crate::storage::memory::InMemoryStorage;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use shared::{DayBaseClass, PanelView};
    use std::sync::atomic::{AtomicBool, Ordering};

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap().and_hms_opt(hour, 0, 0).unwrap()
    }

    fn event(id: &str, day: u32, hour: u32) -> DayEvent {
        DayEvent {
            id: id.to_string(),
            date: CalendarDate::new(2024, 3, day),
            text: format!("event {}", id),
            expense: 10.0,
            created_at: at(1, hour),
        }
    }

    async fn controller_with(
        storage: Arc<InMemoryStorage>,
        notifier: Arc<QueuedNotifier>,
    ) -> CalendarController {
        let budgets = BudgetService::new(storage.clone(), storage.clone(), "$");
        CalendarController::open(EntryRules::default(), storage, budgets, notifier, at(15, 10)).await
    }

    fn cell_for(view: &CalendarView, day: u32) -> shared::CalendarCell {
        view.cells
            .iter()
            .find(|cell| cell.date == CalendarDate::new(2024, 3, day))
            .cloned()
            .unwrap()
    }

    /// Event storage whose writes always fail
    struct ReadOnlyStorage(InMemoryStorage);

    #[async_trait]
    impl EventStorage for ReadOnlyStorage {
        async fn get_events_for_month(&self, year: i32, month_index: u32) -> anyhow::Result<Vec<DayEvent>> {
            self.0.get_events_for_month(year, month_index).await
        }

        async fn add_event(&self, _date: CalendarDate, _text: &str, _expense: f64) -> anyhow::Result<DayEvent> {
            Err(anyhow!("disk full"))
        }

        async fn delete_event(&self, _event_id: &str) -> anyhow::Result<bool> {
            Err(anyhow!("disk full"))
        }
    }

    /// Event storage whose month loads can be switched off
    #[derive(Default)]
    struct FlakyReads {
        inner: InMemoryStorage,
        failing: AtomicBool,
    }

    #[async_trait]
    impl EventStorage for FlakyReads {
        async fn get_events_for_month(&self, year: i32, month_index: u32) -> anyhow::Result<Vec<DayEvent>> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(anyhow!("events file locked"));
            }
            self.inner.get_events_for_month(year, month_index).await
        }

        async fn add_event(&self, date: CalendarDate, text: &str, expense: f64) -> anyhow::Result<DayEvent> {
            self.inner.add_event(date, text, expense).await
        }

        async fn delete_event(&self, event_id: &str) -> anyhow::Result<bool> {
            self.inner.delete_event(event_id).await
        }
    }

    async fn controller_over_flaky(
        storage: Arc<FlakyReads>,
        notifier: Arc<QueuedNotifier>,
    ) -> CalendarController {
        let finances = Arc::new(InMemoryStorage::new());
        let budgets = BudgetService::new(finances.clone(), finances, "$");
        CalendarController::open(EntryRules::default(), storage, budgets, notifier, at(15, 10)).await
    }

    #[tokio::test]
    async fn test_failed_load_keeps_selection_draft_and_month() {
        let storage = Arc::new(FlakyReads::default());
        storage.inner.insert_event(event("a", 18, 9)).unwrap();
        let notifier = Arc::new(QueuedNotifier::new());
        let mut controller = controller_over_flaky(storage.clone(), notifier.clone()).await;

        let day = CalendarDate::new(2024, 3, 20);
        controller.select_day(day).await.unwrap();
        controller.update_draft_text("Concert").unwrap();
        let before = controller.selection().clone();
        notifier.drain();

        storage.failing.store(true, Ordering::SeqCst);

        let result = controller.select_day(CalendarDate::new(2024, 5, 2)).await;
        assert!(matches!(result, Err(CalendarError::CollaboratorFailure(_))));
        assert!(controller.show_month(6, 2024).await.is_err());
        assert!(controller.next_month().await.is_err());
        assert!(controller.previous_month().await.is_err());

        assert_eq!((controller.month_index(), controller.year()), (2, 2024));
        assert_eq!(controller.selection(), &before);
        assert_eq!(controller.events_for(&CalendarDate::new(2024, 3, 18)).len(), 1);

        let notes = notifier.drain();
        assert_eq!(notes.len(), 4);
        assert!(notes.iter().all(|note| note.severity == Severity::Error));

        // The draft still renders and can be committed once storage recovers
        let view = controller.on_tick(at(15, 10)).await;
        assert!(cell_for(&view, 20).classification.has_data);
        storage.failing.store(false, Ordering::SeqCst);
        controller.submit_draft().await.unwrap();
        assert_eq!(controller.events_for(&day).len(), 1);
    }

    #[tokio::test]
    async fn test_tick_renders_march_scenario() {
        let storage = Arc::new(InMemoryStorage::new());
        storage.insert_event(event("today", 15, 9)).unwrap();
        let notifier = Arc::new(QueuedNotifier::new());
        let mut controller = controller_with(storage, notifier).await;

        let view = controller.on_tick(at(15, 10)).await;
        assert_eq!(view.month_index, 2);
        assert_eq!(view.month_label, "3/2024");
        assert_eq!(view.time_label, "10:00:00");
        assert_eq!(view.cells.len(), 31);
        assert_eq!(view.panel, PanelView::NoSelection);

        assert_eq!(cell_for(&view, 10).classification.base, DayBaseClass::Past);
        let today = cell_for(&view, 15).classification;
        assert_eq!(today.base, DayBaseClass::TodayWithEvent);
        assert!(today.has_data);
        let future = cell_for(&view, 20).classification;
        assert_eq!(future.base, DayBaseClass::Future);
        assert!(!future.has_data);

        let budget = view.budget.unwrap();
        assert!(!budget.has_budget());
        assert_eq!(budget.percent, 0.0);
    }

    #[tokio::test]
    async fn test_draft_marks_day_and_submit_commits() {
        let storage = Arc::new(InMemoryStorage::new());
        let notifier = Arc::new(QueuedNotifier::new());
        let mut controller = controller_with(storage.clone(), notifier.clone()).await;
        let day = CalendarDate::new(2024, 3, 20);

        controller.select_day(day).await.unwrap();
        assert!(controller.selection().is_editing());

        // A blank draft does not mark the day
        let view = controller.on_tick(at(15, 10)).await;
        assert!(!cell_for(&view, 20).classification.has_data);

        controller.update_draft_text("Concert").unwrap();
        controller.update_draft_expense("45").unwrap();
        let view = controller.on_tick(at(15, 10)).await;
        assert!(cell_for(&view, 20).classification.has_data);
        assert!(matches!(view.panel, PanelView::EditForm { ref text, .. } if text == "Concert"));

        let committed = controller.submit_draft().await.unwrap();
        assert_eq!(committed.expense, 45.0);
        assert_eq!(storage.event_count(), 1);
        assert_eq!(controller.events_for(&day).len(), 1);
        assert_eq!(
            notifier.drain().last().map(|n| n.severity),
            Some(Severity::Success)
        );
    }

    #[tokio::test]
    async fn test_blank_submit_warns_and_keeps_state() {
        let storage = Arc::new(InMemoryStorage::new());
        let notifier = Arc::new(QueuedNotifier::new());
        let mut controller = controller_with(storage.clone(), notifier.clone()).await;

        controller.select_day(CalendarDate::new(2024, 3, 20)).await.unwrap();
        let before = controller.selection().clone();

        let result = controller.submit_draft().await;
        assert!(result.unwrap_err().is_validation());
        assert_eq!(controller.selection(), &before);
        assert_eq!(storage.event_count(), 0);

        let notes = notifier.drain();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].severity, Severity::Warning);
    }

    #[tokio::test]
    async fn test_storage_failure_keeps_draft_and_notifies_error() {
        let notifier = Arc::new(QueuedNotifier::new());
        let finances = Arc::new(InMemoryStorage::new());
        let budgets = BudgetService::new(finances.clone(), finances, "$");
        let events: Arc<dyn EventStorage> = Arc::new(ReadOnlyStorage(InMemoryStorage::new()));
        let mut controller =
            CalendarController::open(EntryRules::default(), events, budgets, notifier.clone(), at(15, 10)).await;

        controller.select_day(CalendarDate::new(2024, 3, 20)).await.unwrap();
        controller.update_draft_text("Concert").unwrap();
        let before = controller.selection().clone();

        let result = controller.submit_draft().await;
        assert!(matches!(result, Err(CalendarError::CollaboratorFailure(_))));
        assert_eq!(controller.selection(), &before);
        assert_eq!(notifier.drain().last().map(|n| n.severity), Some(Severity::Error));
    }

    #[tokio::test]
    async fn test_remove_marker_shows_for_one_render() {
        let storage = Arc::new(InMemoryStorage::new());
        storage.insert_event(event("a", 20, 9)).unwrap();
        storage.insert_event(event("b", 20, 11)).unwrap();
        let notifier = Arc::new(QueuedNotifier::new());
        let mut controller = controller_with(storage.clone(), notifier).await;
        let day = CalendarDate::new(2024, 3, 20);

        controller.select_day(day).await.unwrap();
        assert_eq!(controller.selection(), &DaySelectionState::Viewing { day });

        let removed = controller.remove_last_event().await.unwrap();
        assert_eq!(removed.id, "b");
        assert_eq!(controller.events_for(&day).len(), 1);

        let first = controller.on_tick(at(15, 10)).await;
        assert!(cell_for(&first, 20).classification.removed);
        let second = controller.on_tick(at(15, 10)).await;
        assert!(!cell_for(&second, 20).classification.removed);
    }

    #[tokio::test]
    async fn test_month_navigation_closes_panel() {
        let storage = Arc::new(InMemoryStorage::new());
        let notifier = Arc::new(QueuedNotifier::new());
        let mut controller = controller_with(storage, notifier).await;

        controller.select_day(CalendarDate::new(2024, 3, 20)).await.unwrap();
        controller.next_month().await.unwrap();
        assert_eq!((controller.month_index(), controller.year()), (3, 2024));
        assert_eq!(controller.selection(), &DaySelectionState::Idle);

        controller.show_month(0, 2024).await.unwrap();
        controller.previous_month().await.unwrap();
        assert_eq!((controller.month_index(), controller.year()), (11, 2023));

        let view = controller.on_tick(at(15, 10)).await;
        assert_eq!(view.cells.len(), 31);
        assert!(view.cells.iter().all(|cell| cell.classification.base == DayBaseClass::Past));

        assert!(controller.show_month(12, 2024).await.is_err());
        assert_eq!(controller.month_index(), 11);
    }

    #[tokio::test]
    async fn test_select_day_in_other_month_switches_view() {
        let storage = Arc::new(InMemoryStorage::new());
        let notifier = Arc::new(QueuedNotifier::new());
        let mut controller = controller_with(storage, notifier).await;

        let day = CalendarDate::new(2024, 5, 2);
        controller.select_day(day).await.unwrap();
        assert_eq!(controller.month_index(), 4);
        assert_eq!(controller.selection().selected_day(), Some(day));

        assert!(controller.select_day(CalendarDate::new(2024, 2, 30)).await.is_err());
    }

    #[tokio::test]
    async fn test_budget_intents_notify() {
        let storage = Arc::new(InMemoryStorage::new());
        let notifier = Arc::new(QueuedNotifier::new());
        let mut controller = controller_with(storage, notifier.clone()).await;

        controller.set_budget(2, "200").await.unwrap();
        assert!(controller.set_budget(2, "-1").await.is_err());
        controller.delete_budget(2).await.unwrap();

        let messages: Vec<String> = notifier.drain().into_iter().map(|n| n.message).collect();
        assert_eq!(messages[0], "Budget added successfully.");
        assert_eq!(messages[1], "Budget cannot be negative");

        let view = controller.on_tick(at(15, 10)).await;
        assert!(!view.budget.unwrap().has_budget());
    }
}
