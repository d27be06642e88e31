use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Weekday header labels, indexed by `weekday_col` (0 = Sunday)
pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// A date truncated to day granularity.
///
/// Equality, ordering and hashing are by calendar value, so two dates built
/// independently for the same day are interchangeable as map keys.
/// `month` is 1-based (1 = January).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CalendarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl CalendarDate {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }

    /// Calendar day of a wall-clock timestamp
    pub fn from_datetime(datetime: NaiveDateTime) -> Self {
        Self::from_naive(datetime.date())
    }

    /// Convert to a chrono date; `None` when the fields do not name a real day
    pub fn to_naive(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    /// Canonical `YYYY-MM-DD` key used for every day-keyed mapping
    pub fn key(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }

    /// Parse a canonical `YYYY-MM-DD` key
    pub fn parse_key(key: &str) -> Option<Self> {
        NaiveDate::parse_from_str(key.trim(), "%Y-%m-%d")
            .ok()
            .map(Self::from_naive)
    }

    /// Zero-based month index (0 = January)
    pub fn month_index(&self) -> u32 {
        self.month.saturating_sub(1)
    }

    /// Short human-readable form, e.g. `3/15/2024`
    pub fn format_for_display(&self) -> String {
        format!("{}/{}/{}", self.month, self.day, self.year)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// An event annotated on a calendar day, owned by the persistence collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayEvent {
    /// Identifier assigned by the storage backend
    pub id: String,
    pub date: CalendarDate,
    /// Short description (max 5 words / 60 characters)
    pub text: String,
    /// Expected cost, never negative
    pub expense: f64,
    /// When the event was committed; orders events within a day
    pub created_at: NaiveDateTime,
}

/// In-progress event being composed for the selected day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftEntry {
    pub day: CalendarDate,
    pub text: String,
    /// Raw contents of the expense field; empty means "no expense entered"
    pub expense_input: String,
}

impl DraftEntry {
    pub fn empty(day: CalendarDate) -> Self {
        Self {
            day,
            text: String::new(),
            expense_input: String::new(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty() && self.expense_input.trim().is_empty()
    }
}

/// Selection and input mode of the day panel
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum DaySelectionState {
    /// No day selected
    #[default]
    Idle,
    /// A day is selected and its committed events are shown
    Viewing { day: CalendarDate },
    /// A day is selected and a new event is being composed
    Editing { draft: DraftEntry },
}

impl DaySelectionState {
    pub fn selected_day(&self) -> Option<CalendarDate> {
        match self {
            DaySelectionState::Idle => None,
            DaySelectionState::Viewing { day } => Some(*day),
            DaySelectionState::Editing { draft } => Some(draft.day),
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, DaySelectionState::Editing { .. })
    }

    pub fn draft(&self) -> Option<&DraftEntry> {
        match self {
            DaySelectionState::Editing { draft } => Some(draft),
            _ => None,
        }
    }
}

/// Budget for one month of the year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthBudget {
    /// Zero-based month index (0 = January)
    pub month: u32,
    pub amount: f64,
}

/// A single income entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeRecord {
    pub id: String,
    pub description: String,
    pub amount: f64,
    pub created_at: NaiveDateTime,
}

/// One spend inside an expense category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseItem {
    pub id: String,
    pub amount: f64,
    pub created_at: NaiveDateTime,
}

/// A named group of expense items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseCategory {
    pub id: String,
    pub title: String,
    /// Display color, e.g. `#ff8800`
    pub color: String,
    pub items: Vec<ExpenseItem>,
}

/// A day of the month positioned on the week grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDate {
    pub date: CalendarDate,
    /// Week boundaries crossed since the 1st of the month (first week is 0)
    pub week_row: u32,
    /// 0 = Sunday .. 6 = Saturday
    pub weekday_col: u32,
}

impl GridDate {
    /// Row in the painted grid; row 0 holds the weekday headers
    pub fn display_row(&self) -> u32 {
        self.week_row + 1
    }
}

/// Base fill category of a calendar cell; the first matching variant wins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DayBaseClass {
    Past,
    TodayWithEvent,
    Today,
    #[default]
    Future,
}

/// Derived state of a calendar cell: a base class plus additive style flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DayClassification {
    pub base: DayBaseClass,
    /// Day is not past and has a persisted event or the active draft
    pub has_data: bool,
    /// Day had an event removed since the previous render
    pub removed: bool,
}

/// Rendering projection of one day; rebuilt on every tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarCell {
    pub date: CalendarDate,
    pub week_row: u32,
    pub weekday_col: u32,
    pub classification: DayClassification,
}

/// One committed event as shown in the day panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelEventLine {
    /// 1-based position within the day
    pub number: usize,
    pub text: String,
    pub expense: f64,
}

/// What the day panel should show
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PanelView {
    NoSelection,
    EventList {
        day: CalendarDate,
        date_label: String,
        events: Vec<PanelEventLine>,
        total_expense: f64,
        can_remove: bool,
    },
    EditForm {
        day: CalendarDate,
        date_label: String,
        text: String,
        expense_input: String,
        text_placeholder: String,
        expense_placeholder: String,
        max_chars: usize,
        words_remaining: usize,
    },
}

/// Spend-vs-budget figures for the viewed month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSummary {
    pub month_index: u32,
    pub month_name: String,
    /// `None` when no budget has been set for the month
    pub budget: Option<f64>,
    pub total_expenses: f64,
    pub total_income: f64,
    /// Clamped to `0.0..=100.0`
    pub percent: f64,
}

impl BudgetSummary {
    /// False when the month has no budget or a deleted (zero) one
    pub fn has_budget(&self) -> bool {
        matches!(self.budget, Some(amount) if amount > 0.0)
    }
}

/// Everything the UI needs to paint one frame of the calendar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarView {
    pub year: i32,
    pub month_index: u32,
    /// e.g. `3/2024`
    pub month_label: String,
    /// e.g. `14:05:09`
    pub time_label: String,
    pub cells: Vec<CalendarCell>,
    pub panel: PanelView,
    /// `None` when the budget figures could not be loaded this tick
    pub budget: Option<BudgetSummary>,
}

/// Severity of a user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{}", label)
    }
}
