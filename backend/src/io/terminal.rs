//! Plain-text rendering of a [`CalendarView`] for the terminal binary.
//!
//! Cell legend: `[15]` today, ` 10 .` past, `*` has events or a draft,
//! `-` an event was just removed.

use crate::domain::calendar::CalendarService;
use crate::domain::money::format_amount;
use shared::{BudgetSummary, CalendarCell, CalendarView, DayBaseClass, PanelView, WEEKDAY_LABELS};
use std::fmt::Write;

const CELL_WIDTH: usize = 5;

fn render_cell(cell: &CalendarCell) -> String {
    let class = cell.classification;
    let day = cell.date.day;
    let body = match class.base {
        DayBaseClass::Today | DayBaseClass::TodayWithEvent => format!("[{:>2}]", day),
        DayBaseClass::Past | DayBaseClass::Future => format!(" {:>2} ", day),
    };
    let flag = if class.removed {
        '-'
    } else if class.has_data {
        '*'
    } else if class.base == DayBaseClass::Past {
        '.'
    } else {
        ' '
    };
    format!("{}{}", body, flag)
}

/// The grid always spans the month's full week rows, even when `cells` is short
fn render_grid(out: &mut String, view: &CalendarView) {
    let cells = &view.cells;
    let header: Vec<String> = WEEKDAY_LABELS
        .iter()
        .map(|label| format!("{:<width$}", label, width = CELL_WIDTH))
        .collect();
    let _ = writeln!(out, "{}", header.join(" ").trim_end());

    let rows = CalendarService::new().week_rows_in_month(view.month_index, view.year);
    for row in 0..rows {
        let mut line = vec![" ".repeat(CELL_WIDTH); 7];
        for cell in cells.iter().filter(|cell| cell.week_row == row) {
            if let Some(slot) = line.get_mut(cell.weekday_col as usize) {
                *slot = render_cell(cell);
            }
        }
        let _ = writeln!(out, "{}", line.join(" ").trim_end());
    }
}

fn render_panel(out: &mut String, panel: &PanelView, currency_symbol: &str) {
    match panel {
        PanelView::NoSelection => {}
        PanelView::EventList { date_label, events, total_expense, .. } => {
            let _ = writeln!(out, "{}", date_label);
            if events.is_empty() {
                let _ = writeln!(out, "  (no events)");
            }
            for line in events {
                let _ = writeln!(
                    out,
                    "  {}. {} ({})",
                    line.number,
                    line.text,
                    format_amount(line.expense, currency_symbol)
                );
            }
            let _ = writeln!(out, "  Total: {}", format_amount(*total_expense, currency_symbol));
        }
        PanelView::EditForm { date_label, text, expense_input, text_placeholder, expense_placeholder, words_remaining, .. } => {
            let _ = writeln!(out, "{}", date_label);
            let shown_text = if text.is_empty() { text_placeholder } else { text };
            let shown_expense = if expense_input.is_empty() { expense_placeholder } else { expense_input };
            let _ = writeln!(out, "  Text: {} ({} words left)", shown_text, words_remaining);
            let _ = writeln!(out, "  Expense: {}", shown_expense);
        }
    }
}

fn render_budget(out: &mut String, budget: &BudgetSummary, currency_symbol: &str) {
    let spent = format_amount(budget.total_expenses, currency_symbol);
    match budget.budget {
        Some(amount) if budget.has_budget() => {
            let _ = writeln!(
                out,
                "{} budget: {} of {} ({:.0}%)",
                budget.month_name,
                spent,
                format_amount(amount, currency_symbol),
                budget.percent
            );
        }
        _ => {
            let _ = writeln!(out, "{}: no budget set, spent {}", budget.month_name, spent);
        }
    }
}

/// Render one frame as text
pub fn render_view(view: &CalendarView, currency_symbol: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}    {}", view.month_label, view.time_label);
    render_grid(&mut out, view);
    render_panel(&mut out, &view.panel, currency_symbol);
    if let Some(budget) = &view.budget {
        render_budget(&mut out, budget, currency_symbol);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{CalendarDate, DayClassification, PanelEventLine};

    fn cell(day: u32, week_row: u32, weekday_col: u32, base: DayBaseClass, has_data: bool) -> CalendarCell {
        CalendarCell {
            date: CalendarDate::new(2024, 3, day),
            week_row,
            weekday_col,
            classification: DayClassification { base, has_data, removed: false },
        }
    }

    fn view(panel: PanelView, budget: Option<BudgetSummary>) -> CalendarView {
        CalendarView {
            year: 2024,
            month_index: 2,
            month_label: "3/2024".to_string(),
            time_label: "10:00:00".to_string(),
            cells: vec![
                cell(1, 0, 5, DayBaseClass::Past, false),
                cell(2, 0, 6, DayBaseClass::Today, false),
                cell(3, 1, 0, DayBaseClass::Future, true),
            ],
            panel,
            budget,
        }
    }

    #[test]
    fn test_renders_grid_rows() {
        let text = render_view(&view(PanelView::NoSelection, None), "$");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "3/2024    10:00:00");
        assert!(lines[1].starts_with("Sun"));
        assert!(lines[2].ends_with("  1 . [ 2]"));
        assert_eq!(lines[3], "  3 *");
        // March 2024 spans six week rows
        assert_eq!(lines.len(), 8);
        assert!(lines[4..].iter().all(|line| line.is_empty()));
    }

    #[test]
    fn test_renders_panel_and_budget() {
        let panel = PanelView::EventList {
            day: CalendarDate::new(2024, 3, 3),
            date_label: "Events of 3/3/2024".to_string(),
            events: vec![PanelEventLine { number: 1, text: "Concert".to_string(), expense: 45.0 }],
            total_expense: 45.0,
            can_remove: true,
        };
        let budget = BudgetSummary {
            month_index: 2,
            month_name: "March".to_string(),
            budget: Some(200.0),
            total_expenses: 50.0,
            total_income: 0.0,
            percent: 25.0,
        };

        let text = render_view(&view(panel, Some(budget)), "$");
        assert!(text.contains("  1. Concert ($45.00)"));
        assert!(text.contains("  Total: $45.00"));
        assert!(text.contains("March budget: $50.00 of $200.00 (25%)"));
    }

    #[test]
    fn test_renders_missing_budget() {
        let budget = BudgetSummary {
            month_index: 2,
            month_name: "March".to_string(),
            budget: None,
            total_expenses: 0.0,
            total_income: 0.0,
            percent: 0.0,
        };
        let text = render_view(&view(PanelView::NoSelection, Some(budget)), "$");
        assert!(text.contains("March: no budget set, spent $0.00"));
    }
}
