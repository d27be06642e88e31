use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use csv::{Reader, Writer};
use shared::{CalendarDate, DayEvent};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::connection::{CsvConnection, EVENTS_HEADER, TIMESTAMP_FORMAT};
use crate::clock::{commit_stamp, Clock, SystemClock};
use crate::storage::traits::EventStorage;

/// CSV-based day event repository (`events.csv`)
#[derive(Debug, Clone)]
pub struct CsvEventRepository {
    connection: CsvConnection,
    clock: Arc<dyn Clock>,
}

impl CsvEventRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self::with_clock(connection, Arc::new(SystemClock))
    }

    /// Stamp new events from `clock`
    pub fn with_clock(connection: CsvConnection, clock: Arc<dyn Clock>) -> Self {
        Self { connection, clock }
    }

    /// Read every event from the file. Rows that cannot be parsed are skipped
    /// with a warning rather than failing the whole read.
    fn read_events(&self) -> Result<Vec<DayEvent>> {
        let file_path = self.connection.events_file_path();
        self.connection.ensure_csv_file_exists(&file_path, &EVENTS_HEADER)?;

        let file = File::open(&file_path)?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut events = Vec::new();
        for (row, result) in csv_reader.records().enumerate() {
            let record = result?;
            let parsed = (
                CalendarDate::parse_key(record.get(1).unwrap_or("")),
                record.get(3).unwrap_or("").parse::<f64>().ok(),
                record.get(4).unwrap_or("").parse::<NaiveDateTime>().ok(),
            );

            match parsed {
                (Some(date), Some(expense), Some(created_at)) => events.push(DayEvent {
                    id: record.get(0).unwrap_or("").to_string(),
                    date,
                    text: record.get(2).unwrap_or("").to_string(),
                    expense,
                    created_at,
                }),
                _ => warn!("Skipping malformed event row {} in {}", row + 1, file_path.display()),
            }
        }

        Ok(events)
    }

    /// Rewrite the file through a temp file and rename
    fn write_events(&self, events: &[DayEvent]) -> Result<()> {
        let file_path = self.connection.events_file_path();
        let temp_path = file_path.with_extension("tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;
            let mut csv_writer = Writer::from_writer(BufWriter::new(file));

            csv_writer.write_record(EVENTS_HEADER)?;
            for event in events {
                csv_writer.write_record([
                    event.id.as_str(),
                    event.date.key().as_str(),
                    event.text.as_str(),
                    event.expense.to_string().as_str(),
                    event.created_at.format(TIMESTAMP_FORMAT).to_string().as_str(),
                ])?;
            }
            csv_writer.flush()?;
        }

        std::fs::rename(&temp_path, &file_path)
            .with_context(|| format!("replacing {}", file_path.display()))?;
        Ok(())
    }
}

#[async_trait]
impl EventStorage for CsvEventRepository {
    async fn get_events_for_month(&self, year: i32, month_index: u32) -> Result<Vec<DayEvent>> {
        let events = self.read_events()?;
        Ok(events
            .into_iter()
            .filter(|event| event.date.year == year && event.date.month_index() == month_index)
            .collect())
    }

    async fn add_event(&self, date: CalendarDate, text: &str, expense: f64) -> Result<DayEvent> {
        let mut events = self.read_events()?;
        let latest = events.iter().map(|event| event.created_at).max();
        let event = DayEvent {
            id: format!("event::{}", Uuid::new_v4()),
            date,
            text: text.to_string(),
            expense,
            created_at: commit_stamp(self.clock.as_ref(), latest),
        };
        events.push(event.clone());
        self.write_events(&events)?;
        info!("Stored event {} on {}", event.id, date);
        Ok(event)
    }

    async fn delete_event(&self, event_id: &str) -> Result<bool> {
        let mut events = self.read_events()?;
        let before = events.len();
        events.retain(|event| event.id != event_id);
        if events.len() == before {
            return Ok(false);
        }
        self.write_events(&events)?;
        info!("Deleted event {}", event_id);
        Ok(true)
    }
}
