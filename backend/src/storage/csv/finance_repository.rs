use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use csv::Reader;
use shared::{ExpenseCategory, ExpenseItem, IncomeRecord};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::warn;

use super::connection::{CsvConnection, EXPENSES_HEADER, INCOME_HEADER};
use crate::storage::traits::FinanceStorage;

/// Read-only access to `income.csv` and `expenses.csv`.
///
/// Expense rows are flattened: one row per item, repeating the category
/// columns. Rows are grouped back into categories in first-seen order.
#[derive(Debug, Clone)]
pub struct CsvFinanceRepository {
    connection: CsvConnection,
}

impl CsvFinanceRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn open_reader(&self, path: &Path, header: &[&str]) -> Result<Reader<BufReader<File>>> {
        self.connection.ensure_csv_file_exists(path, header)?;
        Ok(Reader::from_reader(BufReader::new(File::open(path)?)))
    }
}

fn parse_amount(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|value| value.trim().parse::<f64>().ok())
}

fn parse_timestamp(raw: Option<&str>) -> Option<NaiveDateTime> {
    raw.and_then(|value| value.trim().parse::<NaiveDateTime>().ok())
}

#[async_trait]
impl FinanceStorage for CsvFinanceRepository {
    async fn list_income(&self) -> Result<Vec<IncomeRecord>> {
        let path = self.connection.income_file_path();
        let mut reader = self.open_reader(&path, &INCOME_HEADER)?;

        let mut income = Vec::new();
        for result in reader.records() {
            let record = result?;
            match (parse_amount(record.get(2)), parse_timestamp(record.get(3))) {
                (Some(amount), Some(created_at)) => income.push(IncomeRecord {
                    id: record.get(0).unwrap_or("").to_string(),
                    description: record.get(1).unwrap_or("").to_string(),
                    amount,
                    created_at,
                }),
                _ => warn!("Skipping malformed income row {:?}", record),
            }
        }
        Ok(income)
    }

    async fn list_expenses(&self) -> Result<Vec<ExpenseCategory>> {
        let path = self.connection.expenses_file_path();
        let mut reader = self.open_reader(&path, &EXPENSES_HEADER)?;

        let mut categories: Vec<ExpenseCategory> = Vec::new();
        for result in reader.records() {
            let record = result?;
            let (Some(amount), Some(created_at)) =
                (parse_amount(record.get(4)), parse_timestamp(record.get(5)))
            else {
                warn!("Skipping malformed expense row {:?}", record);
                continue;
            };

            let category_id = record.get(0).unwrap_or("");
            let item = ExpenseItem {
                id: record.get(3).unwrap_or("").to_string(),
                amount,
                created_at,
            };

            match categories.iter_mut().find(|category| category.id == category_id) {
                Some(category) => category.items.push(item),
                None => categories.push(ExpenseCategory {
                    id: category_id.to_string(),
                    title: record.get(1).unwrap_or("").to_string(),
                    color: record.get(2).unwrap_or("").to_string(),
                    items: vec![item],
                }),
            }
        }
        Ok(categories)
    }
}
