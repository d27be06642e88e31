//! Month budgets stored as a single YAML file (`budgets.yaml`).
//!
//! ```yaml
//! budgets:
//!   - month: 0
//!     amount: 1200.0
//!   - month: 2
//!     amount: 950.0
//! updated_at: "2024-03-15T10:30:00+00:00"
//! ```
//!
//! Months without an entry have no budget; an entry with amount 0 is kept as is.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use shared::MonthBudget;
use std::fs;
use tracing::{debug, info};

use super::connection::CsvConnection;
use crate::storage::traits::BudgetStorage;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct BudgetFile {
    #[serde(default)]
    budgets: Vec<MonthBudget>,
    #[serde(default)]
    updated_at: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CsvBudgetRepository {
    connection: CsvConnection,
}

impl CsvBudgetRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn load(&self) -> Result<BudgetFile> {
        let path = self.connection.budgets_file_path();
        if !path.exists() {
            return Ok(BudgetFile::default());
        }
        let yaml_content = fs::read_to_string(&path)?;
        let file: BudgetFile = serde_yaml::from_str(&yaml_content)
            .with_context(|| format!("parsing {}", path.display()))?;
        debug!("Loaded {} budgets from {:?}", file.budgets.len(), path);
        Ok(file)
    }

    fn save(&self, file: &BudgetFile) -> Result<()> {
        let path = self.connection.budgets_file_path();
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, serde_yaml::to_string(file)?)?;
        fs::rename(&temp_path, &path)?;
        Ok(())
    }
}

#[async_trait]
impl BudgetStorage for CsvBudgetRepository {
    async fn get_budget(&self, month_index: u32) -> Result<Option<f64>> {
        Ok(self
            .load()?
            .budgets
            .iter()
            .find(|budget| budget.month == month_index)
            .map(|budget| budget.amount))
    }

    async fn set_budget(&self, month_index: u32, amount: f64) -> Result<()> {
        let mut file = self.load()?;
        match file.budgets.iter_mut().find(|budget| budget.month == month_index) {
            Some(existing) => existing.amount = amount,
            None => file.budgets.push(MonthBudget { month: month_index, amount }),
        }
        file.budgets.sort_by_key(|budget| budget.month);
        file.updated_at = Some(Utc::now().to_rfc3339());
        self.save(&file)?;
        info!("Stored budget {:.2} for month {}", amount, month_index);
        Ok(())
    }
}
