use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

pub const EVENTS_FILE: &str = "events.csv";
pub const BUDGETS_FILE: &str = "budgets.yaml";
pub const INCOME_FILE: &str = "income.csv";
pub const EXPENSES_FILE: &str = "expenses.csv";

pub const EVENTS_HEADER: [&str; 5] = ["id", "date", "text", "expense", "created_at"];
pub const INCOME_HEADER: [&str; 4] = ["id", "description", "amount", "created_at"];
pub const EXPENSES_HEADER: [&str; 6] = ["category_id", "title", "color", "item_id", "amount", "created_at"];

/// Timestamp layout used in every CSV file
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// CsvConnection manages file paths inside the data directory and makes sure
/// the files exist before they are read
#[derive(Debug, Clone)]
pub struct CsvConnection {
    base_directory: Arc<PathBuf>,
}

impl CsvConnection {
    /// Create a new CSV connection with a base directory
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
            info!("Created data directory {}", base_path.display());
        }

        Ok(Self {
            base_directory: Arc::new(base_path),
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn events_file_path(&self) -> PathBuf {
        self.base_directory.join(EVENTS_FILE)
    }

    pub fn budgets_file_path(&self) -> PathBuf {
        self.base_directory.join(BUDGETS_FILE)
    }

    pub fn income_file_path(&self) -> PathBuf {
        self.base_directory.join(INCOME_FILE)
    }

    pub fn expenses_file_path(&self) -> PathBuf {
        self.base_directory.join(EXPENSES_FILE)
    }

    /// Create `path` containing only the header row if it does not exist yet
    pub fn ensure_csv_file_exists(&self, path: &Path, header: &[&str]) -> Result<()> {
        if path.exists() {
            return Ok(());
        }
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(header)?;
        writer.flush()?;
        info!("Created {}", path.display());
        Ok(())
    }
}
