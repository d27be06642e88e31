//! # Configuration
//!
//! Runtime settings for the calendar engine, stored as YAML next to the data
//! files (`calendar_config.yaml`). A missing file means defaults.
//!
//! ```yaml
//! tick_interval_ms: 1000
//! max_event_chars: 60
//! max_event_words: 5
//! currency_symbol: "$"
//! data_directory: "/home/me/Documents/Expense Calendar"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

pub const CONFIG_FILE_NAME: &str = "calendar_config.yaml";
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_MAX_EVENT_CHARS: usize = 60;
pub const DEFAULT_MAX_EVENT_WORDS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// How often the clock ticks and the view is re-derived
    pub tick_interval_ms: u64,
    /// Maximum characters in an event description
    pub max_event_chars: usize,
    /// Maximum words in an event description
    pub max_event_words: usize,
    /// Symbol stripped from amount input and used when formatting amounts
    pub currency_symbol: String,
    /// Where the on-disk repositories keep their files
    pub data_directory: Option<PathBuf>,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            max_event_chars: DEFAULT_MAX_EVENT_CHARS,
            max_event_words: DEFAULT_MAX_EVENT_WORDS,
            currency_symbol: "$".to_string(),
            data_directory: None,
        }
    }
}

impl CalendarConfig {
    /// Load `calendar_config.yaml` from `directory`, falling back to defaults
    /// when the file does not exist
    pub fn load_from_directory<P: AsRef<Path>>(directory: P) -> Result<Self> {
        let config_path = directory.as_ref().join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            info!("No config file at {:?}, using defaults", config_path);
            return Ok(Self::default());
        }

        let yaml_content = fs::read_to_string(&config_path)
            .with_context(|| format!("reading {}", config_path.display()))?;
        let config: CalendarConfig = serde_yaml::from_str(&yaml_content)
            .with_context(|| format!("parsing {}", config_path.display()))?;
        debug!("Loaded config from {:?}: {:?}", config_path, config);
        Ok(config)
    }

    /// Write this config as `calendar_config.yaml` inside `directory`
    pub fn save_to_directory<P: AsRef<Path>>(&self, directory: P) -> Result<()> {
        let directory = directory.as_ref();
        fs::create_dir_all(directory)?;
        let config_path = directory.join(CONFIG_FILE_NAME);
        let temp_path = config_path.with_extension("tmp");
        fs::write(&temp_path, serde_yaml::to_string(self)?)?;
        fs::rename(&temp_path, &config_path)?;
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    /// Configured data directory, or `~/Documents/Expense Calendar`
    pub fn resolve_data_directory(&self) -> Result<PathBuf> {
        if let Some(directory) = &self.data_directory {
            return Ok(directory.clone());
        }
        default_data_directory()
    }
}

/// `~/Documents/Expense Calendar`, or `~/Expense Calendar` when the platform
/// has no documents folder
pub fn default_data_directory() -> Result<PathBuf> {
    let base = dirs::document_dir()
        .or_else(dirs::home_dir)
        .context("Could not determine home directory")?;
    Ok(base.join("Expense Calendar"))
}
