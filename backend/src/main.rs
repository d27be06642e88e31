use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use expense_calendar_backend::clock::{start_ticker, Clock, SystemClock};
use expense_calendar_backend::config::{default_data_directory, CalendarConfig, CONFIG_FILE_NAME};
use expense_calendar_backend::initialize_backend;
use expense_calendar_backend::io::{render_view, LogNotifier};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Month calendar with day events, expenses and budget progress
#[derive(Parser, Debug)]
#[command(name = "expense-calendar")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Print each frame as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Render a single frame and exit
    #[arg(long)]
    once: bool,

    /// Directory holding the config and data files
    #[arg(long, value_name = "PATH", env = "EXPENSE_CALENDAR_DIR")]
    data_dir: Option<PathBuf>,
}

/// Load the config from `directory`, writing the defaults there on first run
fn load_config(directory: PathBuf) -> Result<CalendarConfig> {
    let mut config = CalendarConfig::load_from_directory(&directory)?;
    if !directory.join(CONFIG_FILE_NAME).exists() {
        config.save_to_directory(&directory)?;
        info!("Wrote default config to {}", directory.display());
    }
    if config.data_directory.is_none() {
        config.data_directory = Some(directory);
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config_directory = match cli.data_dir {
        Some(directory) => directory,
        None => default_data_directory()?,
    };
    let config = load_config(config_directory)?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let mut app = initialize_backend(config, clock.clone(), Arc::new(LogNotifier)).await?;

    let (subscription, mut ticks) = start_ticker(clock, app.config.tick_interval());
    info!("Calendar running, press Ctrl+C to stop");

    loop {
        tokio::select! {
            tick = ticks.recv() => {
                let Some(now) = tick else { break };
                let view = app.controller.on_tick(now).await;
                if cli.json {
                    println!("{}", serde_json::to_string(&view)?);
                } else {
                    println!("{}", render_view(&view, &app.config.currency_symbol));
                }
                if cli.once {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
        }
    }

    subscription.cancel();
    Ok(())
}
