mod config;
pub mod database;
pub mod migrations;

pub use config::{Config, LogConfig, OutputConfig, ReviewConfig};
pub use database::{Database, ImportSummary, LogMaintenance, TodayLog};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the data directory, creating it if needed.
///
/// `LIFESTYLE_DATA_DIR` wins when set. Otherwise `~/.config/lifestyle[-dev]/`
/// based on `LIFESTYLE_ENV` (set `LIFESTYLE_ENV=dev` for the development
/// directory).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("LIFESTYLE_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("LIFESTYLE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("lifestyle-dev")
            } else {
                base_dir.join("lifestyle")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
