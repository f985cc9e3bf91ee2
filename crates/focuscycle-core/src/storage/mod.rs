mod config;

pub use config::{Config, TimerConfig, UiConfig};

use std::path::PathBuf;

use crate::error::Result;

/// Returns the focuscycle data directory.
///
/// `FOCUSCYCLE_HOME` wins if set. Otherwise `~/.config/focuscycle[-dev]/`
/// based on FOCUSCYCLE_ENV (set FOCUSCYCLE_ENV=dev for a development
/// directory).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("FOCUSCYCLE_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("FOCUSCYCLE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("focuscycle-dev")
            } else {
                base_dir.join("focuscycle")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
