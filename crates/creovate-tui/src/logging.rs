use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "CREOVATE_LOG";
const DEFAULT_FILTER: &str = "info";

pub fn log_path() -> Result<PathBuf> {
    let cache_dir = dirs::cache_dir().context("Could not find cache directory")?;
    Ok(cache_dir.join("creovate").join("creovate.log"))
}

/// Route `tracing` output to the log file. The terminal belongs to the UI,
/// so nothing is ever written to stdout or stderr.
pub fn init() -> Result<PathBuf> {
    let path = log_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!(e))?;

    Ok(path)
}
