//! Tracing setup.
//!
//! The TUI owns the terminal, so interactive sessions log to a file; text and
//! JSON modes log to stderr and keep stdout clean for their output.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides `--log-level`.
pub const LOG_ENV: &str = "SORT_VISUALIZER_LOG";

pub enum LogTarget<'a> {
    Stderr,
    File(Option<&'a Path>),
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn default_log_file() -> Result<PathBuf> {
    Ok(crate::storage::log_dir()?.join("sort-visualizer.log"))
}

/// Install the global subscriber. Returns the log file path when logging to a file.
pub fn init(level: &str, target: LogTarget<'_>) -> Result<Option<PathBuf>> {
    match target {
        LogTarget::Stderr => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter(level))
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| anyhow::anyhow!("install tracing subscriber: {e}"))?;
            Ok(None)
        }
        LogTarget::File(path) => {
            let path = match path {
                Some(p) => p.to_path_buf(),
                None => default_log_file()?,
            };
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create log directory {}", parent.display()))?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(env_filter(level))
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .try_init()
                .map_err(|e| anyhow::anyhow!("install tracing subscriber: {e}"))?;
            Ok(Some(path))
        }
    }
}
