use crate::model::SortRun;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Write a run as pretty JSON, creating parent directories as needed.
pub fn export_json(path: &Path, run: &SortRun) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let data = serde_json::to_vec_pretty(run).context("serialize run")?;
    std::fs::write(path, data).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Default file name for a run, e.g. `sort-visualizer-quick-sort-2024-05-01_12-00-00Z.json`.
pub fn default_export_name(run: &SortRun) -> String {
    format!(
        "sort-visualizer-{}-{}.json",
        run.algorithm.slug(),
        run.timestamp_utc.replace(':', "-").replace('T', "_")
    )
}

/// Export into the current directory under the default name.
/// Returns the absolute path of the written file.
pub fn export_to_current_dir(run: &SortRun) -> Result<PathBuf> {
    let current_dir = std::env::current_dir().context("get current directory")?;
    let path = current_dir.join(default_export_name(run));
    export_json(&path, run)?;
    Ok(path)
}

/// Directory used for the TUI log file.
pub fn log_dir() -> Result<PathBuf> {
    let base = dirs::cache_dir()
        .or_else(dirs::data_local_dir)
        .context("no cache directory available")?;
    Ok(base.join("sort-visualizer-cli"))
}
