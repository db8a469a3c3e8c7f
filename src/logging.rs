//! Logging configuration
//!
//! The terminal belongs to the TUI, so all output goes to a log file.
//! `RUST_LOG` takes precedence over the configured filter.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

pub const LOG_FILE: &str = "casebook.log";
const DEFAULT_FILTER: &str = "casebook=info,warn";

/// Default log directory, e.g. `~/.local/share/casebook/logs` on Linux.
pub fn default_log_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "casebook").map(|dirs| dirs.data_local_dir().join("logs"))
}

/// Resolve the directory logs should go to, honoring the config override.
pub fn log_dir(config: &LoggingConfig, workspace: &Path) -> PathBuf {
    match &config.directory {
        Some(dir) if dir.is_absolute() => dir.clone(),
        Some(dir) => workspace.join(dir),
        None => default_log_dir().unwrap_or_else(|| workspace.join(".casebook").join("logs")),
    }
}

/// Install the global subscriber. Keep the returned guard alive until exit so
/// buffered lines are flushed.
pub fn init(config: &LoggingConfig, workspace: &Path) -> Result<(WorkerGuard, PathBuf)> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(config.filter.as_deref().unwrap_or(DEFAULT_FILTER))
    });

    let dir = log_dir(config, workspace);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;

    let path = dir.join(LOG_FILE);
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false),
        )
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok((guard, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_directory_is_resolved_against_workspace() {
        let config = LoggingConfig {
            directory: Some(PathBuf::from("logs")),
            filter: None,
        };
        assert_eq!(log_dir(&config, Path::new("/work")), PathBuf::from("/work/logs"));
    }

    #[test]
    fn absolute_directory_is_kept() {
        let config = LoggingConfig {
            directory: Some(PathBuf::from("/var/log/casebook")),
            filter: None,
        };
        assert_eq!(
            log_dir(&config, Path::new("/work")),
            PathBuf::from("/var/log/casebook")
        );
    }
}
