//! Log setup. The terminal belongs to the UI, so all output goes to a file.
//!
//! Call [`init`] once at start-up and keep the returned guard alive until
//! the terminal is restored; dropping it flushes the background writer.

use std::fs;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::error::{AppError, Result};

pub const LOG_FILE_NAME: &str = "cide.log";

/// Keeps the non-blocking writer alive.
pub struct LogGuard {
    _guard: WorkerGuard,
    path: PathBuf,
}

impl LogGuard {
    /// Full path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Filter from `RUST_LOG` if set, otherwise `default_directive`.
fn build_filter(rust_log: Option<String>, default_directive: &str) -> EnvFilter {
    rust_log
        .and_then(|val| EnvFilter::try_new(val).ok())
        .or_else(|| EnvFilter::try_new(default_directive).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Install the global subscriber writing to `<dir>/cide.log`.
pub fn init(dir: &Path, level: &str) -> Result<LogGuard> {
    fs::create_dir_all(dir)?;
    let path = dir.join(LOG_FILE_NAME);
    let file = fs::OpenOptions::new().create(true).append(true).open(&path)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(build_filter(std::env::var("RUST_LOG").ok(), level))
        .with(file_layer)
        .try_init()
        .map_err(|e| AppError::Config(format!("logging already initialised: {}", e)))?;

    Ok(LogGuard {
        _guard: guard,
        path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rust_log_wins_over_default() {
        let filter = build_filter(Some("cloud_ide=trace".into()), "warn");
        assert_eq!(filter.to_string(), "cloud_ide=trace");
    }

    #[test]
    fn default_directive_used_without_rust_log() {
        let filter = build_filter(None, "debug");
        assert_eq!(filter.to_string(), "debug");
    }

    #[test]
    fn malformed_directive_falls_back_to_info() {
        let filter = build_filter(None, "cloud_ide=loud");
        assert_eq!(filter.to_string(), "info");
    }
}
