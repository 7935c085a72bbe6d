//! Logging initialization for jx402.
//!
//! Dashboard mode: logs to `.jx402/logs/jx402-{datetime}.log`
//! CLI mode: logs to stderr

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

/// Result of logging initialization
pub struct LoggingHandle {
    /// Guard that must be kept alive for the duration of the program.
    /// When dropped, ensures all buffered logs are flushed.
    pub _guard: Option<WorkerGuard>,

    /// Path to the log file (only set in dashboard mode with file logging enabled)
    pub log_file_path: Option<PathBuf>,
}

/// Filter directive: `RUST_LOG` wins, then `--debug`, then config
fn filter_directive(config: &Config, debug_override: bool, rust_log: Option<String>) -> String {
    rust_log.unwrap_or_else(|| {
        if debug_override {
            "debug".to_string()
        } else {
            config.logging.level.clone()
        }
    })
}

/// Log file path for a session started at `timestamp`
fn log_file_path(logs_dir: &Path, timestamp: chrono::DateTime<chrono::Utc>) -> PathBuf {
    logs_dir.join(format!("jx402-{}.log", timestamp.format("%Y%m%dT%H%M%SZ")))
}

/// Initialize logging based on mode and configuration.
///
/// # Arguments
/// * `config` - Application configuration
/// * `is_tui_mode` - Whether the dashboard is about to take over the terminal
/// * `debug_override` - If true, override log level to "debug" (from --debug flag)
pub fn init_logging(
    config: &Config,
    is_tui_mode: bool,
    debug_override: bool,
) -> Result<LoggingHandle> {
    let directive = filter_directive(config, debug_override, std::env::var("RUST_LOG").ok());
    let filter = tracing_subscriber::EnvFilter::new(directive);

    if is_tui_mode && config.logging.to_file {
        // Stderr would corrupt the alternate screen, so write to a file
        let logs_dir = config.logs_path();
        std::fs::create_dir_all(&logs_dir)?;

        let log_file_path = log_file_path(&logs_dir, chrono::Utc::now());
        let log_filename = log_file_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "jx402.log".to_string());

        let file_appender = tracing_appender::rolling::never(&logs_dir, &log_filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false) // No ANSI codes in log files
                    .with_writer(non_blocking),
            )
            .init();

        Ok(LoggingHandle {
            _guard: Some(guard),
            log_file_path: Some(log_file_path),
        })
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();

        Ok(LoggingHandle {
            _guard: None,
            log_file_path: None,
        })
    }
}
