use crate::config::{LogRotation, LoggingConfig};
use anyhow::Result;
use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::EnvFilter;

/// Base name of rolling log files
const LOG_FILE_NAME: &str = "anaphora-rs.log";

/// Initializes the global tracing subscriber.
///
/// Console output goes to stderr so stdout stays free for command results.
/// When file output is enabled the returned guard must be held until exit,
/// otherwise buffered lines are lost. With both sinks off no subscriber is
/// installed.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let (writer, guard) = match (config.console, config.file) {
        (true, true) => {
            let (file, guard) = file_writer(config)?;
            (BoxMakeWriter::new(std::io::stderr.and(file)), Some(guard))
        }
        (false, true) => {
            let (file, guard) = file_writer(config)?;
            (BoxMakeWriter::new(file), Some(guard))
        }
        (true, false) => (BoxMakeWriter::new(std::io::stderr), None),
        // Logging disabled: no subscriber, events are dropped
        (false, false) => return Ok(None),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_filter(&config.level))
        .with_writer(writer)
        .with_ansi(!config.file)
        .with_target(true);
    if config.json {
        builder.json().init();
    } else {
        builder.init();
    }

    tracing::debug!(
        level = %config.level,
        console = config.console,
        file = config.file,
        json = config.json,
        log_dir = %config.log_dir.display(),
        "logging initialized"
    );
    Ok(guard)
}

/// Parses a filter directive, falling back to `info`
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}

fn file_writer(config: &LoggingConfig) -> Result<(non_blocking::NonBlocking, WorkerGuard)> {
    ensure_log_dir(&config.log_dir)?;
    let appender = match config.rotation {
        LogRotation::Daily => rolling::daily(&config.log_dir, LOG_FILE_NAME),
        LogRotation::Hourly => rolling::hourly(&config.log_dir, LOG_FILE_NAME),
        LogRotation::Never => rolling::never(&config.log_dir, LOG_FILE_NAME),
    };
    Ok(non_blocking(appender))
}

/// Creates the log directory if needed
fn ensure_log_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}
