//! # diffline-logging
//!
//! Tracing setup for diffline.
//!
//! Logs never go to stdout, which belongs to the status display. They go
//! to stderr, or to a file when one is configured.
//!
//! ## Log Formats
//!
//! - `Pretty` - Human-readable multi-line output
//! - `JSON` - Structured JSON lines
//! - `Compact` - Minimal single-line output

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format
    Pretty,
    /// JSON lines format for machine consumption
    Json,
    /// Compact single-line format
    #[default]
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// Initialize tracing for the application.
///
/// `RUST_LOG` takes precedence over `level`. When `log_file` is set, logs
/// are appended to that file through a non-blocking writer; keep the
/// returned guard alive until exit or buffered lines are lost.
pub fn init_tracing(
    level: &str,
    format: LogFormat,
    log_file: Option<&Path>,
) -> std::io::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (writer, guard) = match log_file {
        Some(path) => {
            let dir = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            };
            std::fs::create_dir_all(dir)?;
            let file_name = path
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_else(|| "diffline.log".into());
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (fmt::writer::BoxMakeWriter::new(writer), Some(guard))
        }
        None => (fmt::writer::BoxMakeWriter::new(std::io::stderr), None),
    };
    let ansi = log_file.is_none();

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_target(false).with_writer(writer))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .pretty()
                        .with_target(false)
                        .with_ansi(ansi)
                        .with_writer(writer),
                )
                .init();
        }
        LogFormat::Compact => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .compact()
                        .with_target(false)
                        .with_ansi(ansi)
                        .with_writer(writer),
                )
                .init();
        }
    }

    Ok(guard)
}
