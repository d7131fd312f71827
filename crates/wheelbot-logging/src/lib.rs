//! # wheelbot-logging
//!
//! Logging for the wheelbot survey service.
//!
//! ## Key Types
//!
//! - [`Logger`] - Structured survey event logging
//! - [`LogEvent`] - Log event types
//! - [`LogFormat`] - Output formats (Pretty, JSON, Compact)
//!
//! User ids never reach the logs directly; events carry [`user_ref`] instead.

mod events;

pub use events::{user_ref, LogEvent, LogFormat, Logger};

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing for the application
pub fn init_tracing(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_target(false))
                .init();
        }
        LogFormat::Pretty | LogFormat::Compact => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
                .init();
        }
    }
}

/// Initialize tracing with an additional daily-rolling JSON file under `dir`.
///
/// Keep the returned guard alive for the life of the process or buffered
/// lines are lost.
pub fn init_tracing_with_file(level: &str, format: LogFormat, dir: &Path) -> WorkerGuard {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let appender = tracing_appender::rolling::daily(dir, "wheelbot.log");
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_target(false))
                .with(fmt::layer().json().with_target(false).with_writer(file_writer))
                .init();
        }
        LogFormat::Pretty | LogFormat::Compact => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
                .with(fmt::layer().json().with_target(false).with_writer(file_writer))
                .init();
        }
    }
    guard
}
