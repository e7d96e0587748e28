//! Tracing setup.

use std::io;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::LoggingConfig;

/// Install the global subscriber: stderr always, plus a daily file when
/// `log_dir` is set. Later calls are no-ops.
///
/// Keep the returned guard alive until exit; dropping it flushes the file log.
#[must_use = "dropping the guard stops the file writer"]
pub fn init_tracing(config: &LoggingConfig) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = fmt::layer().with_writer(io::stderr).with_target(false);

    let mut guard = None;
    let file_layer = config.log_dir.as_ref().map(|dir| {
        let appender = tracing_appender::rolling::daily(dir, "blueprint-assign.log");
        let (writer, file_guard) = tracing_appender::non_blocking(appender);
        guard = Some(file_guard);
        fmt::layer().with_writer(writer).with_ansi(false)
    });

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .is_ok();

    if !installed {
        return None;
    }
    tracing::debug!(log_dir = ?config.log_dir, "tracing initialized");
    guard
}
