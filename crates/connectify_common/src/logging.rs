//! Logging utilities for the Connectify application.
//!
//! Sets up the `tracing` subscriber once per process: an `EnvFilter` that
//! honours `RUST_LOG`, a formatted stdout layer and, when configured, a daily
//! rolling log file.

use connectify_config::LoggingConfig;
use std::str::FromStr;
use tracing::{info, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber at INFO level.
///
/// # Examples
///
/// ```
/// use connectify_common::logging;
///
/// logging::init();
/// ```
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber with a specific log level.
pub fn init_with_level(level: Level) {
    let result = tracing_subscriber::registry()
        .with(stdout_layer())
        .with(filter_for(level))
        .try_init();

    // A subscriber may already be installed (tests, embedding); that is fine.
    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}

/// Initialize logging from the `logging` section of the configuration.
///
/// Returns the guard of the file writer when a log directory is configured;
/// keep it alive for as long as logs should be flushed to the file.
pub fn init_from_config(config: Option<&LoggingConfig>) -> Option<WorkerGuard> {
    let level = config
        .and_then(|c| c.level.as_deref())
        .and_then(|l| Level::from_str(l).ok())
        .unwrap_or(Level::INFO);

    let Some(directory) = config.and_then(|c| c.directory.as_deref()) else {
        init_with_level(level);
        return None;
    };

    let prefix = config
        .and_then(|c| c.file_prefix.as_deref())
        .unwrap_or("connectify.log");
    let appender = tracing_appender::rolling::daily(directory, prefix);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let result = tracing_subscriber::registry()
        .with(stdout_layer())
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .with(filter_for(level))
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level {} (file: {}/{})", level, directory, prefix);
    }
    Some(guard)
}

fn stdout_layer<S>() -> impl tracing_subscriber::Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
}

fn filter_for(level: Level) -> EnvFilter {
    let filter = EnvFilter::from_default_env();
    match format!("connectify={}", level).parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

/// Log a result, with different messages for success and error cases.
///
/// Returns the original result so it can be used in a chain.
pub fn log_result<T, E: std::fmt::Display>(
    result: Result<T, E>,
    success_message: &str,
    error_context: &str,
) -> Result<T, E> {
    match &result {
        Ok(_) => info!("{}", success_message),
        Err(e) => tracing::error!("{}: {}", error_context, e),
    }
    result
}
