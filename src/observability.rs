use std::time::Duration;

use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::protocol::Usage;

/// Initialize the tracing subscriber with the configured log level.
///
/// Maps application log levels to tracing levels:
/// - "DISABLED" -> no subscriber installed
/// - "WARNING" -> WARN
/// - "CRITICAL" -> ERROR
/// - Others map directly (DEBUG, INFO, ERROR)
pub fn init_tracing(log_level: &str) {
    let level = log_level.to_uppercase();

    if level == "DISABLED" {
        return;
    }

    let tracing_level = match level.as_str() {
        "WARNING" => "WARN",
        "CRITICAL" => "ERROR",
        other => other,
    };

    let filter = EnvFilter::try_new(tracing_level).unwrap_or_else(|_| EnvFilter::new("INFO"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// Log usage for a completed stream at DEBUG level.
pub fn log_stream_complete(usage: Option<&Usage>, duration: Duration) {
    debug!(
        prompt_tokens = usage.and_then(|u| u.prompt_tokens).unwrap_or(0),
        completion_tokens = usage.and_then(|u| u.completion_tokens).unwrap_or(0),
        total_tokens = usage.and_then(|u| u.total_tokens).unwrap_or(0),
        duration_seconds = duration.as_secs_f64(),
        "stream completed"
    );
}
