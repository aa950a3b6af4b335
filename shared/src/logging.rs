//! Shared logging utilities for consistent tracing across harness runs

use chrono::{DateTime, Utc};
use tracing::{error, info};

/// Build the filter directive used by the harness subscriber
pub fn filter_directive(log_level: Option<&str>) -> String {
    let base_level = log_level.unwrap_or("info");
    format!("harness={base_level},shared={base_level}")
}

/// Initialize the tracing subscriber for a harness binary or test run
///
/// Safe to call more than once: later calls are ignored so that every test
/// can request logging without coordinating with the others.
pub fn init_tracing(log_level: Option<&str>) {
    use tracing_subscriber::{EnvFilter, fmt};

    let env_filter = EnvFilter::new(filter_directive(log_level));

    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_test_writer()
        .try_init();
}

/// Get formatted timestamp for consistent logging
pub fn format_timestamp() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.format("%H:%M:%S%.3f").to_string()
}

/// Macro for case-aware info logging
#[macro_export]
macro_rules! case_info {
    ($case_id:expr, $($arg:tt)*) => {
        $crate::tracing::info!(
            case = %$case_id,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for case-aware warning logging
#[macro_export]
macro_rules! case_warn {
    ($case_id:expr, $($arg:tt)*) => {
        $crate::tracing::warn!(
            case = %$case_id,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for case-aware debug logging
#[macro_export]
macro_rules! case_debug {
    ($case_id:expr, $($arg:tt)*) => {
        $crate::tracing::debug!(
            case = %$case_id,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Contextual logging helper for error conditions
pub fn log_error(case_id: &str, context: &str, error: &dyn std::fmt::Display) {
    error!(
        case = %case_id,
        timestamp = format_timestamp(),
        error = %error,
        "❌ {} failed: {}",
        context,
        error
    );
}

/// Contextual logging helper for success conditions
pub fn log_success(case_id: &str, message: &str) {
    info!(
        case = %case_id,
        timestamp = format_timestamp(),
        "✅ {}",
        message
    );
}
