use std::path::Path;

use fmt::format::FmtSpan;
use predizer_error::FatalError;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub const DEFAULT_FILTER: &str = "info,hyper_util=warn,reqwest=warn";
pub const LOG_FILE_NAME: &str = "predizer.log";

/// Keeps the non-blocking log writer flushing; drop it last.
pub struct LoggingGuards {
    pub main: WorkerGuard,
}

/// Install the global subscriber: `RUST_LOG` filter, daily-rolling file in `log_dir`.
///
/// Stdout belongs to the result element, so nothing is logged there.
pub fn init_tracing(log_dir: &Path) -> predizer_error::Result<LoggingGuards> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    std::fs::create_dir_all(log_dir).map_err(|source| FatalError::FileOperation {
        operation: "create log directory",
        path: log_dir.to_path_buf(),
        source,
    })?;
    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_NAME);
    let (non_blocking_file, main_guard) = tracing_appender::non_blocking(file_appender);

    let main_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(false)
        .with_writer(non_blocking_file);

    // try_init: a subscriber may already be installed (tests, embedding applications)
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(main_layer)
        .try_init();

    Ok(LoggingGuards { main: main_guard })
}

/// Subscriber for tests: stderr only, so failures print captured diagnostics.
pub fn init_tracing_tests(level: Level) {
    let env_filter = format!("{level},hyper_util=error,reqwest=error,httpmock=error");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&env_filter));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .without_time()
        .with_line_number(true)
        .with_thread_ids(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_test_writer();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init();
}
