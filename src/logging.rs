use std::env;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Log to stdout (pretty, ANSI) and to a file (plain). Filter comes from the
/// `TRACING_LEVEL` environment variable, the file target from `LOG_FILE_PATH`.
pub fn init_logger() -> impl Drop {
    let filter_layer =
        EnvFilter::new(env::var("TRACING_LEVEL").unwrap_or_else(|_| "info".to_string()));

    let log_file_path =
        env::var("LOG_FILE_PATH").unwrap_or_else(|_| "./logs/test-reorg.log".to_string());

    let file_appender = tracing_appender::rolling::never("./", log_file_path);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stdout)
                .pretty()
                .with_file(false)
                .without_time()
                .with_ansi(true),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .with(filter_layer)
        .init();

    info!("Tracing is configured for stdout and file logging.");

    guard
}
