//! Logging and tracing initialization.

use std::io;
use std::path::Path;

use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::config::LoggingConfig;

/// Initialize the tracing subscriber with the given configuration.
///
/// Events go to stderr, never stdout: stdout belongs to the wire when
/// streaming, and mixing the two corrupts the frame stream. When the
/// configuration names a log file, events go there instead.
pub fn init_logging(config: &LoggingConfig) {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let writer = match &config.file {
        Some(path) => match log_file_writer(path) {
            Ok(writer) => writer,
            Err(e) => {
                eprintln!("Cannot open log file {}: {e}; logging to stderr", path.display());
                BoxMakeWriter::new(io::stderr)
            }
        },
        None => BoxMakeWriter::new(io::stderr),
    };

    if config.json {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(writer)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(writer)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
}

fn log_file_writer(path: &Path) -> io::Result<BoxMakeWriter> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    Ok(BoxMakeWriter::new(std::sync::Mutex::new(file)))
}

/// Initialize logging with defaults (useful for tests and quick scripts).
pub fn init_default_logging() {
    init_logging(&LoggingConfig::default());
}
