use anyhow::Result;
use std::path::Path;

use tracing::Subscriber;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Install the global subscriber.
///
/// Console output goes to stderr so the report on stdout can be piped.
/// When `log_dir` is set, a plain-text copy is written to a daily rolling
/// file in that directory.
pub fn init_logger(log_dir: Option<&Path>) -> Result<()> {
    // Get log level from environment (default: warn, info for this crate)
    let log_level = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "warn,paper_topics=info".to_string());

    // "pretty" or "json"
    let log_format = std::env::var("LOG_FORMAT")
        .unwrap_or_else(|_| "pretty".to_string());

    let filter = EnvFilter::try_new(&log_level)?;

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(file_layer(log_dir)?)
                .try_init()?;
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(file_layer(log_dir)?)
                .try_init()?;
        }
    }

    Ok(())
}

fn file_layer<S>(log_dir: Option<&Path>) -> Result<Option<impl Layer<S>>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let Some(dir) = log_dir else {
        return Ok(None);
    };

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("paper-topics")
        .filename_suffix("log")
        .build(dir)?;

    Ok(Some(
        fmt::layer()
            .with_writer(appender)
            .with_target(true)
            .with_level(true)
            .with_ansi(false), // No colors in file
    ))
}
