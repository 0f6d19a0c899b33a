//! Structured logging for the pilco-cost CLI.
//!
//! Provides dual-mode logging:
//! - Human-readable console output for interactive use
//! - Machine-parseable JSONL for pipelines
//!
//! stdout is reserved for results; all log output goes to stderr.

pub mod config;
pub mod layer;

pub use config::{LogConfig, LogFormat, LogLevel};
pub use layer::JsonlLayer;

use std::io::IsTerminal;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Build the event filter for a config.
///
/// Raw `RUST_LOG` directives are used when present and valid; otherwise the
/// pilco crates are filtered at the configured level.
pub fn build_filter(config: &LogConfig) -> EnvFilter {
    config
        .directives
        .as_deref()
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(config.default_directives()))
}

/// Initialize the logging subsystem.
///
/// Must be called once at startup before any logging occurs. A second call
/// leaves the first subscriber in place.
pub fn init_logging(config: &LogConfig) {
    let filter = build_filter(config);

    let result = match config.format {
        LogFormat::Human => {
            let use_ansi = std::io::stderr().is_terminal();
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_file(config.source_location)
                .with_line_number(config.source_location)
                .with_ansi(use_ansi);

            if config.timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer)
                    .try_init()
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer.without_time())
                    .try_init()
            }
        }
        LogFormat::Jsonl => tracing_subscriber::registry()
            .with(filter)
            .with(JsonlLayer::stderr())
            .try_init(),
    };

    if let Err(e) = result {
        eprintln!("Warning: logging already initialized: {}", e);
    }
}
