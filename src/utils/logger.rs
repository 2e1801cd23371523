//! Subscriber setup for the binary. `RUST_LOG` wins over the built-in
//! directives.

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    /// JSON lines, for running under a log collector.
    Json,
}

/// Directive used when `RUST_LOG` is unset. Interactive use only hears about
/// problems unless asked for more.
pub fn default_directive(format: LogFormat, verbose: bool) -> &'static str {
    match (format, verbose) {
        (_, true) => "mart_config=debug,info",
        (LogFormat::Json, false) => "mart_config=info",
        (LogFormat::Compact, false) => "mart_config=warn",
    }
}

fn env_filter(format: LogFormat, verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(format, verbose)))
}

/// Install the global subscriber. Logs go to stderr so listings on stdout stay
/// machine readable. Fails if a subscriber is already installed.
pub fn init_logger(format: LogFormat, verbose: bool) -> Result<(), TryInitError> {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);
    let registry = tracing_subscriber::registry().with(env_filter(format, verbose));

    match format {
        LogFormat::Compact => registry.with(layer.compact()).try_init(),
        LogFormat::Json => registry.with(layer.json()).try_init(),
    }
}
