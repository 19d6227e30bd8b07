//! Tracing subscriber setup for the `function-switcher` binary.

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

const DEFAULT_DIRECTIVES: &str = "function_switcher=info,switcher_core=info";
const DEBUG_DIRECTIVES: &str = "function_switcher=debug,switcher_core=debug";

/// Directives used when `RUST_LOG` is not set.
pub fn default_directives(config: &LoggingConfig) -> &'static str {
    if config.debug {
        DEBUG_DIRECTIVES
    } else {
        DEFAULT_DIRECTIVES
    }
}

/// Install the global subscriber, writing to stderr.
///
/// Stdout is reserved for command output. Calling this twice leaves the first
/// subscriber in place.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(config)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = match config.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "Tracing subscriber already installed");
    }
}
