//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

use crate::ports::Severity;

/// `EnvFilter` directive matching a reporter severity
pub fn directive(level: Severity) -> &'static str {
    match level {
        Severity::Debug => "debug",
        Severity::Info => "info",
        Severity::Warning => "warn",
        Severity::Fatal => "error",
    }
}

/// Install the global subscriber; `RUST_LOG` wins over `level` when set.
///
/// Returns `false` if a subscriber was already installed.
pub fn init(level: Severity) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive(level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
