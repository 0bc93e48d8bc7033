//! Diagnostic logging setup for the binary.
//!
//! Logs go to standard error so that standard output carries only the
//! container command's own output. `RUST_LOG` overrides the verbosity flag.

use tracing_subscriber::EnvFilter;

/// Map the count of `-v` flags to a default filter directive.
#[must_use]
pub const fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Build the filter, preferring `RUST_LOG` when it is set and valid.
#[must_use]
pub fn filter(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)))
}

/// Install the global subscriber.
///
/// A second call is a no-op, so tests and embedders that already installed
/// a subscriber keep theirs.
pub fn init(verbosity: u8) {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    if installed.is_err() {
        tracing::debug!("global subscriber already installed");
    }
}
