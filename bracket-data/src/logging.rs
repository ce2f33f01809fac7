use std::io::{self, IsTerminal};

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Builds the log filter.
///
/// `RUST_LOG` wins when set; otherwise `default_directive` is used. Accepts a
/// bare level ("warn", "debug") or any full `EnvFilter` directive.
pub fn make_filter(default_directive: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_directive)
            .map_err(|e| anyhow!("invalid log level '{default_directive}': {e}")),
    }
}

/// Initialise the tracing subscriber. Call once at startup.
///
/// * Writes to stderr so stdout stays free for command output.
/// * Colored only when stderr is a terminal.
/// * Strips timestamps and target names to keep CLI output clean.
pub fn init_tracing(default_directive: &str) -> Result<()> {
    let filter = make_filter(default_directive)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .without_time()
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("logging already initialized: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_filter_accepts_bare_level() {
        // RUST_LOG may be set in the test environment; either way a filter
        // must come back.
        assert!(make_filter("debug").is_ok());
    }

    #[test]
    fn make_filter_accepts_directive() {
        assert!(make_filter("warn,bracket_core=debug").is_ok());
    }
}
