//! Diagnostics through `tracing`, and command output on stdout.

use std::io::{self, Write};

use restproxy_application::ports::{Logger, OutputSink};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Target of every event emitted by [`TracingLogger`].
pub const LOG_TARGET: &str = "restproxy";

/// Installs the global subscriber: human-readable events on stderr.
///
/// `RUST_LOG` wins when set. Otherwise only warnings are shown, plus the
/// request diagnostics when `verbose` is on. Stdout stays reserved for
/// command output.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    // Fails only when a subscriber is already installed.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .try_init();
}

const fn default_directives(verbose: bool) -> &'static str {
    if verbose { "warn,restproxy=debug" } else { "warn" }
}

/// [`Logger`] that forwards verbose diagnostics as `debug` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn verbose(&self, message: &str) {
        tracing::debug!(target: LOG_TARGET, "{message}");
    }
}

/// Writes command output to the process's stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write_line(&self, text: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{text}")?;
        stdout.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_directives() {
        assert_eq!(default_directives(false), "warn");
        assert_eq!(default_directives(true), "warn,restproxy=debug");
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init_tracing(true);
        init_tracing(false);
        TracingLogger.verbose("diagnostic after init");
    }

    #[test]
    fn test_stdout_sink_writes() {
        assert!(StdoutSink.write_line("{\"success\":true}").is_ok());
    }
}
