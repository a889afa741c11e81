//! Diagnostic logging port.

/// The only logging capability the executor sees.
///
/// Implementations decide whether verbose messages are shown; the executor
/// never checks a verbosity flag itself.
pub trait Logger: Send + Sync {
    /// Records a diagnostic message.
    fn verbose(&self, message: &str);
}

/// Logger that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn verbose(&self, _message: &str) {}
}
