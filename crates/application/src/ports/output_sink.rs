//! Destination for rendered command output.

use std::io;

/// Receives the rendered output of a command.
pub trait OutputSink: Send + Sync {
    /// Writes `text` followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying stream cannot be written.
    fn write_line(&self, text: &str) -> io::Result<()>;
}
