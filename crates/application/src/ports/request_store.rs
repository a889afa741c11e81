//! Saved request snapshots.

use std::future::Future;
use std::path::Path;

use restproxy_domain::StoredRequest;
use thiserror::Error;

/// Errors saving or loading a stored request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Reading or writing the file failed.
    #[error("file system error: {0}")]
    FileSystem(String),

    /// The file is not a valid stored request.
    #[error("invalid stored request: {0}")]
    Serialization(String),
}

/// Persists [`StoredRequest`] snapshots for later replay.
pub trait RequestStore: Send + Sync {
    /// Writes `request` to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be serialized or written.
    fn save(
        &self,
        path: &Path,
        request: &StoredRequest,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Reads the request saved at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    fn load(&self, path: &Path) -> impl Future<Output = Result<StoredRequest, StoreError>> + Send;
}
