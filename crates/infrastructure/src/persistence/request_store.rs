//! Stored requests as JSON files.

use std::path::Path;

use restproxy_application::ports::{FileSystem, RequestStore, StoreError};
use restproxy_domain::StoredRequest;

use crate::serialization::{from_json, to_json_stable};

/// File system based implementation of `RequestStore`.
pub struct FileRequestStore<F: FileSystem> {
    fs: F,
}

impl<F: FileSystem> FileRequestStore<F> {
    /// Creates a new store with the given file system implementation.
    #[must_use]
    pub const fn new(fs: F) -> Self {
        Self { fs }
    }
}

impl<F: FileSystem> RequestStore for FileRequestStore<F> {
    async fn save(&self, path: &Path, request: &StoredRequest) -> Result<(), StoreError> {
        let json = to_json_stable(request).map_err(|e| StoreError::Serialization(e.to_string()))?;

        self.fs
            .write_file(path, json.as_bytes())
            .await
            .map_err(|e| StoreError::FileSystem(e.to_string()))
    }

    async fn load(&self, path: &Path) -> Result<StoredRequest, StoreError> {
        let content = self
            .fs
            .read_file_string(path)
            .await
            .map_err(|e| StoreError::FileSystem(e.to_string()))?;

        from_json(&content).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}
