//! Restproxy Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for external dependencies)
//! - The retry policy and the request executor use case
//! - Output transformation and rendering
//! - Application-level error handling

pub mod error;
pub mod execute_request;
pub mod output;
pub mod payload;
pub mod ports;
pub mod retry;

#[cfg(test)]
mod test_support;

pub use error::{ApplicationError, ApplicationResult};
pub use execute_request::{RequestExecutor, START_AT_PARAM};
pub use output::{OutputDataTransformer, OutputRenderer};
pub use ports::{
    AuthError, AuthHeader, AuthHeaderProvider, Clock, FileSystem, FileSystemError, HttpClient,
    HttpClientError, Logger, NullLogger, OutputSink, RequestStore, StoreError,
};
pub use retry::RetryPolicy;

/// Re-exported so callers can create the token passed to
/// [`RequestExecutor::execute`].
pub use tokio_util::sync::CancellationToken;
