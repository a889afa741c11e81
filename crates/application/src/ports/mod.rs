//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod auth;
mod clock;
mod file_system;
mod http_client;
mod logger;
mod output_sink;
mod request_store;

pub use auth::{AuthError, AuthHeader, AuthHeaderProvider};
pub use clock::Clock;
pub use file_system::{FileSystem, FileSystemError};
pub use http_client::{HttpClient, HttpClientError};
pub use logger::{Logger, NullLogger};
pub use output_sink::OutputSink;
pub use request_store::{RequestStore, StoreError};
