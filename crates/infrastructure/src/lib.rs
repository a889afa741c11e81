//! Restproxy Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer.

pub mod adapters;
pub mod auth;
pub mod config;
pub mod logging;
pub mod persistence;
pub mod serialization;

pub use adapters::{ReqwestHttpClient, SystemClock};
pub use auth::StandardAuthProvider;
pub use config::{ConfigError, EnvConfigLoader};
pub use logging::{LOG_TARGET, StdoutSink, TracingLogger, init_tracing};
pub use persistence::{FileRequestStore, TokioFileSystem};
pub use serialization::{SerializationError, from_json, to_json_stable};
