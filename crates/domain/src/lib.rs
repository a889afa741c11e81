//! Restproxy Domain - Core types
//!
//! This crate defines the domain model for the restproxy command-line
//! REST proxy. All types here are pure Rust with no I/O dependencies.

pub mod config;
pub mod error;
pub mod json_path;
pub mod output;
pub mod request;
pub mod response;
pub mod taxonomy;

pub use config::{AuthConfig, Config};
pub use error::{DomainError, DomainResult};
pub use output::{
    Envelope, EnvelopeError, JsonStyle, Meta, OutputFormat, OutputPipeline, OutputPreferences,
};
pub use request::{
    Header, Headers, HttpMethod, QueryParam, QueryParams, RequestCommandOptions, RequestSpec,
    StoredRequest,
};
pub use response::{ResponseSpec, StatusCode};
pub use taxonomy::{ErrorCode, ExitCode, FailureKind, classify_failure, classify_status};

/// Tool version reported in `meta.version` and the `User-Agent` header.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
