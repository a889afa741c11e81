//! HTTP Request domain types

mod header;
mod method;
mod options;
mod query;
mod spec;
mod stored;

pub use header::{Header, Headers};
pub use method::HttpMethod;
pub use options::{DEFAULT_ACCEPT, RequestCommandOptions};
pub use query::{QueryParam, QueryParams};
pub use spec::RequestSpec;
pub use stored::StoredRequest;
