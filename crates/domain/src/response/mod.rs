//! HTTP Response domain types

mod spec;

pub use spec::{REQUEST_ID_HEADERS, ResponseSpec, StatusCode};
