//! File-backed adapters.

mod file_system;
mod request_store;

pub use file_system::TokioFileSystem;
pub use request_store::FileRequestStore;
