//! Clock port for time-related operations

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Port for reading the current time and waiting.
///
/// Retry backoff goes through this trait so tests can substitute a clock
/// that returns immediately and records the requested delays.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;

    /// Suspends for `duration`.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}
