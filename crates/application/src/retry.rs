//! Retry decisions and backoff.
//!
//! A request is retried only when both the method allows it and the outcome
//! is transient: a 429 or 5xx response, a timeout, or a transport failure.
//! Backoff is exponential with jitter; a 429 carrying a usable `Retry-After`
//! waits exactly as long as the server asked.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use restproxy_domain::{Config, HttpMethod, ResponseSpec};
use tokio_util::sync::CancellationToken;

use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::{Clock, HttpClientError, Logger};

/// Upper bound for any single delay.
pub const MAX_DELAY: Duration = Duration::from_millis(30_000);

/// Exclusive upper bound of the random jitter added to backoff, in ms.
pub const MAX_JITTER_MS: u64 = 250;

const TOO_MANY_REQUESTS: u16 = 429;

/// Stateless retry policy over an injected clock.
#[derive(Debug)]
pub struct RetryPolicy<K: Clock> {
    clock: Arc<K>,
}

impl<K: Clock> Clone for RetryPolicy<K> {
    fn clone(&self) -> Self {
        Self {
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<K: Clock> RetryPolicy<K> {
    /// Creates a policy that reads time from and sleeps on `clock`.
    pub const fn new(clock: Arc<K>) -> Self {
        Self { clock }
    }

    /// GET, PUT, DELETE (and the other idempotent methods) may always be
    /// retried; POST and PATCH only when the caller opted in.
    #[must_use]
    pub const fn is_method_retryable(method: HttpMethod, retry_non_idempotent: bool) -> bool {
        method.is_idempotent() || retry_non_idempotent
    }

    /// A response is worth retrying when it is a 429 or any 5xx.
    #[must_use]
    pub const fn should_retry_response(response: &ResponseSpec) -> bool {
        response.status == TOO_MANY_REQUESTS || response.status >= 500
    }

    /// Timeouts and transport failures are transient. Cancellation by the
    /// user and every other error are not.
    #[must_use]
    pub const fn should_retry_error(error: &HttpClientError) -> bool {
        error.is_timeout() || error.is_transport()
    }

    /// Computes how long to wait before the attempt after `attempt`.
    ///
    /// `attempt` is 1-based and names the attempt that just failed.
    #[must_use]
    pub fn compute_delay(
        &self,
        response: Option<&ResponseSpec>,
        attempt: u32,
        config: &Config,
    ) -> Duration {
        if let Some(delay) = response
            .filter(|r| r.status == TOO_MANY_REQUESTS)
            .and_then(|r| self.retry_after(r))
        {
            return delay;
        }

        let jitter = rand::rng().random_range(0..MAX_JITTER_MS);
        backoff_delay(config.retry_base_delay(), attempt, Duration::from_millis(jitter))
    }

    /// Computes the delay, logs it, and sleeps on the clock.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Cancelled`] if `cancel` fires while waiting.
    pub async fn wait(
        &self,
        response: Option<&ResponseSpec>,
        attempt: u32,
        config: &Config,
        logger: &dyn Logger,
        cancel: &CancellationToken,
    ) -> ApplicationResult<()> {
        let delay = self.compute_delay(response, attempt, config);
        logger.verbose(&format!(
            "attempt {attempt} failed; retrying in {} ms",
            delay.as_millis()
        ));

        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(ApplicationError::Cancelled),
            () = self.clock.sleep(delay) => Ok(()),
        }
    }

    /// Parses `Retry-After` as delta-seconds or an HTTP-date, clamped to
    /// `[0, MAX_DELAY]`.
    fn retry_after(&self, response: &ResponseSpec) -> Option<Duration> {
        let raw = response.header("retry-after")?.trim();

        if let Ok(seconds) = raw.parse::<u64>() {
            return Some(Duration::from_secs(seconds).min(MAX_DELAY));
        }

        let date = DateTime::parse_from_rfc2822(raw).ok()?;
        let millis = (date.with_timezone(&Utc) - self.clock.now()).num_milliseconds();
        let clamped = u64::try_from(millis.max(0)).unwrap_or(0);
        Some(Duration::from_millis(clamped).min(MAX_DELAY))
    }
}

/// `base * 2^(attempt-1) + jitter`, capped at [`MAX_DELAY`].
#[must_use]
pub fn backoff_delay(base: Duration, attempt: u32, jitter: Duration) -> Duration {
    let exponent = attempt.saturating_sub(1).min(31);
    base.saturating_mul(1u32 << exponent)
        .saturating_add(jitter)
        .min(MAX_DELAY)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::{FakeClock, RecordingLogger, response, response_with_headers, test_config};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn policy() -> (RetryPolicy<FakeClock>, Arc<FakeClock>) {
        let clock = Arc::new(FakeClock::at(Utc.with_ymd_and_hms(2025, 1, 6, 12, 0, 0).unwrap()));
        (RetryPolicy::new(Arc::clone(&clock)), clock)
    }

    #[test]
    fn test_method_retryability() {
        for method in [HttpMethod::Get, HttpMethod::Put, HttpMethod::Delete] {
            assert!(RetryPolicy::<FakeClock>::is_method_retryable(method, false));
        }
        for method in [HttpMethod::Post, HttpMethod::Patch] {
            assert!(!RetryPolicy::<FakeClock>::is_method_retryable(method, false));
            assert!(RetryPolicy::<FakeClock>::is_method_retryable(method, true));
        }
    }

    #[test]
    fn test_should_retry_response() {
        for status in [429, 500, 502, 503, 504, 599] {
            assert!(
                RetryPolicy::<FakeClock>::should_retry_response(&response(status, "")),
                "status {status}"
            );
        }
        for status in [200, 201, 204, 301, 400, 401, 403, 404, 408, 409, 422, 428, 499] {
            assert!(
                !RetryPolicy::<FakeClock>::should_retry_response(&response(status, "")),
                "status {status}"
            );
        }
    }

    #[test]
    fn test_should_retry_error() {
        assert!(RetryPolicy::<FakeClock>::should_retry_error(
            &HttpClientError::Timeout { timeout_ms: 1000 }
        ));
        assert!(RetryPolicy::<FakeClock>::should_retry_error(
            &HttpClientError::ConnectionFailed("reset by peer".into())
        ));
        assert!(!RetryPolicy::<FakeClock>::should_retry_error(
            &HttpClientError::Cancelled
        ));
        assert!(!RetryPolicy::<FakeClock>::should_retry_error(
            &HttpClientError::InvalidUrl("x".into())
        ));
    }

    #[test]
    fn test_retry_after_seconds_is_used_verbatim() {
        let (policy, _) = policy();
        let throttled = response_with_headers(429, "", &[("Retry-After", "2")]);
        let delay = policy.compute_delay(Some(&throttled), 3, &test_config());
        assert_eq!(delay, Duration::from_secs(2));
    }

    #[test]
    fn test_retry_after_is_clamped() {
        let (policy, _) = policy();
        let throttled = response_with_headers(429, "", &[("Retry-After", "120")]);
        assert_eq!(
            policy.compute_delay(Some(&throttled), 1, &test_config()),
            MAX_DELAY
        );
    }

    #[test]
    fn test_retry_after_http_date() {
        let (policy, _) = policy();
        let throttled = response_with_headers(
            429,
            "",
            &[("Retry-After", "Mon, 06 Jan 2025 12:00:05 GMT")],
        );
        assert_eq!(
            policy.compute_delay(Some(&throttled), 1, &test_config()),
            Duration::from_secs(5)
        );

        let past = response_with_headers(
            429,
            "",
            &[("Retry-After", "Mon, 06 Jan 2025 11:59:00 GMT")],
        );
        assert_eq!(
            policy.compute_delay(Some(&past), 1, &test_config()),
            Duration::ZERO
        );
    }

    #[test]
    fn test_retry_after_ignored_for_server_errors() {
        let (policy, _) = policy();
        let unavailable = response_with_headers(503, "", &[("Retry-After", "7")]);
        let delay = policy.compute_delay(Some(&unavailable), 1, &test_config());
        assert!(delay >= Duration::from_millis(100));
        assert!(delay < Duration::from_millis(100 + MAX_JITTER_MS));
    }

    #[test]
    fn test_unusable_retry_after_falls_back_to_backoff() {
        let (policy, _) = policy();
        let throttled = response_with_headers(429, "", &[("Retry-After", "soon")]);
        let delay = policy.compute_delay(Some(&throttled), 2, &test_config());
        assert!(delay >= Duration::from_millis(200));
        assert!(delay < Duration::from_millis(200 + MAX_JITTER_MS));
    }

    #[test]
    fn test_backoff_range_per_attempt() {
        let (policy, _) = policy();
        let config = test_config();
        for attempt in 1..=6u32 {
            let floor = Duration::from_millis(100 * 2u64.pow(attempt - 1));
            for _ in 0..20 {
                let delay = policy.compute_delay(None, attempt, &config);
                assert!(delay >= floor, "attempt {attempt}: {delay:?}");
                assert!(
                    delay <= floor + Duration::from_millis(MAX_JITTER_MS),
                    "attempt {attempt}: {delay:?}"
                );
            }
        }
    }

    #[test]
    fn test_backoff_is_capped() {
        assert_eq!(
            backoff_delay(Duration::from_millis(500), 30, Duration::from_millis(249)),
            MAX_DELAY
        );
        assert_eq!(
            backoff_delay(Duration::from_millis(500), 0, Duration::ZERO),
            Duration::from_millis(500)
        );
    }

    #[tokio::test]
    async fn test_wait_sleeps_on_clock_and_logs() {
        let (policy, clock) = policy();
        let logger = RecordingLogger::default();
        let throttled = response_with_headers(429, "", &[("Retry-After", "3")]);

        policy
            .wait(
                Some(&throttled),
                1,
                &test_config(),
                &logger,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(clock.sleeps(), vec![Duration::from_secs(3)]);
        assert!(logger.messages()[0].contains("retrying in 3000 ms"));
    }

    #[tokio::test]
    async fn test_wait_observes_cancellation() {
        let clock = Arc::new(FakeClock::blocking());
        let policy = RetryPolicy::new(clock);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = policy
            .wait(None, 1, &test_config(), &RecordingLogger::default(), &cancel)
            .await;
        assert!(matches!(result, Err(ApplicationError::Cancelled)));
    }
}
