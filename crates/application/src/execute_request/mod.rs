//! Execute Request Use Case
//!
//! The single entry point of the core: validate a command, send it with
//! retries (page by page when pagination is requested), turn the outcome
//! into an [`Envelope`] and write the rendered result to the output sink.
//!
//! Errors are handled in three tiers:
//!
//! 1. Rejected preconditions never reach the network and always exit with
//!    the validation code.
//! 2. Non-success HTTP responses become failing envelopes; whether the exit
//!    code reflects that is governed by `fail_on_non_success`.
//! 3. Anything that prevented getting an answer (transport, timeout,
//!    cancellation, unexpected failures) is caught once here and always
//!    exits non-zero.

mod pagination;
mod response;

use std::sync::Arc;
use std::time::Instant;

use restproxy_domain::output::VERBOSE_HINT;
use restproxy_domain::{
    Config, DomainError, Envelope, EnvelopeError, ErrorCode, ExitCode, Headers, HttpMethod,
    OutputPreferences, QueryParams, RequestCommandOptions, RequestSpec, ResponseSpec, VERSION,
    classify_failure, classify_status,
};
use tokio_util::sync::CancellationToken;
use url::Url;

use self::pagination::{PageAccumulator, PageStep};
use self::response::{build_meta, error_message, parse_body, saved_descriptor};
use crate::error::{ApplicationError, ApplicationResult};
use crate::output::OutputRenderer;
use crate::ports::{
    AuthHeaderProvider, Clock, FileSystem, HttpClient, HttpClientError, Logger, OutputSink,
};
use crate::retry::RetryPolicy;

/// Query parameter carrying the pagination offset.
pub const START_AT_PARAM: &str = "startAt";

/// Default `Content-Type` for requests that carry a body.
const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// The rendered envelope and the exit code that goes with it.
#[derive(Debug)]
struct Outcome {
    envelope: Envelope,
    exit_code: ExitCode,
}

/// Everything about a request that does not change between pages.
#[derive(Debug)]
struct PreparedRequest {
    method: HttpMethod,
    url: Url,
    headers: Headers,
    body: Option<String>,
    timeout_ms: u64,
}

impl PreparedRequest {
    fn with_query(&self, query: &QueryParams) -> RequestSpec {
        let mut url = self.url.clone();
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for param in query.iter() {
                pairs.append_pair(&param.key, &param.value);
            }
        }

        let mut request = RequestSpec::new(self.method, url.as_str(), self.timeout_ms);
        request.headers = self.headers.clone();
        request.body.clone_from(&self.body);
        request
    }
}

/// One step of the send-with-retries loop.
enum Attempt {
    /// Hand this response to the caller, whatever its status.
    Success(ResponseSpec),
    /// Wait and try again.
    RetryableFailure(Option<ResponseSpec>),
    /// Give up with this error.
    FatalFailure(HttpClientError),
}

/// Use case for executing one request command.
///
/// Holds no per-call state; one executor can serve many commands.
///
/// # Example
///
/// ```ignore
/// let executor = RequestExecutor::new(client, clock, auth, files, sink);
/// let exit_code = executor.execute(&config, &options, &logger, &cancel).await;
/// std::process::exit(exit_code.as_i32());
/// ```
pub struct RequestExecutor<C: HttpClient, K: Clock, F: FileSystem> {
    client: Arc<C>,
    retry: RetryPolicy<K>,
    auth: Arc<dyn AuthHeaderProvider>,
    files: Arc<F>,
    sink: Arc<dyn OutputSink>,
}

impl<C: HttpClient, K: Clock, F: FileSystem> RequestExecutor<C, K, F> {
    /// Creates an executor over its collaborators.
    pub fn new(
        client: Arc<C>,
        clock: Arc<K>,
        auth: Arc<dyn AuthHeaderProvider>,
        files: Arc<F>,
        sink: Arc<dyn OutputSink>,
    ) -> Self {
        Self {
            client,
            retry: RetryPolicy::new(clock),
            auth,
            files,
            sink,
        }
    }

    /// Runs the command, writes the rendered envelope and returns the
    /// process exit code.
    pub async fn execute(
        &self,
        config: &Config,
        options: &RequestCommandOptions,
        logger: &dyn Logger,
        cancel: &CancellationToken,
    ) -> ExitCode {
        let started = Instant::now();

        let outcome = match self.prepare(config, options) {
            Err(error) => {
                logger.verbose(&format!("request rejected before sending: {error}"));
                Outcome {
                    envelope: Envelope::failure(
                        EnvelopeError::new(ErrorCode::ValidationError, error.to_string()),
                        build_meta(options, None, started),
                    ),
                    exit_code: ExitCode::Validation,
                }
            }
            Ok(prepared) => {
                let result = if options.wants_pagination() {
                    self.paginate(config, options, &prepared, logger, cancel, started)
                        .await
                } else {
                    self.send_single(config, options, &prepared, logger, cancel, started)
                        .await
                };
                result.unwrap_or_else(|error| failure_outcome(&error, options, started, logger))
            }
        };

        self.emit(&outcome, &options.output, logger)
    }

    /// Checks preconditions and builds everything that can be built without
    /// I/O.
    fn prepare(
        &self,
        config: &Config,
        options: &RequestCommandOptions,
    ) -> ApplicationResult<PreparedRequest> {
        if options.wants_pagination() && options.method != HttpMethod::Get {
            return Err(ApplicationError::Precondition(format!(
                "pagination is only supported for GET requests, not {}",
                options.method
            )));
        }
        if options.method.is_mutating() && !options.confirmed {
            return Err(ApplicationError::Precondition(format!(
                "{} modifies remote data; confirmation is required (re-run with --yes)",
                options.method
            )));
        }
        options.output.validate()?;

        let url = build_url(&config.base_url, &options.path)?;
        let headers = self.build_headers(config, options)?;

        Ok(PreparedRequest {
            method: options.method,
            url,
            headers,
            body: options.body.clone(),
            timeout_ms: config.timeout_seconds.saturating_mul(1000),
        })
    }

    fn build_headers(
        &self,
        config: &Config,
        options: &RequestCommandOptions,
    ) -> ApplicationResult<Headers> {
        let auth = self.auth.create_auth_header(config)?;

        let mut headers = Headers::new();
        headers.set("Accept", options.accept.as_str());
        headers.set("User-Agent", format!("restproxy/{VERSION}"));
        headers.set("Authorization", auth.header_value());
        if let Some(content_type) = &options.content_type {
            headers.set("Content-Type", content_type.as_str());
        }
        for header in options.headers.iter() {
            headers.set(header.name.as_str(), header.value.as_str());
        }
        if options.body.is_some() && !headers.contains("Content-Type") {
            headers.set("Content-Type", DEFAULT_CONTENT_TYPE);
        }
        Ok(headers)
    }

    async fn send_single(
        &self,
        config: &Config,
        options: &RequestCommandOptions,
        prepared: &PreparedRequest,
        logger: &dyn Logger,
        cancel: &CancellationToken,
        started: Instant,
    ) -> ApplicationResult<Outcome> {
        let request = prepared.with_query(&options.query);
        let response = self
            .send_with_retries(config, &request, options.retry_non_idempotent, logger, cancel)
            .await?;
        self.handle_response(response, options, logger, started)
            .await
    }

    /// Sends `request` until it succeeds, fails fatally, or runs out of
    /// attempts.
    ///
    /// The last response is returned as-is even when its status is an
    /// error; only send failures surface as `Err`.
    async fn send_with_retries(
        &self,
        config: &Config,
        request: &RequestSpec,
        retry_non_idempotent: bool,
        logger: &dyn Logger,
        cancel: &CancellationToken,
    ) -> ApplicationResult<ResponseSpec> {
        let max_attempts = config.max_attempts().max(1);
        let method_retryable =
            RetryPolicy::<K>::is_method_retryable(request.method, retry_non_idempotent);

        let mut attempt = 1;
        loop {
            logger.verbose(&format!(
                "{} {} (attempt {attempt}/{max_attempts})",
                request.method, request.url
            ));

            let result = tokio::select! {
                biased;
                () = cancel.cancelled() => Err(HttpClientError::Cancelled),
                result = self.client.execute(request) => result,
            };
            let can_retry = method_retryable && attempt < max_attempts;

            let step = match result {
                Ok(response) => {
                    logger.verbose(&format!(
                        "received {} in {} ms",
                        response.status_code(),
                        response.duration.as_millis()
                    ));
                    if can_retry && RetryPolicy::<K>::should_retry_response(&response) {
                        Attempt::RetryableFailure(Some(response))
                    } else {
                        Attempt::Success(response)
                    }
                }
                Err(error) => {
                    logger.verbose(&format!("send failed: {error}"));
                    if can_retry && RetryPolicy::<K>::should_retry_error(&error) {
                        Attempt::RetryableFailure(None)
                    } else {
                        Attempt::FatalFailure(error)
                    }
                }
            };

            match step {
                Attempt::Success(response) => return Ok(response),
                Attempt::FatalFailure(error) => return Err(error.into()),
                Attempt::RetryableFailure(response) => {
                    self.retry
                        .wait(response.as_ref(), attempt, config, logger, cancel)
                        .await?;
                }
            }
            attempt += 1;
        }
    }

    /// Builds the outcome for a final response.
    async fn handle_response(
        &self,
        response: ResponseSpec,
        options: &RequestCommandOptions,
        logger: &dyn Logger,
        started: Instant,
    ) -> ApplicationResult<Outcome> {
        let meta = build_meta(options, Some(&response), started);

        if response.is_success() {
            let data = match &options.out_path {
                Some(path) => {
                    self.files.write_file(path, &response.body_bytes).await?;
                    logger.verbose(&format!(
                        "wrote {} bytes to {}",
                        response.body_bytes.len(),
                        path.display()
                    ));
                    Some(saved_descriptor(path, &response))
                }
                None => parse_body(&response),
            };
            return Ok(Outcome {
                envelope: Envelope::success(data, meta),
                exit_code: ExitCode::Success,
            });
        }

        let (exit_code, code) = classify_status(response.status);
        let details = parse_body(&response);
        let error = EnvelopeError::new(code, error_message(&response, details.as_ref()))
            .with_details(details)
            .with_hint(VERBOSE_HINT);

        Ok(Outcome {
            envelope: Envelope::failure(error, meta),
            exit_code: if options.fail_on_non_success {
                exit_code
            } else {
                ExitCode::Success
            },
        })
    }

    /// Fetches every page of a `startAt`-paginated list and renders them as
    /// one combined document.
    async fn paginate(
        &self,
        config: &Config,
        options: &RequestCommandOptions,
        prepared: &PreparedRequest,
        logger: &dyn Logger,
        cancel: &CancellationToken,
        started: Instant,
    ) -> ApplicationResult<Outcome> {
        let mut start_at = options
            .query
            .get(START_AT_PARAM)
            .and_then(|value| value.trim().parse::<u64>().ok())
            .unwrap_or(0);
        let mut pages = PageAccumulator::default();
        let mut query = options.query.clone();

        let last = loop {
            query.set(START_AT_PARAM, start_at.to_string());
            let request = prepared.with_query(&query);
            let response = self
                .send_with_retries(config, &request, options.retry_non_idempotent, logger, cancel)
                .await?;

            if !response.is_success() {
                return self.handle_response(response, options, logger, started).await;
            }

            let page = serde_json::from_slice(&response.body_bytes)?;
            match pages.push(page, start_at)? {
                PageStep::Next(next) => {
                    logger.verbose(&format!("fetching next page at {START_AT_PARAM}={next}"));
                    start_at = next;
                }
                PageStep::Done => break response,
            }
        };

        logger.verbose(&format!("pagination complete: {} values", pages.len()));
        let combined = pages.finish();
        let mut response = last;
        response.body_bytes = serde_json::to_vec(&combined)?;
        response.content_type = Some(DEFAULT_CONTENT_TYPE.to_string());
        self.handle_response(response, options, logger, started)
            .await
    }

    fn emit(
        &self,
        outcome: &Outcome,
        prefs: &OutputPreferences,
        logger: &dyn Logger,
    ) -> ExitCode {
        let rendered = OutputRenderer::render(&outcome.envelope, prefs).or_else(|_| {
            // Rejected preferences: render the envelope untransformed.
            let fallback = OutputPreferences {
                format: prefs.format,
                ..OutputPreferences::default()
            };
            OutputRenderer::render(&outcome.envelope, &fallback)
        });

        let written = rendered.map_err(|e| e.to_string()).and_then(|text| {
            if text.is_empty() {
                Ok(())
            } else {
                self.sink.write_line(&text).map_err(|e| e.to_string())
            }
        });

        match written {
            Ok(()) => outcome.exit_code,
            Err(error) => {
                logger.verbose(&format!("failed to write output: {error}"));
                ExitCode::Internal
            }
        }
    }
}

/// Joins `path` onto the base URL. Absolute URLs pass through unchanged.
fn build_url(base: &Url, path: &str) -> ApplicationResult<Url> {
    let path = path.trim();
    let raw = if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else {
        format!(
            "{}/{}",
            base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    };
    Url::parse(&raw).map_err(|e| DomainError::InvalidUrl(format!("{raw}: {e}")).into())
}

/// Maps an error that escaped the whole operation onto a failing envelope.
fn failure_outcome(
    error: &ApplicationError,
    options: &RequestCommandOptions,
    started: Instant,
    logger: &dyn Logger,
) -> Outcome {
    let (exit_code, code) = classify_failure(error.failure_kind());
    logger.verbose(&format!("request failed: {error}"));

    Outcome {
        envelope: Envelope::failure(
            EnvelopeError::new(code, error.to_string()),
            build_meta(options, None, started),
        ),
        exit_code,
    }
}
