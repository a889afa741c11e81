//! restproxy - Main Entry Point
//!
//! Parses the command line, loads configuration from the environment, wires
//! the adapters into the request executor and exits with its exit code.

mod cli;

use std::sync::Arc;

use clap::Parser;
use restproxy_application::payload::{build_body, parse_field};
use restproxy_application::{
    CancellationToken, FileSystem, FileSystemError, HttpClientError, OutputRenderer, OutputSink,
    RequestExecutor, RequestStore, StoreError,
};
use restproxy_domain::{
    DomainError, Envelope, EnvelopeError, ErrorCode, ExitCode, Meta, OutputPreferences,
    RequestCommandOptions, StoredRequest, VERSION,
};
use restproxy_infrastructure::{
    ConfigError, EnvConfigLoader, FileRequestStore, LOG_TARGET, ReqwestHttpClient,
    StandardAuthProvider, StdoutSink, SystemClock, TokioFileSystem, TracingLogger, init_tracing,
};
use thiserror::Error;

use crate::cli::{Cli, Commands, ReplayArgs, RequestArgs};

/// Failures that happen before the executor takes over.
#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot read body file: {0}")]
    BodyFile(FileSystemError),

    #[error("cannot load saved request: {0}")]
    Load(StoreError),

    #[error("cannot save request: {0}")]
    Save(StoreError),

    #[error("cannot create HTTP client: {0}")]
    Client(HttpClientError),
}

impl StartupError {
    const fn classify(&self) -> (ExitCode, ErrorCode) {
        match self {
            Self::Save(_) | Self::Client(_) => (ExitCode::Internal, ErrorCode::InternalError),
            _ => (ExitCode::Validation, ErrorCode::ValidationError),
        }
    }
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            // --help and --version also arrive here.
            let _ = error.print();
            let code = if error.use_stderr() {
                ExitCode::Validation
            } else {
                ExitCode::Success
            };
            return process_exit(code);
        }
    };

    init_tracing(cli.verbose);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, cancelling request");
            on_interrupt.cancel();
        }
    });

    process_exit(run(cli.command, &cancel).await)
}

fn process_exit(code: ExitCode) -> std::process::ExitCode {
    u8::try_from(code.as_i32())
        .map_or(std::process::ExitCode::FAILURE, std::process::ExitCode::from)
}

async fn run(command: Commands, cancel: &CancellationToken) -> ExitCode {
    let sink = Arc::new(StdoutSink);
    let files = Arc::new(TokioFileSystem::new());

    let prepared = match command {
        Commands::Request(args) => prepare_request(*args, &files).await,
        Commands::Replay(args) => prepare_replay(args).await,
    };
    let options = match prepared {
        Ok(options) => options,
        Err(error) => return report(sink.as_ref(), &OutputPreferences::default(), &error),
    };

    let config = match EnvConfigLoader::from_env().load() {
        Ok(config) => config,
        Err(error) => return report(sink.as_ref(), &options.output, &error.into()),
    };
    let client = match ReqwestHttpClient::new() {
        Ok(client) => client,
        Err(error) => {
            return report(sink.as_ref(), &options.output, &StartupError::Client(error));
        }
    };

    let executor = RequestExecutor::new(
        Arc::new(client),
        Arc::new(SystemClock::new()),
        Arc::new(StandardAuthProvider::new()),
        files,
        sink,
    );
    executor
        .execute(&config, &options, &TracingLogger, cancel)
        .await
}

async fn prepare_request(
    args: RequestArgs,
    files: &Arc<TokioFileSystem>,
) -> Result<RequestCommandOptions, StartupError> {
    let mut options = args.to_options()?;

    let base = match (&args.body, &args.body_file) {
        (Some(body), _) => Some(body.clone()),
        (None, Some(path)) => Some(
            files
                .read_file_string(path)
                .await
                .map_err(StartupError::BodyFile)?,
        ),
        (None, None) => None,
    };
    let fields = args
        .field
        .iter()
        .map(|raw| parse_field(raw))
        .collect::<Result<Vec<_>, _>>()?;
    options.body = build_body(base.as_deref(), &fields)?;

    if let Some(path) = &args.save {
        FileRequestStore::new(TokioFileSystem::new())
            .save(path, &StoredRequest::from_options(&options))
            .await
            .map_err(StartupError::Save)?;
        tracing::debug!(target: LOG_TARGET, "saved request to {}", path.display());
    }

    Ok(options)
}

async fn prepare_replay(args: ReplayArgs) -> Result<RequestCommandOptions, StartupError> {
    let stored = FileRequestStore::new(TokioFileSystem::new())
        .load(&args.file)
        .await
        .map_err(StartupError::Load)?;

    let mut options = stored.into_options();
    options.out_path = args.out;
    options.output = args.output.to_preferences()?;
    args.policy.apply(&mut options);
    Ok(options)
}

/// Renders a startup failure as an envelope on stdout.
fn report(sink: &dyn OutputSink, prefs: &OutputPreferences, error: &StartupError) -> ExitCode {
    let (exit_code, code) = error.classify();
    let envelope = Envelope::failure(
        EnvelopeError::new(code, error.to_string()),
        Meta::new(VERSION),
    );

    let rendered = OutputRenderer::render(&envelope, prefs)
        .or_else(|_| OutputRenderer::render(&envelope, &OutputPreferences::default()));
    match rendered {
        Ok(text) if sink.write_line(&text).is_ok() => exit_code,
        _ => ExitCode::Internal,
    }
}
