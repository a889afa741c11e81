//! CLI argument structures
//!
//! `request` describes a call from flags; `replay` re-sends a call saved
//! with `request --save`. Output and policy flags are shared by both.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use restproxy_domain::{
    DomainResult, Header, HttpMethod, JsonStyle, OutputFormat, OutputPreferences, QueryParam,
    RequestCommandOptions,
};

/// Send authenticated REST calls and print normalized JSON envelopes
#[derive(Debug, Parser)]
#[command(name = "restproxy")]
#[command(about = "restproxy - authenticated REST calls with normalized JSON output", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Log request, retry and timing diagnostics to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Send one request
    #[command(name = "request")]
    Request(Box<RequestArgs>),

    /// Send a request saved with `request --save`
    #[command(name = "replay")]
    Replay(ReplayArgs),
}

/// Flags describing the HTTP call.
#[derive(Debug, Args)]
pub struct RequestArgs {
    /// HTTP method (GET, POST, PUT, PATCH, DELETE, HEAD, OPTIONS)
    pub method: String,

    /// Path relative to the base URL, or an absolute URL
    pub path: String,

    /// Query parameter, repeatable
    #[arg(long = "query", value_name = "KEY=VALUE")]
    pub query: Vec<String>,

    /// Request header, repeatable
    #[arg(long = "header", value_name = "NAME: VALUE")]
    pub header: Vec<String>,

    /// Accept header
    #[arg(long)]
    pub accept: Option<String>,

    /// Content-Type of the body
    #[arg(long)]
    pub content_type: Option<String>,

    /// Inline request body
    #[arg(long, conflicts_with = "body_file")]
    pub body: Option<String>,

    /// Read the request body from a file
    #[arg(long, value_name = "PATH")]
    pub body_file: Option<PathBuf>,

    /// Set a JSON body field by dot-path, repeatable
    #[arg(long = "field", value_name = "PATH=VALUE")]
    pub field: Vec<String>,

    /// Write the response body to a file instead of stdout
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Save the request for later replay
    #[arg(long, value_name = "PATH")]
    pub save: Option<PathBuf>,

    #[command(flatten)]
    pub output: OutputArgs,

    #[command(flatten)]
    pub policy: PolicyArgs,
}

/// Flags for `replay`.
#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Saved request file
    pub file: PathBuf,

    /// Write the response body to a file instead of stdout
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    #[command(flatten)]
    pub output: OutputArgs,

    #[command(flatten)]
    pub policy: PolicyArgs,
}

/// Output shaping flags.
#[derive(Debug, Clone, Default, Args)]
pub struct OutputArgs {
    /// Output format: json, jsonl or text
    #[arg(long, default_value = "json")]
    pub format: String,

    /// Indent JSON output
    #[arg(long, conflicts_with = "compact")]
    pub pretty: bool,

    /// Single-line JSON output (default)
    #[arg(long)]
    pub compact: bool,

    /// Comma-separated dot-paths to keep
    #[arg(long)]
    pub select: Option<String>,

    /// Keep array elements where FIELD equals VALUE
    #[arg(long, value_name = "FIELD=VALUE")]
    pub filter: Option<String>,

    /// Sort array elements by a field
    #[arg(long, value_name = "FIELD[:asc|desc]")]
    pub sort: Option<String>,

    /// Keep the first N array elements
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Opaque pagination cursor
    #[arg(long)]
    pub cursor: Option<String>,

    /// Page number
    #[arg(long)]
    pub page: Option<u32>,

    /// Fetch every page and combine them
    #[arg(long)]
    pub all: bool,

    /// Print scalar values one per line (text format only)
    #[arg(long)]
    pub plain: bool,
}

/// Execution policy flags.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct PolicyArgs {
    /// Fetch every page of a startAt-paginated list
    #[arg(long)]
    pub paginate: bool,

    /// Exit 0 even when the server answers with an error status
    #[arg(long)]
    pub no_fail_on_non_success: bool,

    /// Allow retries of POST and PATCH
    #[arg(long)]
    pub retry_non_idempotent: bool,

    /// Confirm a mutating request
    #[arg(short = 'y', long)]
    pub yes: bool,
}

impl OutputArgs {
    /// Converts the flags to output preferences.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown format.
    pub fn to_preferences(&self) -> DomainResult<OutputPreferences> {
        let json_style = if self.pretty {
            Some(JsonStyle::Pretty)
        } else if self.compact {
            Some(JsonStyle::Compact)
        } else {
            None
        };

        Ok(OutputPreferences {
            format: self.format.parse::<OutputFormat>()?,
            json_style,
            select: self.select.clone(),
            filter: self.filter.clone(),
            sort: self.sort.clone(),
            limit: self.limit,
            cursor: self.cursor.clone(),
            page: self.page,
            all: self.all,
            plain: self.plain,
        })
    }
}

impl PolicyArgs {
    /// Copies the policy flags onto `options`.
    pub const fn apply(self, options: &mut RequestCommandOptions) {
        options.paginate = self.paginate;
        options.fail_on_non_success = !self.no_fail_on_non_success;
        options.retry_non_idempotent = self.retry_non_idempotent;
        options.confirmed = self.yes;
    }
}

impl RequestArgs {
    /// Converts everything except the body, which may need file I/O.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown method, a malformed query or header,
    /// or invalid output flags.
    pub fn to_options(&self) -> DomainResult<RequestCommandOptions> {
        let method = self.method.parse::<HttpMethod>()?;
        let mut options = RequestCommandOptions::new(method, self.path.trim());

        for raw in &self.query {
            options.query.add(raw.parse::<QueryParam>()?);
        }
        for raw in &self.header {
            options.headers.add(raw.parse::<Header>()?);
        }
        if let Some(accept) = &self.accept {
            options.accept.clone_from(accept);
        }
        options.content_type.clone_from(&self.content_type);
        options.out_path.clone_from(&self.out);
        options.output = self.output.to_preferences()?;
        self.policy.apply(&mut options);

        Ok(options)
    }
}
