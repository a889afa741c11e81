//! Output preferences chosen on the command line.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::pipeline::{FilterExpr, OutputPipeline, SortExpr, parse_select};
use crate::error::{DomainError, DomainResult};

/// Serialization format for rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// A single JSON envelope.
    #[default]
    Json,
    /// One compact envelope per array element, one per line.
    Jsonl,
    /// Unwrapped text without the envelope.
    Text,
}

impl OutputFormat {
    /// Returns the format as a static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Jsonl => "jsonl",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "jsonl" | "ndjson" => Ok(Self::Jsonl),
            "text" => Ok(Self::Text),
            other => Err(DomainError::InvalidOutputOptions(format!(
                "unknown format '{other}', expected json, jsonl or text"
            ))),
        }
    }
}

/// JSON layout for the `json` format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum JsonStyle {
    /// Indented, multi-line JSON.
    Pretty,
    /// Single-line JSON.
    #[default]
    Compact,
}

/// How the envelope should be transformed and rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OutputPreferences {
    /// Output format.
    pub format: OutputFormat,
    /// Explicit JSON style; `None` means compact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_style: Option<JsonStyle>,
    /// Comma-separated dot-paths to project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select: Option<String>,
    /// `field=value` equality filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    /// `field[:asc|desc]` sort key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    /// Maximum number of array elements to keep.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    /// Reserved cursor token, carried through but not interpreted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    /// Reserved page number, carried through but not interpreted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Fetch every page of a list endpoint.
    #[serde(default)]
    pub all: bool,
    /// Flatten text output to one scalar per line.
    #[serde(default)]
    pub plain: bool,
}

impl OutputPreferences {
    /// Returns the JSON style that applies when rendering.
    #[must_use]
    pub fn style(&self) -> JsonStyle {
        self.json_style.unwrap_or_default()
    }

    /// Checks flag combinations and parses the transformation expressions.
    ///
    /// # Errors
    ///
    /// Returns an error when `plain` is used outside the text format, when a
    /// JSON style is combined with the text format, or when an expression
    /// cannot be parsed.
    pub fn validate(&self) -> DomainResult<OutputPipeline> {
        if self.plain && self.format != OutputFormat::Text {
            return Err(DomainError::InvalidOutputOptions(
                "--plain requires --format text".to_string(),
            ));
        }
        if self.format == OutputFormat::Text && self.json_style.is_some() {
            return Err(DomainError::InvalidOutputOptions(
                "--pretty and --compact cannot be used with --format text".to_string(),
            ));
        }

        Ok(OutputPipeline {
            filter: self.filter.as_deref().map(FilterExpr::parse).transpose()?,
            sort: self.sort.as_deref().map(SortExpr::parse).transpose()?,
            limit: self.limit,
            select: self
                .select
                .as_deref()
                .map(parse_select)
                .transpose()?
                .unwrap_or_default(),
        })
    }
}
