//! Output envelope, preferences and transformation expressions

mod envelope;
mod pipeline;
mod preferences;

pub use envelope::{Envelope, EnvelopeError, Meta, VERBOSE_HINT};
pub use pipeline::{FilterExpr, OutputPipeline, SortDirection, SortExpr, parse_select};
pub use preferences::{JsonStyle, OutputFormat, OutputPreferences};
