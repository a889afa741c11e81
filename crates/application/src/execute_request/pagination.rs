//! Accumulation of `startAt`/`maxResults` pages into one document.

use serde_json::{Map, Value};

use crate::error::{ApplicationError, ApplicationResult};

const VALUES: &str = "values";

/// What to do after a page was accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum PageStep {
    /// Fetch the page starting at this offset.
    Next(u64),
    /// Every page has been seen.
    Done,
}

/// Collects the `values` of every page plus the top-level keys of the
/// first one.
#[derive(Debug, Default)]
pub(super) struct PageAccumulator {
    template: Option<Map<String, Value>>,
    values: Vec<Value>,
}

impl PageAccumulator {
    /// Adds one page fetched at `requested_start` and decides whether
    /// another is needed.
    ///
    /// Completion is decided by `isLast` when present, else by `total`
    /// against the next offset. Only a page carrying neither ends the loop
    /// by being empty. The next offset is always past `requested_start`,
    /// even when the server echoes a stale `startAt`.
    pub(super) fn push(
        &mut self,
        page: Value,
        requested_start: u64,
    ) -> ApplicationResult<PageStep> {
        let Value::Object(mut object) = page else {
            return Err(ApplicationError::Pagination(
                "page is not a JSON object".to_string(),
            ));
        };
        let Some(Value::Array(values)) = object.remove(VALUES) else {
            return Err(ApplicationError::Pagination(format!(
                "page has no '{VALUES}' array"
            )));
        };

        let page_len = u64::try_from(values.len()).unwrap_or(u64::MAX);
        self.values.extend(values);

        let start_at = object
            .get("startAt")
            .and_then(Value::as_u64)
            .map_or(requested_start, |server| server.max(requested_start));
        let max_results = object.get("maxResults").and_then(Value::as_u64);
        let next = start_at.saturating_add(max_results.unwrap_or(page_len).max(1));

        let is_last = object.get("isLast").and_then(Value::as_bool);
        let total = object.get("total").and_then(Value::as_u64);
        let done = match (is_last, total) {
            (Some(is_last), _) => is_last,
            (None, Some(total)) => next >= total,
            (None, None) => page_len == 0,
        };

        if self.template.is_none() {
            self.template = Some(object);
        }

        Ok(if done { PageStep::Done } else { PageStep::Next(next) })
    }

    /// Number of values collected so far.
    pub(super) fn len(&self) -> usize {
        self.values.len()
    }

    /// The first page's keys with `values` replaced by everything collected.
    pub(super) fn finish(self) -> Value {
        let mut combined = self.template.unwrap_or_default();
        combined.insert(VALUES.to_string(), Value::Array(self.values));
        Value::Object(combined)
    }
}
