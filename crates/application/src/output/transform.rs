//! Filter, sort, limit and select over the `data` of an envelope.

use restproxy_domain::json_path;
use restproxy_domain::output::{FilterExpr, OutputPipeline, SortDirection, SortExpr};
use serde_json::{Map, Value};

/// Applies an [`OutputPipeline`] to response data.
///
/// The order is fixed: filter, sort, limit, then select. Filter, sort and
/// limit only touch arrays; select projects objects and arrays of objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputDataTransformer;

impl OutputDataTransformer {
    /// Runs every configured stage over `data`.
    #[must_use]
    pub fn apply(data: Value, pipeline: &OutputPipeline) -> Value {
        if pipeline.is_identity() {
            return data;
        }

        let mut data = data;
        if let Some(filter) = &pipeline.filter {
            data = Self::filter(data, filter);
        }
        if let Some(sort) = &pipeline.sort {
            data = Self::sort(data, sort);
        }
        if let Some(limit) = pipeline.limit {
            data = Self::limit(data, limit);
        }
        if !pipeline.select.is_empty() {
            data = Self::select(data, &pipeline.select);
        }
        data
    }

    fn filter(data: Value, filter: &FilterExpr) -> Value {
        match data {
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .filter(|item| {
                        json_path::get(item, &filter.path)
                            .is_some_and(|field| json_path::scalar_string(field) == filter.expected)
                    })
                    .collect(),
            ),
            other => other,
        }
    }

    fn sort(data: Value, sort: &SortExpr) -> Value {
        let Value::Array(items) = data else {
            return data;
        };

        let mut keyed: Vec<(String, Value)> = items
            .into_iter()
            .map(|item| {
                let key = json_path::get(&item, &sort.path)
                    .map(json_path::scalar_string)
                    .unwrap_or_default();
                (key, item)
            })
            .collect();

        // slice::sort_by is stable, so equal keys keep their input order in
        // both directions.
        match sort.direction {
            SortDirection::Ascending => keyed.sort_by(|a, b| a.0.cmp(&b.0)),
            SortDirection::Descending => keyed.sort_by(|a, b| b.0.cmp(&a.0)),
        }

        Value::Array(keyed.into_iter().map(|(_, item)| item).collect())
    }

    fn limit(data: Value, limit: usize) -> Value {
        match data {
            Value::Array(mut items) => {
                items.truncate(limit);
                Value::Array(items)
            }
            other => other,
        }
    }

    fn select(data: Value, paths: &[String]) -> Value {
        match data {
            Value::Object(map) => Value::Object(project(&map, paths)),
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| match item {
                        Value::Object(map) => Value::Object(project(&map, paths)),
                        other => other,
                    })
                    .collect(),
            ),
            other => other,
        }
    }
}

/// Keeps only `paths`, keyed by their last segment. Missing paths are
/// omitted.
fn project(object: &Map<String, Value>, paths: &[String]) -> Map<String, Value> {
    let source = Value::Object(object.clone());
    paths
        .iter()
        .filter_map(|path| {
            json_path::get(&source, path)
                .map(|value| (json_path::leaf(path).to_string(), value.clone()))
        })
        .collect()
}

/// Flattens data into newline-separated scalar strings: one line per array
/// element, or a single line for anything else.
#[must_use]
pub fn flatten_plain(data: &Value) -> String {
    match data {
        Value::Array(items) => items
            .iter()
            .map(json_path::scalar_string)
            .collect::<Vec<_>>()
            .join("\n"),
        other => json_path::scalar_string(other),
    }
}
