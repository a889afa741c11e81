//! Parsed output transformation expressions.

use crate::error::{DomainError, DomainResult};

/// Keep array elements whose field stringifies to `expected`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterExpr {
    /// Dot-path of the compared field.
    pub path: String,
    /// Expected scalar string, trimmed and unquoted.
    pub expected: String,
}

impl FilterExpr {
    /// Parses `field=value`.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no `=` or the field is empty.
    pub fn parse(expression: &str) -> DomainResult<Self> {
        let invalid = |reason: &str| DomainError::InvalidExpression {
            kind: "filter",
            expression: expression.to_string(),
            reason: reason.to_string(),
        };

        let (path, expected) = expression
            .split_once('=')
            .ok_or_else(|| invalid("expected field=value"))?;
        let path = path.trim();
        if path.is_empty() {
            return Err(invalid("field is empty"));
        }

        Ok(Self {
            path: path.to_string(),
            expected: strip_quotes(expected.trim()).to_string(),
        })
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

/// Sort array elements by a field's scalar string form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortExpr {
    /// Dot-path of the sort key.
    pub path: String,
    /// Sort direction.
    pub direction: SortDirection,
}

impl SortExpr {
    /// Parses `field`, `field:asc` or `field:desc`.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is empty or the direction is unknown.
    pub fn parse(expression: &str) -> DomainResult<Self> {
        let invalid = |reason: String| DomainError::InvalidExpression {
            kind: "sort",
            expression: expression.to_string(),
            reason,
        };

        let trimmed = expression.trim();
        let (path, direction) = match trimmed.rsplit_once(':') {
            Some((path, dir)) => {
                let direction = match dir.trim().to_lowercase().as_str() {
                    "asc" => SortDirection::Ascending,
                    "desc" => SortDirection::Descending,
                    other => {
                        return Err(invalid(format!(
                            "unknown direction '{other}', expected asc or desc"
                        )));
                    }
                };
                (path.trim(), direction)
            }
            None => (trimmed, SortDirection::Ascending),
        };

        if path.is_empty() {
            return Err(invalid("field is empty".to_string()));
        }

        Ok(Self {
            path: path.to_string(),
            direction,
        })
    }
}

/// Parses a comma-separated list of dot-paths.
///
/// # Errors
///
/// Returns an error if no non-empty path is present.
pub fn parse_select(expression: &str) -> DomainResult<Vec<String>> {
    let paths: Vec<String> = expression
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(ToString::to_string)
        .collect();

    if paths.is_empty() {
        return Err(DomainError::InvalidExpression {
            kind: "select",
            expression: expression.to_string(),
            reason: "no fields given".to_string(),
        });
    }
    Ok(paths)
}

/// The validated output transformation, applied as
/// filter, then sort, then limit, then select.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutputPipeline {
    /// Equality filter.
    pub filter: Option<FilterExpr>,
    /// Sort key.
    pub sort: Option<SortExpr>,
    /// Element limit.
    pub limit: Option<usize>,
    /// Projected paths; empty means no projection.
    pub select: Vec<String>,
}

impl OutputPipeline {
    /// Returns true if applying the pipeline would leave data unchanged.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.filter.is_none() && self.sort.is_none() && self.limit.is_none() && self.select.is_empty()
    }
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_filter_parse_strips_quotes() {
        let filter = FilterExpr::parse(" fields.status = \"In Progress\" ").unwrap();
        assert_eq!(filter.path, "fields.status");
        assert_eq!(filter.expected, "In Progress");

        let single = FilterExpr::parse("key='ABC-1'").unwrap();
        assert_eq!(single.expected, "ABC-1");
    }

    #[test]
    fn test_filter_parse_keeps_equals_in_value() {
        let filter = FilterExpr::parse("expr=a=b").unwrap();
        assert_eq!(filter.expected, "a=b");
    }

    #[test]
    fn test_filter_parse_errors() {
        assert!(FilterExpr::parse("status").is_err());
        assert!(FilterExpr::parse("=open").is_err());
    }

    #[test]
    fn test_sort_parse() {
        let plain = SortExpr::parse("name").unwrap();
        assert_eq!(plain.direction, SortDirection::Ascending);

        let desc = SortExpr::parse("fields.score:DESC").unwrap();
        assert_eq!(desc.path, "fields.score");
        assert_eq!(desc.direction, SortDirection::Descending);

        assert!(SortExpr::parse("name:sideways").is_err());
        assert!(SortExpr::parse(":asc").is_err());
    }

    #[test]
    fn test_select_parse() {
        assert_eq!(parse_select("a, b.c,,").unwrap(), vec!["a", "b.c"]);
        assert!(parse_select(" , ").is_err());
    }
}
