//! Turns an envelope into the text written to stdout.

use restproxy_domain::{Envelope, JsonStyle, OutputFormat, OutputPipeline, OutputPreferences};
use serde_json::Value;

use super::transform::{OutputDataTransformer, flatten_plain};
use crate::error::ApplicationResult;

/// Renders envelopes according to [`OutputPreferences`].
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputRenderer;

impl OutputRenderer {
    /// Renders `envelope` in the format requested by `prefs`.
    ///
    /// # Errors
    ///
    /// Returns an error if the preferences are invalid or serialization
    /// fails.
    pub fn render(envelope: &Envelope, prefs: &OutputPreferences) -> ApplicationResult<String> {
        let pipeline = prefs.validate()?;
        match prefs.format {
            OutputFormat::Json | OutputFormat::Jsonl => {
                Self::render_envelope(envelope, prefs, &pipeline)
            }
            OutputFormat::Text => Self::render_text(envelope, prefs, &pipeline),
        }
    }

    /// Renders the whole envelope as JSON, or as one envelope per array
    /// element for JSON Lines.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_envelope(
        envelope: &Envelope,
        prefs: &OutputPreferences,
        pipeline: &OutputPipeline,
    ) -> ApplicationResult<String> {
        let transformed = transform(envelope, pipeline);

        if prefs.format == OutputFormat::Jsonl {
            if let Some(Value::Array(items)) = &transformed.data {
                let lines = items
                    .iter()
                    .map(|item| serde_json::to_string(&transformed.with_data(Some(item.clone()))))
                    .collect::<Result<Vec<_>, _>>()?;
                return Ok(lines.join("\n"));
            }
            return Ok(serde_json::to_string(&transformed)?);
        }

        let rendered = match prefs.style() {
            JsonStyle::Pretty => serde_json::to_string_pretty(&transformed)?,
            JsonStyle::Compact => serde_json::to_string(&transformed)?,
        };
        Ok(rendered)
    }

    /// Renders the data alone, without the envelope.
    ///
    /// Failures render as the bare error message.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_text(
        envelope: &Envelope,
        prefs: &OutputPreferences,
        pipeline: &OutputPipeline,
    ) -> ApplicationResult<String> {
        if !envelope.success {
            return Ok(envelope
                .error
                .as_ref()
                .map(|error| error.message.clone())
                .unwrap_or_default());
        }

        let data = match transform(envelope, pipeline).data {
            None | Some(Value::Null) => return Ok(String::new()),
            Some(data) => data,
        };

        if prefs.plain {
            return Ok(flatten_plain(&data));
        }

        match data {
            Value::String(text) => Ok(text),
            other => Ok(serde_json::to_string_pretty(&other)?),
        }
    }
}

fn transform(envelope: &Envelope, pipeline: &OutputPipeline) -> Envelope {
    envelope.with_data(
        envelope
            .data
            .clone()
            .map(|data| OutputDataTransformer::apply(data, pipeline)),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use restproxy_domain::{EnvelopeError, ErrorCode, Meta};
    use serde_json::json;

    fn meta() -> Meta {
        Meta {
            status_code: Some(200),
            ..Meta::new("0.1.0")
        }
    }

    fn prefs(format: OutputFormat) -> OutputPreferences {
        OutputPreferences {
            format,
            ..OutputPreferences::default()
        }
    }

    #[test]
    fn test_json_compact_by_default() {
        let envelope = Envelope::success(Some(json!({"ok": true})), meta());
        let rendered = OutputRenderer::render(&envelope, &prefs(OutputFormat::Json)).unwrap();
        assert_eq!(
            rendered,
            r#"{"success":true,"data":{"ok":true},"error":null,"meta":{"version":"0.1.0","statusCode":200}}"#
        );
    }

    #[test]
    fn test_json_pretty() {
        let envelope = Envelope::success(Some(json!({"ok": true})), meta());
        let mut prefs = prefs(OutputFormat::Json);
        prefs.json_style = Some(JsonStyle::Pretty);
        let rendered = OutputRenderer::render(&envelope, &prefs).unwrap();
        assert!(rendered.contains("\n  \"success\": true"));
    }

    #[test]
    fn test_jsonl_emits_one_envelope_per_element() {
        let envelope = Envelope::success(Some(json!([{"id": 1}, {"id": 2}, {"id": 3}])), meta());
        let rendered = OutputRenderer::render(&envelope, &prefs(OutputFormat::Jsonl)).unwrap();

        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        for (index, line) in lines.iter().enumerate() {
            let parsed: Envelope = serde_json::from_str(line).unwrap();
            assert!(parsed.success);
            assert_eq!(parsed.data, Some(json!({"id": index + 1})));
            assert_eq!(parsed.meta, meta());
        }
    }

    #[test]
    fn test_jsonl_applies_transforms_before_splitting() {
        let envelope = Envelope::success(
            Some(json!([{"id": 1, "s": "x"}, {"id": 2, "s": "y"}, {"id": 3, "s": "x"}])),
            meta(),
        );
        let mut prefs = prefs(OutputFormat::Jsonl);
        prefs.filter = Some("s=x".into());
        prefs.select = Some("id".into());
        let rendered = OutputRenderer::render(&envelope, &prefs).unwrap();
        assert_eq!(rendered.lines().count(), 2);
        assert!(rendered.lines().all(|line| !line.contains("\"s\"")));
    }

    #[test]
    fn test_jsonl_non_array_falls_back_to_single_line() {
        let envelope = Envelope::success(Some(json!({"id": 1})), meta());
        let rendered = OutputRenderer::render(&envelope, &prefs(OutputFormat::Jsonl)).unwrap();
        assert_eq!(rendered.lines().count(), 1);
    }

    #[test]
    fn test_text_failure_is_message_only() {
        let envelope = Envelope::failure(
            EnvelopeError::new(ErrorCode::NotFound, "HTTP 404 Not Found"),
            meta(),
        );
        let rendered = OutputRenderer::render(&envelope, &prefs(OutputFormat::Text)).unwrap();
        assert_eq!(rendered, "HTTP 404 Not Found");
    }

    #[test]
    fn test_text_variants() {
        let text = prefs(OutputFormat::Text);

        let empty = Envelope::success(None, meta());
        assert_eq!(OutputRenderer::render(&empty, &text).unwrap(), "");

        let string = Envelope::success(Some(json!("hello")), meta());
        assert_eq!(OutputRenderer::render(&string, &text).unwrap(), "hello");

        let object = Envelope::success(Some(json!({"a": 1})), meta());
        assert_eq!(OutputRenderer::render(&object, &text).unwrap(), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_text_plain_flattens() {
        let mut plain = prefs(OutputFormat::Text);
        plain.plain = true;
        plain.select = Some("key".into());

        let envelope = Envelope::success(Some(json!([{"key": "A-1"}, {"key": "A-2"}])), meta());
        assert_eq!(
            OutputRenderer::render(&envelope, &plain).unwrap(),
            "{\"key\":\"A-1\"}\n{\"key\":\"A-2\"}"
        );

        let scalars = Envelope::success(Some(json!(["A-1", "A-2"])), meta());
        assert_eq!(OutputRenderer::render(&scalars, &plain).unwrap(), "A-1\nA-2");
    }

    #[test]
    fn test_invalid_preferences_are_rejected() {
        let envelope = Envelope::success(None, meta());
        let mut prefs = prefs(OutputFormat::Json);
        prefs.plain = true;
        assert!(OutputRenderer::render(&envelope, &prefs).is_err());
    }
}
