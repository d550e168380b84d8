//! Normalization of raw model output into exactly five color suggestions.
//!
//! The model is asked for a bare JSON array but routinely wraps it in prose
//! or markdown fences. Parsing is attempted strictly first, then on the
//! widest `[...]` span of the text. Whatever list comes out is mapped
//! field-by-field with defaults and then padded or truncated to
//! [`SUGGESTION_COUNT`] entries. Field values that are present are never
//! coerced or validated.

use std::sync::LazyLock;

use regex_lite::Regex;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::suggestion::{
    ColorSuggestion, DEFAULT_COLOR_NAME, DEFAULT_DESCRIPTION, DEFAULT_HEX_CODE, SUGGESTION_COUNT,
};

/// First `[` to last `]`, across newlines.
static JSON_ARRAY_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[.*\]").expect("valid array span pattern"));

/// Errors produced while turning model text into suggestions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("Could not parse AI response into valid JSON format")]
    MalformedResponse,

    #[error("Invalid response format: expected a list, got {found}")]
    UnexpectedShape { found: &'static str },
}

impl NormalizeError {
    /// Short label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            NormalizeError::MalformedResponse => "malformed_response",
            NormalizeError::UnexpectedShape { .. } => "unexpected_shape",
        }
    }
}

/// Parse the widest bracketed span of `text` as JSON.
///
/// Returns `None` when the text has no `[...]` span or the span is not
/// valid JSON. Nested and multiple arrays are handled only in the sense
/// that the outermost span is tried as a whole.
pub fn extract_json_array(text: &str) -> Option<Value> {
    let span = JSON_ARRAY_SPAN.find(text)?;
    serde_json::from_str(span.as_str()).ok()
}

/// Parse model text into a list of raw JSON elements.
pub fn parse_ai_response(text: &str) -> Result<Vec<Value>, NormalizeError> {
    let text = text.trim();

    let parsed = match serde_json::from_str::<Value>(text) {
        Ok(value) => value,
        Err(e) => {
            debug!("Strict JSON parse failed ({}), scanning for array span", e);
            extract_json_array(text).ok_or(NormalizeError::MalformedResponse)?
        }
    };

    match parsed {
        Value::Array(items) => Ok(items),
        other => Err(NormalizeError::UnexpectedShape {
            found: json_kind(&other),
        }),
    }
}

/// Suggestions ready for the client, plus how many filler records were
/// appended to reach [`SUGGESTION_COUNT`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedReply {
    pub suggestions: Vec<ColorSuggestion>,
    pub fillers_appended: usize,
}

/// Map one raw element onto a [`ColorSuggestion`], filling missing fields.
///
/// Elements that are not objects produce an all-default record.
pub fn format_suggestion(element: &Value) -> ColorSuggestion {
    let empty = Map::new();
    let fields = element.as_object().unwrap_or(&empty);

    ColorSuggestion {
        color_name: field_or(fields, "ColorName", DEFAULT_COLOR_NAME),
        hex_code: field_or(fields, "hexCode", DEFAULT_HEX_CODE),
        description: field_or(fields, "description", DEFAULT_DESCRIPTION),
    }
}

/// Pad with the filler record or truncate so exactly
/// [`SUGGESTION_COUNT`] suggestions remain, order preserved.
pub fn pad_and_truncate(mut suggestions: Vec<ColorSuggestion>) -> Vec<ColorSuggestion> {
    if suggestions.len() < SUGGESTION_COUNT {
        debug!(
            received = suggestions.len(),
            "Padding suggestions with neutral filler"
        );
        suggestions.resize_with(SUGGESTION_COUNT, ColorSuggestion::filler);
    } else if suggestions.len() > SUGGESTION_COUNT {
        debug!(
            received = suggestions.len(),
            "Truncating surplus suggestions"
        );
        suggestions.truncate(SUGGESTION_COUNT);
    }
    suggestions
}

/// Full pipeline: parse, map, then pad or truncate.
pub fn normalize_reply(text: &str) -> Result<NormalizedReply, NormalizeError> {
    let items = parse_ai_response(text)?;
    let fillers_appended = SUGGESTION_COUNT.saturating_sub(items.len());
    let suggestions = items.iter().map(format_suggestion).collect();
    Ok(NormalizedReply {
        suggestions: pad_and_truncate(suggestions),
        fillers_appended,
    })
}

/// [`normalize_reply`] without the filler count.
pub fn normalize_suggestions(text: &str) -> Result<Vec<ColorSuggestion>, NormalizeError> {
    normalize_reply(text).map(|reply| reply.suggestions)
}

/// Any present value, `null` included, passes through unchanged.
fn field_or(fields: &Map<String, Value>, key: &str, default: &str) -> Value {
    fields
        .get(key)
        .cloned()
        .unwrap_or_else(|| Value::from(default))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
