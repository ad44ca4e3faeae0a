//! Field builders that turn raw inputs into normalized note fields.
//!
//! # Invariants
//! - Builders are pure: no I/O, no clock reads.
//! - Tag normalization is idempotent.

use serde_json::Value;

const HASHTAG: char = '#';

/// Note comment, passed through unchanged.
pub fn comment(text: Option<&str>) -> Option<String> {
    text.map(str::to_string)
}

/// Note content, passed through unchanged.
pub fn content(text: Option<&str>) -> Option<String> {
    text.map(str::to_string)
}

/// Markdown code block language: the explicit value, else `default`.
pub fn content_type(explicit: Option<&str>, default: &str) -> String {
    explicit.unwrap_or(default).to_string()
}

/// Note header.
///
/// - `Some(text)` with `append_date` -> `"<text> / <date>"`
/// - `Some(text)` without `append_date` -> `text`
/// - `None` -> `date`
pub fn header(text: Option<&str>, date: &str, append_date: bool) -> String {
    match text {
        Some(text) if append_date => format!("{text} / {date}"),
        Some(text) => text.to_string(),
        None => date.to_string(),
    }
}

/// Tags coerced to strings, prefixed with `#` when `auto_hashtag` is set.
pub fn tags(values: &[Value], auto_hashtag: bool) -> Vec<String> {
    sequence_field(values, |value| {
        let tag = tag_text(value);
        if auto_hashtag && !tag.starts_with(HASHTAG) {
            format!("{HASHTAG}{tag}")
        } else {
            tag
        }
    })
}

/// Urls, unchanged.
pub fn urls(values: &[String]) -> Vec<String> {
    sequence_field(values, String::clone)
}

fn sequence_field<T>(values: &[T], normalize: impl Fn(&T) -> String) -> Vec<String> {
    values.iter().map(normalize).collect()
}

/// Strings are used as-is. Booleans and null read `True`, `False` and
/// `None`; any other value uses its JSON text.
fn tag_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Null => "None".to_string(),
        other => other.to_string(),
    }
}
