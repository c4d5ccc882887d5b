//! JSON detection and best-effort repair.
//!
//! Text copied out of a rendered editor is often JSON that no longer parses:
//! the DOM inserted raw line breaks into string values, wrapped the document
//! in a JSON string, or surrounded it with stray text. [`repair`] undoes those
//! in a fixed sequence of steps and never recurses.

use serde_json::Value;

use crate::patterns::WHITESPACE_RUN;

/// Parse `text` as a JSON object or array. Scalars do not count.
#[must_use]
pub fn parse_structured(text: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(text.trim()) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => Some(value),
        _ => None,
    }
}

/// Parse `text` as a JSON document.
///
/// Accepts an object or array, or a JSON string whose content is itself an
/// object or array (double-encoded), in which case one level is unwrapped.
#[must_use]
pub fn parse_document(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return parse_structured(trimmed);
    }
    unwrap_encoded(trimmed).and_then(|inner| parse_structured(&inner))
}

/// Whether `text` starts like a JSON object or an encoded one.
#[must_use]
pub fn looks_like_json(text: &str) -> bool {
    let trimmed = text.trim_start();
    trimmed.starts_with('{') || trimmed.starts_with("\"{")
}

/// Content of a JSON string literal, if `text` is one and it wraps an object
/// or array.
fn unwrap_encoded(text: &str) -> Option<String> {
    if text.len() < 2 || !text.starts_with('"') || !text.ends_with('"') {
        return None;
    }
    match serde_json::from_str::<Value>(text) {
        Ok(Value::String(inner)) => {
            let inner = inner.trim();
            (inner.starts_with('{') || inner.starts_with('[')).then(|| inner.to_string())
        }
        _ => None,
    }
}

/// Try to turn JSON-looking text into a parseable JSON document.
///
/// Only attempted when the trimmed text starts with `{` or `"`. Steps, in
/// order, each returning on the first success:
///
/// 1. the text parses as is;
/// 2. the text is a JSON string wrapping an object or array;
/// 3. whitespace runs collapse to single spaces;
/// 4. the outermost `{`...`}` span of the collapsed text;
/// 5. the outermost `[`...`]` span of the collapsed text.
///
/// # Example
///
/// ```rust
/// use rs_sheetpeek::classify::json::repair;
///
/// let rendered = "{\"body\": \"line one\nline two\"}";
/// assert_eq!(repair(rendered).as_deref(), Some("{\"body\": \"line one line two\"}"));
/// assert_eq!(repair("plain words"), None);
/// ```
#[must_use]
pub fn repair(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if !(trimmed.starts_with('{') || trimmed.starts_with('"')) {
        return None;
    }

    if parse_structured(trimmed).is_some() {
        return Some(trimmed.to_string());
    }

    if let Some(inner) = unwrap_encoded(trimmed) {
        if parse_structured(&inner).is_some() {
            log::debug!("repaired JSON by unwrapping an encoded string");
            return Some(inner);
        }
    }

    let collapsed = WHITESPACE_RUN.replace_all(trimmed, " ");
    if parse_structured(&collapsed).is_some() {
        log::debug!("repaired JSON by collapsing whitespace");
        return Some(collapsed.into_owned());
    }

    for (open, close) in [('{', '}'), ('[', ']')] {
        if let Some(span) = outer_span(&collapsed, open, close) {
            if parse_structured(span).is_some() {
                log::debug!("repaired JSON from its outermost {open}{close} span");
                return Some(span.to_string());
            }
        }
    }

    None
}

fn outer_span(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}
