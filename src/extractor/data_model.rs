//! Data-model probing.
//!
//! Host editors keep the cell being edited in page globals. Reading it there
//! bypasses DOM rendering altogether, so the text arrives exactly as typed.
//! Locations are typed [`Probe`]s; every lookup returns an `Option` and a
//! missing or mistyped location is simply skipped.

use serde_json::Value;

use crate::options::Options;
use crate::page::{lookup_path, Page};
use crate::patterns::{DATA_MODEL_CELL_PATHS, PRIORITY_KEYS};

/// Strings longer than this (in characters) are meaningful on length alone.
const MEANINGFUL_CHARS: usize = 20;

/// Expected JSON shape at a probed location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A non-empty string.
    Text,
    /// An object or array worth searching.
    Container,
}

/// A dotted path and the shape expected there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe<'p> {
    pub path: &'p str,
    pub shape: Shape,
}

impl<'p> Probe<'p> {
    #[must_use]
    pub fn text(path: &'p str) -> Self {
        Self { path, shape: Shape::Text }
    }

    #[must_use]
    pub fn container(path: &'p str) -> Self {
        Self { path, shape: Shape::Container }
    }

    /// The value at the probed location, if it has the expected shape.
    #[must_use]
    pub fn evaluate<'v>(&self, root: &'v Value) -> Option<&'v Value> {
        let value = lookup_path(root, self.path)?;
        match (self.shape, value) {
            (Shape::Text, Value::String(s)) if !s.is_empty() => Some(value),
            (Shape::Container, Value::Object(_) | Value::Array(_)) => Some(value),
            _ => None,
        }
    }
}

/// Cell text from the first configured root that holds one.
#[must_use]
pub fn cell_text(page: &Page, options: &Options) -> Option<String> {
    options
        .data_model_roots
        .iter()
        .map(|root| Probe::container(root))
        .filter_map(|probe| probe.evaluate(page.globals()))
        .find_map(|model| model_cell_text(model, options))
        .map(str::to_string)
}

/// Cell text inside one data-model object: well-known cell paths first,
/// then a bounded search.
fn model_cell_text<'v>(model: &'v Value, options: &Options) -> Option<&'v str> {
    let direct = DATA_MODEL_CELL_PATHS
        .iter()
        .filter_map(|path| Probe::text(path).evaluate(model))
        .find_map(Value::as_str)
        .filter(|s| !s.trim().is_empty());
    if let Some(text) = direct {
        log::debug!("data model cell found at a well-known path");
        return Some(text);
    }
    search_text(model, 0, options)
}

/// Depth-bounded search for meaningful text.
///
/// Objects are searched under [`PRIORITY_KEYS`] first, then under their
/// remaining keys in order. Array elements are searched by index.
#[must_use]
pub fn search_text<'v>(value: &'v Value, depth: usize, options: &Options) -> Option<&'v str> {
    if depth > options.max_depth {
        return None;
    }
    match value {
        Value::String(s) => is_meaningful(s, options).then_some(s.as_str()),
        Value::Array(items) => items
            .iter()
            .find_map(|item| search_text(item, depth + 1, options)),
        Value::Object(map) => {
            let prioritized = PRIORITY_KEYS
                .iter()
                .filter_map(|key| map.get(*key))
                .find_map(|member| search_text(member, depth + 1, options));
            prioritized.or_else(|| {
                map.iter()
                    .filter(|(key, _)| !PRIORITY_KEYS.contains(&key.as_str()))
                    .find_map(|(_, member)| search_text(member, depth + 1, options))
            })
        }
        _ => None,
    }
}

/// Whether a string looks like cell content rather than a stray identifier.
fn is_meaningful(s: &str, options: &Options) -> bool {
    let len = s.chars().count();
    if s.trim().is_empty() || len >= options.max_data_model_len {
        return false;
    }
    s.contains('|') || s.contains('#') || len > MEANINGFUL_CHARS
}
