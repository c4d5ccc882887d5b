//! Markdown search over parsed JSON.
//!
//! Walks arrays and objects down to their string leaves and tests each leaf
//! with [`is_markdown`]. Both walks are depth bounded; anything nested deeper
//! than the bound is treated as absent.

use serde_json::Value;

use crate::classify::is_markdown;

/// Default recursion bound.
pub const MAX_DEPTH: usize = 10;

/// Depth-bounded walker over JSON values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonMarkdownWalker {
    max_depth: usize,
}

impl Default for JsonMarkdownWalker {
    fn default() -> Self {
        Self::new(MAX_DEPTH)
    }
}

impl JsonMarkdownWalker {
    /// Walker that stops descending below `max_depth`. The root is depth 0.
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Whether any string leaf of `value` is Markdown.
    #[must_use]
    pub fn has_markdown(&self, value: &Value) -> bool {
        self.has_markdown_at(value, 0)
    }

    /// Every Markdown string leaf of `value`, in document order.
    ///
    /// Object members are visited in their parsed order and array elements
    /// by index, so repeated calls on the same value return the same list.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rs_sheetpeek::walker::JsonMarkdownWalker;
    ///
    /// let value = serde_json::json!({
    ///     "title": "plain",
    ///     "sections": ["# One", {"body": "## Two"}],
    /// });
    /// let found = JsonMarkdownWalker::default().extract_all(&value);
    /// assert_eq!(found, ["# One", "## Two"]);
    /// ```
    #[must_use]
    pub fn extract_all<'v>(&self, value: &'v Value) -> Vec<&'v str> {
        let mut found = Vec::new();
        self.collect_at(value, 0, &mut found);
        found
    }

    fn has_markdown_at(&self, value: &Value, depth: usize) -> bool {
        if depth > self.max_depth {
            return false;
        }
        match value {
            Value::String(s) => is_markdown(s),
            Value::Array(items) => items.iter().any(|v| self.has_markdown_at(v, depth + 1)),
            Value::Object(map) => map.values().any(|v| self.has_markdown_at(v, depth + 1)),
            _ => false,
        }
    }

    fn collect_at<'v>(&self, value: &'v Value, depth: usize, found: &mut Vec<&'v str>) {
        if depth > self.max_depth {
            return;
        }
        match value {
            Value::String(s) if is_markdown(s) => found.push(s),
            Value::Array(items) => {
                for item in items {
                    self.collect_at(item, depth + 1, found);
                }
            }
            Value::Object(map) => {
                for member in map.values() {
                    self.collect_at(member, depth + 1, found);
                }
            }
            _ => {}
        }
    }
}

/// [`JsonMarkdownWalker::has_markdown`] with the default bound.
#[must_use]
pub fn has_markdown(value: &Value) -> bool {
    JsonMarkdownWalker::default().has_markdown(value)
}

/// [`JsonMarkdownWalker::extract_all`] with the default bound.
#[must_use]
pub fn extract_all(value: &Value) -> Vec<&str> {
    JsonMarkdownWalker::default().extract_all(value)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn nested(depth: usize, leaf: &str) -> Value {
        (0..depth).fold(Value::from(leaf), |inner, _| json!([inner]))
    }

    #[test]
    fn test_plain_json_has_no_markdown() {
        let value = json!({"a": 1, "b": [2, 3], "c": "words"});
        assert!(!has_markdown(&value));
        assert!(extract_all(&value).is_empty());
    }

    #[test]
    fn test_leaf_at_bound_is_found() {
        assert!(has_markdown(&nested(10, "# Deep")));
        assert_eq!(extract_all(&nested(10, "# Deep")), ["# Deep"]);
    }

    #[test]
    fn test_leaf_past_bound_is_absent() {
        assert!(!has_markdown(&nested(11, "# Deep")));
        assert!(extract_all(&nested(11, "# Deep")).is_empty());
    }

    #[test]
    fn test_custom_bound() {
        let walker = JsonMarkdownWalker::new(1);
        assert!(walker.has_markdown(&nested(1, "# One")));
        assert!(!walker.has_markdown(&nested(2, "# Two")));
    }

    #[test]
    fn test_extract_all_is_deterministic() {
        let value: Value = serde_json::from_str(
            r###"{"z": "# Zed", "a": {"inner": "## Inner"}, "m": ["- one\n- two", "plain"]}"###,
        )
        .unwrap_or_default();
        let first = extract_all(&value);
        assert_eq!(first, extract_all(&value));
        assert_eq!(first, ["# Zed", "## Inner", "- one\n- two"]);
    }
}
