//! Result types for extraction and classification output.
//!
//! This module defines the extraction candidate, its classification, and the
//! outbound payload handed to the renderer. The payload's field names and the
//! category strings are a stable wire contract.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where an extraction candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceStrategy {
    /// A string found in an exposed page data model.
    DataModel,
    /// The `value` of an input-like element.
    InputValue,
    /// A data attribute holding an unrendered copy.
    DataAttribute,
    /// `textContent` of an editor container, minimally normalized.
    TextContent,
    /// Rendered text of an editor container, aggressively normalized.
    CleanedDom,
}

impl SourceStrategy {
    /// Stable label used in logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DataModel => "data-model",
            Self::InputValue => "input-value",
            Self::DataAttribute => "data-attribute",
            Self::TextContent => "text-content",
            Self::CleanedDom => "cleaned-dom",
        }
    }
}

impl fmt::Display for SourceStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A string recovered by one extraction strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionCandidate {
    /// Trimmed candidate text.
    pub text: String,

    /// Strategy that produced it.
    pub source: SourceStrategy,

    /// Length in characters of the text before trimming.
    pub raw_length: usize,
}

/// Step of the cell-resolution fallback chain that produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionStep {
    /// Formula bar or input bar, including the five-strategy extractor.
    FormulaBar,
    /// Formula input next to the cell-coordinate label.
    CellCoordinate,
    /// Selection overlay of an in-memory data-model cell.
    DataModelCell,
    /// Selection and edit overlays found by selector.
    Overlay,
    /// Input overlay positioned on the highlighted cell.
    ActiveCellProximity,
    /// Any visible editable element.
    Editable,
}

impl fmt::Display for ResolutionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::FormulaBar => "formula-bar",
            Self::CellCoordinate => "cell-coordinate",
            Self::DataModelCell => "data-model-cell",
            Self::Overlay => "overlay",
            Self::ActiveCellProximity => "active-cell-proximity",
            Self::Editable => "editable",
        };
        f.write_str(label)
    }
}

/// Text recovered by the cell-resolution chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellContent {
    /// Trimmed text.
    pub text: String,

    /// Step that produced it.
    pub step: ResolutionStep,
}

/// Content category assigned by the classifier.
///
/// Serialized names are the strings downstream renderers switch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentCategory {
    /// Empty or whitespace-only text.
    Empty,
    /// Markdown document.
    Markdown,
    /// JSON object or array without Markdown leaves.
    Json,
    /// JSON object or array with at least one Markdown string leaf.
    JsonWithMarkdown,
    /// Tab- or pipe-separated tabular text.
    Table,
    /// Source code or markup.
    Code,
    /// Anything else.
    Text,
}

impl ContentCategory {
    /// Wire string for the category.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Markdown => "markdown",
            Self::Json => "json",
            Self::JsonWithMarkdown => "json-with-markdown",
            Self::Table => "table",
            Self::Code => "code",
            Self::Text => "text",
        }
    }

    /// Whether the category is significant regardless of length.
    #[must_use]
    pub fn is_structured(self) -> bool {
        matches!(
            self,
            Self::Markdown | Self::JsonWithMarkdown | Self::Json | Self::Code | Self::Table
        )
    }
}

impl fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentClassification {
    /// Assigned category.
    pub category: ContentCategory,

    /// Markdown score behind the decision. For JSON with Markdown this is the
    /// best leaf score; for plain JSON and empty text it is zero.
    pub score: u32,
}

/// Outbound payload emitted once per accepted extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    /// Extracted text, trimmed (and repaired, for JSON).
    pub text: String,

    /// Category the renderer switches on.
    pub content_type: ContentCategory,

    /// Time of the interaction that produced the payload, epoch milliseconds
    /// on the wire.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_wire_names() {
        let names: Vec<&str> = [
            ContentCategory::Markdown,
            ContentCategory::Json,
            ContentCategory::JsonWithMarkdown,
            ContentCategory::Code,
            ContentCategory::Table,
            ContentCategory::Text,
        ]
        .iter()
        .map(|c| c.as_str())
        .collect();
        assert_eq!(names, ["markdown", "json", "json-with-markdown", "code", "table", "text"]);
    }

    #[test]
    fn test_payload_serializes_wire_contract() {
        let payload = Payload {
            text: "# Title".to_string(),
            content_type: ContentCategory::JsonWithMarkdown,
            timestamp: DateTime::from_timestamp_millis(1_700_000_000_123).unwrap_or_default(),
        };
        let json = serde_json::to_value(&payload).unwrap_or_default();
        assert_eq!(json["text"], "# Title");
        assert_eq!(json["contentType"], "json-with-markdown");
        assert_eq!(json["timestamp"], 1_700_000_000_123_i64);
    }

    #[test]
    fn test_structured_categories() {
        assert!(ContentCategory::Table.is_structured());
        assert!(!ContentCategory::Text.is_structured());
        assert!(!ContentCategory::Empty.is_structured());
    }
}
