//! Content type classification.
//!
//! Assigns one of the [`ContentCategory`] values to a candidate string:
//!
//! 1. empty or whitespace-only text is `Empty`;
//! 2. a JSON object or array (possibly double-encoded, possibly repaired) is
//!    `JsonWithMarkdown` when any string leaf is Markdown, else `Json`;
//! 3. a Markdown score of at least [`MARKDOWN_THRESHOLD`] is `Markdown`;
//! 4. tab-separated or multi-line pipe-separated text is `Table`;
//! 5. text matching a code pattern is `Code`;
//! 6. anything else is `Text`.
//!
//! Classification is advisory. Ambiguous input falls through to a less
//! specific category and never fails.

pub mod json;
pub mod markdown;

use serde_json::Value;

pub use self::markdown::{is_markdown, markdown_score, MARKDOWN_THRESHOLD};
use crate::options::Options;
use crate::patterns::CODE_PATTERNS;
use crate::result::{ContentCategory, ContentClassification};
use crate::walker::JsonMarkdownWalker;

/// Classify `text` with default settings.
///
/// # Example
///
/// ```rust
/// use rs_sheetpeek::{classify, ContentCategory};
///
/// let c = classify("# Title\n\nSome **bold** text");
/// assert_eq!(c.category, ContentCategory::Markdown);
/// assert_eq!(c.score, 4);
///
/// assert_eq!(classify(r#"{"a": 1, "b": [2,3]}"#).category, ContentCategory::Json);
/// ```
#[must_use]
pub fn classify(text: &str) -> ContentClassification {
    ContentClassifier::default().classify(text)
}

/// Stateless content classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentClassifier {
    walker: JsonMarkdownWalker,
}

impl ContentClassifier {
    /// Classifier whose JSON walk honours `options.max_depth`.
    #[must_use]
    pub fn new(options: &Options) -> Self {
        Self {
            walker: JsonMarkdownWalker::new(options.max_depth),
        }
    }

    /// The walker used for JSON string leaves.
    #[must_use]
    pub fn walker(&self) -> &JsonMarkdownWalker {
        &self.walker
    }

    /// Classify a candidate string.
    #[must_use]
    pub fn classify(&self, text: &str) -> ContentClassification {
        self.prepare(text).1
    }

    /// Classify a candidate and return the text to forward with it.
    ///
    /// For JSON that only parses after [`json::repair`], the repaired text
    /// replaces the original so the payload is parseable downstream. Every
    /// other candidate is returned trimmed.
    #[must_use]
    pub fn prepare(&self, text: &str) -> (String, ContentClassification) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return (String::new(), scored(ContentCategory::Empty, 0));
        }

        if let Some(value) = json::parse_document(trimmed) {
            return (trimmed.to_string(), self.classify_json(&value));
        }

        if json::looks_like_json(trimmed) {
            if let Some(repaired) = json::repair(trimmed) {
                if let Some(value) = json::parse_document(&repaired) {
                    log::debug!("classified repaired JSON ({} chars)", repaired.len());
                    let classification = self.classify_json(&value);
                    return (repaired, classification);
                }
            }
        }

        (trimmed.to_string(), classify_plain(trimmed))
    }

    fn classify_json(&self, value: &Value) -> ContentClassification {
        let best = self
            .walker
            .extract_all(value)
            .iter()
            .map(|leaf| markdown_score(leaf))
            .max();
        match best {
            Some(score) => scored(ContentCategory::JsonWithMarkdown, score),
            None => scored(ContentCategory::Json, 0),
        }
    }
}

/// Steps 3 to 6 for text that is not JSON.
fn classify_plain(text: &str) -> ContentClassification {
    let score = markdown_score(text);
    let category = if score >= MARKDOWN_THRESHOLD {
        ContentCategory::Markdown
    } else if is_tabular(text) {
        ContentCategory::Table
    } else if CODE_PATTERNS.iter().any(|p| p.is_match(text)) {
        ContentCategory::Code
    } else {
        ContentCategory::Text
    };
    scored(category, score)
}

fn is_tabular(text: &str) -> bool {
    text.contains('\t') || (text.contains('|') && text.contains('\n'))
}

fn scored(category: ContentCategory, score: u32) -> ContentClassification {
    ContentClassification { category, score }
}
