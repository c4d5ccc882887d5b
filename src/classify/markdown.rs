//! Markdown scoring.
//!
//! The score is a sum over a fixed table of weighted signals. Each signal
//! contributes at most once, however often its pattern occurs. List markers
//! are graded separately (0, 1 or 2) since a single bullet is weak evidence.

use crate::classify::json;
use crate::patterns::{
    BLOCKQUOTE, BOLD, FENCED_CODE, HEADING, IMAGE, INLINE_CODE, ITALIC, LINK, ORDERED_ITEM,
    STRIKETHROUGH, TABLE_ROW, TABLE_SEPARATOR, THEMATIC_BREAK, UNORDERED_ITEM,
};

/// Score at or above which text counts as Markdown.
pub const MARKDOWN_THRESHOLD: u32 = 2;

/// Shortest text (in characters) that can be Markdown.
const MIN_MARKDOWN_CHARS: usize = 3;

/// Share of non-blank lines that must be list items for the full list score.
const LIST_DENSITY: f64 = 0.3;

/// One weighted Markdown signal.
#[derive(Debug, Clone, Copy)]
pub struct Signal {
    /// Name used in score breakdowns and logs.
    pub name: &'static str,
    /// Points added when the signal is present.
    pub weight: u32,
    /// Presence test.
    pub detect: fn(&str) -> bool,
}

/// Weighted signals summed into the Markdown score.
pub static SIGNALS: &[Signal] = &[
    Signal { name: "heading", weight: 3, detect: has_heading },
    Signal { name: "fenced-code", weight: 3, detect: has_fenced_code },
    Signal { name: "bold", weight: 1, detect: has_bold },
    Signal { name: "italic", weight: 1, detect: has_italic },
    Signal { name: "inline-code", weight: 1, detect: has_inline_code },
    Signal { name: "link", weight: 2, detect: has_link },
    Signal { name: "image", weight: 2, detect: has_image },
    Signal { name: "blockquote", weight: 2, detect: has_blockquote },
    Signal { name: "thematic-break", weight: 2, detect: has_thematic_break },
    Signal { name: "strikethrough", weight: 1, detect: has_strikethrough },
    Signal { name: "table", weight: 3, detect: has_table },
];

fn has_heading(text: &str) -> bool {
    HEADING.is_match(text)
}

fn has_fenced_code(text: &str) -> bool {
    FENCED_CODE.is_match(text)
}

fn has_bold(text: &str) -> bool {
    BOLD.is_match(text)
}

fn has_italic(text: &str) -> bool {
    ITALIC.is_match(&BOLD.replace_all(text, ""))
}

fn has_inline_code(text: &str) -> bool {
    INLINE_CODE.is_match(text)
}

fn has_link(text: &str) -> bool {
    LINK.is_match(text)
}

fn has_image(text: &str) -> bool {
    IMAGE.is_match(text)
}

fn has_blockquote(text: &str) -> bool {
    BLOCKQUOTE.is_match(text)
}

fn has_thematic_break(text: &str) -> bool {
    THEMATIC_BREAK.is_match(text)
}

fn has_strikethrough(text: &str) -> bool {
    STRIKETHROUGH.is_match(text)
}

/// A pipe-delimited row directly followed (ignoring blank lines) by a
/// separator row.
fn has_table(text: &str) -> bool {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    lines
        .windows(2)
        .any(|pair| TABLE_ROW.is_match(pair[0]) && TABLE_SEPARATOR.is_match(pair[1]))
}

/// Graded list contribution: 2 for a dense list, 1 for any list item.
#[must_use]
pub fn list_score(text: &str) -> u32 {
    let mut non_blank = 0_usize;
    let mut items = 0_usize;

    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        non_blank += 1;
        let content = UNORDERED_ITEM
            .find(line)
            .or_else(|| ORDERED_ITEM.find(line))
            .map(|marker| line[marker.end()..].trim_end());
        if let Some(content) = content {
            let introduces = content.ends_with(':') || content.ends_with('\u{ff1a}');
            if content.chars().count() > 2 && !introduces {
                items += 1;
            }
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let dense = non_blank > 0 && items as f64 / non_blank as f64 > LIST_DENSITY;
    if items >= 2 && dense {
        2
    } else {
        u32::from(items >= 1)
    }
}

/// Sum of the weighted signals plus the list score.
#[must_use]
pub fn markdown_score(text: &str) -> u32 {
    SIGNALS
        .iter()
        .filter(|signal| (signal.detect)(text))
        .map(|signal| signal.weight)
        .sum::<u32>()
        + list_score(text)
}

/// Names and weights of the signals present in `text`, list score last.
#[must_use]
pub fn breakdown(text: &str) -> Vec<(&'static str, u32)> {
    let mut present: Vec<(&'static str, u32)> = SIGNALS
        .iter()
        .filter(|signal| (signal.detect)(text))
        .map(|signal| (signal.name, signal.weight))
        .collect();
    let list = list_score(text);
    if list > 0 {
        present.push(("list", list));
    }
    present
}

/// Whether a string (typically a JSON leaf) is Markdown.
///
/// Too-short strings and strings that are themselves JSON documents never
/// are.
#[must_use]
pub fn is_markdown(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.chars().count() < MIN_MARKDOWN_CHARS {
        return false;
    }
    if json::parse_structured(trimmed).is_some() {
        return false;
    }
    markdown_score(trimmed) >= MARKDOWN_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_and_bold_score() {
        assert_eq!(markdown_score("# Title\n\nSome **bold** text"), 4);
    }

    #[test]
    fn test_bold_is_not_also_italic() {
        assert_eq!(markdown_score("**x**"), 1);
        assert_eq!(markdown_score("**x** and *y*"), 2);
    }

    #[test]
    fn test_signals_count_once() {
        assert_eq!(markdown_score("**a** **b** **c**"), 1);
    }

    #[test]
    fn test_list_scoring() {
        assert_eq!(list_score("- one item"), 1);
        assert_eq!(list_score("- first\n- second"), 2);
        assert_eq!(list_score("1. alpha\n2. beta"), 2);
        assert_eq!(list_score("- ab\n- cd"), 0);
        assert_eq!(list_score("- Notes:\n- Todo:"), 0);
    }

    #[test]
    fn test_sparse_list_scores_one() {
        let text = "- first\n- second\nline\nline\nline\nline\nline";
        assert_eq!(list_score(text), 1);
    }

    #[test]
    fn test_table_needs_separator() {
        assert!(has_table("| a | b |\n|---|---|"));
        assert!(has_table("| a | b |\n\n|---|---|\n\n| 1 | 2 |"));
        assert!(!has_table("| a | b |\n| c | d |"));
    }

    #[test]
    fn test_breakdown_lists_present_signals() {
        let parts = breakdown("# Title\n- first\n- second");
        assert_eq!(parts, vec![("heading", 3), ("list", 2)]);
    }

    #[test]
    fn test_is_markdown_rejects_short_and_json() {
        assert!(!is_markdown("# "));
        assert!(!is_markdown("{\"a\": \"# Title\"}"));
        assert!(is_markdown("# Title"));
        assert!(is_markdown("[docs](https://example.com)"));
    }
}
