//! Text normalization for DOM-extracted content.
//!
//! Undoes the artifacts the host editor's rendering leaves in extracted
//! text: mixed line endings, non-breaking spaces, trailing whitespace,
//! doubled blank lines between table rows, and line breaks lost when a
//! multi-line value is flattened into one text node.

use std::borrow::Cow;

use crate::patterns::{
    DOUBLE_PIPE, GLUED_AFTER_SEPARATOR, GLUED_BULLET, GLUED_HEADING, GLUED_ORDINAL, GLUED_QUOTE,
    GLUED_ROWS, SENTENCE_BREAK, TABLE_ROW,
};

/// How much cleanup [`normalize`] applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Line endings, non-breaking spaces, outer and trailing whitespace.
    Minimal,
    /// Minimal cleanup plus blank-line collapsing and table-row repair.
    Aggressive,
}

/// Normalize raw extracted text.
///
/// Both modes are idempotent.
///
/// # Example
///
/// ```rust
/// use rs_sheetpeek::normalize::{normalize, Mode};
///
/// assert_eq!(normalize("  a \r\nb\u{a0}c  ", Mode::Minimal), "a\nb c");
/// assert_eq!(
///     normalize("| a |\n\n| b |\n\n\n\ntext", Mode::Aggressive),
///     "| a |\n| b |\n\ntext"
/// );
/// ```
#[must_use]
pub fn normalize(raw: &str, mode: Mode) -> String {
    let unified = unify(raw);
    let mut lines: Vec<&str> = unified
        .trim()
        .split('\n')
        .map(|line| line.trim_end_matches([' ', '\t']))
        .collect();

    if mode == Mode::Aggressive {
        lines = collapse_blank_runs(lines);
        lines = join_table_rows(lines);
    }

    lines.join("\n")
}

/// Unify line endings to `\n` and replace non-breaking spaces.
fn unify(raw: &str) -> Cow<'_, str> {
    if !raw.contains(['\r', '\u{a0}']) {
        return Cow::Borrowed(raw);
    }
    Cow::Owned(
        raw.replace("\r\n", "\n")
            .replace('\r', "\n")
            .replace('\u{a0}', " "),
    )
}

/// Reduce every run of blank lines to a single blank line.
fn collapse_blank_runs(lines: Vec<&str>) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    for line in lines {
        if line.is_empty() && out.last().is_some_and(|prev| prev.is_empty()) {
            continue;
        }
        out.push(line);
    }
    out
}

/// Drop a blank line sitting between two table rows.
fn join_table_rows(lines: Vec<&str>) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        if line.is_empty() {
            let after_row = out.last().is_some_and(|prev| TABLE_ROW.is_match(prev));
            let before_row = lines.get(i + 1).is_some_and(|next| TABLE_ROW.is_match(next));
            if after_row && before_row {
                continue;
            }
        }
        out.push(line);
    }
    out
}

/// Re-insert line breaks lost when multi-line content was flattened.
///
/// Best effort and lossy: breaks go before heading markers, between glued
/// table rows, before list and blockquote markers, after sentence-ending punctuation that
/// precedes a capital letter or CJK ideograph, and around code fences.
/// Text that already contains line breaks is only touched where the
/// patterns match.
#[must_use]
pub fn restore_line_breaks(text: &str) -> String {
    let restored = GLUED_HEADING.replace_all(text, "$1\n$2");
    let restored = GLUED_ROWS.replace_all(&restored, "|\n|$1");
    let restored = GLUED_AFTER_SEPARATOR.replace_all(&restored, "$1\n|");
    let restored = DOUBLE_PIPE.replace_all(&restored, "|\n|");
    let restored = GLUED_BULLET.replace_all(&restored, "$1\n$2");
    let restored = GLUED_ORDINAL.replace_all(&restored, "$1\n$2");
    let restored = GLUED_QUOTE.replace_all(&restored, "$1\n$2");
    let restored = SENTENCE_BREAK.replace_all(&restored, "$1\n\n$2");
    split_fences(&restored)
}

/// Put code fences on their own lines. An opening fence keeps its info
/// string (the first word after it).
fn split_fences(text: &str) -> String {
    const FENCE: &str = "```";

    let mut out = String::with_capacity(text.len() + 8);
    let mut rest = text;
    let mut inside = false;

    while let Some(pos) = rest.find(FENCE) {
        let before = &rest[..pos];
        out.push_str(before.trim_end_matches([' ', '\t']));
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(FENCE);
        rest = &rest[pos + FENCE.len()..];

        if inside {
            let trimmed = rest.trim_start_matches([' ', '\t']);
            if !trimmed.is_empty() && !trimmed.starts_with('\n') {
                out.push('\n');
            }
            rest = trimmed;
        } else {
            let info_len = rest
                .find(|c: char| c.is_whitespace())
                .unwrap_or(rest.len());
            out.push_str(&rest[..info_len]);
            rest = &rest[info_len..];
            let trimmed = rest.trim_start_matches([' ', '\t']);
            if !trimmed.is_empty() && !trimmed.starts_with('\n') {
                out.push('\n');
            }
            rest = trimmed;
        }
        inside = !inside;
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_unifies_and_trims() {
        let raw = "\u{a0} line one  \r\nline\u{a0}two\t\r\n\r\n  ";
        assert_eq!(normalize(raw, Mode::Minimal), "line one\nline two");
    }

    #[test]
    fn test_minimal_keeps_blank_lines_and_indentation() {
        let raw = "a\n\n\n\n  b";
        assert_eq!(normalize(raw, Mode::Minimal), "a\n\n\n\n  b");
    }

    #[test]
    fn test_minimal_is_idempotent() {
        let samples = [
            "",
            "   ",
            "a \n b \t\n\n c",
            "\u{a0}x\u{a0}\r\ny\r",
            "x\u{3000}\n \n",
            "| a |\n\n| b |",
        ];
        for s in samples {
            let once = normalize(s, Mode::Minimal);
            assert_eq!(normalize(&once, Mode::Minimal), once, "input {s:?}");
        }
    }

    #[test]
    fn test_aggressive_collapses_blank_runs() {
        let raw = "a\n\n \n\t\n\nb";
        assert_eq!(normalize(raw, Mode::Aggressive), "a\n\nb");
    }

    #[test]
    fn test_aggressive_joins_table_rows() {
        let raw = "| **industry** | **risk** |\n\n|---|---|\n\n| A | B |";
        assert_eq!(
            normalize(raw, Mode::Aggressive),
            "| **industry** | **risk** |\n|---|---|\n| A | B |"
        );
    }

    #[test]
    fn test_aggressive_keeps_blank_line_after_table() {
        let raw = "| a |\n\nprose";
        assert_eq!(normalize(raw, Mode::Aggressive), "| a |\n\nprose");
    }

    #[test]
    fn test_aggressive_is_idempotent() {
        let raw = "| a |\n\n\n\n| b |\n\n\ntext  \n";
        let once = normalize(raw, Mode::Aggressive);
        assert_eq!(normalize(&once, Mode::Aggressive), once);
    }

    #[test]
    fn test_restore_heading_and_list() {
        let flat = "Intro text # Title - first item - second item";
        assert_eq!(
            restore_line_breaks(flat),
            "Intro text\n# Title\n- first item\n- second item"
        );
    }

    #[test]
    fn test_restore_keeps_multi_hash_headings_whole() {
        assert_eq!(restore_line_breaks("## Section"), "## Section");
    }

    #[test]
    fn test_restore_table_rows() {
        let flat = "| h1 | h2 ||---|---|| a | b |";
        assert_eq!(restore_line_breaks(flat), "| h1 | h2 |\n|---|---|\n| a | b |");
    }

    #[test]
    fn test_restore_blockquotes() {
        assert_eq!(
            restore_line_breaks("Notes > keep the totals"),
            "Notes\n> keep the totals"
        );
        assert_eq!(restore_line_breaks("when x > 3 stop"), "when x > 3 stop");
    }

    #[test]
    fn test_restore_sentences() {
        assert_eq!(restore_line_breaks("Done. Next part"), "Done.\n\nNext part");
        assert_eq!(restore_line_breaks("完成。下一步"), "完成。\n\n下一步");
        assert_eq!(restore_line_breaks("version 1.2 is out"), "version 1.2 is out");
    }

    #[test]
    fn test_restore_fences() {
        let flat = "See: ```js let x = 1; ``` done";
        assert_eq!(restore_line_breaks(flat), "See:\n```js\nlet x = 1;\n```\ndone");
    }

    #[test]
    fn test_restore_leaves_bold_alone() {
        assert_eq!(restore_line_breaks("some **bold** text"), "some **bold** text");
    }
}
