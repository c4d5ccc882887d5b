//! Compiled regex patterns and CSS selectors for extraction and classification.
//!
//! All patterns are compiled once at first use using `LazyLock`.
//! Patterns are organized by the pipeline stage that uses them.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Markdown Signal Patterns
// =============================================================================

/// ATX heading line.
pub static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#{1,6}[ \t]+\S").expect("HEADING regex"));

/// Fenced code block with opening and closing fence.
pub static FENCED_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```.*?```").expect("FENCED_CODE regex"));

/// Bold emphasis with asterisks.
pub static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*[^*\n]+\*\*").expect("BOLD regex"));

/// Italic emphasis with single asterisks. Only meaningful after bold spans
/// have been removed, since `**x**` contains `*x*`.
pub static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*[^*\n]+\*").expect("ITALIC regex"));

/// Inline code span.
pub static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`[^`\n]+`").expect("INLINE_CODE regex"));

/// Inline hyperlink `[text](target)`.
pub static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]\n]+\]\([^)\n]+\)").expect("LINK regex"));

/// Inline image `![alt](src)`.
pub static IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[[^\]\n]*\]\([^)\n]+\)").expect("IMAGE regex"));

/// Blockquote line.
pub static BLOCKQUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*>[ \t]+").expect("BLOCKQUOTE regex"));

/// Thematic break: three or more `-` or `=` alone on a line.
pub static THEMATIC_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*(?:-{3,}|={3,})[ \t]*$").expect("THEMATIC_BREAK regex"));

/// Strikethrough span.
pub static STRIKETHROUGH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"~~[^~\n]+~~").expect("STRIKETHROUGH regex"));

/// Unordered list marker at line start.
pub static UNORDERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-*+]\s+").expect("UNORDERED_ITEM regex"));

/// Ordered list marker at line start.
pub static ORDERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+\.\s+").expect("ORDERED_ITEM regex"));

/// A pipe-delimited table row.
pub static TABLE_ROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\|.*\|\s*$").expect("TABLE_ROW regex"));

/// A pipe-delimited table separator row (`|---|:--:|`).
pub static TABLE_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\|(?:\s*:?-+:?\s*\|)+\s*$").expect("TABLE_SEPARATOR regex")
});

// =============================================================================
// Code Detection Patterns
// =============================================================================

/// Code-like patterns: declarations, imports, braced control flow, SQL, markup.
pub static CODE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"function\s+\w+\s*\(",
        r"\bclass\s+[A-Za-z_]\w*(?:\s*\([^)]*\))?(?:\s+extends\s+[\w.]+)?\s*[:{]",
        r"\bimport\s+.*\bfrom\b",
        r"\w+\s*=\s*\{[\s\S]*\}",
        r"\bif\s*\([^)]+\)\s*\{",
        r"\bfor\s*\([^)]*\)\s*\{",
        r"\bwhile\s*\([^)]*\)\s*\{",
        r"<[A-Za-z][\w-]*[^>]*>",
        r"(?i)\bselect\s+.+?\s+from\s+\w+(?:\s+(?:where|join|group|order|limit)\b|\s*;|\s*$)",
        r"\bdef\s+\w+\s*\(",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("CODE_PATTERNS regex"))
    .collect()
});

// =============================================================================
// Line Break Restoration Patterns
// =============================================================================

/// Heading marker glued to preceding text.
pub static GLUED_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^\n#])[ \t]*(#{1,6}[ \t])").expect("GLUED_HEADING regex"));

/// Two table rows glued pipe-to-pipe.
pub static GLUED_ROWS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\|[ \t]*\|([ \t]*:?-{3,})").expect("GLUED_ROWS regex"));

/// A separator row followed directly by another row.
pub static GLUED_AFTER_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(-{3,}:?[ \t]*\|)[ \t]*\|").expect("GLUED_AFTER_SEPARATOR regex"));

/// Row boundary written as `||`.
pub static DOUBLE_PIPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\|\|").expect("DOUBLE_PIPE regex"));

/// Unordered list marker glued to preceding text.
pub static GLUED_BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^\s*])[ \t]+([-*+][ \t]+\S)").expect("GLUED_BULLET regex"));

/// Ordered list marker glued to preceding text.
pub static GLUED_ORDINAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^\s\d])[ \t]+(\d+\.[ \t]+\S)").expect("GLUED_ORDINAL regex"));

/// Blockquote marker glued to preceding text. A digit after the marker reads
/// as a comparison and is left alone.
pub static GLUED_QUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^\n>])[ \t]+(>[ \t]+[^\s\d=])").expect("GLUED_QUOTE regex"));

/// Sentence end followed by a capital letter or CJK ideograph.
pub static SENTENCE_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([.!?\x{3002}\x{FF01}\x{FF1F}])[ \t]*([A-Z\x{4E00}-\x{9FA5}])")
        .expect("SENTENCE_BREAK regex")
});

// =============================================================================
// DOM Style Patterns
// =============================================================================

/// Inline `display: none`.
pub static DISPLAY_NONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)display\s*:\s*none").expect("DISPLAY_NONE regex"));

/// Inline `left: Npx`.
pub static STYLE_LEFT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^|[;\s])left\s*:\s*(-?\d+)(?:\.\d+)?px").expect("STYLE_LEFT regex"));

/// Inline `top: Npx`.
pub static STYLE_TOP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^|[;\s])top\s*:\s*(-?\d+)(?:\.\d+)?px").expect("STYLE_TOP regex"));

/// Whitespace run, for rendered-text collapsing.
pub static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\r\n\x{0C}]+").expect("WHITESPACE_RUN regex"));

// =============================================================================
// CSS Selectors
// =============================================================================

/// Input-like elements holding the raw cell value.
pub const INPUT_VALUE_SELECTORS: &[&str] = &[
    ".formula-input input",
    ".ae-formula-input input",
    "input[role=\"combobox\"]",
    ".table-input-stage input",
    "#alloy-simple-text-editor input",
    "input[type=\"text\"]",
];

/// Content-editable elements that may mirror their content in `data-value`.
pub const EDITABLE_SELECTOR: &str = "[contenteditable=\"true\"]";

/// Containers that may carry an unrendered copy of the content.
pub const DATA_ATTRIBUTE_CONTAINERS: &[&str] = &[
    ".formula-input",
    ".ae-formula-input",
    ".table-input-stage",
    ".cell-editor-container",
    "[role=\"combobox\"]",
];

/// Data attributes checked on those containers, in order.
pub const DATA_ATTRIBUTES: &[&str] = &[
    "data-value",
    "data-content",
    "data-text",
    "data-original",
    "data-raw",
    "data-cell-value",
];

/// Children of a container that carry data attributes.
pub const DATA_ATTRIBUTE_CHILD: &str = "[data-value], [data-content], [data-text]";

/// Cell selectors within a data-model object, tried before a free search.
pub const DATA_MODEL_CELL_PATHS: &[&str] = &[
    "currentCell.content",
    "currentCell.value",
    "selectedCell.content",
    "selectedCell.value",
    "activeCell.content",
    "activeCell.value",
    "cellData.content",
    "cellData.value",
    "formulaBar.content",
    "formulaBar.value",
];

/// Property names searched first in a data-model object.
pub const PRIORITY_KEYS: &[&str] = &["content", "value", "text", "data", "body", "markdown"];

/// Formula-bar inputs for the legacy formula-bar read.
pub const FORMULA_INPUT_SELECTORS: &[&str] = &[
    ".formula-input input",
    ".ae-formula-input input",
    "input[role=\"combobox\"]",
    ".table-input-stage input",
];

/// Formula-bar containers whose markup still carries line structure.
pub const FORMULA_STRUCTURE_SELECTORS: &[&str] = &[
    ".formula-bar .formula-input",
    "#alloy-simple-text-editor",
    ".ae-formula-input",
];

/// Formula-bar containers read as rendered text.
pub const FORMULA_RENDERED_SELECTORS: &[&str] = &[
    "#mainContainer .formula-input",
    ".ae-formula-bar .ae-formula-input",
    "#formula_bar_ssr .formula-input",
    "[role=\"combobox\"][data-placeholder]",
];

/// Label holding the current cell coordinate (`E11`).
pub const CELL_LABEL: &str = ".bar-label, .ae-bar-label";

/// Formula input read by the coordinate step.
pub const COORDINATE_FORMULA_INPUT: &str = ".formula-input, .ae-formula-input";

/// In-cell editing surfaces.
pub const EDITING_STAGES: &str = ".table-input-stage, #alloy-rich-text-editor";

/// Selection overlays consulted when the data model is present.
pub const MODEL_SELECTIONS: &str =
    ".single-selection, .cell-editor-container, .cell-editor-stage, .table-input-stage";

/// Editor inside a selection overlay.
pub const MODEL_SELECTION_EDITOR: &str = "#alloy-rich-text-editor, [contenteditable=\"true\"]";

/// Selection and edit overlays, in order.
pub const OVERLAY_SELECTORS: &[&str] = &[
    ".single-selection",
    ".cell-editor-container",
    ".table-input-stage",
    ".table-input",
    ".table-input-board .table-input-stage",
    ".operate-board .cell-editor-container",
    ".formula-input",
    "[contenteditable=\"true\"][role=\"combobox\"]",
];

/// Highlighted cell frame.
pub const ACTIVE_CELL: &str = ".single-selection[style*=\"display: block\"]";

/// Input overlays matched to the highlighted cell by position.
pub const POSITIONED_INPUTS: &str = ".table-input-stage, [contenteditable=\"true\"][role=\"combobox\"]";

/// Last-resort editable surfaces.
pub const ANY_EDITABLE: &str = ".table-input, #alloy-rich-text-editor, [contenteditable=\"true\"]";

/// Elements that are themselves grid cells.
pub const GRID_CELL: &str = ".sheet-cell, [role=\"gridcell\"], td, th";

/// Ancestors that identify a cell or text area, in priority order.
pub const CELL_ANCESTORS: &[&str] = &[
    ".sheet-cell",
    "[role=\"gridcell\"]",
    "[data-row-id]",
    "td",
    "th",
    ".paragraph",
    ".para-graph",
    "[contenteditable=\"true\"]",
    ".doc-editor",
    "[data-tid]",
    "[data-id]",
];

/// Cell content wrappers inside a cell.
pub const CELL_CONTENT: &str = ".sheet-cell-content, .single-line-cell, [data-id=\"cell-content\"]";

/// Rich-text editors nested in an element.
pub const RICH_TEXT_EDITORS: &str = "[contenteditable=\"true\"], .doc-editor-container";

/// Slate editor text leaves.
pub const SLATE_LEAVES: &str = "[data-slate-string], [data-slate-leaf]";

/// Sheet areas whose clicks are handled through the settle delay.
pub const SHEET_AREAS: &[&str] = &[
    ".cell-active",
    ".cell-selected",
    ".main-board",
    ".excel-container",
    ".block-board",
    ".sheet-cell",
    "[role=\"gridcell\"]",
    "td",
    "th",
];

/// Editor overlays whose appearance signals a new cell selection.
pub const OVERLAY_CLASSES: &[&str] = &[
    "single-selection",
    "table-input-stage",
    "cell-editor-container",
    "table-input",
    "select-selection-border",
];

/// Editor overlay ids.
pub const OVERLAY_IDS: &[&str] = &["alloy-rich-text-editor", "alloy-simple-text-editor"];

/// Descendants of an added node that signal a new cell selection.
pub const OVERLAY_DESCENDANTS: &str = ".single-selection, .table-input-stage, .cell-editor-container, \
     #alloy-rich-text-editor, .table-input, .select-selection-border, \
     [contenteditable=\"true\"][role=\"combobox\"], .formula-input";
