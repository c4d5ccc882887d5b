//! DOM Operations Adapter
//!
//! Browser-style reads over the `dom_query` crate: `textContent`, an
//! `innerText` approximation, `closest`, inline-style visibility and position.
//! Selectors are compiled through [`matcher`] so a bad selector is an
//! [`Error::InvalidSelector`] instead of a panic.

// Re-export core types for external use
pub use dom_query::{Document, Matcher, NodeRef, Selection};

// Re-export StrTendril for external use
pub use tendril::StrTendril;

use crate::error::{Error, Result};
use crate::patterns::{DISPLAY_NONE, STYLE_LEFT, STYLE_TOP, WHITESPACE_RUN};

/// Elements that start and end a line in rendered text.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "header", "hr", "li", "main", "nav", "ol",
    "section", "table", "tbody", "tfoot", "thead", "tr", "ul",
];

/// Elements rendered with a blank line before and after.
const PARAGRAPH_TAGS: &[&str] = &["p", "h1", "h2", "h3", "h4", "h5", "h6", "pre"];

/// Attributes host editors use as stable element keys, in order.
const KEY_ATTRIBUTES: &[&str] = &["data-row-id", "data-tid", "data-id"];

/// Elements that never contribute rendered text.
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template", "head"];

// === Parsing & Selectors ===

/// Parse HTML string into document
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

/// Compile a CSS selector.
///
/// # Errors
///
/// Returns [`Error::InvalidSelector`] when the selector does not parse.
pub fn matcher(selector: &str) -> Result<Matcher> {
    Matcher::new(selector).map_err(|_| Error::InvalidSelector(selector.to_string()))
}

/// Query all elements in the document matching `selector`.
///
/// # Errors
///
/// Returns [`Error::InvalidSelector`] when the selector does not parse.
pub fn query_all<'a>(doc: &'a Document, selector: &str) -> Result<Selection<'a>> {
    let m = matcher(selector)?;
    Ok(doc.select_matcher(&m))
}

/// Query the first element in the document matching `selector`.
///
/// # Errors
///
/// Returns [`Error::InvalidSelector`] when the selector does not parse.
pub fn query_first<'a>(doc: &'a Document, selector: &str) -> Result<Option<Selection<'a>>> {
    let all = query_all(doc, selector)?;
    Ok(all.nodes().first().map(|node| Selection::from(*node)))
}

/// Query descendants of `sel` matching `selector`.
///
/// # Errors
///
/// Returns [`Error::InvalidSelector`] when the selector does not parse.
pub fn query_within<'a>(sel: &Selection<'a>, selector: &str) -> Result<Selection<'a>> {
    let m = matcher(selector)?;
    Ok(sel.select_matcher(&m))
}

/// Split a selection into one selection per element, in document order.
#[must_use]
pub fn elements<'a>(sel: &Selection<'a>) -> Vec<Selection<'a>> {
    sel.nodes()
        .iter()
        .filter(|node| node.is_element())
        .map(|node| Selection::from(*node))
        .collect()
}

/// Check whether the element matches `selector`.
///
/// # Errors
///
/// Returns [`Error::InvalidSelector`] when the selector does not parse.
pub fn element_matches(sel: &Selection, selector: &str) -> Result<bool> {
    let m = matcher(selector)?;
    Ok(sel.is_matcher(&m))
}

/// Nearest inclusive ancestor matching `selector`, like `Element.closest`.
///
/// # Errors
///
/// Returns [`Error::InvalidSelector`] when the selector does not parse.
pub fn closest<'a>(sel: &Selection<'a>, selector: &str) -> Result<Option<Selection<'a>>> {
    let m = matcher(selector)?;
    let mut current = sel.nodes().first().copied();
    while let Some(node) = current {
        if node.is_element() {
            let candidate = Selection::from(node);
            if candidate.is_matcher(&m) {
                return Ok(Some(candidate));
            }
        }
        current = node.parent();
    }
    Ok(None)
}

// === Attribute Operations ===

/// Get any attribute value
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|s| s.to_string())
}

/// Check whether the class list contains `class`.
#[must_use]
pub fn has_class(sel: &Selection, class: &str) -> bool {
    sel.attr("class")
        .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class))
}

// === Tag/Node Information ===

/// Get tag name (lowercase)
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    sel.nodes()
        .first()
        .and_then(dom_query::NodeRef::node_name)
        .map(|t| t.to_ascii_lowercase())
}

/// Key of the first element in the selection that survives re-parsing and
/// unrelated insertions elsewhere in the page.
///
/// The element's own `id` or editor data key if it has one, else its path
/// from the nearest keyed ancestor (or the root). Each path step is the tag,
/// the classes and the position among same-tag siblings.
#[must_use]
pub fn element_key(sel: &Selection) -> Option<String> {
    let node = sel.nodes().first().copied().filter(NodeRef::is_element)?;
    let mut steps = Vec::new();
    let mut current = Some(node);
    while let Some(node) = current.filter(NodeRef::is_element) {
        if let Some(anchor) = anchor(&node) {
            steps.push(anchor);
            break;
        }
        steps.push(path_step(&node));
        current = node.parent();
    }
    steps.reverse();
    Some(steps.join(">"))
}

fn anchor(node: &NodeRef) -> Option<String> {
    if let Some(id) = node.attr("id").filter(|id| !id.is_empty()) {
        return Some(format!("#{id}"));
    }
    KEY_ATTRIBUTES.iter().find_map(|name| {
        node.attr(name)
            .filter(|v| !v.is_empty())
            .map(|v| format!("[{name}={v}]"))
    })
}

fn path_step(node: &NodeRef) -> String {
    let tag = node
        .node_name()
        .map(|t| t.to_ascii_lowercase())
        .unwrap_or_default();

    let mut index = 1;
    let mut sibling = node.prev_sibling();
    while let Some(prev) = sibling {
        if prev.is_element() && prev.node_name().is_some_and(|n| n.eq_ignore_ascii_case(&tag)) {
            index += 1;
        }
        sibling = prev.prev_sibling();
    }

    let classes = node
        .attr("class")
        .map(|c| c.split_ascii_whitespace().collect::<Vec<_>>().join("."))
        .unwrap_or_default();
    if classes.is_empty() {
        format!("{tag}:{index}")
    } else {
        format!("{tag}.{classes}:{index}")
    }
}

/// Whether the element is editable, honouring inherited `contenteditable`.
#[must_use]
pub fn is_content_editable(sel: &Selection) -> bool {
    let mut current = sel.nodes().first().copied();
    while let Some(node) = current {
        if let Some(value) = node.attr("contenteditable") {
            let value = value.to_ascii_lowercase();
            return value.is_empty() || value == "true" || value == "plaintext-only";
        }
        current = node.parent();
    }
    false
}

/// The element's `value` property: an input's `value` attribute or a
/// textarea's text. `None` for elements without a value property.
#[must_use]
pub fn value(sel: &Selection) -> Option<String> {
    match tag_name(sel).as_deref() {
        Some("input" | "select") => Some(get_attribute(sel, "value").unwrap_or_default()),
        Some("textarea") => Some(sel.text().to_string()),
        _ => None,
    }
}

// === Inline Style ===

/// Whether the element is visible as far as its own inline style says.
#[must_use]
pub fn is_visible(sel: &Selection) -> bool {
    sel.attr("style")
        .is_none_or(|style| !DISPLAY_NONE.is_match(&style))
}

/// Value of one inline style property, trimmed.
#[must_use]
pub fn style_property(sel: &Selection, name: &str) -> Option<String> {
    let style = sel.attr("style")?;
    style.split(';').find_map(|decl| {
        let (prop, value) = decl.split_once(':')?;
        prop.trim()
            .eq_ignore_ascii_case(name)
            .then(|| value.trim().to_string())
    })
}

/// Inline `left`/`top` pixel offsets of the element.
#[must_use]
pub fn style_position(sel: &Selection) -> Option<(i64, i64)> {
    let style = sel.attr("style")?;
    let left = STYLE_LEFT.captures(&style)?.get(1)?.as_str().parse().ok()?;
    let top = STYLE_TOP.captures(&style)?.get(1)?.as_str().parse().ok()?;
    Some((left, top))
}

// === Text Content ===

/// Get all text content of node and descendants (`textContent`).
///
/// Returns `StrTendril` for zero-copy passing.
#[inline]
#[must_use]
pub fn text_content(sel: &Selection) -> StrTendril {
    sel.text()
}

/// Approximate the browser's `innerText` for the selection.
///
/// Block elements and `<br>` break lines, paragraphs and headings are
/// surrounded by blank lines, table cells are tab separated, whitespace runs
/// collapse outside `<pre>`, and hidden or script elements are skipped.
#[must_use]
pub fn rendered_text(sel: &Selection) -> String {
    let mut out = String::new();
    for node in sel.nodes() {
        push_rendered(node, &mut out, false);
    }
    out.trim_matches('\n').to_string()
}

fn push_rendered(node: &NodeRef, out: &mut String, preformatted: bool) {
    if node.is_text() {
        let text = node.text();
        if preformatted {
            out.push_str(&text);
        } else {
            let collapsed = WHITESPACE_RUN.replace_all(&text, " ");
            if out.is_empty() || out.ends_with(['\n', '\t', ' ']) {
                out.push_str(collapsed.trim_start());
            } else {
                out.push_str(&collapsed);
            }
        }
        return;
    }

    if !node.is_element() {
        for child in node.children() {
            push_rendered(&child, out, preformatted);
        }
        return;
    }

    let tag = node
        .node_name()
        .map(|t| t.to_ascii_lowercase())
        .unwrap_or_default();
    if SKIPPED_TAGS.contains(&tag.as_str()) {
        return;
    }
    if node
        .attr("style")
        .is_some_and(|style| DISPLAY_NONE.is_match(&style))
    {
        return;
    }
    if tag == "br" {
        trim_trailing_spaces(out);
        out.push('\n');
        return;
    }

    let breaks = if PARAGRAPH_TAGS.contains(&tag.as_str()) {
        2
    } else {
        usize::from(BLOCK_TAGS.contains(&tag.as_str()))
    };
    require_breaks(out, breaks);

    if matches!(tag.as_str(), "td" | "th") && !(out.is_empty() || out.ends_with('\n')) {
        trim_trailing_spaces(out);
        out.push('\t');
    }

    let pre = preformatted || matches!(tag.as_str(), "pre" | "textarea");
    for child in node.children() {
        push_rendered(&child, out, pre);
    }

    require_breaks(out, breaks);
}

fn trim_trailing_spaces(out: &mut String) {
    let kept = out.trim_end_matches(' ').len();
    out.truncate(kept);
}

/// Ensure `out` ends with at least `count` line breaks (nothing at the start).
fn require_breaks(out: &mut String, count: usize) {
    if count == 0 || out.is_empty() {
        return;
    }
    trim_trailing_spaces(out);
    let present = out.len() - out.trim_end_matches('\n').len();
    for _ in present..count {
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_selector_is_an_error() {
        let doc = parse("<div></div>");
        assert!(matches!(query_all(&doc, "div[["), Err(Error::InvalidSelector(_))));
    }

    #[test]
    fn test_rendered_text_breaks_blocks() {
        let doc = parse("<div id=\"r\"><div>one</div><div>two<br>three</div></div>");
        let root = doc.select("#r");
        assert_eq!(rendered_text(&root), "one\ntwo\nthree");
    }

    #[test]
    fn test_rendered_text_paragraphs_get_blank_lines() {
        let doc = parse("<div id=\"r\"><p>first</p><p>second</p></div>");
        assert_eq!(rendered_text(&doc.select("#r")), "first\n\nsecond");
    }

    #[test]
    fn test_rendered_text_skips_hidden_and_scripts() {
        let doc = parse(
            "<div id=\"r\">shown<span style=\"display:none\">hidden</span><script>x()</script></div>",
        );
        assert_eq!(rendered_text(&doc.select("#r")), "shown");
    }

    #[test]
    fn test_rendered_text_tabs_between_cells() {
        let doc = parse("<table id=\"t\"><tr><td>a</td><td>b</td></tr><tr><td>c</td><td>d</td></tr></table>");
        assert_eq!(rendered_text(&doc.select("#t")), "a\tb\nc\td");
    }

    #[test]
    fn test_text_content_keeps_raw_whitespace() {
        let doc = parse("<div id=\"r\">a  <span>b</span>\n c</div>");
        assert_eq!(text_content(&doc.select("#r")).to_string(), "a  b\n c");
    }

    #[test]
    fn test_element_key_survives_insertions() {
        let before = parse("<div id=\"grid\"><p class=\"cell a\">x</p><p>y</p></div>");
        let after = parse(
            "<span class=\"overlay\"></span><div id=\"grid\"><b></b><p class=\"cell a\">x</p><p>y</p></div>",
        );
        let key = |doc: &Document, sel: &str| element_key(&doc.select(sel));
        assert_eq!(key(&before, "p.cell"), Some("#grid>p.cell.a:1".to_string()));
        assert_eq!(key(&before, "p.cell"), key(&after, "p.cell"));
        assert_eq!(key(&before, "p:not(.cell)"), key(&after, "p:not(.cell)"));
        assert_ne!(key(&before, "p.cell"), key(&before, "p:not(.cell)"));

        let keyed = parse("<div data-row-id=\"r7\">v</div>");
        assert_eq!(key(&keyed, "div"), Some("[data-row-id=r7]".to_string()));
        assert_eq!(element_key(&before.select("#missing")), None);
    }

    #[test]
    fn test_closest_walks_ancestors() {
        let doc = parse("<div class=\"sheet-cell\"><span><b id=\"x\">v</b></span></div>");
        let b = doc.select("#x");
        let cell = closest(&b, ".sheet-cell").ok().flatten();
        assert!(cell.is_some_and(|c| has_class(&c, "sheet-cell")));
        assert!(closest(&b, "td").ok().flatten().is_none());
    }

    #[test]
    fn test_content_editable_is_inherited() {
        let doc = parse("<div contenteditable=\"true\"><p id=\"p\">x</p></div><p id=\"q\">y</p>");
        assert!(is_content_editable(&doc.select("#p")));
        assert!(!is_content_editable(&doc.select("#q")));
    }

    #[test]
    fn test_visibility_and_position() {
        let doc = parse(
            "<div id=\"a\" style=\"display: none\"></div><div id=\"b\" style=\"left: 10px; top: 20px\"></div>",
        );
        assert!(!is_visible(&doc.select("#a")));
        assert!(is_visible(&doc.select("#b")));
        assert_eq!(style_position(&doc.select("#b")), Some((10, 20)));
        assert_eq!(style_position(&doc.select("#a")), None);
        assert_eq!(style_property(&doc.select("#b"), "TOP").as_deref(), Some("20px"));
        assert_eq!(style_property(&doc.select("#b"), "width"), None);
    }

    #[test]
    fn test_value_property() {
        let doc = parse("<input id=\"i\" value=\"raw\"><textarea id=\"t\">typed</textarea><div id=\"d\"></div>");
        assert_eq!(value(&doc.select("#i")).as_deref(), Some("raw"));
        assert_eq!(value(&doc.select("#t")).as_deref(), Some("typed"));
        assert_eq!(value(&doc.select("#d")), None);
    }
}
