//! Cell resolution and single-element text reads.

use crate::dom::{self, Selection};
use crate::error::Result;
use crate::page::Page;
use crate::patterns::{
    CELL_ANCESTORS, CELL_CONTENT, EDITING_STAGES, GRID_CELL, RICH_TEXT_EDITORS, SLATE_LEAVES,
};

/// Text longer than this (in characters) marks an element as content.
const CONTENT_CHARS: usize = 5;

/// Ancestors inspected when no cell-like ancestor exists.
const ANCESTOR_LOOKUP: usize = 3;

/// Map an event target to the cell or text area it belongs to.
///
/// Tried in order: the target if it is a grid cell; its nearest ancestor
/// matching [`CELL_ANCESTORS`] (in that priority); the focused input,
/// textarea or editable element; the target if it holds text; the nearest
/// of three ancestors holding text; the target itself.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidSelector`] if a selector fails to compile.
pub fn resolve_cell<'a>(page: &'a Page, target: &Selection<'a>) -> Result<Selection<'a>> {
    if dom::element_matches(target, GRID_CELL)? {
        return Ok(target.clone());
    }

    for selector in CELL_ANCESTORS {
        if let Some(cell) = dom::closest(target, selector)? {
            return Ok(cell);
        }
    }

    if let Some(active) = page.focused() {
        let editable = matches!(dom::tag_name(&active).as_deref(), Some("input" | "textarea"))
            || dom::is_content_editable(&active);
        if editable {
            return Ok(active);
        }
    }

    if holds_text(target) {
        return Ok(target.clone());
    }

    let mut current = target.parent();
    for _ in 0..ANCESTOR_LOOKUP {
        if !current.exists() {
            break;
        }
        if holds_text(&current) {
            return Ok(current);
        }
        current = current.parent();
    }

    Ok(target.clone())
}

fn holds_text(sel: &Selection) -> bool {
    dom::text_content(sel).trim().chars().count() > CONTENT_CHARS
}

/// Read the text of one element, preferring unrendered sources.
///
/// In order: an input's value; a cell-content child; a document paragraph;
/// a nested rich-text editor; Slate text leaves joined by line breaks; the
/// element if editable; the element if a grid cell; an editable in-cell
/// editing stage anywhere on the page; the element's rendered text; its
/// trimmed `textContent`.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidSelector`] if a selector fails to compile.
pub fn element_text(page: &Page, element: &Selection) -> Result<String> {
    if let Some(value) = dom::value(element) {
        return Ok(value);
    }

    if let Some(content) = dom::elements(&dom::query_within(element, CELL_CONTENT)?).first() {
        if let Some(text) = non_blank(dom::rendered_text(content)) {
            return Ok(text);
        }
    }

    if dom::has_class(element, "paragraph") || dom::has_class(element, "para-graph") {
        if let Some(text) = non_blank(dom::rendered_text(element)) {
            return Ok(text);
        }
    }

    for editor in dom::elements(&dom::query_within(element, RICH_TEXT_EDITORS)?) {
        if let Some(text) = non_blank(dom::rendered_text(&editor)) {
            return Ok(text);
        }
    }

    let leaves = dom::elements(&dom::query_within(element, SLATE_LEAVES)?);
    if !leaves.is_empty() {
        let joined = leaves
            .iter()
            .map(|leaf| dom::text_content(leaf).to_string())
            .collect::<Vec<_>>()
            .join("\n");
        if let Some(text) = non_blank(joined) {
            return Ok(text.trim().to_string());
        }
    }

    if dom::is_content_editable(element) || dom::element_matches(element, GRID_CELL)? {
        if let Some(text) = non_blank(dom::rendered_text(element)) {
            return Ok(text);
        }
    }

    for stage in dom::elements(&dom::query_all(page.document(), EDITING_STAGES)?) {
        if dom::is_content_editable(&stage) {
            if let Some(text) = non_blank(dom::rendered_text(&stage)) {
                return Ok(text);
            }
        }
    }

    if let Some(text) = non_blank(dom::rendered_text(element)) {
        return Ok(text);
    }

    Ok(dom::text_content(element).trim().to_string())
}

fn non_blank(text: String) -> Option<String> {
    (!text.trim().is_empty()).then_some(text)
}
