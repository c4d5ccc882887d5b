//! Cell-resolution fallback chain.
//!
//! Used when an interaction did not land on a readable editor surface. Each
//! step runs only if the ones before it produced nothing; a failing step is
//! logged and skipped.

use crate::dom::{self, Selection};
use crate::error::Result;
use crate::normalize::{normalize, restore_line_breaks, Mode};
use crate::options::Options;
use crate::page::Page;
use crate::patterns::{
    ACTIVE_CELL, ANY_EDITABLE, CELL_LABEL, COORDINATE_FORMULA_INPUT, EDITING_STAGES,
    FORMULA_INPUT_SELECTORS, FORMULA_RENDERED_SELECTORS, FORMULA_STRUCTURE_SELECTORS,
    MODEL_SELECTIONS, MODEL_SELECTION_EDITOR, OVERLAY_SELECTORS, POSITIONED_INPUTS,
};
use crate::result::{CellContent, ResolutionStep};

use super::cell::element_text;

/// Global whose presence means the editor keeps cells in memory.
const DATA_MODEL_MARKER: &str = "basicClientVars.padData";

type Step = fn(&Page, &Options) -> Result<Option<String>>;

static STEPS: &[(ResolutionStep, Step)] = &[
    (ResolutionStep::FormulaBar, formula_bar),
    (ResolutionStep::CellCoordinate, cell_coordinate),
    (ResolutionStep::DataModelCell, data_model_cell),
    (ResolutionStep::Overlay, overlays),
    (ResolutionStep::ActiveCellProximity, active_cell_proximity),
    (ResolutionStep::Editable, any_editable),
];

/// Run the chain and return the first non-empty result.
///
/// # Example
///
/// ```rust
/// use rs_sheetpeek::{extractor, Options, Page, ResolutionStep};
///
/// let page = Page::from_html(
///     r#"<div class="single-selection" style="display: block">
///          <div contenteditable="true">=SUM(A1:A3)</div>
///        </div>"#,
/// );
/// let found = extractor::resolve_cell_content(&page, &Options::default());
/// assert_eq!(found.map(|c| c.step), Some(ResolutionStep::Overlay));
/// ```
#[must_use]
pub fn resolve_cell_content(page: &Page, options: &Options) -> Option<CellContent> {
    for &(step, run) in STEPS {
        match run(page, options) {
            Ok(Some(text)) => {
                let text = text.trim();
                if text.is_empty() {
                    continue;
                }
                log::debug!("cell chain resolved at {step} ({} chars)", text.chars().count());
                return Some(CellContent {
                    text: text.to_string(),
                    step,
                });
            }
            Ok(None) => {}
            Err(err) => log::debug!("cell chain step {step} failed: {err}"),
        }
    }
    log::debug!("cell chain found nothing");
    None
}

/// The five-strategy extractor, then a direct formula-bar read.
fn formula_bar(page: &Page, options: &Options) -> Result<Option<String>> {
    if let Some(candidate) = super::extract(page, options) {
        return Ok(Some(candidate.text));
    }
    formula_bar_direct(page)
}

/// Formula-bar read: input values, then markup that kept its line
/// structure, then rendered text with lost breaks restored.
fn formula_bar_direct(page: &Page) -> Result<Option<String>> {
    for selector in FORMULA_INPUT_SELECTORS {
        let value = page
            .find(selector)?
            .and_then(|input| dom::value(&input))
            .filter(|v| !v.trim().is_empty());
        if let Some(value) = value {
            return Ok(Some(value.trim().to_string()));
        }
    }

    for selector in FORMULA_STRUCTURE_SELECTORS {
        let Some(bar) = page.find(selector)? else {
            continue;
        };
        let structured = dom::rendered_text(&bar);
        if structured.contains('\n') {
            return Ok(Some(normalize(&structured, Mode::Minimal)));
        }
        let content = dom::text_content(&bar);
        if !content.trim().is_empty() {
            return Ok(Some(restore_flattened(&normalize(&content, Mode::Minimal))));
        }
    }

    for selector in FORMULA_RENDERED_SELECTORS {
        let Some(bar) = page.find(selector)? else {
            continue;
        };
        let rendered = dom::rendered_text(&bar);
        if !rendered.trim().is_empty() {
            let restored = restore_flattened(&rendered);
            return Ok(Some(normalize(&restored, Mode::Aggressive)));
        }
    }

    Ok(None)
}

/// Restore line breaks only in text that has none left.
fn restore_flattened(text: &str) -> String {
    if text.contains('\n') {
        text.to_string()
    } else {
        restore_line_breaks(text)
    }
}

/// The formula input or a visible editing stage, once a cell coordinate
/// label is on screen.
fn cell_coordinate(page: &Page, _options: &Options) -> Result<Option<String>> {
    let Some(label) = page.find(CELL_LABEL)? else {
        return Ok(None);
    };
    let coordinate = dom::text_content(&label).trim().to_string();

    if let Some(input) = page.find(COORDINATE_FORMULA_INPUT)? {
        if let Some(text) = trimmed_content(&input) {
            log::debug!("read cell {coordinate} from the formula input");
            return Ok(Some(text));
        }
    }

    for stage in dom::elements(&dom::query_all(page.document(), EDITING_STAGES)?) {
        if dom::is_visible(&stage) {
            if let Some(text) = trimmed_content(&stage) {
                log::debug!("read cell {coordinate} from an editing stage");
                return Ok(Some(text));
            }
        }
    }
    Ok(None)
}

/// The visible selection overlay, when the editor keeps cells in memory.
fn data_model_cell(page: &Page, _options: &Options) -> Result<Option<String>> {
    if page.global(DATA_MODEL_MARKER).is_none() {
        return Ok(None);
    }

    for selection in dom::elements(&dom::query_all(page.document(), MODEL_SELECTIONS)?) {
        if !dom::is_visible(&selection) {
            continue;
        }
        let editor = dom::elements(&dom::query_within(&selection, MODEL_SELECTION_EDITOR)?)
            .into_iter()
            .next();
        let text = dom::rendered_text(editor.as_ref().unwrap_or(&selection));
        if !text.trim().is_empty() {
            return Ok(Some(text.trim().to_string()));
        }
    }
    Ok(None)
}

/// First visible selection or edit overlay with text.
fn overlays(page: &Page, _options: &Options) -> Result<Option<String>> {
    for selector in OVERLAY_SELECTORS {
        for overlay in dom::elements(&dom::query_all(page.document(), selector)?) {
            if !dom::is_visible(&overlay) {
                continue;
            }
            let text = element_text(page, &overlay)?;
            if !text.trim().is_empty() {
                return Ok(Some(text));
            }
        }
    }
    Ok(None)
}

/// An input overlay positioned on top of the highlighted cell.
fn active_cell_proximity(page: &Page, options: &Options) -> Result<Option<String>> {
    let Some(active) = page.find(ACTIVE_CELL)? else {
        return Ok(None);
    };
    let Some((left, top)) = dom::style_position(&active) else {
        return Ok(None);
    };
    let threshold = i64::from(options.proximity_px);

    for input in dom::elements(&dom::query_all(page.document(), POSITIONED_INPUTS)?) {
        let Some((input_left, input_top)) = dom::style_position(&input) else {
            continue;
        };
        if (input_left - left).abs() < threshold && (input_top - top).abs() < threshold {
            let text = element_text(page, &input)?;
            if !text.trim().is_empty() {
                return Ok(Some(text));
            }
        }
    }
    Ok(None)
}

/// Any visible editable surface with text.
fn any_editable(page: &Page, _options: &Options) -> Result<Option<String>> {
    for editable in dom::elements(&dom::query_all(page.document(), ANY_EDITABLE)?) {
        if !dom::is_visible(&editable) {
            continue;
        }
        let text = element_text(page, &editable)?;
        if !text.trim().is_empty() {
            return Ok(Some(text));
        }
    }
    Ok(None)
}

fn trimmed_content(sel: &Selection) -> Option<String> {
    let content = dom::text_content(sel);
    let trimmed = content.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
