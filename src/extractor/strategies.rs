//! The five extraction strategies, purest source first.
//!
//! Each strategy returns `Ok(None)` when it has nothing to offer and `Err`
//! only for a failed DOM query. The caller treats both as "no result".

use crate::dom;
use crate::error::Result;
use crate::normalize::{normalize, Mode};
use crate::options::Options;
use crate::page::Page;
use crate::patterns::{
    DATA_ATTRIBUTES, DATA_ATTRIBUTE_CHILD, DATA_ATTRIBUTE_CONTAINERS, EDITABLE_SELECTOR,
    INPUT_VALUE_SELECTORS,
};
use crate::result::SourceStrategy;

use super::data_model;

/// A strategy probes a page for candidate text.
pub type Strategy = fn(&Page, &Options) -> Result<Option<String>>;

/// Strategies in priority order.
pub static STRATEGIES: &[(SourceStrategy, Strategy)] = &[
    (SourceStrategy::DataModel, from_data_model),
    (SourceStrategy::InputValue, from_input_value),
    (SourceStrategy::DataAttribute, from_data_attribute),
    (SourceStrategy::TextContent, from_text_content),
    (SourceStrategy::CleanedDom, from_cleaned_dom),
];

/// Text held in the page's exposed data model.
///
/// # Errors
///
/// Never fails; the signature matches [`Strategy`].
pub fn from_data_model(page: &Page, options: &Options) -> Result<Option<String>> {
    Ok(data_model::cell_text(page, options))
}

/// The raw `value` of a formula-bar or editor input, or a `data-value`
/// mirrored on a content-editable element.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidSelector`] if a selector fails to compile.
pub fn from_input_value(page: &Page, _options: &Options) -> Result<Option<String>> {
    for selector in INPUT_VALUE_SELECTORS {
        let value = page
            .find(selector)?
            .and_then(|input| dom::value(&input))
            .filter(|v| !v.trim().is_empty());
        if value.is_some() {
            return Ok(value);
        }
    }

    let editables = dom::query_all(page.document(), EDITABLE_SELECTOR)?;
    Ok(dom::elements(&editables)
        .iter()
        .filter_map(|el| dom::get_attribute(el, "data-value"))
        .find(|v| !v.trim().is_empty()))
}

/// An unrendered copy kept in a data attribute of an editor container or of
/// its first child carrying one.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidSelector`] if a selector fails to compile.
pub fn from_data_attribute(page: &Page, _options: &Options) -> Result<Option<String>> {
    for selector in DATA_ATTRIBUTE_CONTAINERS {
        let Some(container) = page.find(selector)? else {
            continue;
        };

        let own = DATA_ATTRIBUTES
            .iter()
            .filter_map(|name| dom::get_attribute(&container, name))
            .find(|v| !v.trim().is_empty());
        if own.is_some() {
            return Ok(own);
        }

        let child = dom::query_within(&container, DATA_ATTRIBUTE_CHILD)?;
        if let Some(child) = dom::elements(&child).first() {
            let mirrored = ["data-value", "data-content", "data-text"]
                .iter()
                .filter_map(|name| dom::get_attribute(child, name))
                .find(|v| !v.trim().is_empty());
            if mirrored.is_some() {
                return Ok(mirrored);
            }
        }
    }
    Ok(None)
}

/// `textContent` of the first editor container with any, minimally
/// normalized.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidSelector`] for a bad configured selector.
pub fn from_text_content(page: &Page, options: &Options) -> Result<Option<String>> {
    for selector in &options.editor_selectors {
        if let Some(editor) = page.find(selector)? {
            let content = dom::text_content(&editor);
            if !content.trim().is_empty() {
                return Ok(Some(normalize(&content, Mode::Minimal)));
            }
        }
    }
    Ok(None)
}

/// Rendered text of the first editor container with any, aggressively
/// normalized.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidSelector`] for a bad configured selector.
pub fn from_cleaned_dom(page: &Page, options: &Options) -> Result<Option<String>> {
    for selector in &options.editor_selectors {
        if let Some(editor) = page.find(selector)? {
            let rendered = dom::rendered_text(&editor);
            let raw = if rendered.trim().is_empty() {
                dom::text_content(&editor).to_string()
            } else {
                rendered
            };
            if !raw.trim().is_empty() {
                return Ok(Some(normalize(&raw, Mode::Aggressive)));
            }
        }
    }
    Ok(None)
}
