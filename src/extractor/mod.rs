//! Candidate extraction.
//!
//! Pulls a best-guess piece of source text out of the host editor.
//!
//! # Module Structure
//!
//! - `strategies`: the five prioritized extraction strategies
//! - `data_model`: typed probes into the page's exposed data model
//! - `cell`: event-target resolution and single-element text reads
//! - `chain`: the cell-resolution fallback chain
//!
//! # Usage
//!
//! ```rust
//! use rs_sheetpeek::{extractor, Options, Page, SourceStrategy};
//!
//! let page = Page::from_html(r#"<div class="formula-input">rendered text</div>"#)
//!     .with_globals_json(r##"{"App": {"currentCell": {"content": "# Source text"}}}"##)?;
//!
//! let candidate = extractor::extract(&page, &Options::default());
//! assert_eq!(candidate.as_ref().map(|c| c.source), Some(SourceStrategy::DataModel));
//! assert_eq!(candidate.map(|c| c.text).as_deref(), Some("# Source text"));
//! # Ok::<(), rs_sheetpeek::Error>(())
//! ```

pub mod cell;
pub mod chain;
pub mod data_model;
pub mod strategies;

pub use cell::{element_text, resolve_cell};
pub use chain::resolve_cell_content;
pub use strategies::{Strategy, STRATEGIES};

use crate::options::Options;
use crate::page::Page;
use crate::result::ExtractionCandidate;

/// Run the strategies in priority order and return the first non-empty
/// trimmed result.
///
/// A strategy that fails is logged and skipped. `None` when every strategy
/// came up empty.
#[must_use]
pub fn extract(page: &Page, options: &Options) -> Option<ExtractionCandidate> {
    for &(source, strategy) in STRATEGIES {
        match strategy(page, options) {
            Ok(Some(raw)) => {
                let text = raw.trim();
                if text.is_empty() {
                    continue;
                }
                log::debug!("{source} strategy produced {} chars", text.chars().count());
                return Some(ExtractionCandidate {
                    text: text.to_string(),
                    source,
                    raw_length: raw.chars().count(),
                });
            }
            Ok(None) => {}
            Err(err) => log::debug!("{source} strategy failed: {err}"),
        }
    }
    log::debug!("no extraction strategy produced text");
    None
}
