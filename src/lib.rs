//! # rs-sheetpeek
//!
//! Heuristic cell-content extraction and content-type classification for
//! web spreadsheet editors.
//!
//! The host editor renders cells through its own layout engine and exposes
//! no stable API. This library recovers a best guess of the source text of
//! whatever the user last interacted with, labels it so a viewer can pick a
//! renderer, and suppresses the flood of repeat triggers the editor's DOM
//! produces.
//!
//! ## Quick Start
//!
//! ```rust
//! use rs_sheetpeek::{classify, extract, ContentCategory, Options, Page};
//!
//! let page = Page::from_html(
//!     r##"<div class="formula-input"><input value="# Title&#10;&#10;Some **bold** text"></div>"##,
//! );
//!
//! let candidate = extract(&page, &Options::default()).map(|c| c.text);
//! let category = candidate.as_deref().map(|text| classify(text).category);
//! assert_eq!(category, Some(ContentCategory::Markdown));
//! ```
//!
//! ## Pipeline
//!
//! - **Normalization**: undoes rendering artifacts in extracted text
//! - **Classification**: Markdown, JSON, JSON with Markdown, table, code or text
//! - **Extraction**: prioritized strategies plus a cell-resolution fallback chain
//! - **Gating**: per-element and per-content de-duplication with time windows
//! - **Observation**: settle-delay scheduling of reads after clicks and mutations

mod error;
mod event;
mod options;
mod page;
mod patterns;
mod result;

/// DOM operations adapter over `dom_query`.
pub mod dom;

/// Text normalization and line-break restoration.
pub mod normalize;

/// Content type classification and JSON repair.
pub mod classify;

/// Markdown search over parsed JSON.
pub mod walker;

/// Candidate extraction strategies and the cell-resolution chain.
pub mod extractor;

/// Interaction gate and its record of the last accepted candidate.
pub mod gate;

/// Cancellable settle-delay task.
pub mod debounce;

/// Event-driven pipeline tying extraction, classification and gating together.
pub mod observer;

// Public API - re-exports
pub use classify::{classify, ContentClassifier};
pub use error::{Error, Result};
pub use event::{Interaction, InteractionKind, KeyPress, MutationRecord};
pub use extractor::extract;
pub use gate::{InteractionGate, InteractionRecord, Verdict};
pub use observer::Observer;
pub use options::Options;
pub use page::{lookup_path, ElementId, Page};
pub use result::{
    CellContent, ContentCategory, ContentClassification, ExtractionCandidate, Payload,
    ResolutionStep, SourceStrategy,
};
