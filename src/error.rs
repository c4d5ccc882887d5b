//! Error types for rs-sheetpeek.
//!
//! Extraction itself never fails outward: strategies report these errors to
//! the chain that runs them, which logs and skips. They surface only from
//! page construction and from the individual strategy functions.

/// Error type for page construction and strategy probing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A CSS selector could not be compiled.
    #[error("invalid selector: {0}")]
    InvalidSelector(String),

    /// Page globals were not a JSON object.
    #[error("invalid page globals: {0}")]
    InvalidGlobals(String),

    /// Page URL could not be parsed.
    #[error("invalid page url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A selector expected to name an element matched nothing.
    #[error("no element matches {0}")]
    ElementNotFound(String),
}

/// Result type alias for rs-sheetpeek operations.
pub type Result<T> = std::result::Result<T, Error>;
