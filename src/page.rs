//! Host page snapshots.
//!
//! A [`Page`] is everything the extractor may read from the host editor at one
//! moment: the parsed DOM, the data model the page exposes as globals, its
//! URL, the focused element and the user's text selection.

use serde_json::{Map, Value};
use url::Url;

use crate::dom::{self, Document, Selection};
use crate::error::{Error, Result};

/// Identity of an element, stable across snapshots.
///
/// Built from the element's `id`, an editor data key or its path in the
/// tree (see [`dom::element_key`]), so re-rendering or inserting overlays
/// elsewhere does not change it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementId(String);

impl ElementId {
    /// Identity of the first element in `sel`.
    #[must_use]
    pub fn of(sel: &Selection) -> Option<Self> {
        dom::element_key(sel).map(Self)
    }

    /// Identity of a grid cell known only by its label (`E11`) or the
    /// position of its highlight.
    #[must_use]
    pub fn cell(label: &str) -> Self {
        Self(format!("cell:{label}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Snapshot of the host editor page.
///
/// # Example
///
/// ```rust
/// use rs_sheetpeek::Page;
///
/// let page = Page::from_html(r#"<input class="cell" value="draft">"#)
///     .with_url("https://docs.qq.com/sheet/abc")?
///     .with_focus(".cell")?
///     .with_globals_json(r#"{"App": {"store": {"content": "hello"}}}"#)?;
///
/// assert!(page.is_supported_host(&["docs.qq.com".to_string()]));
/// assert!(page.focused().is_some());
/// assert!(page.global("App.store.content").is_some());
/// # Ok::<(), rs_sheetpeek::Error>(())
/// ```
pub struct Page {
    document: Document,
    globals: Value,
    url: Option<Url>,
    focus: Option<String>,
    selection: Option<String>,
}

impl Page {
    /// Page from HTML with no globals, URL, focus or selection.
    #[must_use]
    pub fn from_html(html: &str) -> Self {
        Self {
            document: dom::parse(html),
            globals: Value::Object(Map::new()),
            url: None,
            focus: None,
            selection: None,
        }
    }

    /// Set the page globals.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGlobals`] when `globals` is not a JSON object.
    pub fn with_globals(mut self, globals: Value) -> Result<Self> {
        if !globals.is_object() {
            return Err(Error::InvalidGlobals(format!(
                "expected an object, found {}",
                json_kind(&globals)
            )));
        }
        self.globals = globals;
        Ok(self)
    }

    /// Set the page globals from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGlobals`] when the text does not parse or is
    /// not an object.
    pub fn with_globals_json(self, json: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| Error::InvalidGlobals(e.to_string()))?;
        self.with_globals(value)
    }

    /// Set the page URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] when `url` does not parse.
    pub fn with_url(mut self, url: &str) -> Result<Self> {
        self.url = Some(Url::parse(url)?);
        Ok(self)
    }

    /// Focus the first element matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSelector`] for a bad selector and
    /// [`Error::ElementNotFound`] when nothing matches.
    pub fn with_focus(mut self, selector: &str) -> Result<Self> {
        if dom::query_first(&self.document, selector)?.is_none() {
            return Err(Error::ElementNotFound(selector.to_string()));
        }
        self.focus = Some(selector.to_string());
        Ok(self)
    }

    /// Set the user's text selection.
    #[must_use]
    pub fn with_selection(mut self, text: impl Into<String>) -> Self {
        self.selection = Some(text.into());
        self
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Page globals, always a JSON object.
    #[must_use]
    pub fn globals(&self) -> &Value {
        &self.globals
    }

    /// Global at a dotted path (`basicClientVars.padData`).
    #[must_use]
    pub fn global(&self, path: &str) -> Option<&Value> {
        lookup_path(&self.globals, path)
    }

    #[must_use]
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// The focused element, if any.
    #[must_use]
    pub fn focused(&self) -> Option<Selection<'_>> {
        let selector = self.focus.as_deref()?;
        dom::query_first(&self.document, selector).ok().flatten()
    }

    /// The user's non-empty text selection.
    #[must_use]
    pub fn selection_text(&self) -> Option<&str> {
        self.selection.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// First element matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSelector`] when the selector does not parse.
    pub fn find(&self, selector: &str) -> Result<Option<Selection<'_>>> {
        dom::query_first(&self.document, selector)
    }

    /// Whether the page is on one of `hosts` or a subdomain of one.
    ///
    /// A page without a URL is assumed to be the editor.
    #[must_use]
    pub fn is_supported_host(&self, hosts: &[String]) -> bool {
        let Some(url) = &self.url else {
            return true;
        };
        let Some(host) = url.host_str() else {
            return false;
        };
        hosts.iter().any(|allowed| {
            host == allowed
                || host
                    .strip_suffix(allowed.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }
}

/// Follow a dotted path through objects (by key) and arrays (by index).
#[must_use]
pub fn lookup_path<'v>(root: &'v Value, path: &str) -> Option<&'v Value> {
    path.split('.').try_fold(root, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
