//! Configuration options for the extraction pipeline.
//!
//! The `Options` struct carries the timing windows, thresholds and probe
//! lists the pipeline depends on. None of them are computed at runtime.

/// Configuration options for extraction, classification and gating.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use rs_sheetpeek::Options;
///
/// let options = Options {
///     settle_delay_ms: 300,
///     min_significant_len: 80,
///     ..Options::default()
/// };
/// assert_eq!(options.same_element_window_ms, 500);
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    /// Delay before a scheduled extraction runs, letting the host DOM settle.
    ///
    /// A new trigger inside the window restarts it.
    ///
    /// Default: `250`
    pub settle_delay_ms: u32,

    /// Window in which a repeat trigger on the same element is dropped.
    ///
    /// Default: `500`
    pub same_element_window_ms: u32,

    /// Window in which identical text on the same element is dropped.
    ///
    /// Default: `2000`
    pub same_content_window_ms: u32,

    /// Length above which any candidate is considered significant.
    ///
    /// Default: `50`
    pub min_significant_len: usize,

    /// Recursion bound for JSON walks and data-model searches.
    ///
    /// Exceeding it means "not found", never an error.
    ///
    /// Default: `10`
    pub max_depth: usize,

    /// Maximum pixel distance (per axis) between the highlighted cell and an
    /// input overlay for the two to be considered the same cell.
    ///
    /// Default: `50`
    pub proximity_px: u32,

    /// Longest string the data-model search accepts as cell content.
    ///
    /// Default: `10000`
    pub max_data_model_len: usize,

    /// Page globals probed by the data-model strategy, in priority order.
    ///
    /// Dotted paths are allowed (`App.store`).
    pub data_model_roots: Vec<String>,

    /// Editor containers read by the text-content and rendered-text strategies.
    pub editor_selectors: Vec<String>,

    /// Hosts the observer is active on. Subdomains match.
    pub supported_hosts: Vec<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            settle_delay_ms: 250,
            same_element_window_ms: 500,
            same_content_window_ms: 2000,
            min_significant_len: 50,
            max_depth: 10,
            proximity_px: 50,
            max_data_model_len: 10_000,
            data_model_roots: [
                "basicClientVars",
                "__INITIAL_STATE__",
                "App",
                "sheetsData",
                "cellData",
            ]
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
            editor_selectors: [
                ".formula-input",
                ".ae-formula-input",
                "#alloy-simple-text-editor",
                ".table-input-stage",
            ]
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
            supported_hosts: ["docs.qq.com", "doc.qq.com", "doc.weixin.qq.com"]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

impl Options {
    /// Settle delay as a chrono duration.
    #[must_use]
    pub fn settle_delay(&self) -> chrono::TimeDelta {
        chrono::TimeDelta::milliseconds(i64::from(self.settle_delay_ms))
    }

    /// Same-element repeat window as a chrono duration.
    #[must_use]
    pub fn same_element_window(&self) -> chrono::TimeDelta {
        chrono::TimeDelta::milliseconds(i64::from(self.same_element_window_ms))
    }

    /// Same-content repeat window as a chrono duration.
    #[must_use]
    pub fn same_content_window(&self) -> chrono::TimeDelta {
        chrono::TimeDelta::milliseconds(i64::from(self.same_content_window_ms))
    }
}
