//! Page observer.
//!
//! The single owner of mutable pipeline state: the interaction gate, the
//! pending settle-delay task and the listening flag. Interactions come in
//! through [`Observer::handle`], the caller advances time through
//! [`Observer::poll`], and both return a [`Payload`] when a candidate is
//! accepted.

use chrono::{DateTime, Utc};

use crate::classify::ContentClassifier;
use crate::debounce::Debouncer;
use crate::dom::{self, Selection};
use crate::event::{Interaction, InteractionKind, KeyPress, MutationRecord};
use crate::extractor::{element_text, resolve_cell, resolve_cell_content};
use crate::gate::InteractionGate;
use crate::options::Options;
use crate::page::{ElementId, Page};
use crate::patterns::{
    ACTIVE_CELL, CELL_LABEL, OVERLAY_CLASSES, OVERLAY_DESCENDANTS, OVERLAY_IDS, SHEET_AREAS,
};
use crate::result::Payload;

/// Overlay classes that count as visible even when collapsed to zero size.
const ALWAYS_VISIBLE_OVERLAYS: &[&str] = &["select-selection-border", "cell-active"];

/// A cell-chain run waiting for the DOM to settle.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ScheduledRead {
    /// Selector of the clicked element, if a click scheduled the read.
    target: Option<String>,
}

/// Event-driven extraction pipeline.
///
/// # Example
///
/// ```rust
/// use chrono::{DateTime, TimeDelta};
/// use rs_sheetpeek::{ContentCategory, Interaction, Observer, Options, Page};
///
/// let page = Page::from_html(
///     r##"<table><tr><td class="sheet-cell" id="a1">
///          <div class="formula-input"><input value="# Title"></div>
///        </td></tr></table>"##,
/// );
/// let mut observer = Observer::new(Options::default());
/// let t0 = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap_or_default();
///
/// // Clicks inside the sheet wait for the DOM to settle.
/// assert!(observer.handle(&page, &Interaction::click("#a1", t0)).is_none());
/// let payload = observer.poll(&page, t0 + TimeDelta::milliseconds(250));
/// assert_eq!(payload.map(|p| p.content_type), Some(ContentCategory::Markdown));
/// ```
#[derive(Debug)]
pub struct Observer {
    options: Options,
    classifier: ContentClassifier,
    gate: InteractionGate,
    scheduled: Debouncer<ScheduledRead>,
    listening: bool,
}

impl Default for Observer {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl Observer {
    #[must_use]
    pub fn new(options: Options) -> Self {
        Self {
            classifier: ContentClassifier::new(&options),
            gate: InteractionGate::new(&options),
            scheduled: Debouncer::new(options.settle_delay()),
            listening: true,
            options,
        }
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    #[must_use]
    pub fn gate(&self) -> &InteractionGate {
        &self.gate
    }

    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// When the pending settle-delay read becomes due.
    #[must_use]
    pub fn pending_deadline(&self) -> Option<DateTime<Utc>> {
        self.scheduled.deadline()
    }

    /// Stop reacting to interactions and drop any pending read.
    pub fn pause(&mut self) {
        self.listening = false;
        if self.scheduled.cancel().is_some() {
            log::debug!("pending read cancelled by pause");
        }
    }

    pub fn resume(&mut self) {
        self.listening = true;
    }

    /// React to one interaction.
    pub fn handle(&mut self, page: &Page, interaction: &Interaction) -> Option<Payload> {
        if !self.listening || !page.is_supported_host(&self.options.supported_hosts) {
            return None;
        }
        let at = interaction.timestamp;
        match interaction.kind {
            InteractionKind::Click => self.on_click(page, interaction.target_element.as_deref(), at),
            InteractionKind::Keydown => self.on_keydown(page, interaction.key.as_ref(), at),
            InteractionKind::Mutation => {
                if interaction.mutations.iter().any(|m| is_relevant(page, m)) {
                    self.schedule(None, at);
                }
                None
            }
        }
    }

    /// Run the pending read if it is due at `now`.
    pub fn poll(&mut self, page: &Page, now: DateTime<Utc>) -> Option<Payload> {
        if !self.listening {
            return None;
        }
        let read = self.scheduled.fire_due(now)?;
        let content = resolve_cell_content(page, &self.options)?;
        self.process(page, &content.text, read.target.as_deref(), now)
    }

    /// Classify, gate and emit one candidate.
    ///
    /// `target` is the selector of the element the candidate was read from;
    /// without one the focused element or the selected cell supplies the
    /// identity.
    pub fn process(
        &mut self,
        page: &Page,
        text: &str,
        target: Option<&str>,
        now: DateTime<Utc>,
    ) -> Option<Payload> {
        if text.trim().is_empty() {
            return None;
        }
        let (text, classification) = self.classifier.prepare(text);
        let element = identity(page, target);

        let verdict = self.gate.admit(&text, classification.category, element.as_ref(), now);
        if !verdict.is_accept() {
            return None;
        }

        log::info!(
            "emitting {} payload ({} chars, score {})",
            classification.category,
            text.chars().count(),
            classification.score
        );
        Some(Payload {
            text,
            content_type: classification.category,
            timestamp: now,
        })
    }

    /// Schedule a settled read. A trigger without a target (an overlay
    /// mutation following a click) keeps the target of the read it replaces.
    fn schedule(&mut self, target: Option<String>, at: DateTime<Utc>) {
        let replaced = self.scheduled.cancel();
        if replaced.is_some() {
            log::debug!("pending read replaced");
        }
        let target = target.or_else(|| replaced.and_then(|read| read.target));
        self.scheduled.schedule(ScheduledRead { target }, at);
    }

    fn on_click(&mut self, page: &Page, target: Option<&str>, at: DateTime<Utc>) -> Option<Payload> {
        let Some(selector) = target else {
            self.schedule(None, at);
            return None;
        };
        let element = match page.find(selector) {
            Ok(Some(element)) => element,
            Ok(None) => {
                log::debug!("click target {selector} is gone");
                return None;
            }
            Err(err) => {
                log::debug!("click target unreadable: {err}");
                return None;
            }
        };

        if in_sheet_area(&element) {
            self.schedule(Some(selector.to_string()), at);
            return None;
        }

        let text = resolve_cell(page, &element)
            .and_then(|cell| element_text(page, &cell))
            .unwrap_or_else(|err| {
                log::debug!("reading click target failed: {err}");
                String::new()
            });
        self.process(page, &text, Some(selector), at)
    }

    fn on_keydown(
        &mut self,
        page: &Page,
        key: Option<&KeyPress>,
        at: DateTime<Utc>,
    ) -> Option<Payload> {
        if !key.is_some_and(KeyPress::is_extract_shortcut) {
            return None;
        }

        if let Some(selected) = page.selection_text() {
            return self.process(page, selected, None, at);
        }

        if let Some(active) = page.focused() {
            let text = resolve_cell(page, &active)
                .and_then(|cell| element_text(page, &cell))
                .unwrap_or_default();
            if !text.trim().is_empty() {
                return self.process(page, &text, None, at);
            }
        }

        let content = resolve_cell_content(page, &self.options)?;
        self.process(page, &content.text, None, at)
    }
}

/// Identity of the cell behind `target`; without one, of the focused
/// element or else the selected cell.
fn identity(page: &Page, target: Option<&str>) -> Option<ElementId> {
    match target {
        Some(selector) => {
            let element = page.find(selector).ok().flatten()?;
            let cell = resolve_cell(page, &element).unwrap_or(element);
            ElementId::of(&cell)
        }
        None => page
            .focused()
            .and_then(|active| ElementId::of(&active))
            .or_else(|| selected_cell(page)),
    }
}

/// The selected cell as the editor shows it: its coordinate label, else the
/// position of the highlighted cell frame.
fn selected_cell(page: &Page) -> Option<ElementId> {
    let label = page
        .find(CELL_LABEL)
        .ok()
        .flatten()
        .map(|label| dom::text_content(&label).trim().to_string())
        .filter(|coordinate| !coordinate.is_empty());
    if let Some(coordinate) = label {
        return Some(ElementId::cell(&coordinate));
    }
    let frame = page.find(ACTIVE_CELL).ok().flatten()?;
    let (left, top) = dom::style_position(&frame)?;
    Some(ElementId::cell(&format!("{left},{top}")))
}

fn in_sheet_area(element: &Selection) -> bool {
    SHEET_AREAS
        .iter()
        .any(|area| dom::closest(element, area).is_ok_and(|found| found.is_some()))
}

/// Whether a mutation record signals a new cell selection.
fn is_relevant(page: &Page, record: &MutationRecord) -> bool {
    match record {
        MutationRecord::ChildList { added } => added.iter().any(|selector| {
            page.find(selector).ok().flatten().is_some_and(|node| {
                is_overlay(&node)
                    || dom::query_within(&node, OVERLAY_DESCENDANTS).is_ok_and(|found| found.exists())
            })
        }),
        MutationRecord::Attributes {
            target,
            attribute_name,
        } => {
            matches!(attribute_name.as_str(), "style" | "class")
                && page
                    .find(target)
                    .ok()
                    .flatten()
                    .is_some_and(|node| is_overlay(&node) && overlay_visible(&node))
        }
    }
}

fn is_overlay(node: &Selection) -> bool {
    OVERLAY_CLASSES.iter().any(|class| dom::has_class(node, class))
        || dom::get_attribute(node, "id").is_some_and(|id| OVERLAY_IDS.contains(&id.as_str()))
}

/// Shown, and either sized or one of the frames drawn at zero size.
fn overlay_visible(node: &Selection) -> bool {
    if !dom::is_visible(node) {
        return false;
    }
    let collapsed = ["width", "height"]
        .iter()
        .all(|prop| dom::style_property(node, prop).as_deref() == Some("0px"));
    !collapsed
        || ALWAYS_VISIBLE_OVERLAYS
            .iter()
            .any(|class| dom::has_class(node, class))
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    fn at(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_700_000_000_000 + ms).unwrap_or_default()
    }

    fn shortcut() -> KeyPress {
        KeyPress {
            key: "M".to_string(),
            ctrl_key: true,
            shift_key: true,
            ..KeyPress::default()
        }
    }

    #[test]
    fn test_mutation_relevance() {
        let page = Page::from_html(
            r#"<div id="wrap"><div class="single-selection"></div></div>
               <div id="plain"></div>
               <div id="alloy-rich-text-editor" style="display: none"></div>
               <div class="table-input-stage" style="width: 0px; height: 0px"></div>
               <div class="select-selection-border" style="width: 0px; height: 0px"></div>"#,
        );
        let added = |sel: &str| MutationRecord::ChildList {
            added: vec![sel.to_string()],
        };
        let style = |sel: &str| MutationRecord::Attributes {
            target: sel.to_string(),
            attribute_name: "style".to_string(),
        };

        assert!(is_relevant(&page, &added("#wrap")));
        assert!(!is_relevant(&page, &added("#plain")));
        assert!(!is_relevant(&page, &style("#alloy-rich-text-editor")));
        assert!(!is_relevant(&page, &style(".table-input-stage")));
        assert!(is_relevant(&page, &style(".select-selection-border")));
        assert!(!is_relevant(
            &page,
            &MutationRecord::Attributes {
                target: ".single-selection".to_string(),
                attribute_name: "data-x".to_string(),
            }
        ));
    }

    #[test]
    fn test_sheet_click_is_debounced() {
        let page = Page::from_html(
            r#"<div class="main-board"><span id="c">cell</span></div>
               <div class="formula-input"><input value="payload text"></div>"#,
        );
        let mut observer = Observer::default();
        assert_eq!(observer.handle(&page, &Interaction::click("#c", at(0))), None);
        assert_eq!(observer.handle(&page, &Interaction::click("#c", at(100))), None);
        assert_eq!(observer.pending_deadline(), Some(at(350)));
        assert_eq!(observer.poll(&page, at(300)), None);
        let payload = observer.poll(&page, at(350));
        assert_eq!(payload.map(|p| p.text).as_deref(), Some("payload text"));
        assert_eq!(observer.poll(&page, at(1000)), None);
    }

    #[test]
    fn test_plain_click_reads_at_once() {
        let page = Page::from_html(r#"<p class="paragraph" id="p">A paragraph of text.</p>"#);
        let mut observer = Observer::default();
        let payload = observer.handle(&page, &Interaction::click("#p", at(0)));
        assert_eq!(payload.map(|p| p.text).as_deref(), Some("A paragraph of text."));
    }

    #[test]
    fn test_shortcut_prefers_selection() {
        let page = Page::from_html(r#"<textarea id="t">focused text</textarea>"#)
            .with_focus("#t")
            .map(|p| p.with_selection("- selected one\n- selected two"));
        let mut observer = Observer::default();
        let payload = page
            .ok()
            .and_then(|page| observer.handle(&page, &Interaction::keydown(shortcut(), at(0))));
        assert_eq!(payload.map(|p| p.content_type), Some(crate::ContentCategory::Markdown));
    }

    #[test]
    fn test_shortcut_reads_focus_and_other_keys_are_ignored() {
        let page = Page::from_html(r#"<textarea id="t">focused text</textarea>"#).with_focus("#t");
        let mut observer = Observer::default();
        let page = page.ok();
        let other = KeyPress {
            key: "a".to_string(),
            ..KeyPress::default()
        };
        let ignored = page
            .as_ref()
            .and_then(|page| observer.handle(page, &Interaction::keydown(other, at(0))));
        assert_eq!(ignored, None);
        let payload = page
            .as_ref()
            .and_then(|page| observer.handle(page, &Interaction::keydown(shortcut(), at(1))));
        assert_eq!(payload.map(|p| p.text).as_deref(), Some("focused text"));
    }

    #[test]
    fn test_pause_cancels_and_ignores() {
        let page = Page::from_html(r#"<div class="single-selection" id="s"></div>"#);
        let mut observer = Observer::default();
        let overlay_added = |ms| {
            Interaction::mutation(
                vec![MutationRecord::ChildList {
                    added: vec!["#s".to_string()],
                }],
                at(ms),
            )
        };
        let _ = observer.handle(&page, &overlay_added(0));
        assert!(observer.pending_deadline().is_some());

        observer.pause();
        assert!(!observer.is_listening());
        assert!(observer.pending_deadline().is_none());
        let _ = observer.handle(&page, &overlay_added(10));
        assert!(observer.pending_deadline().is_none());

        observer.resume();
        let _ = observer.handle(&page, &overlay_added(20));
        assert_eq!(observer.pending_deadline(), Some(at(20) + TimeDelta::milliseconds(250)));
    }

    #[test]
    fn test_unsupported_host_is_ignored() {
        let page = Page::from_html(r#"<p class="paragraph" id="p">Some paragraph text.</p>"#)
            .with_url("https://example.com/doc");
        let mut observer = Observer::default();
        let payload = page
            .ok()
            .and_then(|page| observer.handle(&page, &Interaction::click("#p", at(0))));
        assert_eq!(payload, None);
    }
}
