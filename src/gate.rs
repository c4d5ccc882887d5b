//! Interaction gate.
//!
//! Decides whether an extracted candidate is worth forwarding. The host DOM
//! fires many mutations per user action; the gate drops repeats on the same
//! element and repeats of the same text, and drops insignificant fragments.
//!
//! Rules, in order:
//!
//! 1. same element as the last accepted candidate, within the same-element
//!    window: reject;
//! 2. same text and same element, within the same-content window: reject;
//! 3. same text on a different element: eligible;
//! 4. the candidate must be structured, longer than the significance
//!    threshold, or non-empty plain text.
//!
//! A candidate without an element identity is never "the same element".

use chrono::{DateTime, TimeDelta, Utc};

use crate::classify::ContentClassifier;
use crate::options::Options;
use crate::page::ElementId;
use crate::result::ContentCategory;

/// The last accepted candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionRecord {
    pub last_content: String,
    /// Never moves backwards.
    pub last_timestamp: DateTime<Utc>,
    pub last_element: Option<ElementId>,
}

impl Default for InteractionRecord {
    fn default() -> Self {
        Self {
            last_content: String::new(),
            last_timestamp: DateTime::<Utc>::UNIX_EPOCH,
            last_element: None,
        }
    }
}

/// Outcome of evaluating a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    /// Rule 1.
    SameElementRepeat,
    /// Rule 2.
    SameContentRepeat,
    /// Rule 4.
    Insignificant,
}

impl Verdict {
    #[must_use]
    pub fn is_accept(self) -> bool {
        self == Self::Accept
    }
}

/// Debounce and de-duplication state for accepted candidates.
#[derive(Debug, Clone)]
pub struct InteractionGate {
    record: InteractionRecord,
    same_element_window: TimeDelta,
    same_content_window: TimeDelta,
    min_significant_len: usize,
    classifier: ContentClassifier,
}

impl Default for InteractionGate {
    fn default() -> Self {
        Self::new(&Options::default())
    }
}

impl InteractionGate {
    /// Gate with an empty record and windows taken from `options`.
    #[must_use]
    pub fn new(options: &Options) -> Self {
        Self {
            record: InteractionRecord::default(),
            same_element_window: options.same_element_window(),
            same_content_window: options.same_content_window(),
            min_significant_len: options.min_significant_len,
            classifier: ContentClassifier::new(options),
        }
    }

    /// The last accepted candidate.
    #[must_use]
    pub fn state(&self) -> &InteractionRecord {
        &self.record
    }

    /// Apply the rules to an already classified candidate. Never mutates.
    #[must_use]
    pub fn evaluate(
        &self,
        text: &str,
        category: ContentCategory,
        element: Option<&ElementId>,
        now: DateTime<Utc>,
    ) -> Verdict {
        let elapsed = (now - self.record.last_timestamp).max(TimeDelta::zero());
        let same_element = element.is_some() && element == self.record.last_element.as_ref();

        if same_element && elapsed < self.same_element_window {
            return Verdict::SameElementRepeat;
        }
        if same_element && text == self.record.last_content && elapsed < self.same_content_window
        {
            return Verdict::SameContentRepeat;
        }
        if !self.is_significant(text, category) {
            return Verdict::Insignificant;
        }
        Verdict::Accept
    }

    /// Whether a candidate would be accepted, classifying it first.
    #[must_use]
    pub fn should_process(
        &self,
        text: &str,
        element: Option<&ElementId>,
        now: DateTime<Utc>,
    ) -> bool {
        let category = self.classifier.classify(text).category;
        self.evaluate(text, category, element, now).is_accept()
    }

    /// Store an accepted candidate.
    pub fn record(&mut self, text: &str, element: Option<&ElementId>, now: DateTime<Utc>) {
        self.record.last_content = text.to_string();
        self.record.last_timestamp = self.record.last_timestamp.max(now);
        self.record.last_element = element.cloned();
    }

    /// Evaluate and, on acceptance, record in one step.
    pub fn admit(
        &mut self,
        text: &str,
        category: ContentCategory,
        element: Option<&ElementId>,
        now: DateTime<Utc>,
    ) -> Verdict {
        let verdict = self.evaluate(text, category, element, now);
        if verdict.is_accept() {
            self.record(text, element, now);
        } else {
            log::debug!("gate rejected candidate: {verdict:?}");
        }
        verdict
    }

    fn is_significant(&self, text: &str, category: ContentCategory) -> bool {
        category.is_structured()
            || text.chars().count() > self.min_significant_len
            || (category == ContentCategory::Text && !text.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Page;

    fn at(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_700_000_000_000 + ms).unwrap_or_default()
    }

    fn two_elements() -> (Option<ElementId>, Option<ElementId>) {
        let page = Page::from_html("<div id=\"a\"></div><div id=\"b\"></div>");
        let id = |sel: &str| page.find(sel).ok().flatten().and_then(|s| ElementId::of(&s));
        (id("#a"), id("#b"))
    }

    #[test]
    fn test_same_element_debounce() {
        let (a, _) = two_elements();
        let mut gate = InteractionGate::default();
        assert!(gate.admit("first text", ContentCategory::Text, a.as_ref(), at(0)).is_accept());
        assert_eq!(
            gate.admit("second text", ContentCategory::Text, a.as_ref(), at(100)),
            Verdict::SameElementRepeat
        );
        assert!(gate.admit("second text", ContentCategory::Text, a.as_ref(), at(600)).is_accept());
    }

    #[test]
    fn test_same_content_window() {
        let (a, _) = two_elements();
        let mut gate = InteractionGate::default();
        assert!(gate.admit("same", ContentCategory::Text, a.as_ref(), at(0)).is_accept());
        assert_eq!(
            gate.admit("same", ContentCategory::Text, a.as_ref(), at(1500)),
            Verdict::SameContentRepeat
        );
        assert!(gate.admit("same", ContentCategory::Text, a.as_ref(), at(2500)).is_accept());
    }

    #[test]
    fn test_cross_element_exception() {
        let (a, b) = two_elements();
        let mut gate = InteractionGate::default();
        let text = "hello world this is a test";
        assert!(gate.admit(text, ContentCategory::Text, a.as_ref(), at(0)).is_accept());
        assert!(gate.admit(text, ContentCategory::Text, b.as_ref(), at(10)).is_accept());
    }

    #[test]
    fn test_unknown_identity_is_always_distinct() {
        let mut gate = InteractionGate::default();
        assert!(gate.admit("same", ContentCategory::Text, None, at(0)).is_accept());
        assert!(gate.admit("same", ContentCategory::Text, None, at(1)).is_accept());
    }

    #[test]
    fn test_rejection_leaves_record_untouched() {
        let (a, _) = two_elements();
        let mut gate = InteractionGate::default();
        assert!(gate.admit("kept", ContentCategory::Text, a.as_ref(), at(0)).is_accept());
        let before = gate.state().clone();
        let _ = gate.admit("dropped", ContentCategory::Text, a.as_ref(), at(50));
        let _ = gate.admit("", ContentCategory::Empty, None, at(60));
        assert_eq!(gate.state(), &before);
    }

    #[test]
    fn test_empty_is_insignificant() {
        let gate = InteractionGate::default();
        assert_eq!(
            gate.evaluate("", ContentCategory::Empty, None, at(0)),
            Verdict::Insignificant
        );
        assert!(!gate.should_process("   ", None, at(0)));
        assert!(gate.should_process("x", None, at(0)));
    }

    #[test]
    fn test_timestamp_never_moves_backwards() {
        let (a, b) = two_elements();
        let mut gate = InteractionGate::default();
        assert!(gate.admit("one", ContentCategory::Text, a.as_ref(), at(1000)).is_accept());
        assert!(gate.admit("two", ContentCategory::Text, b.as_ref(), at(400)).is_accept());
        assert_eq!(gate.state().last_timestamp, at(1000));
    }

    #[test]
    fn test_should_process_does_not_record() {
        let (a, _) = two_elements();
        let gate = InteractionGate::default();
        assert!(gate.should_process("# Title", a.as_ref(), at(0)));
        assert!(gate.should_process("# Title", a.as_ref(), at(1)));
        assert_eq!(gate.state(), &InteractionRecord::default());
    }
}
