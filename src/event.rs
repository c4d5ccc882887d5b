//! Inbound interaction events.
//!
//! An [`Interaction`] is what the page observer learns from the host page:
//! a click, a key press or a batch of DOM mutations. Elements are named by
//! CSS selectors resolved against the current [`Page`](crate::Page).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of user interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    /// Mouse click on an element.
    Click,
    /// Key press.
    Keydown,
    /// Batch of DOM mutations.
    Mutation,
}

/// Key and modifier state of a key press.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPress {
    /// `KeyboardEvent.key`.
    pub key: String,
    #[serde(default)]
    pub ctrl_key: bool,
    #[serde(default)]
    pub meta_key: bool,
    #[serde(default)]
    pub shift_key: bool,
}

impl KeyPress {
    /// Whether this is the extract shortcut, Ctrl/Cmd+Shift+M.
    #[must_use]
    pub fn is_extract_shortcut(&self) -> bool {
        (self.ctrl_key || self.meta_key) && self.shift_key && self.key.eq_ignore_ascii_case("m")
    }
}

/// One DOM mutation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MutationRecord {
    /// Elements were inserted.
    #[serde(rename_all = "camelCase")]
    ChildList {
        /// Selectors of the added elements.
        added: Vec<String>,
    },
    /// An attribute changed.
    #[serde(rename_all = "camelCase")]
    Attributes {
        /// Selector of the changed element.
        target: String,
        /// Name of the changed attribute.
        attribute_name: String,
    },
}

/// An interaction reported by the host page.
///
/// On the wire: `{"type": "interaction", "kind": "click", "targetElement":
/// "#cell", "timestamp": 1700000000000}`, with optional `key` and
/// `mutations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "interaction", rename_all = "camelCase")]
pub struct Interaction {
    pub kind: InteractionKind,

    /// Selector of the event target, if any.
    #[serde(default)]
    pub target_element: Option<String>,

    /// Event time, epoch milliseconds on the wire.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<KeyPress>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mutations: Vec<MutationRecord>,
}

impl Interaction {
    /// A click on the element matching `target`.
    #[must_use]
    pub fn click(target: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind: InteractionKind::Click,
            target_element: Some(target.into()),
            timestamp,
            key: None,
            mutations: Vec::new(),
        }
    }

    /// A key press with no particular target.
    #[must_use]
    pub fn keydown(key: KeyPress, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind: InteractionKind::Keydown,
            target_element: None,
            timestamp,
            key: Some(key),
            mutations: Vec::new(),
        }
    }

    /// A batch of mutation records.
    #[must_use]
    pub fn mutation(mutations: Vec<MutationRecord>, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind: InteractionKind::Mutation,
            target_element: None,
            timestamp,
            key: None,
            mutations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_shortcut() {
        let mut key = KeyPress {
            key: "M".to_string(),
            ctrl_key: true,
            shift_key: true,
            ..KeyPress::default()
        };
        assert!(key.is_extract_shortcut());

        key.ctrl_key = false;
        key.meta_key = true;
        assert!(key.is_extract_shortcut());

        key.shift_key = false;
        assert!(!key.is_extract_shortcut());
    }

    #[test]
    fn test_interaction_from_wire() {
        let wire = r#"{
            "type": "interaction",
            "kind": "click",
            "targetElement": "td.cell",
            "timestamp": 1700000000250
        }"#;
        let parsed: Result<Interaction, _> = serde_json::from_str(wire);
        assert!(parsed.is_ok());
        if let Ok(interaction) = parsed {
            assert_eq!(interaction.kind, InteractionKind::Click);
            assert_eq!(interaction.target_element.as_deref(), Some("td.cell"));
            assert_eq!(interaction.timestamp.timestamp_millis(), 1_700_000_000_250);
            assert!(interaction.mutations.is_empty());
        }
    }

    #[test]
    fn test_mutation_records_from_wire() {
        let wire = r##"{
            "type": "interaction",
            "kind": "mutation",
            "timestamp": 1,
            "mutations": [
                {"type": "childList", "added": [".single-selection"]},
                {"type": "attributes", "target": "#alloy-rich-text-editor", "attributeName": "style"}
            ]
        }"##;
        let parsed: Interaction = serde_json::from_str(wire).unwrap_or_else(|_| {
            Interaction::mutation(Vec::new(), DateTime::<Utc>::UNIX_EPOCH)
        });
        assert_eq!(parsed.mutations.len(), 2);
        assert!(matches!(
            &parsed.mutations[1],
            MutationRecord::Attributes { attribute_name, .. } if attribute_name == "style"
        ));
    }

    #[test]
    fn test_interaction_to_wire() {
        let at = DateTime::from_timestamp_millis(42).unwrap_or_default();
        let value = serde_json::to_value(Interaction::click("#a1", at)).unwrap_or_default();
        assert_eq!(value["type"], "interaction");
        assert_eq!(value["targetElement"], "#a1");
        assert_eq!(value["timestamp"], 42);
        assert!(value.get("key").is_none());
    }
}
