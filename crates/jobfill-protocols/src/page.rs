//! The live page abstraction.
//!
//! A [`Page`] only reports raw facts about the document and performs
//! low-level interactions. Visibility rules, label priority, answered-state
//! derivation, listbox selection and option scoring all live in the engine.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::PageError;
use crate::field::{ControlFamily, ElementHandle};
use crate::profile::DocumentBlob;

/// Layout and interactivity facts for one control.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Visibility {
    pub width: f64,
    pub height: f64,
    pub display_none: bool,
    pub visibility_hidden: bool,
    pub disabled: bool,
    /// An ancestor is `hidden`, `aria-hidden` or collapsed to zero size.
    pub hidden_ancestor: bool,
}

/// Every place a label may come from, in raw form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelSources {
    pub aria_label: Option<String>,
    /// Text of the elements referenced by `aria-labelledby`.
    pub labelled_by: Option<String>,
    /// Text of a `<label for=...>` pointing at the control.
    pub label_for: Option<String>,
    /// Label or legend text of the nearest field container.
    pub container_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeOption {
    pub text: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToggleMember {
    pub handle: ElementHandle,
    pub label: String,
    pub checked: bool,
}

/// Live value state of a control, per family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ControlState {
    Text {
        value: String,
    },
    NativeChoice {
        selected_index: Option<usize>,
        selected_value: Option<String>,
        selected_text: Option<String>,
        options: Vec<NativeOption>,
    },
    Virtual {
        /// Rendered single-value text, if any.
        single_value: Option<String>,
        /// Rendered multi-value chip texts.
        #[serde(default)]
        chips: Vec<String>,
        placeholder: Option<String>,
        #[serde(default)]
        multi: bool,
        #[serde(default)]
        expanded: bool,
    },
    Toggle {
        members: Vec<ToggleMember>,
    },
    File {
        file_count: usize,
        /// Text of the surrounding upload section.
        context: Option<String>,
    },
}

/// One candidate control as reported by the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlSnapshot {
    pub handle: ElementHandle,
    pub family: ControlFamily,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub labels: LabelSources,
    /// `required` or `aria-required` attribute is present.
    #[serde(default)]
    pub required_attr: bool,
    #[serde(default)]
    pub placeholder: Option<String>,
    pub state: ControlState,
}

/// An option element inside an open listbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionNode {
    pub handle: ElementHandle,
    pub text: String,
}

/// An open option list somewhere on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listbox {
    pub handle: ElementHandle,
    #[serde(default)]
    pub options: Vec<OptionNode>,
    #[serde(default)]
    pub visible: bool,
    /// Belongs to a phone country-code picker.
    #[serde(default)]
    pub in_phone_widget: bool,
    /// Status text such as "No options" or "Loading...".
    #[serde(default)]
    pub notice: Option<String>,
}

/// Where the option list for a widget may be found, in lookup order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListboxProbe {
    /// A listbox inside the widget's own container.
    pub contained: Option<Listbox>,
    /// The listbox named by `aria-controls`/`aria-owns`.
    pub aria_controlled: Option<Listbox>,
    /// Every other listbox currently open on the page.
    pub open_elsewhere: Vec<Listbox>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomEvent {
    Input,
    Change,
    Blur,
}

impl DomEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            DomEvent::Input => "input",
            DomEvent::Change => "change",
            DomEvent::Blur => "blur",
        }
    }
}

/// A live application page.
#[async_trait]
pub trait Page: Send + Sync {
    async fn url(&self) -> Result<String, PageError>;

    /// Whether any application-form signal is present.
    async fn has_form_signal(&self) -> Result<bool, PageError>;

    /// Monotonic DOM mutation counter.
    async fn mutation_epoch(&self) -> Result<u64, PageError>;

    /// Every candidate control of the five families, in document order per family.
    async fn controls(&self) -> Result<Vec<ControlSnapshot>, PageError>;

    /// Re-read one control's live state.
    async fn control_state(&self, handle: &ElementHandle) -> Result<ControlState, PageError>;

    async fn focus(&self, handle: &ElementHandle) -> Result<(), PageError>;

    /// pointerdown, mousedown, pointerup, mouseup, click at the element centre.
    async fn pointer_click(&self, handle: &ElementHandle) -> Result<(), PageError>;

    /// A plain user-level `click()`.
    async fn user_click(&self, handle: &ElementHandle) -> Result<(), PageError>;

    /// Write through the prototype value setter so framework trackers notice.
    async fn set_native_value(&self, handle: &ElementHandle, value: &str) -> Result<(), PageError>;

    async fn dispatch(&self, handle: &ElementHandle, event: DomEvent) -> Result<(), PageError>;

    async fn select_native_option(&self, handle: &ElementHandle, index: usize) -> Result<(), PageError>;

    async fn press_escape(&self, handle: &ElementHandle) -> Result<(), PageError>;

    /// Click on an empty area of the document to dismiss popups.
    async fn click_outside(&self) -> Result<(), PageError>;

    async fn listbox_probe(&self, handle: &ElementHandle) -> Result<ListboxProbe, PageError>;

    /// Attach a document to a file input. Returns whether the input now holds a file.
    async fn attach_file(&self, handle: &ElementHandle, blob: &DocumentBlob) -> Result<bool, PageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_state_deserialize_virtual() {
        let json = r#"{"state":"virtual","single_value":null,"placeholder":"Select..."}"#;
        let state: ControlState = serde_json::from_str(json).unwrap();
        match state {
            ControlState::Virtual { chips, multi, placeholder, .. } => {
                assert!(chips.is_empty());
                assert!(!multi);
                assert_eq!(placeholder.as_deref(), Some("Select..."));
            }
            other => panic!("unexpected state: {:?}", other),
        }
    }

    #[test]
    fn test_snapshot_deserialize_defaults() {
        let json = r#"{
            "handle": "jf-4",
            "family": "free_text",
            "state": {"state": "text", "value": ""}
        }"#;
        let snapshot: ControlSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.handle.as_str(), "jf-4");
        assert_eq!(snapshot.visibility, Visibility::default());
        assert!(!snapshot.required_attr);
    }

    #[test]
    fn test_listbox_probe_default_is_empty() {
        let probe: ListboxProbe = serde_json::from_str("{}").unwrap();
        assert!(probe.contained.is_none());
        assert!(probe.open_elsewhere.is_empty());
    }

    #[test]
    fn test_dom_event_names() {
        assert_eq!(DomEvent::Input.as_str(), "input");
        assert_eq!(DomEvent::Change.as_str(), "change");
        assert_eq!(DomEvent::Blur.as_str(), "blur");
    }
}
