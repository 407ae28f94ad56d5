//! Discovered form fields.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::page::ToggleMember;

/// Opaque reference to a live control.
///
/// Only meaningful for the page visit that produced it; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementHandle(pub String);

impl ElementHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The five control families the classifier enumerates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlFamily {
    /// Text inputs and textareas.
    FreeText,
    /// Native `<select>` elements.
    NativeChoice,
    /// Combobox widgets whose option list renders lazily.
    VirtualChoice,
    /// Radio groups and checkboxes.
    Toggle,
    /// File inputs.
    File,
}

/// Field kind as reported to callers and the AI collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    FreeText,
    SingleChoice,
    MultiChoice,
    Binary,
    File,
}

impl FieldKind {
    /// Whether the field offers a constrained option set.
    pub fn is_choice(&self) -> bool {
        matches!(self, FieldKind::SingleChoice | FieldKind::MultiChoice | FieldKind::Binary)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnsweredState {
    Empty,
    Answered,
}

impl AnsweredState {
    pub fn is_answered(&self) -> bool {
        matches!(self, AnsweredState::Answered)
    }
}

/// A discovered form element, valid for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    /// Cleaned question text, without required markers.
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    /// Option texts for choice fields; empty until populated.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip)]
    pub handle: ElementHandle,
    pub family: ControlFamily,
    /// Derived at scan time. Injectors re-read the live state before writing.
    pub answered: AnsweredState,
    /// Radio/checkbox members for toggle groups.
    #[serde(skip)]
    pub members: Vec<ToggleMember>,
    /// Surrounding text for file controls, used to route attachments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Field {
    /// Lowercased, whitespace-collapsed label used for de-duplication and targeting.
    pub fn normalized_label(&self) -> String {
        normalize_label(&self.label)
    }
}

/// Lowercase and collapse whitespace.
pub fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
