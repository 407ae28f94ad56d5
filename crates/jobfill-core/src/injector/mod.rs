//! Synthetic injection: committing answers through the page's own event paths.
//!
//! Every commit re-reads the control's live state first and refuses to touch
//! a control that already holds an answer.

mod toggle;
mod virtual_choice;

use std::sync::Arc;

use jobfill_config::TimingConfig;
use jobfill_protocols::{
    ControlFamily, ControlState, DocumentBlob, DomEvent, Field, FieldError, Page,
};
use tracing::debug;

use crate::classifier::state::{answered_state, native_choices};
use crate::resolver::{AnswerCandidate, Resolver};

/// How a virtual widget produces its option list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectMode {
    /// All options render as soon as the widget opens.
    Static,
    /// Options render after a query is typed; `network` lists need longer.
    Search { network: bool },
}

/// How an option is chosen from a rendered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Picker {
    Standard,
    /// City suggestions, preferring the applicant's region.
    Location { region: Option<String> },
    /// The country list of a phone widget, which other pickers ignore.
    PhoneCountry,
}

/// A value to commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Text(String),
    Choice {
        candidates: AnswerCandidate,
        mode: SelectMode,
        picker: Picker,
    },
}

impl Answer {
    pub fn choice(candidates: AnswerCandidate) -> Self {
        Answer::Choice {
            candidates,
            mode: SelectMode::Static,
            picker: Picker::Standard,
        }
    }

    pub fn candidates(&self) -> AnswerCandidate {
        match self {
            Answer::Text(value) => AnswerCandidate::single(value.clone()),
            Answer::Choice { candidates, .. } => candidates.clone(),
        }
    }

    /// Whether the options can only be resolved inside the opened widget.
    pub fn needs_live_options(&self) -> bool {
        matches!(
            self,
            Answer::Choice {
                mode: SelectMode::Search { .. },
                ..
            } | Answer::Choice {
                picker: Picker::Location { .. } | Picker::PhoneCountry,
                ..
            }
        )
    }
}

/// What was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Committed {
    pub value: String,
}

pub struct Injector {
    resolver: Arc<Resolver>,
    timing: TimingConfig,
}

impl Injector {
    pub fn new(resolver: Arc<Resolver>, timing: TimingConfig) -> Self {
        Self { resolver, timing }
    }

    /// Commit `answer` into `field`.
    pub async fn commit(&self, page: &dyn Page, field: &Field, answer: &Answer) -> Result<Committed, FieldError> {
        let live = page.control_state(&field.handle).await?;
        if answered_state(&live).is_answered() {
            debug!("'{}' already answered on the page", field.label);
            return Err(FieldError::AlreadyAnswered);
        }

        let candidates = answer.candidates();
        match field.family {
            ControlFamily::FreeText => {
                let value = candidates.first().ok_or(FieldError::NoMatch)?;
                self.commit_text(page, field, value).await
            }
            ControlFamily::NativeChoice => self.commit_native(page, field, live, &candidates).await,
            ControlFamily::VirtualChoice => {
                let (mode, picker) = match answer {
                    Answer::Choice { mode, picker, .. } => (*mode, picker.clone()),
                    Answer::Text(_) => (SelectMode::Static, Picker::Standard),
                };
                virtual_choice::commit(self, page, field, &candidates, mode, &picker).await
            }
            ControlFamily::Toggle => toggle::commit(self, page, field, live, &candidates).await,
            ControlFamily::File => Err(FieldError::NoMatch),
        }
    }

    /// Attach a document to an empty file control.
    pub async fn attach(&self, page: &dyn Page, field: &Field, blob: &DocumentBlob) -> Result<Committed, FieldError> {
        match page.control_state(&field.handle).await? {
            ControlState::File { file_count, .. } if file_count > 0 => {
                return Err(FieldError::AlreadyAnswered);
            }
            ControlState::File { .. } => {}
            _ => return Err(FieldError::NotCommitted("not a file control".to_string())),
        }
        if page.attach_file(&field.handle, blob).await? {
            debug!("Attached {} to '{}'", blob.filename, field.label);
            Ok(Committed {
                value: blob.filename.clone(),
            })
        } else {
            Err(FieldError::NotCommitted("file input did not accept the document".to_string()))
        }
    }

    async fn commit_text(&self, page: &dyn Page, field: &Field, value: &str) -> Result<Committed, FieldError> {
        let handle = &field.handle;
        page.focus(handle).await?;
        page.set_native_value(handle, value).await?;
        for event in [DomEvent::Input, DomEvent::Change, DomEvent::Blur] {
            page.dispatch(handle, event).await?;
        }

        match page.control_state(handle).await? {
            ControlState::Text { value: current } if current.trim() == value.trim() => Ok(Committed {
                value: value.to_string(),
            }),
            _ => Err(FieldError::NotCommitted("value was reverted".to_string())),
        }
    }

    async fn commit_native(
        &self,
        page: &dyn Page,
        field: &Field,
        live: ControlState,
        candidates: &AnswerCandidate,
    ) -> Result<Committed, FieldError> {
        let ControlState::NativeChoice { options, .. } = live else {
            return Err(FieldError::NotCommitted("not a select".to_string()));
        };
        let choices = native_choices(&options);
        let texts: Vec<String> = choices.iter().map(|(_, t)| t.to_string()).collect();
        let matched = self
            .resolver
            .best_match(&texts, candidates)
            .ok_or(FieldError::NoMatch)?;
        let (index, text) = choices[matched.option_index];

        let handle = &field.handle;
        page.focus(handle).await?;
        page.select_native_option(handle, index).await?;
        page.dispatch(handle, DomEvent::Change).await?;

        match page.control_state(handle).await? {
            ControlState::NativeChoice { selected_index, .. } if selected_index == Some(index) => Ok(Committed {
                value: text.to_string(),
            }),
            _ => Err(FieldError::NotCommitted("selection was reverted".to_string())),
        }
    }
}

#[cfg(test)]
#[path = "injector_tests.rs"]
mod tests;
