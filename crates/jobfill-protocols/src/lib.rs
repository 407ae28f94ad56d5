//! # jobfill Protocols
//!
//! Data model and collaborator traits for the jobfill autofill engine.
//! Contains only types and interfaces - no engine logic.
//!
//! ## Core Traits
//!
//! - [`Page`] - A live application page, reached through raw snapshots and interactions
//! - [`AnswerProvider`] - AI collaborator that answers free-form questions
//! - [`OutcomeStore`] - Persistence for the last fill report per URL
//! - [`ShellNotifier`] - Host shell status affordance

pub mod error;
pub mod field;
pub mod outcome;
pub mod page;
pub mod profile;
pub mod provider;
pub mod shell;
pub mod store;

pub use error::{FieldError, PageError, ProviderError, RunError, StoreError};
pub use field::{AnsweredState, ControlFamily, ElementHandle, Field, FieldKind};
pub use outcome::{FailedField, FillOutcome, FillReport, RunStatus, Uploaded};
pub use page::{
    ControlSnapshot, ControlState, DomEvent, LabelSources, Listbox, ListboxProbe, NativeOption,
    OptionNode, Page, ToggleMember, Visibility,
};
pub use profile::{
    Authorization, Contact, Demographic, DocumentBlob, Documents, Education, Identity,
    Professional, Profile,
};
pub use provider::{AiAnswer, AnswerProvider, Question};
pub use shell::{FillStatus, ShellNotifier};
pub use store::OutcomeStore;
