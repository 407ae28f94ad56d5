//! # jobfill Core
//!
//! Field discovery and answer injection engine.
//!
//! ## Components
//!
//! - [`Classifier`] - Enumerates fillable fields and their answered state
//! - [`Resolver`] - Scores option texts against ordered answer candidates
//! - [`Injector`] - Commits values through control-family interaction sequences
//! - [`Orchestrator`] - Runs the category plan, AI augmentation and attachments
//! - [`ReadinessGate`] - Waits for a form and for host hydration to settle
//! - [`RunGuard`] - Per-URL idempotence for the browsing session
//! - [`AutoFill`] - Ties the above to a page, an outcome store and a notifier

pub mod autofill;
pub mod classifier;
pub mod guard;
pub mod injector;
pub mod listbox;
pub mod orchestrator;
pub mod readiness;
pub mod resolver;
pub mod site;
pub mod store;
pub mod text;
pub mod wait;

#[cfg(test)]
pub(crate) mod testing;

pub use autofill::AutoFill;
pub use classifier::Classifier;
pub use guard::RunGuard;
pub use injector::{Answer, Committed, Injector, Picker, SelectMode};
pub use orchestrator::{Orchestrator, Phase};
pub use readiness::{Readiness, ReadinessGate};
pub use resolver::{AnswerCandidate, MatchResult, Resolution, Resolver};
pub use site::{SiteKind, detect_site, is_candidate_page};
pub use store::MemoryOutcomeStore;
pub use wait::{Quiet, await_with_deadline, wait_for_quiet};
