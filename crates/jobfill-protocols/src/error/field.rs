//! Per-field errors.

use thiserror::Error;

use super::PageError;

/// Outcome taxonomy for a single field. None of these abort a run on their own;
/// the orchestrator only stops on [`FieldError::PageGone`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("No label could be resolved")]
    NoLabel,

    #[error("No option scored above the acceptance threshold")]
    NoMatch,

    #[error("Option list did not populate within {0} ms")]
    WidgetTimeout(u64),

    #[error("Field already answered")]
    AlreadyAnswered,

    #[error("Value was not committed: {0}")]
    NotCommitted(String),

    #[error("Page navigated away during commit")]
    PageGone,

    #[error("Page error: {0}")]
    Page(PageError),
}

impl FieldError {
    /// Whether the field should be reported as skipped instead of failed.
    pub fn is_skip(&self) -> bool {
        matches!(self, FieldError::AlreadyAnswered)
    }
}

impl From<PageError> for FieldError {
    fn from(e: PageError) -> Self {
        match e {
            PageError::Gone(_) => FieldError::PageGone,
            other => FieldError::Page(other),
        }
    }
}
