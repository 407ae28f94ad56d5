//! Page-wide run errors.

use thiserror::Error;

use super::PageError;

/// Errors that abort the remaining steps of a run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RunError {
    #[error("Field classification failed: {0}")]
    Classification(PageError),

    #[error("Page navigated away mid-run")]
    PageGone,

    #[error("Readiness check failed: {0}")]
    Readiness(PageError),
}
