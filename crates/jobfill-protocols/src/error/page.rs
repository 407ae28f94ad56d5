//! Live page errors.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PageError {
    /// The page navigated away or its session closed; every handle is invalid.
    #[error("Page is gone: {0}")]
    Gone(String),

    /// A single control disappeared from the page.
    #[error("Stale element handle: {0}")]
    StaleHandle(String),

    #[error("Page script failed: {0}")]
    Script(String),

    #[error("Page transport error: {0}")]
    Transport(String),
}

impl PageError {
    /// Whether the error invalidates the whole page visit rather than one control.
    pub fn is_gone(&self) -> bool {
        matches!(self, PageError::Gone(_))
    }
}
