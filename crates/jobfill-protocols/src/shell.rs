//! Host shell collaborator.

use serde::{Deserialize, Serialize};

/// User-visible run status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FillStatus {
    Running,
    Success {
        filled: usize,
        resume: bool,
        cover_letter: bool,
        ai_filled: usize,
    },
    Error {
        reason: String,
    },
}

/// Fire-and-forget notifications to the host shell.
pub trait ShellNotifier: Send + Sync {
    fn status(&self, url: &str, status: FillStatus);

    /// Ask the shell to open its configuration surface.
    fn open_configuration(&self);
}
