//! Browser lifecycle.
//!
//! Launches Chrome with a persistent profile when nothing is listening on the
//! debug port, so the applicant stays logged in to job boards between runs.

mod manager_core;
mod manager_types;

pub use manager_core::BrowserManager;
pub use manager_types::{BrowserError, endpoint, profile_dir};

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
