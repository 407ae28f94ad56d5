//! Per-URL run idempotence for one browsing session.

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::debug;
use url::Url;

#[derive(Debug, Default, Clone, Copy)]
struct GuardEntry {
    ran: bool,
    retried: bool,
    dismissed: bool,
}

/// Session-scoped flags keyed by page URL.
///
/// At most one run per key, plus at most one retry after it.
#[derive(Debug, Default)]
pub struct RunGuard {
    entries: Mutex<HashMap<String, GuardEntry>>,
}

impl RunGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page identity: the URL without its fragment.
    pub fn key(url: &str) -> String {
        match Url::parse(url) {
            Ok(mut parsed) => {
                parsed.set_fragment(None);
                parsed.to_string()
            }
            Err(_) => url.split('#').next().unwrap_or(url).to_string(),
        }
    }

    /// Claim the first run for `url`. False when a run already happened.
    pub fn try_begin(&self, url: &str) -> bool {
        let mut entries = self.entries.lock();
        let entry = entries.entry(Self::key(url)).or_default();
        if entry.ran {
            debug!("Run already claimed for {}", url);
            return false;
        }
        entry.ran = true;
        true
    }

    pub fn has_run(&self, url: &str) -> bool {
        self.entries
            .lock()
            .get(&Self::key(url))
            .is_some_and(|e| e.ran)
    }

    /// Claim the single retry permitted after a first run.
    pub fn try_begin_retry(&self, url: &str) -> bool {
        let mut entries = self.entries.lock();
        match entries.get_mut(&Self::key(url)) {
            Some(entry) if entry.ran && !entry.retried => {
                entry.retried = true;
                true
            }
            _ => false,
        }
    }

    /// Record that the user dismissed the prompt for this page.
    pub fn dismiss(&self, url: &str) {
        self.entries.lock().entry(Self::key(url)).or_default().dismissed = true;
    }

    pub fn is_dismissed(&self, url: &str) -> bool {
        self.entries
            .lock()
            .get(&Self::key(url))
            .is_some_and(|e| e.dismissed)
    }

    /// End of session.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}
