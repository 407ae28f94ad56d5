//! Page.* commands: navigation, load waiting and URL lookup.

use std::time::Duration;

use serde_json::json;
use tokio::time::{Instant, sleep};
use tracing::debug;

use crate::cdp::error::CdpError;
use crate::cdp::protocol::NavigationHistory;

use super::core::PageSession;

const LOAD_TIMEOUT: Duration = Duration::from_secs(30);
const LOAD_POLL: Duration = Duration::from_millis(100);

fn is_loaded(ready_state: &str) -> bool {
    matches!(ready_state, "interactive" | "complete")
}

impl PageSession {
    /// Load `url` and return once the document is at least interactive.
    pub async fn navigate(&self, url: &str) -> Result<(), CdpError> {
        let reply = self.call("Page.navigate", Some(json!({ "url": url }))).await?;
        if let Some(reason) = reply.get("errorText").and_then(|v| v.as_str()) {
            return Err(CdpError::NavigationFailed(format!("{} ({})", url, reason)));
        }
        self.wait_for_load().await?;
        debug!("Loaded {}", url);
        Ok(())
    }

    pub async fn wait_for_load(&self) -> Result<(), CdpError> {
        let deadline = Instant::now() + LOAD_TIMEOUT;
        while Instant::now() < deadline {
            let state = self.evaluate("document.readyState").await?;
            if state.as_str().is_some_and(is_loaded) {
                return Ok(());
            }
            sleep(LOAD_POLL).await;
        }
        Err(CdpError::Timeout("document load".to_string()))
    }

    /// Top-level URL, read from the navigation history so it works while
    /// the page's script context is being replaced.
    pub async fn current_url(&self) -> Result<String, CdpError> {
        let reply = self.call("Page.getNavigationHistory", None).await?;
        let history: NavigationHistory = serde_json::from_value(reply)?;
        match history.current_url() {
            Some(url) => Ok(url.to_string()),
            None => Err(CdpError::InvalidResponse("navigation history is empty".to_string())),
        }
    }
}
