//! The per-tab handle: a flattened target session over the browser socket.

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::debug;

use crate::cdp::client::Wire;
use crate::cdp::error::CdpError;
use crate::cdp::protocol::CdpResponse;

pub struct PageSession {
    target_id: String,
    session_id: String,
    wire: Wire,
    /// Held so the router's sender for this session stays open.
    _events: mpsc::UnboundedReceiver<CdpResponse>,
}

impl PageSession {
    pub(crate) fn new(
        target_id: String,
        session_id: String,
        wire: Wire,
        events: mpsc::UnboundedReceiver<CdpResponse>,
    ) -> Self {
        Self {
            target_id,
            session_id,
            wire,
            _events: events,
        }
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Send `method` to this tab.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.wire.send(method, params, Some(&self.session_id)).await
    }

    /// The bridge needs page lifecycle and runtime evaluation; nothing else.
    pub(crate) async fn enable_domains(&self) -> Result<(), CdpError> {
        for domain in ["Page.enable", "Runtime.enable"] {
            self.call(domain, None).await?;
        }
        debug!("Session {} ready", self.session_id);
        Ok(())
    }
}
