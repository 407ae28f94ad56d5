//! [`Page`] over a CDP session and the in-page bridge.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use jobfill_protocols::{
    ControlSnapshot, ControlState, DocumentBlob, DomEvent, ElementHandle, ListboxProbe, Page,
    PageError,
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, trace};

use crate::bridge::{BRIDGE_SOURCE, Reply, invocation};
use crate::cdp::{CdpError, PageSession};

pub(crate) fn page_error(e: CdpError) -> PageError {
    if e.is_context_lost() {
        return PageError::Gone(e.to_string());
    }
    match e {
        CdpError::JavaScript(msg) => PageError::Script(msg),
        other => PageError::Transport(other.to_string()),
    }
}

/// One browser tab.
pub struct CdpPage {
    session: PageSession,
}

impl CdpPage {
    pub fn new(session: PageSession) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &PageSession {
        &self.session
    }

    async fn invoke<T: DeserializeOwned + Send>(&self, method: &str, args: &[Value]) -> Result<T, PageError> {
        let expression = invocation(method, args);
        let mut raw = self.session.evaluate(&expression).await.map_err(page_error)?;
        if raw.is_null() {
            debug!("Installing page bridge");
            self.session.evaluate(BRIDGE_SOURCE).await.map_err(page_error)?;
            raw = self.session.evaluate(&expression).await.map_err(page_error)?;
        }
        trace!("bridge {} -> {}", method, raw);

        let reply: Reply = serde_json::from_value(raw)
            .map_err(|e| PageError::Script(format!("bad bridge reply for {}: {}", method, e)))?;
        let value = reply.into_result()?;
        serde_json::from_value(value).map_err(|e| PageError::Script(format!("bad {} result: {}", method, e)))
    }

    async fn invoke_on(&self, method: &str, handle: &ElementHandle, extra: &[Value]) -> Result<(), PageError> {
        let mut args = vec![json!(handle)];
        args.extend_from_slice(extra);
        self.invoke::<Value>(method, &args).await.map(|_| ())
    }
}

#[async_trait]
impl Page for CdpPage {
    async fn url(&self) -> Result<String, PageError> {
        self.session.current_url().await.map_err(page_error)
    }

    async fn has_form_signal(&self) -> Result<bool, PageError> {
        self.invoke("hasFormSignal", &[]).await
    }

    async fn mutation_epoch(&self) -> Result<u64, PageError> {
        self.invoke("epoch", &[]).await
    }

    async fn controls(&self) -> Result<Vec<ControlSnapshot>, PageError> {
        self.invoke("controls", &[]).await
    }

    async fn control_state(&self, handle: &ElementHandle) -> Result<ControlState, PageError> {
        self.invoke("state", &[json!(handle)]).await
    }

    async fn focus(&self, handle: &ElementHandle) -> Result<(), PageError> {
        self.invoke_on("focus", handle, &[]).await
    }

    async fn pointer_click(&self, handle: &ElementHandle) -> Result<(), PageError> {
        self.invoke_on("pointerClick", handle, &[]).await
    }

    async fn user_click(&self, handle: &ElementHandle) -> Result<(), PageError> {
        self.invoke_on("userClick", handle, &[]).await
    }

    async fn set_native_value(&self, handle: &ElementHandle, value: &str) -> Result<(), PageError> {
        self.invoke_on("setValue", handle, &[json!(value)]).await
    }

    async fn dispatch(&self, handle: &ElementHandle, event: DomEvent) -> Result<(), PageError> {
        self.invoke_on("dispatch", handle, &[json!(event.as_str())]).await
    }

    async fn select_native_option(&self, handle: &ElementHandle, index: usize) -> Result<(), PageError> {
        self.invoke_on("selectIndex", handle, &[json!(index)]).await
    }

    async fn press_escape(&self, handle: &ElementHandle) -> Result<(), PageError> {
        self.invoke_on("focus", handle, &[]).await?;
        self.session.press_key("Escape").await.map_err(page_error)
    }

    async fn click_outside(&self) -> Result<(), PageError> {
        self.invoke::<Value>("clickOutside", &[]).await.map(|_| ())
    }

    async fn listbox_probe(&self, handle: &ElementHandle) -> Result<ListboxProbe, PageError> {
        self.invoke("listboxProbe", &[json!(handle)]).await
    }

    async fn attach_file(&self, handle: &ElementHandle, blob: &DocumentBlob) -> Result<bool, PageError> {
        let data = STANDARD.encode(&blob.bytes);
        self.invoke(
            "attachFile",
            &[
                json!(handle),
                json!(blob.filename),
                json!(blob.mime_type),
                json!(data),
            ],
        )
        .await
    }
}
