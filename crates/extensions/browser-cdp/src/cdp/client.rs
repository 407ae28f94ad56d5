//! CDP WebSocket client.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio::sync::{RwLock, mpsc, oneshot};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, trace, warn};

use super::error::CdpError;
use super::protocol::{BrowserVersion, CdpRequest, CdpResponse, PageInfo};
use super::session::PageSession;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;

type PendingMap = Arc<Mutex<HashMap<u64, PendingRequest>>>;
type EventHandlers = Arc<RwLock<HashMap<String, mpsc::UnboundedSender<CdpResponse>>>>;

/// Upper bound for any single CDP round trip.
pub(crate) const CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Request waiting for its response.
pub(crate) struct PendingRequest {
    pub tx: oneshot::Sender<Result<Value, CdpError>>,
}

/// The shared socket half plus request bookkeeping. Cloned into every
/// [`PageSession`] so sessions multiplex over the browser connection.
#[derive(Clone)]
pub(crate) struct Wire {
    sink: Arc<tokio::sync::Mutex<WsSink>>,
    pending: PendingMap,
    next_id: Arc<AtomicU64>,
}

impl Wire {
    fn new(sink: WsSink, pending: PendingMap) -> Self {
        Self {
            sink: Arc::new(tokio::sync::Mutex::new(sink)),
            pending,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Send `method` (scoped to `session_id` when given) and wait for its reply.
    pub(crate) async fn send(
        &self,
        method: &str,
        params: Option<Value>,
        session_id: Option<&str>,
    ) -> Result<Value, CdpError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let frame = serde_json::to_string(&CdpRequest {
            id,
            method: method.to_string(),
            params,
            session_id: session_id.map(str::to_string),
        })?;
        trace!("CDP send: {}", frame);

        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(id, PendingRequest { tx });
        let sent = self.sink.lock().await.send(Message::Text(frame.into())).await;
        if let Err(e) = sent {
            self.pending.lock().remove(&id);
            return Err(e.into());
        }

        match tokio::time::timeout(CALL_TIMEOUT, rx).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(_)) => Err(CdpError::SessionClosed),
            Err(_) => {
                self.pending.lock().remove(&id);
                Err(CdpError::Timeout(format!("{} (id {})", method, id)))
            }
        }
    }
}

/// Hand a response to its waiter, or an event to its session's channel.
async fn route(message: CdpResponse, pending: &PendingMap, event_handlers: &EventHandlers) {
    if let Some(id) = message.id {
        let Some(waiter) = pending.lock().remove(&id) else {
            trace!("Response {} has no waiter", id);
            return;
        };
        let result = match message.error {
            Some(error) => Err(CdpError::Protocol {
                code: error.code,
                message: error.message,
            }),
            None => Ok(message.result.unwrap_or(Value::Null)),
        };
        let _ = waiter.tx.send(result);
        return;
    }
    if message.method.is_some() {
        let session_id = message.session_id.clone().unwrap_or_default();
        if let Some(tx) = event_handlers.read().await.get(&session_id) {
            let _ = tx.send(message);
        }
    }
}

/// Connection to one browser. Pages are reached through [`PageSession`]s.
pub struct CdpClient {
    http_endpoint: String,
    browser_ws_url: String,
    wire: Wire,
    event_handlers: EventHandlers,
    _recv_task: tokio::task::JoinHandle<()>,
}

impl CdpClient {
    /// Connect to Chrome at the given debugging endpoint, e.g. `http://localhost:9222`.
    pub async fn connect(endpoint: &str) -> Result<Self, CdpError> {
        let http_endpoint = endpoint.trim_end_matches('/').to_string();
        let version = Self::discover(&http_endpoint).await?;
        debug!("{} speaks DevTools {}", version.browser, version.protocol_version);

        let browser_ws_url = version.web_socket_debugger_url;
        let (ws_stream, _) = tokio_tungstenite::connect_async(&browser_ws_url)
            .await
            .map_err(|e| CdpError::ConnectionFailed(format!("{} ({})", browser_ws_url, e)))?;

        let (ws_sink, ws_source) = ws_stream.split();
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let event_handlers: EventHandlers = Arc::new(RwLock::new(HashMap::new()));
        let recv_task = tokio::spawn(Self::receive_loop(
            ws_source,
            pending.clone(),
            event_handlers.clone(),
        ));
        debug!("DevTools socket open at {}", browser_ws_url);

        Ok(Self {
            http_endpoint,
            browser_ws_url,
            wire: Wire::new(ws_sink, pending),
            event_handlers,
            _recv_task: recv_task,
        })
    }

    /// Read `/json/version`, which carries the browser-level socket URL.
    async fn discover(http_endpoint: &str) -> Result<BrowserVersion, CdpError> {
        let unavailable = |e: reqwest::Error| CdpError::ChromeNotAvailable(format!("{} ({})", http_endpoint, e));
        reqwest::get(format!("{}/json/version", http_endpoint))
            .await
            .map_err(unavailable)?
            .json()
            .await
            .map_err(unavailable)
    }

    async fn receive_loop(mut ws_source: WsSource, pending: PendingMap, event_handlers: EventHandlers) {
        while let Some(frame) = ws_source.next().await {
            let text = match frame {
                Ok(Message::Text(text)) => text,
                Ok(Message::Close(_)) => {
                    debug!("Browser closed the DevTools socket");
                    break;
                }
                Ok(_) => continue,
                Err(e) => {
                    error!("DevTools socket failed: {}", e);
                    break;
                }
            };
            trace!("CDP recv: {}", text);
            match serde_json::from_str::<CdpResponse>(&text) {
                Ok(message) => route(message, &pending, &event_handlers).await,
                Err(e) => warn!("Unparseable CDP frame: {}", e),
            }
        }
        // Dropping the senders fails every waiter with SessionClosed.
        pending.lock().clear();
    }

    /// Send a browser-level CDP command.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.wire.send(method, params, None).await
    }

    pub fn browser_ws_url(&self) -> &str {
        &self.browser_ws_url
    }

    pub async fn list_pages(&self) -> Result<Vec<PageInfo>, CdpError> {
        let listing = reqwest::get(format!("{}/json/list", self.http_endpoint)).await?;
        Ok(listing.json().await?)
    }

    /// Open a new tab, optionally at `url`, and attach to it.
    pub async fn new_page(&self, url: Option<&str>) -> Result<PageSession, CdpError> {
        let mut create = format!("{}/json/new", self.http_endpoint);
        if let Some(url) = url {
            create.push('?');
            create.push_str(url);
        }
        // Current Chrome rejects GET on /json/new.
        let target: PageInfo = reqwest::Client::new().put(&create).send().await?.json().await?;
        debug!("New tab {} at {}", target.id, target.url);
        self.attach_page(&target.id).await
    }

    /// Attach to an existing tab.
    pub async fn attach_page(&self, target_id: &str) -> Result<PageSession, CdpError> {
        let reply = self
            .call("Target.attachToTarget", Some(json!({ "targetId": target_id, "flatten": true })))
            .await?;
        let Some(session_id) = reply.get("sessionId").and_then(Value::as_str).map(str::to_string) else {
            return Err(CdpError::InvalidResponse("attachToTarget returned no sessionId".to_string()));
        };

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        self.event_handlers
            .write()
            .await
            .insert(session_id.clone(), event_tx);

        let session = PageSession::new(target_id.to_string(), session_id, self.wire.clone(), event_rx);
        session.enable_domains().await?;
        Ok(session)
    }

    pub async fn close_page(&self, target_id: &str) -> Result<(), CdpError> {
        self.call("Target.closeTarget", Some(json!({"targetId": target_id})))
            .await?;
        Ok(())
    }
}

impl Drop for CdpClient {
    fn drop(&mut self) {
        self._recv_task.abort();
    }
}
